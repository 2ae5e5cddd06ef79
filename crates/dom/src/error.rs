//! Error types for DOM operations

use thiserror::Error;

use crate::types::NodeId;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Document has no root element")]
    NoRoot,

    #[error("Cannot append node {child} to its own descendant {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
