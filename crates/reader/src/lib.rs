//! TechDocs Reader
//!
//! Fetches MkDocs-rendered pages from docs storage and turns them into a
//! document that can be mounted inside an application.
//!
//! # Architecture
//!
//! ```text
//! storage (api) → markup → pre-render steps → ShadowRoot → post-render steps
//!                                                  ↑              ↓
//!                                   Host (location, scroll)   listeners
//! ```
//!
//! 1. **Steps are values**: every rewrite is a [`Transformer`]; a pipeline is
//!    a slice of them. `None` from any step halts the run.
//! 2. **The host is a trait**: routing, scrolling and window events go
//!    through [`Host`], never a real browser.
//! 3. **Listeners are paired**: every window listener comes with a guard
//!    that removes it exactly once.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod listeners;
pub mod pipeline;
pub mod reader;
pub mod shadow;
pub mod sidebar;
pub mod theme;
pub mod transformers;

pub use api::{EntityName, HttpStorageApi, TechDocsStorageApi};
pub use config::ReaderConfig;
pub use error::{ConfigError, ReaderError, Result, StorageError};
pub use events::{EventBus, ReaderEvent};
pub use host::{HeadlessHost, Host, HostAction};
pub use listeners::{WindowEventKind, WindowListenerGuard, WindowListeners};
pub use pipeline::{transform, Source, Steps, Transformer};
pub use reader::{DocsKey, LoadOutcome, Reader, ReaderState, ReaderView};
pub use shadow::ShadowRoot;
pub use theme::Theme;

pub use techdocs_dom as dom;
