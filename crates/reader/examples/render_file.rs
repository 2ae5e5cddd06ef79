//! Render a page from a local MkDocs site build
//!
//! Usage: render_file <site-dir> <kind> <name> [path]
//!
//! Pages are read from `<site-dir>/<kind>/default/<name>/<path>/index.html`.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use techdocs_reader::{
    EntityName, HeadlessHost, LoadOutcome, Reader, ReaderConfig, StorageError, TechDocsStorageApi,
};

struct SiteDirStorage {
    root: PathBuf,
}

#[async_trait]
impl TechDocsStorageApi for SiteDirStorage {
    async fn get_entity_docs(&self, entity: &EntityName, path: &str) -> Result<String, StorageError> {
        let file = self
            .root
            .join(&entity.kind)
            .join(&entity.namespace)
            .join(&entity.name)
            .join(path.trim_matches('/'))
            .join("index.html");

        tokio::fs::read_to_string(&file)
            .await
            .map_err(|_| StorageError::NotFound(file.display().to_string()))
    }

    fn api_origin(&self) -> String {
        "https://docs.example.com".to_string()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(site_dir), Some(kind), Some(name)) = (args.next(), args.next(), args.next()) else {
        eprintln!("usage: render_file <site-dir> <kind> <name> [path]");
        std::process::exit(2);
    };
    let path = args.next().unwrap_or_default();

    let host = Arc::new(HeadlessHost::parse(&format!(
        "http://localhost:3000/docs/default/{}/{}/{}",
        kind, name, path
    ))?);
    let storage = Arc::new(SiteDirStorage {
        root: PathBuf::from(site_dir),
    });
    let reader = Reader::new(storage, host, ReaderConfig::default());

    match reader.load(EntityName::new(kind, "default", name), path).await {
        LoadOutcome::Rendered => println!("{}", reader.shadow_root().to_html()?),
        outcome => {
            eprintln!("not rendered: {:?} ({:?})", outcome, reader.view());
            std::process::exit(1);
        }
    }

    Ok(())
}
