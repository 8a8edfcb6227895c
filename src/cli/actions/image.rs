use crate::{
    cli::globals::GlobalArgs,
    client::{BlobRegistry, ObjectUrls},
};
use anyhow::{Context, Result};
use std::{fs, path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub url: String,
    pub output: PathBuf,
}

/// Execute the image action.
/// # Errors
/// Returns an error if the image cannot be loaded or written.
pub async fn execute(args: Args) -> Result<()> {
    let gateway = args.globals.gateway()?;
    let registry = Arc::new(BlobRegistry::new());
    let loader = gateway.image_loader(Arc::clone(&registry) as Arc<dyn ObjectUrls>);

    let object_url = loader
        .get_image_url(&args.url)
        .await
        .with_context(|| format!("failed to load image {}", args.url))?;

    let blob = registry
        .get(&object_url)
        .context("image payload missing from the blob registry")?;
    registry.revoke(&object_url);

    fs::write(&args.output, &blob.bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        "saved {} bytes ({}) to {}",
        blob.bytes.len(),
        blob.content_type.as_deref().unwrap_or("unknown type"),
        args.output.display()
    );

    Ok(())
}
