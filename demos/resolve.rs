//! Example resolving a jextract installation and printing its version.
//!
//! ```text
//! cargo run --example resolve -- 22
//! cargo run --example resolve -- /opt/jextract-22
//! RUST_LOG=jextract_store=debug cargo run --example resolve
//! ```
//!
//! A numeric argument is a runtime version to download jextract for, anything
//! else a directory holding a local installation. The cache and distribution
//! data honour `JEXTRACT_STORE_CACHE_DIR` and `JEXTRACT_STORE_DISTRIBUTIONS`.
//!
//! The bundled data lists archive URLs only, so downloading needs
//! `JEXTRACT_STORE_DISTRIBUTIONS` pointing at a file that adds
//! `jextract.<version>.<os>.<arch>.sha-256` for the archive in question.

use color_eyre::Result;
use jextract_store::progress::ProgressBarOpts;
use jextract_store::{InstallationSelector, StoreBuilder};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let selector = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u32>() {
            Ok(runtime_version) => InstallationSelector::remote(runtime_version),
            Err(_) => InstallationSelector::local(PathBuf::from(arg)),
        },
        None => InstallationSelector::remote(22),
    };

    let store = StoreBuilder::from_env()
        .progress(ProgressBarOpts::with_pip_style())
        .build()?;

    let installation = store.resolve(&selector).await?;
    println!(
        "jextract {} at {}",
        installation.version,
        installation.executable.display()
    );

    // Ask the tool itself.
    let output = store
        .exec(&selector, |_, command| {
            command.arg("--version");
        })
        .await?;
    print!("{}", String::from_utf8_lossy(&output.stderr));

    Ok(())
}
