//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Comet;

/// Clean the public directory
pub fn run(comet: &Comet) -> Result<()> {
    if comet.public_dir.exists() {
        fs::remove_dir_all(&comet.public_dir)?;
        tracing::info!("Deleted: {:?}", comet.public_dir);
    }

    Ok(())
}
