//! comet-rs: a static blog generator backed by a headless CMS
//!
//! This crate renders a paginated post list and individual post pages
//! from documents fetched out of a headless CMS query API, using Tera
//! templates with an embedded default theme.

pub mod cms;
pub mod commands;
pub mod comments;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main Comet application
#[derive(Clone)]
pub struct Comet {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets directory (copied verbatim into public)
    pub static_dir: std::path::PathBuf,
}

impl Comet {
    /// Create a new Comet instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        })
    }

    /// Generate the static site from the CMS
    pub async fn generate(&self, preview_ref: Option<&str>) -> Result<()> {
        commands::generate::run(self, preview_ref).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
