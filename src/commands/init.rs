//! Initialize a new Comet site

use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Comet configuration
title: My Blog
subtitle: ""
description: ""
author: John Doe
language: en

url: http://example.com
root: /

public_dir: public
static_dir: static

# Content backend
api:
  endpoint: ""           # e.g. https://my-repo.cdn.example.io/api/v2
  # access_token: ""
  document_type: post

pagination:
  per_page: 10
  prerender_limit: 20

# Comment widget
comments:
  enable: true
  repo: ""               # e.g. me/my-blog
  label: Comments
  theme: github-dark
  issue_term: pathname
"#;

/// Scaffold a site directory
pub fn run(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a _config.yml", target_dir);
    }

    fs::create_dir_all(target_dir)?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::create_dir_all(target_dir.join("static"))?;

    tracing::info!("Created {:?}", config_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_scaffolds_config_and_static_dir() {
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path()).unwrap();

        assert!(tmp.path().join("_config.yml").exists());
        assert!(tmp.path().join("static").is_dir());

        // The scaffolded config parses back
        let config = crate::config::SiteConfig::load(tmp.path().join("_config.yml")).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.api.document_type, "post");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path()).unwrap();
        assert!(run(tmp.path()).is_err());
    }
}
