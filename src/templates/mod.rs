//! Built-in theme templates using the Tera template engine
//!
//! All templates are embedded directly in the binary; there is no
//! theme directory to resolve at run time.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Disable autoescaping: the generator emits pre-escaped HTML
        // fragments (rich text bodies, embed scripts)
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("comet/layout.html")),
            ("index.html", include_str!("comet/index.html")),
            ("post.html", include_str!("comet/post.html")),
            ("loading.html", include_str!("comet/loading.html")),
            (
                "partials/header.html",
                include_str!("comet/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Site-wide template data
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
}

/// One post summary on the list page, dates preformatted
#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
}

/// One content section on the post page, body already rendered
#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: Option<String>,
    pub body_html: String,
}

/// Post-page header data
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub uid: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub reading_time: usize,
    pub banner_url: Option<String>,
}
