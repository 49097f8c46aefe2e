//! Post models
//!
//! Immutable snapshots of CMS documents, mapped once at the wire
//! boundary. Identity is the document uid.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cms::{Block, ContentSection, Document};

/// Assumed reading rate for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// A post as it appears in the list page
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: doc.data.title.clone(),
            subtitle: doc.data.subtitle.clone(),
            author: doc.data.author.clone(),
        }
    }
}

/// A full post as it appears on its detail page
#[derive(Debug, Clone)]
pub struct Post {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: Option<String>,
    /// Ordered content sections, never reordered or merged
    pub content: Vec<Section>,
}

/// One content section: an optional heading plus rich text blocks
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: Option<String>,
    pub body: Vec<Block>,
}

impl Section {
    fn from_wire(section: &ContentSection) -> Self {
        // Empty headings collapse to None so templates can skip them
        let heading = section
            .heading
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .map(|h| h.to_string());
        Self {
            heading,
            body: section.body.clone(),
        }
    }

    /// Whitespace-delimited token count of heading plus body.
    ///
    /// An absent heading contributes zero tokens; it must not poison
    /// the total.
    pub fn word_count(&self) -> usize {
        let heading_words = self
            .heading
            .as_deref()
            .map(count_words)
            .unwrap_or(0);
        let body_words: usize = self.body.iter().map(|b| count_words(&b.text)).sum();
        heading_words + body_words
    }
}

impl Post {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: doc.data.title.clone(),
            subtitle: doc.data.subtitle.clone(),
            author: doc.data.author.clone(),
            banner_url: doc.data.banner.url.clone(),
            content: doc.data.content.iter().map(Section::from_wire).collect(),
        }
    }

    /// Estimated reading time in whole minutes, rounded up
    pub fn reading_time(&self) -> usize {
        let words: usize = self.content.iter().map(Section::word_count).sum();
        words.div_ceil(WORDS_PER_MINUTE)
    }
}

/// A chronological neighbor of a post, reduced to link material
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub uid: String,
    pub title: String,
}

impl NavPost {
    /// Absence is valid: the first and last posts have one neighbor only
    pub fn from_document(doc: &Document) -> Option<Self> {
        let uid = doc.uid.clone()?;
        Some(Self {
            uid,
            title: doc.data.title.clone(),
        })
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{Block, BlockKind};

    fn text_block(text: &str) -> Block {
        Block {
            kind: BlockKind::Paragraph,
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
        }
    }

    fn section(heading: Option<&str>, bodies: &[&str]) -> Section {
        Section {
            heading: heading.map(|h| h.to_string()),
            body: bodies.iter().map(|b| text_block(b)).collect(),
        }
    }

    fn post_with(content: Vec<Section>) -> Post {
        Post {
            uid: "p".to_string(),
            first_publication_date: None,
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
            banner_url: None,
            content,
        }
    }

    #[test]
    fn test_reading_time_single_section() {
        // heading "a b" (2) + body "c d e" (3) = 5 words -> ceil(5/200) = 1
        let post = post_with(vec![section(Some("a b"), &["c d e"])]);
        assert_eq!(post.reading_time(), 1);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let long = "word ".repeat(201);
        let post = post_with(vec![section(None, &[long.as_str()])]);
        assert_eq!(post.reading_time(), 2);
    }

    #[test]
    fn test_reading_time_empty_content() {
        let post = post_with(vec![]);
        assert_eq!(post.reading_time(), 0);
    }

    #[test]
    fn test_absent_heading_contributes_zero() {
        let with = post_with(vec![section(Some("x y"), &["a b c"])]);
        let without = post_with(vec![section(None, &["a b c"])]);
        assert_eq!(with.reading_time(), 1);
        assert_eq!(without.reading_time(), 1);
    }

    #[test]
    fn test_from_document_preserves_section_order() {
        let json = serde_json::json!({
            "id": "X",
            "uid": "ordered",
            "type": "post",
            "data": {
                "title": "T",
                "content": [
                    {"heading": "one", "body": []},
                    {"heading": "two", "body": []},
                    {"heading": "", "body": [{"type": "paragraph", "text": "tail"}]}
                ]
            }
        });
        let doc: crate::cms::Document = serde_json::from_value(json).unwrap();
        let post = Post::from_document(&doc);
        assert_eq!(post.content.len(), 3);
        assert_eq!(post.content[0].heading.as_deref(), Some("one"));
        assert_eq!(post.content[1].heading.as_deref(), Some("two"));
        // Empty heading collapses to None
        assert!(post.content[2].heading.is_none());
        assert_eq!(post.content[2].body[0].text, "tail");
    }
}
