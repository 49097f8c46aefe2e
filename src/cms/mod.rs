//! Headless CMS query API: client, wire types and rich text rendering

mod client;
mod document;
mod error;
pub mod richtext;

pub use client::{ApiConfig, CmsClient, SearchQuery};
pub use document::{
    Banner, Block, BlockKind, ContentSection, Document, DocumentData, QueryResponse, Ref,
    Repository, Span, SpanData, SpanKind,
};
pub use error::{CmsError, Result};
