//! Rich text to HTML rendering
//!
//! Turns the structured blocks of a document field into markup. Block
//! order is preserved; consecutive list items of the same kind group
//! into a single list element. Span offsets are character offsets into
//! the block text.

use super::document::{Block, BlockKind, Span, SpanKind};

/// Render a sequence of rich text blocks as HTML
pub fn as_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut blocks = blocks.iter().peekable();

    while let Some(block) = blocks.next() {
        match block.kind {
            BlockKind::Paragraph => {
                out.push_str("<p>");
                out.push_str(&render_spans(&block.text, &block.spans));
                out.push_str("</p>");
            }
            BlockKind::Heading1
            | BlockKind::Heading2
            | BlockKind::Heading3
            | BlockKind::Heading4
            | BlockKind::Heading5
            | BlockKind::Heading6 => {
                let level = heading_level(block.kind);
                out.push_str(&format!("<h{}>", level));
                out.push_str(&render_spans(&block.text, &block.spans));
                out.push_str(&format!("</h{}>", level));
            }
            BlockKind::Preformatted => {
                out.push_str("<pre>");
                out.push_str(&escape_html(&block.text));
                out.push_str("</pre>");
            }
            BlockKind::Image => {
                if let Some(url) = &block.url {
                    out.push_str(&format!(
                        r#"<img src="{}" alt="{}">"#,
                        escape_html(url),
                        escape_html(block.alt.as_deref().unwrap_or(""))
                    ));
                }
            }
            BlockKind::ListItem | BlockKind::OrderedListItem => {
                let tag = if block.kind == BlockKind::ListItem {
                    "ul"
                } else {
                    "ol"
                };
                out.push_str(&format!("<{}>", tag));
                out.push_str("<li>");
                out.push_str(&render_spans(&block.text, &block.spans));
                out.push_str("</li>");
                while let Some(next) = blocks.peek() {
                    if next.kind != block.kind {
                        break;
                    }
                    let item = blocks.next().unwrap();
                    out.push_str("<li>");
                    out.push_str(&render_spans(&item.text, &item.spans));
                    out.push_str("</li>");
                }
                out.push_str(&format!("</{}>", tag));
            }
            BlockKind::Unknown => {
                tracing::debug!("skipping rich text block of unknown kind");
            }
        }
    }

    out
}

fn heading_level(kind: BlockKind) -> u8 {
    match kind {
        BlockKind::Heading1 => 1,
        BlockKind::Heading2 => 2,
        BlockKind::Heading3 => 3,
        BlockKind::Heading4 => 4,
        BlockKind::Heading5 => 5,
        BlockKind::Heading6 => 6,
        _ => 6,
    }
}

/// Apply inline spans to a block's text, escaping as we go
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for idx in 0..=chars.len() {
        // Close before opening so adjacent spans nest cleanly
        for span in spans.iter().rev() {
            if span.end == idx {
                out.push_str(close_tag(span));
            }
        }
        for span in spans.iter() {
            if span.start == idx {
                out.push_str(&open_tag(span));
            }
        }
        if let Some(&c) = chars.get(idx) {
            push_escaped(&mut out, c);
        }
    }

    out
}

fn open_tag(span: &Span) -> String {
    match span.kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Hyperlink => {
            let url = span
                .data
                .as_ref()
                .and_then(|d| d.url.as_deref())
                .unwrap_or("");
            format!(r#"<a href="{}">"#, escape_html(url))
        }
        SpanKind::Unknown => String::new(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Unknown => "",
    }
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::super::document::SpanData;
    use super::*;

    fn block(kind: BlockKind, text: &str) -> Block {
        Block {
            kind,
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
        }
    }

    fn span(start: usize, end: usize, kind: SpanKind) -> Span {
        Span {
            start,
            end,
            kind,
            data: None,
        }
    }

    #[test]
    fn test_paragraph_with_strong_span() {
        let mut b = block(BlockKind::Paragraph, "hello world");
        b.spans.push(span(0, 5, SpanKind::Strong));
        assert_eq!(as_html(&[b]), "<p><strong>hello</strong> world</p>");
    }

    #[test]
    fn test_hyperlink_span() {
        let mut b = block(BlockKind::Paragraph, "see docs");
        b.spans.push(Span {
            start: 4,
            end: 8,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                url: Some("https://example.com".to_string()),
            }),
        });
        assert_eq!(
            as_html(&[b]),
            r#"<p>see <a href="https://example.com">docs</a></p>"#
        );
    }

    #[test]
    fn test_consecutive_list_items_group() {
        let blocks = vec![
            block(BlockKind::ListItem, "one"),
            block(BlockKind::ListItem, "two"),
            block(BlockKind::Paragraph, "after"),
        ];
        assert_eq!(
            as_html(&blocks),
            "<ul><li>one</li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn test_ordered_and_unordered_do_not_merge() {
        let blocks = vec![
            block(BlockKind::ListItem, "a"),
            block(BlockKind::OrderedListItem, "b"),
        ];
        assert_eq!(as_html(&blocks), "<ul><li>a</li></ul><ol><li>b</li></ol>");
    }

    #[test]
    fn test_heading_and_preformatted() {
        let blocks = vec![
            block(BlockKind::Heading2, "Title"),
            block(BlockKind::Preformatted, "a < b"),
        ];
        assert_eq!(as_html(&blocks), "<h2>Title</h2><pre>a &lt; b</pre>");
    }

    #[test]
    fn test_image_block() {
        let mut b = block(BlockKind::Image, "");
        b.url = Some("https://img.example.com/x.png".to_string());
        b.alt = Some("banner".to_string());
        assert_eq!(
            as_html(&[b]),
            r#"<img src="https://img.example.com/x.png" alt="banner">"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let b = block(BlockKind::Paragraph, "1 < 2 & \"q\"");
        assert_eq!(as_html(&[b]), "<p>1 &lt; 2 &amp; &quot;q&quot;</p>");
    }

    #[test]
    fn test_span_offsets_are_character_based() {
        // "é" is two bytes but one character; offsets must count characters
        let mut b = block(BlockKind::Paragraph, "café bar");
        b.spans.push(span(0, 4, SpanKind::Em));
        assert_eq!(as_html(&[b]), "<p><em>café</em> bar</p>");
    }

    #[test]
    fn test_unknown_block_is_skipped() {
        let blocks = vec![
            block(BlockKind::Unknown, "mystery"),
            block(BlockKind::Paragraph, "kept"),
        ];
        assert_eq!(as_html(&blocks), "<p>kept</p>");
    }
}
