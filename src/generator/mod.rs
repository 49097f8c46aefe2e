//! Generator module - renders the site from CMS content using the
//! built-in Tera templates

use anyhow::Result;
use std::fs;
use tera::Context;
use walkdir::WalkDir;

use crate::cms::{richtext, CmsClient};
use crate::content::{NavPost, Post, PostList};
use crate::helpers::{display_date, month_abbreviations};
use crate::templates::{PostData, SectionData, SiteData, SummaryData, TemplateRenderer};
use crate::Comet;

/// Client-side incremental loader for the post list.
///
/// Mirrors the `PostList` semantics: new summaries append after the
/// existing items, the cursor attribute is replaced by each response,
/// and the button disappears once the cursor is exhausted. A failed
/// fetch keeps the current cursor so the action can be retried.
const LOAD_MORE_SCRIPT: &str = r#"<script>
(function () {
    var button = document.getElementById('load-more');
    if (!button) { return; }
    var root = button.getAttribute('data-root') || '/';
    var months = [];
    try { months = JSON.parse(button.getAttribute('data-months')) || []; } catch (err) {}
    function formatDate(value) {
        if (!value) { return ''; }
        var d = new Date(value);
        var day = ('0' + d.getUTCDate()).slice(-2);
        return day + ' ' + (months[d.getUTCMonth()] || '') + ' ' + d.getUTCFullYear();
    }
    function summaryNode(doc) {
        var item = document.createElement('a');
        item.className = 'post-summary';
        item.href = root + 'post/' + doc.uid;
        var title = document.createElement('h1');
        title.textContent = (doc.data && doc.data.title) || '';
        var subtitle = document.createElement('h3');
        subtitle.textContent = (doc.data && doc.data.subtitle) || '';
        var info = document.createElement('ul');
        info.className = 'post-info';
        var date = document.createElement('li');
        date.className = 'date';
        date.textContent = formatDate(doc.first_publication_date);
        var author = document.createElement('li');
        author.className = 'author';
        author.textContent = (doc.data && doc.data.author) || '';
        info.appendChild(date);
        info.appendChild(author);
        item.appendChild(title);
        item.appendChild(subtitle);
        item.appendChild(info);
        return item;
    }
    button.addEventListener('click', function () {
        var next = button.getAttribute('data-next-page');
        if (!next) { return; }
        button.disabled = true;
        fetch(next)
            .then(function (res) { return res.json(); })
            .then(function (data) {
                var list = document.getElementById('post-list');
                (data.results || []).forEach(function (doc) {
                    list.appendChild(summaryNode(doc));
                });
                if (data.next_page) {
                    button.setAttribute('data-next-page', data.next_page);
                    button.disabled = false;
                } else {
                    button.remove();
                }
            })
            .catch(function (err) {
                console.error('load more failed, keeping current cursor', err);
                button.disabled = false;
            });
    });
})();
</script>"#;

/// Counts reported after a full generation
pub struct GenerateStats {
    pub posts: usize,
}

/// Static site generator
pub struct Generator {
    comet: Comet,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(comet: &Comet) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            comet: comet.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub async fn generate(
        &self,
        client: &CmsClient,
        preview_ref: Option<&str>,
    ) -> Result<GenerateStats> {
        fs::create_dir_all(&self.comet.public_dir)?;

        self.write_stylesheet()?;
        self.copy_static_assets()?;

        self.generate_index(client).await?;

        let uids = self.prerender_uids(client).await?;
        for uid in &uids {
            self.generate_post(client, uid, preview_ref).await?;
        }

        Ok(GenerateStats { posts: uids.len() })
    }

    /// Generate the list page from the first page of summaries
    async fn generate_index(&self, client: &CmsClient) -> Result<()> {
        let doc_type = client.document_type();
        let fields = [
            format!("{}.title", doc_type),
            format!("{}.subtitle", doc_type),
            format!("{}.author", doc_type),
        ];
        let fields: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();

        let response = client
            .query()
            .at("document.type", doc_type)
            .fetch(&fields)
            .page_size(self.comet.config.pagination.per_page)
            .orderings("[document.first_publication_date desc]")
            .send()
            .await?;

        let list = PostList::from_response(&response);
        let html = self.render_index(&list)?;

        let output_path = self.comet.public_dir.join("index.html");
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    pub(crate) fn render_index(&self, list: &PostList) -> Result<String> {
        let language = &self.comet.config.language;
        let posts: Vec<SummaryData> = list
            .results
            .iter()
            .map(|p| SummaryData {
                uid: p.uid.clone(),
                title: p.title.clone(),
                subtitle: p.subtitle.clone(),
                author: p.author.clone(),
                date: display_date(p.first_publication_date.as_ref(), language),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &posts);
        context.insert(
            "next_page",
            &list.next_page.as_ref().map(|u| u.as_str().to_string()),
        );
        context.insert(
            "months",
            &serde_json::to_string(month_abbreviations(language))?,
        );
        context.insert("load_more_script", LOAD_MORE_SCRIPT);

        self.renderer.render("index.html", &context)
    }

    /// The bounded set of uids generated at build time; everything else
    /// goes through the server fallback path
    async fn prerender_uids(&self, client: &CmsClient) -> Result<Vec<String>> {
        let response = client
            .query()
            .at("document.type", client.document_type())
            .page_size(self.comet.config.pagination.prerender_limit)
            .orderings("[document.first_publication_date desc]")
            .send()
            .await?;

        Ok(response
            .results
            .iter()
            .filter_map(|doc| doc.uid.clone())
            .collect())
    }

    /// Generate a single post page
    pub async fn generate_post(
        &self,
        client: &CmsClient,
        uid: &str,
        preview_ref: Option<&str>,
    ) -> Result<()> {
        let doc = client.get_by_uid(uid, preview_ref).await?;

        // Neighbors always resolve against published content
        let prev = self
            .neighbor(client, &doc.id, "[document.first_publication_date]")
            .await?;
        let next = self
            .neighbor(client, &doc.id, "[document.last_publication_date desc]")
            .await?;

        let post = Post::from_document(&doc);
        let html = self.render_post(&post, prev, next, preview_ref.is_some())?;

        let output_path = self
            .comet
            .public_dir
            .join("post")
            .join(uid)
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated post: {:?}", output_path);

        Ok(())
    }

    /// Fetch at most one chronological neighbor of a document
    async fn neighbor(
        &self,
        client: &CmsClient,
        after_id: &str,
        orderings: &str,
    ) -> Result<Option<NavPost>> {
        let response = client
            .query()
            .at("document.type", client.document_type())
            .page_size(1)
            .after(after_id)
            .orderings(orderings)
            .send()
            .await?;

        Ok(response.results.first().and_then(NavPost::from_document))
    }

    pub(crate) fn render_post(
        &self,
        post: &Post,
        prev: Option<NavPost>,
        next: Option<NavPost>,
        preview: bool,
    ) -> Result<String> {
        let language = &self.comet.config.language;

        let sections: Vec<SectionData> = post
            .content
            .iter()
            .map(|s| SectionData {
                heading: s.heading.clone(),
                body_html: richtext::as_html(&s.body),
            })
            .collect();

        let post_data = PostData {
            uid: post.uid.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            date: display_date(post.first_publication_date.as_ref(), language),
            reading_time: post.reading_time(),
            banner_url: post.banner_url.clone(),
        };

        let mut context = self.base_context();
        context.insert("post", &post_data);
        context.insert("sections", &sections);
        context.insert("prev_post", &prev);
        context.insert("next_post", &next);
        context.insert("preview", &preview);
        context.insert("comments_html", &self.comet.config.comments.mount_html());

        self.renderer.render("post.html", &context)
    }

    /// Render the transient placeholder served while a fallback post
    /// resolves
    pub fn render_loading(&self) -> Result<String> {
        let context = self.base_context();
        self.renderer.render("loading.html", &context)
    }

    /// Create a base context with common variables
    fn base_context(&self) -> Context {
        let config = &self.comet.config;
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: config.title.clone(),
                subtitle: config.subtitle.clone(),
                description: config.description.clone(),
                author: config.author.clone(),
                language: config.language.clone(),
                root: config.root.clone(),
            },
        );
        context
    }

    /// Write the embedded stylesheet
    fn write_stylesheet(&self) -> Result<()> {
        let output_path = self.comet.public_dir.join("style.css");
        fs::write(&output_path, include_str!("../templates/comet/style.css"))?;
        Ok(())
    }

    /// Copy static assets (logo, images, etc.) to the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.comet.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.comet.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::QueryResponse;
    use crate::config::SiteConfig;

    fn test_comet() -> Comet {
        let mut config = SiteConfig::default();
        config.comments.repo = "me/my-blog".to_string();
        Comet {
            config,
            base_dir: std::path::PathBuf::from("."),
            public_dir: std::path::PathBuf::from("public"),
            static_dir: std::path::PathBuf::from("static"),
        }
    }

    fn list_with(uids: &[&str], next_page: Option<&str>) -> PostList {
        let results: Vec<serde_json::Value> = uids
            .iter()
            .map(|uid| {
                serde_json::json!({
                    "id": format!("id-{uid}"),
                    "uid": uid,
                    "type": "post",
                    "first_publication_date": "2021-04-19T20:55:29+0000",
                    "data": {"title": format!("Title {uid}"), "subtitle": "sub", "author": "Ada"}
                })
            })
            .collect();
        let response: QueryResponse = serde_json::from_value(serde_json::json!({
            "page": 1,
            "next_page": next_page,
            "results": results,
        }))
        .unwrap();
        PostList::from_response(&response)
    }

    fn sample_post() -> Post {
        let doc: crate::cms::Document = serde_json::from_value(serde_json::json!({
            "id": "X1",
            "uid": "hello-world",
            "type": "post",
            "first_publication_date": "2021-04-19T20:55:29+0000",
            "data": {
                "title": "Hello world",
                "subtitle": "first contact",
                "author": "Ada",
                "banner": {"url": "https://img.example.com/banner.png"},
                "content": [
                    {"heading": "a b", "body": [{"type": "paragraph", "text": "c d e"}]}
                ]
            }
        }))
        .unwrap();
        Post::from_document(&doc)
    }

    #[test]
    fn test_index_with_cursor_renders_load_more() {
        let generator = Generator::new(&test_comet()).unwrap();
        let list = list_with(&["a", "b"], Some("https://x/page/2"));
        let html = generator.render_index(&list).unwrap();
        assert!(html.contains(r#"id="load-more""#));
        assert!(html.contains(r#"data-next-page="https://x/page/2""#));
        assert!(html.contains("Title a"));
        assert!(html.contains("19 Apr 2021"));
    }

    #[test]
    fn test_index_without_cursor_has_no_load_more() {
        let generator = Generator::new(&test_comet()).unwrap();
        let html = generator.render_index(&list_with(&["a"], None)).unwrap();
        assert!(!html.contains("load-more"));
    }

    #[test]
    fn test_index_preserves_list_order() {
        let generator = Generator::new(&test_comet()).unwrap();
        let html = generator
            .render_index(&list_with(&["first", "second"], None))
            .unwrap();
        let first = html.find("Title first").unwrap();
        let second = html.find("Title second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_post_page_renders_content_and_reading_time() {
        let generator = Generator::new(&test_comet()).unwrap();
        let html = generator
            .render_post(&sample_post(), None, None, false)
            .unwrap();
        assert!(html.contains("Hello world"));
        assert!(html.contains("1 min"));
        assert!(html.contains("<h2>a b</h2>"));
        assert!(html.contains("<p>c d e</p>"));
        assert!(html.contains("https://img.example.com/banner.png"));
        // Comment widget mounts on the post page
        assert!(html.contains(r#"<section id="comments">"#));
        assert!(!html.contains("exit-preview"));
    }

    #[test]
    fn test_post_page_preview_mode_renders_exit_link() {
        let generator = Generator::new(&test_comet()).unwrap();
        let html = generator
            .render_post(&sample_post(), None, None, true)
            .unwrap();
        assert!(html.contains(r#"href="/api/exit-preview""#));
    }

    #[test]
    fn test_post_page_neighbor_links() {
        let generator = Generator::new(&test_comet()).unwrap();
        let prev = NavPost {
            uid: "older".to_string(),
            title: "Older".to_string(),
        };
        let html = generator
            .render_post(&sample_post(), Some(prev), None, false)
            .unwrap();
        assert!(html.contains("post/older"));
        assert!(html.contains("Previous post"));
        assert!(!html.contains("Next post"));
    }

    #[test]
    fn test_loading_page_has_placeholder() {
        let generator = Generator::new(&test_comet()).unwrap();
        let html = generator.render_loading().unwrap();
        assert!(html.contains("Loading..."));
        assert!(html.contains("location.reload"));
    }

    #[test]
    fn test_stylesheet_and_static_assets_land_in_public() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        std::fs::create_dir_all(base.join("static/img")).unwrap();
        std::fs::write(base.join("static/logo.svg"), "<svg/>").unwrap();
        std::fs::write(base.join("static/img/x.png"), "png").unwrap();

        let mut comet = test_comet();
        comet.base_dir = base.to_path_buf();
        comet.public_dir = base.join("public");
        comet.static_dir = base.join("static");
        std::fs::create_dir_all(&comet.public_dir).unwrap();

        let generator = Generator::new(&comet).unwrap();
        generator.write_stylesheet().unwrap();
        generator.copy_static_assets().unwrap();

        assert!(comet.public_dir.join("style.css").exists());
        assert!(comet.public_dir.join("logo.svg").exists());
        assert!(comet.public_dir.join("img/x.png").exists());
    }
}
