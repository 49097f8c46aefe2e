//! Third-party comment widget embedding
//!
//! The widget's embed contract is a single script tag: it self-renders
//! into the DOM wherever the tag is appended. The mount script emitted
//! here removes any pre-existing widget root before appending, so a
//! repeated mount leaves at most one widget on the page.

use serde::{Deserialize, Serialize};

/// Source of the widget client script
pub const WIDGET_SRC: &str = "https://utteranc.es/client.js";

/// Class the widget gives its root element once loaded
pub const WIDGET_ROOT_CLASS: &str = "utterances";

/// Comment widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    /// GitHub repository receiving the comment issues
    pub repo: String,
    /// Issue label; empty omits the attribute
    pub label: String,
    pub theme: String,
    /// Issue matching strategy: pathname, url, title or og:title
    pub issue_term: String,
    /// When set, all pages share this fixed issue instead of `issue_term`
    pub issue_number: Option<u64>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            repo: String::new(),
            label: "Comments".to_string(),
            theme: "github-dark".to_string(),
            issue_term: "pathname".to_string(),
            issue_number: None,
        }
    }
}

impl CommentsConfig {
    /// The widget only mounts when enabled and pointed at a repository
    pub fn is_enabled(&self) -> bool {
        self.enable && !self.repo.is_empty()
    }

    /// Attributes of the embed script tag, in emission order
    pub fn script_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("src", WIDGET_SRC.to_string()),
            ("crossorigin", "anonymous".to_string()),
            ("async", "true".to_string()),
            ("repo", self.repo.clone()),
        ];
        if !self.label.is_empty() {
            attrs.push(("label", self.label.clone()));
        }
        match self.issue_number {
            Some(n) => attrs.push(("issue-number", n.to_string())),
            None => attrs.push(("issue-term", self.issue_term.clone())),
        }
        attrs.push(("theme", self.theme.clone()));
        attrs
    }

    /// The comments container plus its mount script.
    ///
    /// Mounting is idempotent: an existing widget root is removed
    /// before the script element is appended.
    pub fn mount_html(&self) -> String {
        if !self.is_enabled() {
            return String::new();
        }

        let mut set_attrs = String::new();
        for (name, value) in self.script_attributes() {
            set_attrs.push_str(&format!(
                "    script.setAttribute('{}', '{}');\n",
                name,
                escape_js(&value)
            ));
        }

        format!(
            r#"<section id="comments"></section>
<script>
(function () {{
    var box = document.getElementById('comments');
    if (!box) {{
        return;
    }}
    var existing = document.getElementsByClassName('{root_class}')[0];
    if (existing) {{
        existing.remove();
    }}
    var script = document.createElement('script');
{set_attrs}    box.appendChild(script);
}})();
</script>
"#,
            root_class = WIDGET_ROOT_CLASS,
            set_attrs = set_attrs,
        )
    }
}

/// Escape a value for inclusion in a single-quoted JS string literal
fn escape_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '<' => out.push_str("\\x3c"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CommentsConfig {
        CommentsConfig {
            repo: "me/my-blog".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_without_repo() {
        let config = CommentsConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.mount_html(), "");
    }

    #[test]
    fn test_script_attributes() {
        let attrs = config().script_attributes();
        assert_eq!(attrs[0], ("src", WIDGET_SRC.to_string()));
        assert!(attrs.contains(&("crossorigin", "anonymous".to_string())));
        assert!(attrs.contains(&("async", "true".to_string())));
        assert!(attrs.contains(&("repo", "me/my-blog".to_string())));
        assert!(attrs.contains(&("label", "Comments".to_string())));
        assert!(attrs.contains(&("issue-term", "pathname".to_string())));
        assert!(attrs.contains(&("theme", "github-dark".to_string())));
    }

    #[test]
    fn test_empty_label_is_omitted() {
        let mut c = config();
        c.label = String::new();
        let attrs = c.script_attributes();
        assert!(!attrs.iter().any(|(name, _)| *name == "label"));
    }

    #[test]
    fn test_issue_number_replaces_issue_term() {
        let mut c = config();
        c.issue_number = Some(7);
        let attrs = c.script_attributes();
        assert!(attrs.contains(&("issue-number", "7".to_string())));
        assert!(!attrs.iter().any(|(name, _)| *name == "issue-term"));
    }

    #[test]
    fn test_mount_removes_existing_widget_before_appending() {
        let html = config().mount_html();
        let remove_at = html.find("existing.remove()").unwrap();
        let append_at = html.find("box.appendChild(script)").unwrap();
        assert!(remove_at < append_at);
    }

    #[test]
    fn test_mount_script_sets_repo() {
        let html = config().mount_html();
        assert!(html.contains("setAttribute('repo', 'me/my-blog')"));
        assert!(html.contains(r#"<section id="comments"></section>"#));
    }

    #[test]
    fn test_js_escaping() {
        let mut c = config();
        c.label = "it's <b>".to_string();
        let html = c.mount_html();
        assert!(html.contains(r"it\'s \x3cb>"));
    }
}
