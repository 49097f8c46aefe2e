//! CMS query API client
//!
//! A thin wrapper over the repository's HTTP query interface. The
//! client resolves the master ref once at connect time; individual
//! queries may override the ref to read draft content (preview mode).

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::document::{Document, QueryResponse, Repository};
use super::error::{CmsError, Result};

const USER_AGENT: &str = concat!("comet-rs/", env!("CARGO_PKG_VERSION"));

/// Content backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Query API root, e.g. `https://my-repo.cdn.example.io/api/v2`
    pub endpoint: String,
    /// Access token for private repositories
    pub access_token: Option<String>,
    /// Document type holding blog posts
    pub document_type: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "post".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    fn to_builder(&self) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// An authenticated handle to the CMS query API
pub struct CmsClient {
    http: reqwest::Client,
    search_url: Url,
    access_token: Option<String>,
    document_type: String,
    master_ref: String,
}

impl CmsClient {
    /// Connect to the repository and resolve the master ref
    pub async fn connect(config: &ApiConfig) -> Result<Self> {
        let root_url = Url::parse(&config.endpoint)
            .map_err(|_| CmsError::InvalidEndpoint(config.endpoint.clone()))?;

        let mut search_url = root_url.clone();
        search_url
            .path_segments_mut()
            .map_err(|_| CmsError::InvalidEndpoint(config.endpoint.clone()))?
            .pop_if_empty()
            .extend(["documents", "search"]);

        let http = config.to_builder().build()?;

        let mut refs_url = root_url;
        if let Some(token) = &config.access_token {
            refs_url.query_pairs_mut().append_pair("access_token", token);
        }
        let repo: Repository = get_json(&http, refs_url).await?;
        let master_ref = repo
            .master_ref()
            .map(|r| r.reference.clone())
            .ok_or(CmsError::MissingMasterRef)?;

        tracing::debug!("Connected to {} (master ref {})", config.endpoint, master_ref);

        Ok(Self {
            http,
            search_url,
            access_token: config.access_token.clone(),
            document_type: config.document_type.clone(),
            master_ref,
        })
    }

    /// The ref published content resolves against
    pub fn master_ref(&self) -> &str {
        &self.master_ref
    }

    /// The configured post document type
    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    /// Start building a documents/search query
    pub fn query(&self) -> SearchQuery<'_> {
        SearchQuery::new(self)
    }

    /// Fetch one page at an opaque pagination cursor
    pub async fn fetch_page(&self, url: &Url) -> Result<QueryResponse> {
        get_json(&self.http, url.clone()).await
    }

    /// Fetch a single post document by uid.
    ///
    /// When a preview ref is given the draft content at that ref is
    /// resolved instead of the published content.
    pub async fn get_by_uid(&self, uid: &str, preview_ref: Option<&str>) -> Result<Document> {
        let mut query = self
            .query()
            .at("document.type", &self.document_type)
            .at(&format!("my.{}.uid", self.document_type), uid)
            .page_size(1);
        if let Some(r) = preview_ref {
            query = query.with_ref(r);
        }
        let response = query.send().await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound(uid.to_string()))
    }
}

async fn get_json<T: DeserializeOwned>(http: &reqwest::Client, url: Url) -> Result<T> {
    tracing::debug!("GET {}", url);
    let response = http.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(CmsError::Status(response.status(), url));
    }
    Ok(response.json().await?)
}

/// Builder for documents/search queries
#[must_use]
pub struct SearchQuery<'a> {
    client: &'a CmsClient,
    predicates: Vec<String>,
    fetch: Vec<String>,
    page_size: Option<usize>,
    after: Option<String>,
    orderings: Option<String>,
    ref_override: Option<String>,
}

impl<'a> SearchQuery<'a> {
    fn new(client: &'a CmsClient) -> Self {
        Self {
            client,
            predicates: Vec::new(),
            fetch: Vec::new(),
            page_size: None,
            after: None,
            orderings: None,
            ref_override: None,
        }
    }

    /// Add an `at(path, "value")` predicate
    pub fn at(mut self, path: &str, value: &str) -> Self {
        self.predicates.push(format!(r#"at({},"{}")"#, path, value));
        self
    }

    /// Restrict returned data to the given fields
    pub fn fetch(mut self, fields: &[&str]) -> Self {
        self.fetch = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = Some(n);
        self
    }

    /// Return results positioned after the given document id
    pub fn after(mut self, id: &str) -> Self {
        self.after = Some(id.to_string());
        self
    }

    /// Order results, e.g. `[document.first_publication_date desc]`
    pub fn orderings(mut self, orderings: &str) -> Self {
        self.orderings = Some(orderings.to_string());
        self
    }

    /// Resolve the query at this ref instead of the master ref
    pub fn with_ref(mut self, reference: &str) -> Self {
        self.ref_override = Some(reference.to_string());
        self
    }

    pub(crate) fn build_url(&self) -> Url {
        let mut url = self.client.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            let reference = self
                .ref_override
                .as_deref()
                .unwrap_or(&self.client.master_ref);
            pairs.append_pair("ref", reference);
            if !self.predicates.is_empty() {
                let inner: String = self
                    .predicates
                    .iter()
                    .map(|p| format!("[{}]", p))
                    .collect();
                pairs.append_pair("q", &format!("[{}]", inner));
            }
            if let Some(n) = self.page_size {
                pairs.append_pair("pageSize", &n.to_string());
            }
            if let Some(after) = &self.after {
                pairs.append_pair("after", after);
            }
            if let Some(orderings) = &self.orderings {
                pairs.append_pair("orderings", orderings);
            }
            if !self.fetch.is_empty() {
                pairs.append_pair("fetch", &self.fetch.join(","));
            }
            if let Some(token) = &self.client.access_token {
                pairs.append_pair("access_token", token);
            }
        }
        url
    }

    pub async fn send(self) -> Result<QueryResponse> {
        let url = self.build_url();
        get_json(&self.client.http, url).await
    }
}

#[cfg(test)]
impl CmsClient {
    /// Test-only handle that resolves no refs and reaches no network;
    /// requests against it fail fast with a connection error.
    pub(crate) fn offline_stub() -> Self {
        Self {
            http: reqwest::Client::new(),
            search_url: Url::parse("http://127.0.0.1:1/api/v2/documents/search").unwrap(),
            access_token: None,
            document_type: "post".to_string(),
            master_ref: "master-ref".to_string(),
        }
    }
}
