//! Collection source backed by a remote newsdesk REST surface.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use newsdesk_api_types as wire;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CategoryPatch, CreateCategoryParams, CreatePostParams,
    PostPatch, PostsRepo, PostsWriteRepo, RepoError,
};
use crate::domain::entities::{CategoryRecord, PostRecord};
use crate::domain::posts::PostCriteria;
use crate::infra::error::InfraError;
use crate::infra::with_trailing_slash;

/// Page size requested while walking the remote listing.
const FETCH_PAGE_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub struct RemoteSource {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl RemoteSource {
    pub fn new(base: Url, token: Option<String>, timeout: Duration) -> Result<Self, InfraError> {
        if base.cannot_be_a_base() {
            return Err(InfraError::configuration(format!(
                "invalid remote base url: {base}"
            )));
        }
        let base = with_trailing_slash(base);
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("newsdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RepoError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|err| RepoError::invalid_input(format!("invalid path `{path}`: {err}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn builder(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Response, RepoError> {
        let label = method.as_str().to_string();
        let mut request = self.builder(method, url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let started = Instant::now();
        let outcome = request.send().await;
        histogram!("newsdesk_remote_request_ms", "method" => label.clone())
            .record(started.elapsed().as_secs_f64() * 1000.0);

        let response = outcome.map_err(|err| {
            counter!("newsdesk_remote_requests_total", "method" => label.clone(), "outcome" => "transport")
                .increment(1);
            RepoError::transport(err.to_string())
        })?;

        let outcome = if response.status().is_success() {
            "ok"
        } else {
            "rejected"
        };
        counter!("newsdesk_remote_requests_total", "method" => label, "outcome" => outcome)
            .increment(1);
        debug!(
            target = "newsdesk::infra::remote",
            url = %url,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "remote request finished"
        );
        Ok(response)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, RepoError> {
        let url = self.url(path, query)?;
        let response = self.send(method, url, body).await?;
        Self::handle(response).await
    }

    async fn request_unit(&self, method: Method, path: &str) -> Result<(), RepoError> {
        let url = self.url(path, &[])?;
        let response = self.send(method, url, None).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RepoError::transport(err.to_string()))?;
        Err(map_status(status, &bytes))
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, RepoError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RepoError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status(status, &bytes));
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| RepoError::transport(format!("failed to parse body: {err}")))
    }

    /// Remote lookups answer 404 for unknown ids; that is an absent record here.
    fn optional<T>(result: Result<T, RepoError>) -> Result<Option<T>, RepoError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(RepoError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Map a non-success status and its error envelope onto the repository taxonomy.
fn map_status(status: StatusCode, body: &[u8]) -> RepoError {
    let message = serde_json::from_slice::<wire::ErrorEnvelope>(body)
        .map(|envelope| envelope.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepoError::Unauthorized,
        StatusCode::NOT_FOUND => RepoError::NotFound,
        StatusCode::CONFLICT => RepoError::Duplicate {
            constraint: message,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            RepoError::invalid_input(message)
        }
        other => RepoError::transport(format!("status {other}: {message}")),
    }
}

fn criteria_query(criteria: &PostCriteria) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(search) = criteria.search.as_deref().filter(|s| !s.trim().is_empty()) {
        query.push(("search", search.to_string()));
    }
    if let Some(category) = criteria.category.as_deref().filter(|c| !c.trim().is_empty()) {
        query.push(("category", category.to_string()));
    }
    if let Some(tag) = criteria.tag.as_deref().filter(|t| !t.trim().is_empty()) {
        query.push(("tag", tag.to_string()));
    }
    if let Some(status) = criteria.status {
        query.push(("status", status.as_str().to_string()));
    }
    query
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RepoError> {
    serde_json::to_value(value).map_err(|err| RepoError::invalid_input(err.to_string()))
}

#[async_trait]
impl PostsRepo for RemoteSource {
    async fn list_posts(&self, criteria: &PostCriteria) -> Result<Vec<PostRecord>, RepoError> {
        let base_query = criteria_query(criteria);
        let mut posts = Vec::new();
        let mut page = 1usize;

        loop {
            let mut query = base_query.clone();
            query.push(("page", page.to_string()));
            query.push(("limit", FETCH_PAGE_SIZE.to_string()));

            let response: wire::PostListResponse = self
                .request(Method::GET, "blog/posts", &query, None)
                .await?;
            let fetched = response.posts.len();
            posts.extend(response.posts.into_iter().map(PostRecord::from));

            if fetched == 0 || page as u64 >= response.pagination.total_pages {
                break;
            }
            page += 1;
        }

        Ok(posts)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        let path = format!("blog/posts/{id}");
        let post = Self::optional(self.request::<wire::Post>(Method::GET, &path, &[], None).await)?;
        Ok(post.map(PostRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.list_posts(&PostCriteria::default()).await?;
        Ok(posts.into_iter().find(|post| post.slug == slug))
    }
}

#[async_trait]
impl PostsWriteRepo for RemoteSource {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let request = wire::PostCreateRequest {
            title: params.title,
            slug: Some(params.slug),
            excerpt: Some(params.excerpt),
            body: params.body_html,
            source_url: params.source_url,
            category: params.category,
            tags: params.tags,
            image_url: params.image_url,
            author: Some(params.author.into()),
            status: Some(params.status.into()),
            publish_date: Some(params.publish_date),
            featured: params.featured,
        };
        let post: wire::Post = self
            .request(Method::POST, "blog/posts", &[], Some(to_json(&request)?))
            .await?;
        Ok(post.into())
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<PostRecord, RepoError> {
        let request = wire::PostUpdateRequest {
            title: patch.title,
            slug: patch.slug,
            excerpt: patch.excerpt,
            body: patch.body_html,
            source_url: patch.source_url,
            category: patch.category,
            tags: patch.tags,
            image_url: patch.image_url,
            author: patch.author.map(Into::into),
            status: patch.status.map(Into::into),
            publish_date: patch.publish_date,
            featured: patch.featured,
        };
        let path = format!("blog/posts/{id}");
        let post: wire::Post = self
            .request(Method::PUT, &path, &[], Some(to_json(&request)?))
            .await?;
        Ok(post.into())
    }

    async fn delete_post(&self, id: &str) -> Result<(), RepoError> {
        self.request_unit(Method::DELETE, &format!("blog/posts/{id}"))
            .await
    }
}

#[async_trait]
impl CategoriesRepo for RemoteSource {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let categories: Vec<wire::Category> =
            self.request(Method::GET, "categories", &[], None).await?;
        Ok(categories.into_iter().map(CategoryRecord::from).collect())
    }

    async fn find_category(&self, id: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let categories = self.list_categories().await?;
        Ok(categories.into_iter().find(|category| category.id == id))
    }
}

#[async_trait]
impl CategoriesWriteRepo for RemoteSource {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let request = wire::CategoryCreateRequest {
            name: params.name,
            description: params.description,
            color: Some(params.color),
            is_active: Some(params.is_active),
            source_urls: params.source_urls.into_iter().map(Into::into).collect(),
        };
        let category: wire::Category = self
            .request(Method::POST, "categories", &[], Some(to_json(&request)?))
            .await?;
        Ok(category.into())
    }

    async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<CategoryRecord, RepoError> {
        let request = wire::CategoryUpdateRequest {
            name: patch.name,
            description: patch.description,
            color: patch.color,
            is_active: patch.is_active,
            source_urls: patch
                .source_urls
                .map(|urls| urls.into_iter().map(Into::into).collect()),
        };
        let category: wire::Category = self
            .request(
                Method::PUT,
                &format!("categories/{id}"),
                &[],
                Some(to_json(&request)?),
            )
            .await?;
        Ok(category.into())
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepoError> {
        self.request_unit(Method::DELETE, &format!("categories/{id}"))
            .await
    }
}
