use std::time::Duration;

use async_trait::async_trait;
use leetdraw_core::{
    config::LeetCodeConfig, FetchError, QuestionDetail, QuestionSlug, QuestionSource,
};
use reqwest::{
    header::REFERER,
    Client, RequestBuilder, Url,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::CatalogResponse,
    graphql::{into_question_detail, GraphQlResponse, QuestionData, QuestionDataRequest},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build leetcode http client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Talks to the public LeetCode catalog and GraphQL endpoints.
///
/// Built once at startup and shared; it holds no per-request state.
#[derive(Clone, Debug)]
pub struct LeetCodeClient {
    client: Client,
    catalog_url: String,
    graphql_url: String,
}

impl LeetCodeClient {
    pub fn new(config: &LeetCodeConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self::with_http_client(client, &config.catalog_url, &config.graphql_url))
    }

    pub fn with_http_client(
        client: Client,
        catalog_url: impl Into<String>,
        graphql_url: impl Into<String>,
    ) -> Self {
        Self { client, catalog_url: catalog_url.into(), graphql_url: graphql_url.into() }
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    pub async fn fetch_slugs(&self) -> Result<Vec<QuestionSlug>, FetchError> {
        let request = self.client.get(&self.catalog_url);
        let catalog: CatalogResponse = send_json(&self.catalog_url, request).await?;
        let slugs = catalog.into_slugs();

        debug!(
            event_name = "leetcode.catalog.fetched",
            url = %self.catalog_url,
            slug_count = slugs.len(),
            "fetched question catalog"
        );
        Ok(slugs)
    }

    pub async fn fetch_question(&self, slug: &QuestionSlug) -> Result<QuestionDetail, FetchError> {
        if slug.is_blank() {
            return Err(FetchError::InvalidSlug);
        }

        let mut request = self.client.post(&self.graphql_url).json(&QuestionDataRequest::new(slug));
        if let Some(referer) = problem_referer(&self.graphql_url, slug) {
            request = request.header(REFERER, referer);
        }

        let response: GraphQlResponse<QuestionData> = send_json(&self.graphql_url, request).await?;
        let detail = into_question_detail(response, slug, &self.graphql_url)?;

        debug!(
            event_name = "leetcode.question.fetched",
            slug = %slug,
            question_id = %detail.id,
            "fetched question detail"
        );
        Ok(detail)
    }
}

#[async_trait]
impl QuestionSource for LeetCodeClient {
    async fn list_slugs(&self) -> Result<Vec<QuestionSlug>, FetchError> {
        let result = self.fetch_slugs().await;
        if let Err(error) = &result {
            warn!(
                event_name = "leetcode.catalog.fetch_failed",
                url = %self.catalog_url,
                error_kind = error.kind(),
                error = %error,
                "failed to fetch question catalog"
            );
        }
        result
    }

    async fn question_detail(&self, slug: &QuestionSlug) -> Result<QuestionDetail, FetchError> {
        let result = self.fetch_question(slug).await;
        if let Err(error) = &result {
            warn!(
                event_name = "leetcode.question.fetch_failed",
                url = %self.graphql_url,
                slug = %slug,
                error_kind = error.kind(),
                error = %error,
                "failed to fetch question detail"
            );
        }
        result
    }
}

async fn send_json<T>(url: &str, request: RequestBuilder) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|error| FetchError::Transport {
            url: url.to_owned(),
            message: error.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { url: url.to_owned(), status: status.as_u16() });
    }

    let body = response
        .bytes()
        .await
        .map_err(|error| FetchError::Transport {
            url: url.to_owned(),
            message: error.to_string(),
        })?;

    serde_json::from_slice::<T>(&body)
        .map_err(|error| FetchError::Shape { url: url.to_owned(), message: error.to_string() })
}

/// LeetCode rejects GraphQL calls without a same-origin referer.
fn problem_referer(graphql_url: &str, slug: &QuestionSlug) -> Option<String> {
    let url = Url::parse(graphql_url).ok()?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/problems/{slug}/", origin.ascii_serialization()))
}

#[cfg(test)]
mod tests {
    use leetdraw_core::{config::AppConfig, FetchError, QuestionSlug};

    use super::{problem_referer, LeetCodeClient};

    #[test]
    fn referer_uses_graphql_origin() {
        assert_eq!(
            problem_referer("https://leetcode.com/graphql", &QuestionSlug::new("two-sum")),
            Some("https://leetcode.com/problems/two-sum/".to_owned())
        );
        assert_eq!(
            problem_referer("http://127.0.0.1:4010/graphql", &QuestionSlug::new("lru-cache")),
            Some("http://127.0.0.1:4010/problems/lru-cache/".to_owned())
        );
        assert_eq!(problem_referer("not a url", &QuestionSlug::new("two-sum")), None);
    }

    #[test]
    fn client_is_built_from_default_config() {
        let config = AppConfig::default();
        let client = LeetCodeClient::new(&config.leetcode).expect("client should build");

        assert_eq!(client.catalog_url(), "https://leetcode.com/api/problems/all/");
        assert_eq!(client.graphql_url(), "https://leetcode.com/graphql");
    }

    #[tokio::test]
    async fn blank_slug_is_rejected_before_any_request() {
        let client = LeetCodeClient::with_http_client(
            reqwest::Client::new(),
            "http://127.0.0.1:9/api/problems/all/",
            "http://127.0.0.1:9/graphql",
        );

        let result = client.fetch_question(&QuestionSlug::new("   ")).await;

        assert_eq!(result, Err(FetchError::InvalidSlug));
    }
}
