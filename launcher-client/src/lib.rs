//! Launcher HTTP Client
//!
//! A small, type-safe client for the build metadata API.
//!
//! The launcher only ever reads: a build, the job it belongs to, and the
//! pipeline that job belongs to. Each lookup is a single `GET` on
//! `{base_url}/v4/{collection}/{id}`, authenticated with a bearer token.
//!
//! # Example
//!
//! ```no_run
//! use launcher_client::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:8080").with_token("secret");
//!
//!     let build = client.get_build("1234").await?;
//!     let job = client.get_job(&build.job_id).await?;
//!     let pipeline = client.get_pipeline(&job.pipeline_id).await?;
//!
//!     println!("Pipeline source: {}", pipeline.scm_url);
//!     Ok(())
//! }
//! ```

mod builds;
pub mod error;
mod jobs;
mod pipelines;

pub use error::{ClientError, Result};

use std::fmt;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Version prefix of every API route
const API_VERSION: &str = "v4";

/// Kind of record served by the metadata API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Build,
    Job,
    Pipeline,
}

impl Resource {
    /// Path segment of the collection holding this kind of record
    fn collection(self) -> &'static str {
        match self {
            Resource::Build => "builds",
            Resource::Job => "jobs",
            Resource::Pipeline => "pipelines",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Build => "build",
            Resource::Job => "job",
            Resource::Pipeline => "pipeline",
        };
        f.write_str(name)
    }
}

/// Read-only client for the metadata API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g. "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client that sends its requests through a preconfigured
    /// `reqwest::Client` (proxies, TLS roots, ...)
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http,
        }
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a single record, e.g. `{base}/v4/builds/{id}`
    ///
    /// The ID is percent-encoded as one path segment, so `/`, `?` and `#`
    /// inside it never change which record is addressed.
    fn record_url(&self, resource: Resource, id: &str) -> Result<Url> {
        if id.trim().is_empty() {
            return Err(ClientError::InvalidRequest(format!("{} ID cannot be empty", resource)));
        }
        // The segment encoder drops these instead of escaping them
        if id == "." || id == ".." {
            return Err(ClientError::InvalidRequest(format!(
                "{} ID {:?} does not name a record",
                resource, id
            )));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("base URL {:?} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend([API_VERSION, resource.collection(), id]);

        Ok(url)
    }

    /// Fetch one record by ID and decode it
    async fn fetch<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> Result<T> {
        let url = self.record_url(resource, id)?;
        debug!("Fetching {} {} from {}", resource, id, url);

        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(resource, id, status.as_u16(), body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| ClientError::ParseError {
            resource,
            message: e.to_string(),
        })
    }
}

// Keeps the token out of logs
impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(
            ApiClient::new("http://localhost:8080/").base_url(),
            "http://localhost:8080"
        );
        assert_eq!(
            ApiClient::with_client("https://api.example.com", reqwest::Client::new()).base_url(),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_token_is_not_printed() {
        let client = ApiClient::new("http://localhost:8080").with_token("abc123");
        let rendered = format!("{:?}", client);

        assert!(!rendered.contains("abc123"));
        assert!(rendered.contains("authenticated: true"));
    }

    #[test]
    fn test_record_url() {
        let client = ApiClient::new("https://api.example.com/");

        assert_eq!(
            client.record_url(Resource::Build, "1234").unwrap().as_str(),
            "https://api.example.com/v4/builds/1234"
        );
        assert_eq!(
            client.record_url(Resource::Pipeline, "p1").unwrap().as_str(),
            "https://api.example.com/v4/pipelines/p1"
        );
    }

    #[test]
    fn test_record_url_keeps_base_path() {
        let client = ApiClient::new("https://ci.example.com/api/");

        assert_eq!(
            client.record_url(Resource::Job, "j1").unwrap().as_str(),
            "https://ci.example.com/api/v4/jobs/j1"
        );
    }

    #[test]
    fn test_record_url_encodes_id_as_one_segment() {
        let client = ApiClient::new("http://localhost:8080");

        assert_eq!(
            client.record_url(Resource::Build, "12#evil").unwrap().as_str(),
            "http://localhost:8080/v4/builds/12%23evil"
        );
        assert_eq!(
            client.record_url(Resource::Build, "../jobs/5").unwrap().as_str(),
            "http://localhost:8080/v4/builds/..%2Fjobs%2F5"
        );
        assert_eq!(
            client.record_url(Resource::Build, "7?x=1").unwrap().as_str(),
            "http://localhost:8080/v4/builds/7%3Fx=1"
        );
    }

    #[test]
    fn test_record_url_rejects_dot_ids() {
        let client = ApiClient::new("http://localhost:8080");

        for id in [".", ".."] {
            let err = client.record_url(Resource::Build, id).unwrap_err();
            assert!(matches!(err, ClientError::InvalidRequest(_)));
        }
    }

    #[test]
    fn test_record_url_rejects_bad_base() {
        let client = ApiClient::new("not a url");
        let err = client.record_url(Resource::Build, "b1").unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_record_url_rejects_empty_id() {
        let client = ApiClient::new("http://localhost:8080");
        let err = client.record_url(Resource::Job, " ").unwrap_err();

        assert_eq!(err.to_string(), "invalid request: job ID cannot be empty");
    }

    #[tokio::test]
    async fn test_empty_id_fails_without_network() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.get_pipeline("").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_unreachable_api_reports_url() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.get_build("b1").await.unwrap_err();

        match err {
            ClientError::RequestFailed { url, .. } => {
                assert_eq!(url, "http://127.0.0.1:9/v4/builds/b1")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_build_sends_token_and_decodes_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v4/builds/b1")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "b1", "jobId": "j1", "number": 3, "status": "QUEUED"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).with_token("secret");
        let build = client.get_build("b1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(build.job_id, "j1");
        assert_eq!(build.number, Some(3));
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v4/jobs/j1")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"id": "j1", "pipelineId": "p1"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let job = client.get_job("j1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(job.pipeline_id, "p1");
    }

    #[tokio::test]
    async fn test_get_pipeline_decodes_record() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v4/pipelines/p1")
            .with_status(200)
            .with_body(r#"{"id": "p1", "scmUrl": "github.com:org/repo#main"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let pipeline = client.get_pipeline("p1").await.unwrap();

        assert_eq!(pipeline.scm_url, "github.com:org/repo#main");
    }

    #[tokio::test]
    async fn test_special_characters_stay_in_the_id() {
        let mut server = mockito::Server::new_async().await;
        let other = server
            .mock("GET", "/v4/builds/12")
            .expect(0)
            .create_async()
            .await;
        let target = server
            .mock("GET", "/v4/builds/12%23evil")
            .with_status(200)
            .with_body(r#"{"id": "12#evil", "jobId": "j1"}"#)
            .create_async()
            .await;
        let traversal = server
            .mock("GET", "/v4/builds/..%2Fjobs%2F5")
            .with_status(404)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let build = client.get_build("12#evil").await.unwrap();
        let err = client.get_build("../jobs/5").await.unwrap_err();

        assert_eq!(build.id, "12#evil");
        assert!(err.is_not_found());
        other.assert_async().await;
        target.assert_async().await;
        traversal.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v4/builds/missing")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/v4/jobs/secret")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("GET", "/v4/jobs/hidden")
            .with_status(403)
            .create_async()
            .await;
        server
            .mock("GET", "/v4/pipelines/p1")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = ApiClient::new(server.url());

        match client.get_build("missing").await.unwrap_err() {
            ClientError::NotFound { resource, id } => {
                assert_eq!(resource, Resource::Build);
                assert_eq!(id, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }

        for id in ["secret", "hidden"] {
            let err = client.get_job(id).await.unwrap_err();
            assert!(err.is_unauthorized(), "{id}: {err}");
        }

        let err = client.get_pipeline("p1").await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(err.to_string(), "API error (status 502): bad gateway");
    }

    #[tokio::test]
    async fn test_malformed_record_names_the_problem() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v4/pipelines/p1")
            .with_status(200)
            .with_body(r#"{"nope": 1}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let err = client.get_pipeline("p1").await.unwrap_err();

        match err {
            ClientError::ParseError { resource, message } => {
                assert_eq!(resource, Resource::Pipeline);
                assert!(message.contains("missing field `id`"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
