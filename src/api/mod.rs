//! HTTP client for the Nikud Analyzer JSON API
//!
//! Every call is resolved against `origin + base_path + endpoint`, performs
//! exactly one round trip and yields the response body parsed as JSON.

pub mod models;
pub mod query;

use crate::error::{ApiError, Result};
use crate::utils::http::build_client;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub use query::{QueryParams, QueryValue};

pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Where the API lives.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub origin: String,
    pub base_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    origin: Url,
    base_path: String,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let origin = Url::parse(&config.origin).map_err(|e| ApiError::InvalidUrl {
            url: config.origin.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: build_client()?,
            origin,
            base_path: config.base_path,
        })
    }

    /// Resolve an endpoint against the origin, like a browser resolves a
    /// root-relative path against the page origin.
    pub fn url_for(&self, endpoint: &str) -> Result<Url> {
        let path = format!("{}{}", self.base_path, endpoint);
        self.origin.join(&path).map_err(|e| ApiError::InvalidUrl {
            url: path,
            reason: e.to_string(),
        })
    }

    /// GET `endpoint`, sending only the retained entries of `params`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &QueryParams) -> Result<T> {
        let request = self
            .request(Method::GET, endpoint)?
            .query(&params.retained());
        self.send(request).await
    }

    /// POST `body` serialized as JSON.
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)?;
        let request = self
            .request(Method::POST, endpoint)?
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(request).await
    }

    /// POST an assembled multipart form. The form sets its own
    /// `multipart/form-data` content type and boundary.
    pub async fn upload<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> Result<T> {
        let request = self.request(Method::POST, endpoint)?.multipart(form);
        self.send(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let request = self.request(Method::DELETE, endpoint)?;
        self.send(request).await
    }

    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url_for(endpoint)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        warn!("{} answered with status {}", response.url(), status.as_u16());
        return Err(ApiError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
