//! HTTP API Client
//!
//! Browser `fetch` transport for the shared plant API client.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};

use plantwatch::api::{join_url, parse_body, ApiRequest, ApiResponse, Method, Transport, TransportError};

/// Default API base URL: relative, same origin as the page
pub const DEFAULT_API_BASE: &str = "";

/// Local storage key overriding the API base URL
pub const API_BASE_KEY: &str = "plantwatch_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten());
    normalize_base(stored.as_deref().unwrap_or(DEFAULT_API_BASE))
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// [`Transport`] over `fetch`
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(&base_url.into()),
        }
    }

    /// Transport for the base URL stored in local storage
    pub fn from_storage() -> Self {
        Self::new(get_api_base())
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let url = join_url(&self.base_url, &request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Delete => Request::delete(&url),
        };
        let builder = builder.header("Content-Type", "application/json");

        match &request.bearer {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let builder = self.builder(&request);
        let prepared = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status == 204 {
            return Ok(ApiResponse::new(status, None));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(ApiResponse::new(status, parse_body(&text)))
    }
}
