use reqwest::{self, RequestBuilder};
use serde::de::DeserializeOwned;
use std::{collections::HashMap, sync::Arc, time::Duration};
use thiserror::Error;

// Browser-like agent; the quote endpoints reject the default reqwest agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

// Shared HTTP client instance. The cookie store keeps the provider session between calls.
lazy_static::lazy_static! {
    static ref CLIENT: Arc<reqwest::Client> = Arc::new(
        reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default()
    );
}

/// Custom error type for HTTP requests.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP error: {0} returned {1}. Response body: {2}")]
    HttpError(reqwest::Url, u16, String),
    #[error("Error deserializing JSON: {0}")]
    JsonError(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Other error: {0}")]
    Other(String),
}

fn build_url(path: &str, params: &HashMap<&str, &str>) -> Result<reqwest::Url, RequestError> {
    if !params.is_empty() {
        reqwest::Url::parse_with_params(path, params).map_err(|e| RequestError::Other(e.to_string()))
    } else {
        reqwest::Url::parse(path).map_err(|e| RequestError::Other(e.to_string()))
    }
}

fn get(url: &reqwest::Url, headers: HashMap<&str, &str>) -> RequestBuilder {
    let mut req = CLIENT.get(url.as_str());
    for (k, v) in headers {
        req = req.header(k, v);
    }
    req
}

async fn send(url: reqwest::Url, req: RequestBuilder) -> Result<reqwest::Response, RequestError> {
    log::debug!("GET {}", url);
    let response = req
        .send()
        .await
        .map_err(|e| RequestError::Other(e.to_string()))?;

    // Handle non-success status codes.
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Other(e.to_string()))?;
        return Err(RequestError::HttpError(url, status.as_u16(), body));
    }
    Ok(response)
}

/// Makes a GET request to the specified path and deserializes the JSON body.
pub async fn request<T: DeserializeOwned>(
    path: &str,                   // Absolute URL.
    params: HashMap<&str, &str>,  // Optional query parameters.
    headers: HashMap<&str, &str>, // Optional header parameters.
) -> Result<T, RequestError> {
    let url = build_url(path, &params)?;
    let req = get(&url, headers);
    send(url, req)
        .await?
        .json()
        .await
        .map_err(|e| RequestError::JsonError(e.to_string()))
}

/// Makes a GET request and returns the body as trimmed text.
pub async fn request_text(
    path: &str,
    params: HashMap<&str, &str>,
    headers: HashMap<&str, &str>,
) -> Result<String, RequestError> {
    let url = build_url(path, &params)?;
    let req = get(&url, headers);
    send(url, req)
        .await?
        .text()
        .await
        .map(|body| body.trim().to_string())
        .map_err(|e| RequestError::Other(e.to_string()))
}

/// Visits a page only for the cookies it sets. The status code is ignored.
pub async fn touch(path: &str, headers: HashMap<&str, &str>) -> Result<(), RequestError> {
    let url = build_url(path, &HashMap::new())?;
    let response = get(&url, headers)
        .send()
        .await
        .map_err(|e| RequestError::Other(e.to_string()))?;
    log::debug!("GET {} -> {}", url, response.status());
    Ok(())
}
