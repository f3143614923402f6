//! HTTP helpers shared by every page.
//!
//! All backend calls go through these functions so that URL building,
//! error extraction (`detail` of the JSON body) and logging stay uniform.

use super::app_config::config;
use super::export::download_blob;
use contracts::shared::error::ApiError;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::{Blob, BlobPropertyBag};

/// Base URL of the backend API, without trailing slash.
///
/// Uses `api.base_url` when configured, otherwise the current page host
/// with the configured port and prefix.
pub fn api_base() -> String {
    let cfg = config();
    if let Some(url) = cfg.explicit_base_url() {
        return url;
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    cfg.derived_base_url(&protocol, &hostname)
}

/// Full URL of an endpoint path such as `clientes/get`
pub fn api_url(path: &str) -> String {
    format!("{}/{}", api_base(), path.trim_start_matches('/'))
}

fn network_error(url: &str, e: gloo_net::Error) -> ApiError {
    log::error!("request to {} failed: {}", url, e);
    ApiError::Network(e.to_string())
}

async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let status_text = response.status_text();
    log::warn!("HTTP {} from {}", status, response.url());
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response_body(status, &status_text, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| {
        log::error!("cannot decode response of {}: {}", response.url(), e);
        ApiError::Decode(e.to_string())
    })
}

async fn send_builder(builder: RequestBuilder, url: &str) -> Result<Response, ApiError> {
    let response = builder.send().await.map_err(|e| network_error(url, e))?;
    ensure_ok(response).await
}

async fn send_with_body<B, T>(builder: RequestBuilder, url: &str, body: &B) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let request = builder
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    let response = request.send().await.map_err(|e| network_error(url, e))?;
    let response = ensure_ok(response).await?;
    decode(response).await
}

/// `GET` returning JSON
pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("GET {}", url);
    let response = send_builder(Request::get(&url), &url).await?;
    decode(response).await
}

/// `?q=` of the search endpoints
#[derive(Serialize)]
pub struct SearchQuery<'a> {
    pub q: &'a str,
}

/// `path?query`, the query serialised with `serde_qs`; `None` fields are left out
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, ApiError> {
    let qs = serde_qs::to_string(query).map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(if qs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, qs)
    })
}

/// `GET` with a query string serialised from `query`
pub async fn get_json_query<Q, T>(path: &str, query: &Q) -> Result<T, ApiError>
where
    Q: Serialize,
    T: DeserializeOwned,
{
    get_json(&with_query(path, query)?).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("POST {}", url);
    send_with_body(Request::post(&url), &url, body).await
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("PUT {}", url);
    send_with_body(Request::put(&url), &url, body).await
}

pub async fn patch_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("PATCH {}", url);
    send_with_body(Request::patch(&url), &url, body).await
}

/// `POST` without a body
pub async fn post_empty<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let url = api_url(path);
    log::debug!("POST {}", url);
    let response = send_builder(Request::post(&url), &url).await?;
    decode(response).await
}

/// `DELETE`, ignoring the response body
pub async fn delete(path: &str) -> Result<(), ApiError> {
    let url = api_url(path);
    log::debug!("DELETE {}", url);
    send_builder(Request::delete(&url), &url).await.map(|_| ())
}

/// `GET` a binary document as a Blob of `mime`
pub async fn get_blob(path: &str, mime: &str) -> Result<Blob, ApiError> {
    let url = api_url(path);
    log::debug!("GET (blob) {}", url);
    let response = send_builder(Request::get(&url), &url).await?;
    let bytes = response
        .binary()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));
    let properties = BlobPropertyBag::new();
    properties.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &properties)
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))
}

/// Fetch a PDF and hand it to the browser as a download
pub async fn download_pdf(path: &str, filename: &str) -> Result<(), ApiError> {
    let blob = get_blob(path, "application/pdf").await?;
    download_blob(&blob, filename).map_err(ApiError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query() {
        assert_eq!(
            with_query("productos/search", &SearchQuery { q: "mesa" }).unwrap(),
            "productos/search?q=mesa"
        );
        assert_eq!(with_query("clientes/search", &SearchQuery { q: "" }).unwrap(), "clientes/search?q=");
    }
}
