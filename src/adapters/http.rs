use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde_json::Value;

/// GETs a feed document. No retries and no timeout; failures go straight to the caller.
pub async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
    tracing::debug!("Making feed request to: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| EtlError::FetchError {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    tracing::debug!("Feed response status: {}", status);

    if !status.is_success() {
        return Err(EtlError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| EtlError::FetchError {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|source| EtlError::InvalidJsonError {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_json_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/gbfs/en/system_regions.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"data": {"regions": []}}));
        });

        let doc = fetch_json(&Client::new(), &server.url("/gbfs/en/system_regions.json"))
            .await
            .unwrap();

        api_mock.assert();
        assert!(doc["data"]["regions"].is_array());
    }

    #[tokio::test]
    async fn test_fetch_json_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.json");
            then.status(404);
        });

        let err = fetch_json(&Client::new(), &server.url("/missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::HttpStatusError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_json_invalid_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/feed.json");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = fetch_json(&Client::new(), &server.url("/feed.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::InvalidJsonError { .. }));
    }

    #[tokio::test]
    async fn test_fetch_json_unreachable() {
        // Port 9 (discard) is not expected to accept HTTP connections on test hosts.
        let err = fetch_json(&Client::new(), "http://127.0.0.1:9/feed.json")
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::FetchError { .. }));
    }
}
