/*
 * aurpc - Typed client for the Arch User Repository RPC interface.
 * Copyright (C) 2025  compiledkernel-idk and pacboost contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! HTTP transport seam and its `reqwest` implementation.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Duration;
use url::Url;

use crate::error::{AurError, AurResult, BoxError};

/// Default User-Agent of [`ReqwestTransport`]
pub const DEFAULT_USER_AGENT: &str = concat!("aurpc/", env!("CARGO_PKG_VERSION"));

/// A prepared GET request, open to request editors until it is sent
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

impl RpcRequest {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
        }
    }
}

/// Status and fully buffered body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RpcResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and returns one response.
///
/// Timeouts and cancellation belong to the implementation. Implementations
/// shared between tasks must be safe for concurrent use.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, BoxError>;
}

/// `reqwest`-backed implementation of [`Transport`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's defaults and the crate User-Agent
    pub fn new() -> AurResult<Self> {
        Self::with_timeouts(DEFAULT_USER_AGENT, None, None)
    }

    /// Create a transport with custom settings
    pub fn with_timeouts(
        user_agent: &str,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
    ) -> AurResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder.build().map_err(|e| AurError::Config {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }

    /// Wrap an already configured client (certificates, proxies, ...)
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, BoxError> {
        let response = self
            .client
            .get(request.url)
            .headers(request.headers)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(RpcResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_returns_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rpc.php"))
            .and(query_param("type", "info"))
            .and(header("x-test", "value-test"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/rpc.php?type=info&v=5", mock_server.uri())).unwrap();
        let mut request = RpcRequest::get(url);
        request
            .headers
            .insert("x-test", HeaderValue::from_static("value-test"));

        let transport = ReqwestTransport::new().unwrap();
        let response = transport.send(request).await.unwrap();

        assert_eq!(response, RpcResponse::new(404, "{}"));
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", "aurpc-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let transport =
            ReqwestTransport::with_timeouts("aurpc-test/1.0", Some(Duration::from_secs(5)), None)
                .unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();
        let response = transport.send(RpcRequest::get(url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"ok");
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Reserve a free port, then release it so nothing is listening there
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/rpc.php", addr)).unwrap();
        let transport =
            ReqwestTransport::with_timeouts(DEFAULT_USER_AGENT, None, Some(Duration::from_secs(5)))
                .unwrap();
        assert!(transport.send(RpcRequest::get(url)).await.is_err());
    }
}
