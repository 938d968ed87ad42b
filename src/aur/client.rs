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

//! AUR RPC API client.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::editor::{apply_editors, RequestEditor};
use super::request::{build_info, build_search, Params};
use super::response::decode_response;
use super::transport::{ReqwestTransport, RpcRequest, Transport};
use super::{Package, SearchBy};
use crate::config::Config;
use crate::error::{AurError, AurResult};

/// Production RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://aur.archlinux.org/rpc.php";

/// Operations offered by an AUR RPC client
///
/// `editors` passed to the `_with` methods run after the client's own
/// editors, for that call only.
#[async_trait]
pub trait AurRpc: Send + Sync {
    /// Search packages with extra editors for this call
    async fn search_with(
        &self,
        query: &str,
        by: SearchBy,
        editors: &[Arc<dyn RequestEditor>],
    ) -> AurResult<Vec<Package>>;

    /// Info lookup with extra editors for this call
    async fn info_with(
        &self,
        names: &[String],
        editors: &[Arc<dyn RequestEditor>],
    ) -> AurResult<Vec<Package>>;

    /// Search packages; [`SearchBy::Unspecified`] leaves the field to the service
    async fn search(&self, query: &str, by: SearchBy) -> AurResult<Vec<Package>> {
        self.search_with(query, by, &[]).await
    }

    /// Detailed information on one or more packages
    async fn info(&self, names: &[String]) -> AurResult<Vec<Package>> {
        self.info_with(names, &[]).await
    }
}

/// AUR RPC client.
///
/// Holds only immutable configuration, so one instance can be shared across
/// tasks as long as its transport and editors allow it.
#[derive(Clone)]
pub struct AurClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    editors: Vec<Arc<dyn RequestEditor>>,
}

impl fmt::Debug for AurClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AurClient")
            .field("base_url", &self.base_url.as_str())
            .field("editors", &self.editors.len())
            .finish_non_exhaustive()
    }
}

impl AurClient {
    /// Create a new AUR client with default settings
    pub fn new() -> AurResult<Self> {
        Self::builder().build()
    }

    pub fn builder() -> AurClientBuilder {
        AurClientBuilder::default()
    }

    /// Build a client with a `reqwest` transport set up from `config`
    pub fn from_config(config: &Config) -> AurResult<Self> {
        AurClientBuilder::from_config(config)?.build()
    }

    /// Normalized endpoint requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Packages without a maintainer
    pub async fn orphans(&self) -> AurResult<Vec<Package>> {
        self.search_with("", SearchBy::Maintainer, &[]).await
    }

    /// Get a single package by exact name
    pub async fn package(&self, name: &str) -> AurResult<Package> {
        self.info_with(&[name.to_string()], &[])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AurError::PackageNotFound {
                package: name.to_string(),
            })
    }

    /// Request URL for `params`, without sending anything
    pub fn request_url(&self, params: &Params) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&params.encode()));
        url
    }

    async fn get(
        &self,
        params: Params,
        call_editors: &[Arc<dyn RequestEditor>],
    ) -> AurResult<Vec<Package>> {
        let mut request = RpcRequest::get(self.request_url(&params));
        apply_editors(&mut request, &self.editors, call_editors)?;

        let url = request.url.to_string();
        debug!(url = %url, "sending AUR RPC request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AurError::network(url, e))?;

        debug!(status = response.status, bytes = response.body.len(), "AUR RPC response");
        decode_response(response.status, &response.body)
    }
}

#[async_trait]
impl AurRpc for AurClient {
    async fn search_with(
        &self,
        query: &str,
        by: SearchBy,
        editors: &[Arc<dyn RequestEditor>],
    ) -> AurResult<Vec<Package>> {
        self.get(build_search(query, by), editors).await
    }

    async fn info_with(
        &self,
        names: &[String],
        editors: &[Arc<dyn RequestEditor>],
    ) -> AurResult<Vec<Package>> {
        self.get(build_info(names), editors).await
    }
}

/// Builder for [`AurClient`]
#[derive(Default)]
pub struct AurClientBuilder {
    base_url: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    editors: Vec<Arc<dyn RequestEditor>>,
}

impl AurClientBuilder {
    /// Builder preloaded with the endpoint and transport settings of `config`
    pub fn from_config(config: &Config) -> AurResult<Self> {
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));
        let transport = ReqwestTransport::with_timeouts(
            &config.user_agent,
            secs(config.timeout_secs),
            secs(config.connect_timeout_secs),
        )?;

        Ok(Self::default()
            .base_url(&config.rpc_url)
            .transport(transport))
    }

    /// Override the RPC endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Replace the default `reqwest` transport
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Add an editor run on every request, in registration order
    pub fn request_editor(mut self, editor: impl RequestEditor + 'static) -> Self {
        self.editors.push(Arc::new(editor));
        self
    }

    pub fn build(self) -> AurResult<AurClient> {
        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_RPC_URL))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(AurClient {
            base_url,
            transport,
            editors: self.editors,
        })
    }
}

/// Strip any query and make the path end in `/rpc.php`.
///
/// `http://localhost:8000`, `http://localhost:8000/` and
/// `http://localhost:8000/rpc.php?` all become `http://localhost:8000/rpc.php`.
pub fn normalize_base_url(raw: &str) -> AurResult<Url> {
    let invalid = |source: url::ParseError| AurError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    };

    let mut url = Url::parse(raw.trim()).map_err(invalid)?;
    if url.cannot_be_a_base() {
        return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }

    url.set_query(None);
    url.set_fragment(None);

    if !url.path().ends_with("/rpc.php") {
        let path = format!("{}/rpc.php", url.path().trim_end_matches('/'));
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aur::editor::SetHeader;
    use crate::aur::transport::RpcResponse;
    use crate::error::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const VALID_PAYLOAD: &str = r#"{"version":5,"type":"multiinfo","resultcount":1,
"results":[{"ID":229417,"Name":"cower","PackageBaseID":44921,"PackageBase":"cower",
"Version":"14-2","Maintainer":null,"License":["MIT"],"MakeDepends":["perl"],"Keywords":[]}]}"#;

    const NO_MATCH_PAYLOAD: &str =
        r#"{"version":5,"type":"search","resultcount":0,"results":[],"error":""}"#;

    /// Records every request and answers with a canned response
    struct MockTransport {
        response: Result<RpcResponse, String>,
        requests: Mutex<Vec<RpcRequest>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(RpcResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.to_string())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: RpcRequest) -> Result<RpcResponse, BoxError> {
            self.requests.lock().unwrap().push(request);
            self.response.clone().map_err(BoxError::from)
        }
    }

    fn client_with(transport: Arc<MockTransport>) -> AurClient {
        AurClient::builder()
            .shared_transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        let cases = [
            ("https://aur.archlinux.org/rpc.php", "https://aur.archlinux.org/rpc.php"),
            ("https://aur.archlinux.org/rpc.php?", "https://aur.archlinux.org/rpc.php"),
            ("http://localhost:8000", "http://localhost:8000/rpc.php"),
            ("http://localhost:8000/", "http://localhost:8000/rpc.php"),
            ("http://localhost:8000/aur/", "http://localhost:8000/aur/rpc.php"),
        ];
        for (raw, want) in cases {
            assert_eq!(normalize_base_url(raw).unwrap().as_str(), want, "input {}", raw);
        }

        assert!(matches!(
            normalize_base_url("not a url"),
            Err(AurError::InvalidBaseUrl { .. })
        ));
        assert!(normalize_base_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let client = AurClient::new().unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_RPC_URL);
        assert!(client.editors.is_empty());

        let client = AurClient::builder()
            .base_url("http://localhost:8000")
            .request_editor(SetHeader::new("x-a", "1").unwrap())
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/rpc.php");
        assert_eq!(client.editors.len(), 1);
    }

    #[test]
    fn test_request_url() {
        let client = AurClient::new().unwrap();
        let url = client.request_url(&build_search("test-query", SearchBy::Unspecified));
        assert_eq!(
            url.as_str(),
            "https://aur.archlinux.org/rpc.php?arg=test-query&type=search&v=5"
        );
    }

    #[tokio::test]
    async fn test_search() {
        let transport = MockTransport::new(200, VALID_PAYLOAD);
        let client = client_with(transport.clone());

        let got = client.search("test", SearchBy::Name).await.unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "cower");
        assert!(got[0].is_orphan());
        assert_eq!(
            transport.urls(),
            vec!["https://aur.archlinux.org/rpc.php?arg=test&by=name&type=search&v=5"]
        );
    }

    #[tokio::test]
    async fn test_info() {
        let transport = MockTransport::new(200, VALID_PAYLOAD);
        let client = client_with(transport.clone());

        let got = client.info(&["test".to_string()]).await.unwrap();

        assert_eq!(got[0].license, vec!["MIT"]);
        assert_eq!(got[0].make_depends, vec!["perl"]);
        assert_eq!(
            transport.urls(),
            vec!["https://aur.archlinux.org/rpc.php?arg%5B%5D=test&type=info&v=5"]
        );
    }

    #[tokio::test]
    async fn test_info_no_match() {
        let transport = MockTransport::new(200, NO_MATCH_PAYLOAD);
        let client = client_with(transport.clone());

        let got = client.info(&["test".to_string()]).await.unwrap();

        assert!(got.is_empty());
        assert_eq!(transport.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_info_service_unavailable() {
        let transport = MockTransport::new(503, "Incorrect by field specified.");
        let client = client_with(transport.clone());

        let err = client.info(&["test".to_string()]).await.unwrap_err();

        assert!(matches!(err, AurError::ServiceUnavailable { status: 503 }));
        assert!(err.is_retryable());
        assert_eq!(transport.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_maintainer_without_packages() {
        let transport = MockTransport::new(200, NO_MATCH_PAYLOAD);
        let client = client_with(transport.clone());

        let got = client
            .search("nobody-maintains-this", SearchBy::Maintainer)
            .await
            .unwrap();

        assert!(got.is_empty());
        assert_eq!(
            transport.urls(),
            vec!["https://aur.archlinux.org/rpc.php?arg=nobody-maintains-this&by=maintainer&type=search&v=5"]
        );
    }

    #[tokio::test]
    async fn test_too_many_results() {
        let transport = MockTransport::new(
            200,
            r#"{"version":5,"type":"error","resultcount":0,"results":[],"error":"Too many package results."}"#,
        );
        let client = client_with(transport);

        let err = client.search("li", SearchBy::Unspecified).await.unwrap_err();

        assert!(err.is_too_many_results());
        assert_eq!(err.to_string(), "status 200: Too many package results.");
    }

    #[tokio::test]
    async fn test_orphans() {
        let transport = MockTransport::new(200, NO_MATCH_PAYLOAD);
        let client = client_with(transport.clone());

        client.orphans().await.unwrap();

        assert_eq!(
            transport.urls(),
            vec!["https://aur.archlinux.org/rpc.php?arg=&by=maintainer&type=search&v=5"]
        );
    }

    #[tokio::test]
    async fn test_package_not_found() {
        let client = client_with(MockTransport::new(200, NO_MATCH_PAYLOAD));

        let err = client.package("missing").await.unwrap_err();

        assert_eq!(err.to_string(), "AUR package 'missing' not found");
    }

    #[tokio::test]
    async fn test_package_found() {
        let client = client_with(MockTransport::new(200, VALID_PAYLOAD));
        assert_eq!(client.package("cower").await.unwrap().id, 229417);
    }

    #[tokio::test]
    async fn test_editor_headers_reach_transport() {
        let transport = MockTransport::new(200, NO_MATCH_PAYLOAD);
        let client = AurClient::builder()
            .shared_transport(transport.clone())
            .request_editor(SetHeader::new("x-client", "1").unwrap())
            .build()
            .unwrap();
        let call: Arc<dyn RequestEditor> = Arc::new(SetHeader::new("x-call", "2").unwrap());

        client
            .search_with("x", SearchBy::Name, &[call])
            .await
            .unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].headers.get("x-client").unwrap(), "1");
        assert_eq!(requests[0].headers.get("x-call").unwrap(), "2");
    }

    #[tokio::test]
    async fn test_call_editors_through_trait_object() {
        let transport = MockTransport::new(200, VALID_PAYLOAD);
        let client = AurClient::builder()
            .shared_transport(transport.clone())
            .request_editor(|req: &mut RpcRequest| -> Result<(), BoxError> {
                req.headers.insert("x-order", "client".parse()?);
                Ok(())
            })
            .build()
            .unwrap();
        let rpc: &dyn AurRpc = &client;
        let call: Arc<dyn RequestEditor> =
            Arc::new(|req: &mut RpcRequest| -> Result<(), BoxError> {
                req.headers.insert("x-order", "call".parse()?);
                Ok(())
            });

        let pkgs = rpc
            .info_with(&["cower".to_string()], &[call.clone()])
            .await
            .unwrap();
        assert_eq!(pkgs[0].name, "cower");
        rpc.search_with("cow", SearchBy::Name, &[call]).await.unwrap();
        rpc.search("cow", SearchBy::Name).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].headers.get("x-order").unwrap(), "call");
        assert_eq!(requests[1].headers.get("x-order").unwrap(), "call");
        assert_eq!(requests[2].headers.get("x-order").unwrap(), "client");
    }

    #[tokio::test]
    async fn test_editor_failure_skips_transport() {
        let transport = MockTransport::new(200, VALID_PAYLOAD);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let client = AurClient::builder()
            .shared_transport(transport.clone())
            .request_editor(move |_: &mut RpcRequest| -> Result<(), BoxError> {
                seen.fetch_add(1, Ordering::SeqCst);
                Err("signing key unavailable".into())
            })
            .build()
            .unwrap();

        let err = client.info(&["cower".to_string()]).await.unwrap_err();

        assert!(matches!(err, AurError::RequestEditor(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(transport.urls().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let client = client_with(MockTransport::failing("connection refused"));

        let err = client.search("x", SearchBy::Name).await.unwrap_err();

        match err {
            AurError::Network { url, source } => {
                assert_eq!(url, "https://aur.archlinux.org/rpc.php?arg=x&by=name&type=search&v=5");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reqwest_transport_end_to_end() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc.php"))
            .and(query_param("type", "info"))
            .and(query_param("arg[]", "cower"))
            .and(query_param("v", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_PAYLOAD))
            .mount(&mock_server)
            .await;

        let client = AurClient::builder()
            .base_url(mock_server.uri())
            .build()
            .unwrap();

        let got = client.info(&["cower".to_string()]).await.unwrap();
        assert_eq!(got[0].package_base_id, 44921);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            rpc_url: "http://localhost:8000/".to_string(),
            timeout_secs: 10,
            ..Config::default()
        };
        let client = AurClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/rpc.php");
    }
}
