//! End-to-end test harness: boots the real server against stub upstream
//! servers returning canned provider JSON.

use std::net::SocketAddr;

use axum::Router;
use config::Config;
use serde_json::{Value, json};
use server::ServeConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// A running pressbox server bound to an ephemeral port.
pub struct TestServer {
    /// Client pointed at the server.
    pub client: TestClient,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Boot `serve()` from a TOML configuration string. Stub upstream URLs
    /// are normally formatted into the TOML by the test.
    pub async fn spawn(config_toml: &str) -> Self {
        let config: Config = toml::from_str(config_toml).expect("test config must parse");

        let shutdown = CancellationToken::new();
        let (addr_sender, addr_receiver) = tokio::sync::oneshot::channel();

        tokio::spawn(server::serve(ServeConfig {
            listen_address: "127.0.0.1:0".parse().expect("loopback address must parse"),
            config,
            shutdown_signal: shutdown.clone(),
            log_filter: "info".to_string(),
            version: "test".to_string(),
            bound_addr_sender: Some(addr_sender),
        }));

        let addr = addr_receiver.await.expect("server must report its bound address");

        Self {
            client: TestClient::new(format!("http://{addr}")),
            shutdown,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Thin reqwest wrapper speaking the JSON-RPC wire format.
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// POST a raw JSON-RPC body to `/mcp`; returns HTTP status and body.
    pub async fn rpc_raw(&self, body: String) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}/mcp", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("rpc request must reach the server");

        let status = response.status().as_u16();
        let body: Value = response.json().await.expect("rpc response must be JSON");

        (status, body)
    }

    /// POST a JSON-RPC envelope.
    pub async fn rpc(&self, body: Value) -> (u16, Value) {
        self.rpc_raw(body.to_string()).await
    }

    /// Call one tool with `id: 1` and return the full JSON-RPC body.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        let (status, body) = self
            .rpc(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": name, "arguments": arguments},
            }))
            .await;

        assert_eq!(status, 200, "tool calls ride on HTTP 200: {body}");

        body
    }

    /// Call one tool and unwrap the `result` envelope.
    pub async fn tool_result(&self, name: &str, arguments: Value) -> Value {
        let body = self.call_tool(name, arguments).await;

        body.get("result").cloned().expect("tool call must produce a result envelope")
    }

    /// GET a path on the server.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("request must reach the server")
    }
}

/// A stub upstream provider bound to an ephemeral port.
pub struct StubUpstream {
    /// Base URL to format into the server's configuration.
    pub url: String,
    shutdown: CancellationToken,
}

impl StubUpstream {
    /// Serve an arbitrary axum router as a stand-in for a provider.
    pub async fn serve(router: Router) -> Self {
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("stub must bind");
        let addr: SocketAddr = listener.local_addr().expect("stub must know its address");

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();

        tokio::spawn(async move {
            let server = axum::serve(listener, router);

            tokio::select! {
                _ = server => {}
                _ = signal.cancelled() => {}
            }
        });

        Self {
            url: format!("http://{addr}"),
            shutdown,
        }
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
