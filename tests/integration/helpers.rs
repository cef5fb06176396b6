//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use diagramhub_api::{AppState, build_app};
use diagramhub_core::UserId;
use diagramhub_core::config::AppConfig;
use diagramhub_service::Workspace;
use diagramhub_storage::{HttpGateway, ItemGateway};

/// A DiagramHub server running on an ephemeral port.
pub struct TestServer {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// Configuration the server was built with.
    pub config: AppConfig,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with default configuration.
    pub async fn spawn() -> Self {
        let config = AppConfig::default();
        let app = build_app(AppState::new(config.clone()), &config.server.cors);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            config,
            handle,
        }
    }

    /// Absolute URL for an API path such as `/api/items`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// An HTTP gateway acting as `user`.
    pub fn gateway(&self, user: UserId) -> HttpGateway {
        HttpGateway::new(reqwest::Client::new(), &self.base_url, user)
    }

    /// A loaded workspace talking to this server as `user`.
    pub async fn workspace(&self, user: UserId) -> Workspace {
        let gateway: Arc<dyn ItemGateway> = Arc::new(self.gateway(user));
        let mut workspace = Workspace::new(gateway, &self.config);
        workspace.load().await;
        workspace
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
