//! [`ItemGateway`] over the REST API.
//!
//! Error responses carry `{ "error": CODE, "message": text }`; the code is
//! mapped back to an [`ErrorKind`] so callers see the same taxonomy as the
//! in-process store. Transport failures become `Network`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use diagramhub_core::config::GatewayConfig;
use diagramhub_core::{AppError, AppResult, ErrorKind, ItemId, UserId};
use diagramhub_entity::content::{FileContent, FileVersion};
use diagramhub_entity::item::{CreateItem, Item, MoveItem, RenameItem, SaveContent};

use crate::gateway::ItemGateway;

/// Header carrying the caller's identity.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

/// Gateway that talks to a DiagramHub server.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    user_id: UserId,
}

impl HttpGateway {
    /// Create a gateway with an explicit client.
    pub fn new(client: Client, base_url: impl Into<String>, user_id: UserId) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id,
        }
    }

    /// Build a gateway from configuration.
    pub fn from_config(config: &GatewayConfig) -> AppResult<Self> {
        let raw = config
            .user_id
            .as_deref()
            .ok_or_else(|| AppError::configuration("gateway.user_id is required"))?;
        let user_id: UserId = raw
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid gateway.user_id: {e}")))?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e))?;
        Ok(Self::new(client, &config.base_url, user_id))
    }

    /// The identity this gateway acts as.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/items{path}", self.base_url)
    }

    async fn execute(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .header(USER_ID_HEADER, self.user_id.to_string())
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Network, format!("Request failed: {e}"), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        debug!(status = %status, "Item API returned an error");
        Err(error_from_response(status, response).await)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = self.execute(request).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to decode response: {e}"),
                e,
            )
        })
    }
}

fn kind_from_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::Internal,
    }
}

async fn error_from_response(status: StatusCode, response: Response) -> AppError {
    match response.json::<ErrorBody>().await {
        Ok(body) => AppError::new(ErrorKind::from_code(&body.error), body.message),
        Err(_) => AppError::new(
            kind_from_status(status),
            format!("Request failed with status {status}"),
        ),
    }
}

#[async_trait]
impl ItemGateway for HttpGateway {
    async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.json(self.client.get(self.url(""))).await
    }

    async fn create_item(&self, input: CreateItem) -> AppResult<Item> {
        self.json(self.client.post(self.url("")).json(&input)).await
    }

    async fn rename_item(&self, id: &ItemId, input: RenameItem) -> AppResult<()> {
        let request = self.client.patch(self.url(&format!("/{id}"))).json(&input);
        self.execute(request).await.map(|_| ())
    }

    async fn move_item(&self, id: &ItemId, input: MoveItem) -> AppResult<()> {
        let request = self.client.patch(self.url(&format!("/{id}/move"))).json(&input);
        self.execute(request).await.map(|_| ())
    }

    async fn delete_item(&self, id: &ItemId) -> AppResult<()> {
        let request = self.client.delete(self.url(&format!("/{id}")));
        self.execute(request).await.map(|_| ())
    }

    async fn duplicate_item(&self, id: &ItemId) -> AppResult<Item> {
        self.json(self.client.post(self.url(&format!("/{id}/duplicate"))))
            .await
    }

    async fn get_content(&self, id: &ItemId) -> AppResult<FileContent> {
        self.json(self.client.get(self.url(&format!("/{id}/content"))))
            .await
    }

    async fn save_content(&self, id: &ItemId, input: SaveContent) -> AppResult<()> {
        let request = self.client.put(self.url(&format!("/{id}/content"))).json(&input);
        self.execute(request).await.map(|_| ())
    }

    async fn list_versions(&self, id: &ItemId) -> AppResult<Vec<FileVersion>> {
        self.json(self.client.get(self.url(&format!("/{id}/versions"))))
            .await
    }
}
