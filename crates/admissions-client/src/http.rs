//! HTTP implementation of [`DirectoryApi`] using reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use admissions_core::config::backend::BackendConfig;
use admissions_core::error::{AppError, ErrorKind};
use admissions_core::AppResult;
use admissions_core::types::{DirectoryId, FieldId};
use admissions_entity::directory::{CreateDirectory, Directory};
use admissions_entity::field::model::FieldStatsResponse;
use admissions_entity::field::{
    CreateFieldDto, DirectoryField, FieldStats, ReorderFieldsRequest, UpdateFieldDto,
};
use admissions_entity::record::{
    CreateRecordRequest, DirectoryRecord, DirectoryValue, UpsertValuesRequest,
};

use crate::api::DirectoryApi;

/// Directory API client talking to the admissions backend.
#[derive(Debug, Clone)]
pub struct HttpDirectoryApi {
    /// Shared reqwest client holding the cookie jar.
    client: Client,
    /// Backend base URL without trailing slash.
    base_url: String,
}

impl HttpDirectoryApi {
    /// Build a client from backend configuration.
    ///
    /// A configured session cookie is installed into the cookie jar so every
    /// request carries the admin's session.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| {
            AppError::configuration(format!("Invalid backend URL '{base_url}': {e}"))
        })?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = config.session_cookie.as_deref() {
            jar.add_cookie_str(
                &format!("{}={}", config.session_cookie_name, cookie),
                &parsed,
            );
        }

        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    fn with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    /// Send a request and return the response text of a 2xx answer.
    async fn execute(&self, request: RequestBuilder, fallback: &str) -> AppResult<String> {
        let request = request
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.client.execute(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "Backend request failed");
            AppError::with_source(ErrorKind::Network, format!("{fallback}: {e}"), e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Network,
                format!("{fallback}: failed to read response: {e}"),
                e,
            )
        })?;

        debug!(%method, %path, status = status.as_u16(), "Backend responded");

        if !status.is_success() {
            let message = extract_message(&body).unwrap_or_else(|| fallback.to_string());
            warn!(%method, %path, status = status.as_u16(), %message, "Backend rejected request");
            return Err(AppError::from_status(status.as_u16(), message));
        }

        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> AppResult<T> {
        let body = self.execute(request, fallback).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull the user-facing message out of an error body.
///
/// The backend answers `{ "message": "..." }`; validation failures may carry
/// `{ "message": ["...", "..."] }`, which are joined.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn directory_path(directory_id: DirectoryId) -> String {
    format!("/api/directories/{directory_id}")
}

fn field_path(directory_id: DirectoryId, field_id: FieldId) -> String {
    format!("/api/directories/{directory_id}/fields/{field_id}")
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn list_directories(&self, year: Option<i32>) -> AppResult<Vec<Directory>> {
        let path = match year {
            Some(year) => format!("/api/directories?year={year}"),
            None => "/api/directories".to_string(),
        };
        self.fetch(
            self.request(Method::GET, &path),
            "Failed to fetch directories",
        )
        .await
    }

    async fn create_directory(&self, request: &CreateDirectory) -> AppResult<Directory> {
        let req = self.with_body(Method::POST, "/api/directories", request);
        self.fetch(req, "Failed to create directory").await
    }

    async fn get_directory(&self, directory_id: DirectoryId) -> AppResult<Directory> {
        self.fetch(
            self.request(Method::GET, &directory_path(directory_id)),
            "Failed to fetch directory",
        )
        .await
    }

    async fn delete_directory(&self, directory_id: DirectoryId) -> AppResult<()> {
        self.execute(
            self.request(Method::DELETE, &directory_path(directory_id)),
            "Failed to delete directory",
        )
        .await
        .map(|_| ())
    }

    async fn create_field(
        &self,
        directory_id: DirectoryId,
        request: &CreateFieldDto,
    ) -> AppResult<DirectoryField> {
        let path = format!("{}/fields", directory_path(directory_id));
        let req = self.with_body(Method::POST, &path, request);
        self.fetch(req, "Failed to create field").await
    }

    async fn update_field(
        &self,
        directory_id: DirectoryId,
        field_id: FieldId,
        request: &UpdateFieldDto,
    ) -> AppResult<DirectoryField> {
        let req = self.with_body(Method::PATCH, &field_path(directory_id, field_id), request);
        self.fetch(req, "Failed to update field").await
    }

    async fn delete_field(&self, directory_id: DirectoryId, field_id: FieldId) -> AppResult<()> {
        self.execute(
            self.request(Method::DELETE, &field_path(directory_id, field_id)),
            "Failed to delete field",
        )
        .await
        .map(|_| ())
    }

    async fn reorder_fields(
        &self,
        directory_id: DirectoryId,
        request: &ReorderFieldsRequest,
    ) -> AppResult<Vec<DirectoryField>> {
        debug!(
            %directory_id,
            fields = request.fields.len(),
            "Sending reorder request"
        );
        let path = format!("{}/fields/reorder", directory_path(directory_id));
        let req = self.with_body(Method::PATCH, &path, request);
        self.fetch(req, "Failed to reorder fields").await
    }

    async fn field_stats(
        &self,
        directory_id: DirectoryId,
        field_id: FieldId,
    ) -> AppResult<FieldStats> {
        let path = format!("{}/stats", field_path(directory_id, field_id));
        let response: FieldStatsResponse = self
            .fetch(
                self.request(Method::GET, &path),
                "Failed to fetch field stats",
            )
            .await?;
        Ok(response.stats)
    }

    async fn create_record(
        &self,
        directory_id: DirectoryId,
        request: &CreateRecordRequest,
    ) -> AppResult<DirectoryRecord> {
        let path = format!("{}/records", directory_path(directory_id));
        let req = self.with_body(Method::POST, &path, request);
        self.fetch(req, "Failed to create record").await
    }

    async fn upsert_values(
        &self,
        directory_id: DirectoryId,
        request: &UpsertValuesRequest,
    ) -> AppResult<Vec<DirectoryValue>> {
        let path = format!("{}/values", directory_path(directory_id));
        let req = self.with_body(Method::PUT, &path, request);
        self.fetch(req, "Failed to save values").await
    }
}
