//! HTTP adapter for the media ingestion/trim service
//!
//! Speaks the JSON/multipart contract of the upload backend:
//! `POST /upload` (multipart `file`), `POST /upload-url` (`{"url"}`) and
//! `POST /trim`, plus plain `GET` for result artifacts.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::adapters::toml_config::ServiceConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Body returned by both ingestion endpoints
#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    #[serde(rename = "cloudinaryUploadResponse")]
    upload: UploadPayload,
}

#[derive(Debug, Deserialize)]
struct UploadPayload {
    public_id: String,
    asset_id: String,
    url: String,
}

impl From<UploadPayload> for IngestResult {
    fn from(payload: UploadPayload) -> Self {
        IngestResult {
            content_id: payload.public_id,
            version_id: payload.asset_id,
            preview_url: payload.url,
        }
    }
}

#[derive(Debug, Serialize)]
struct IngestUrlBody<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct TrimBody<'a> {
    public_id: &'a str,
    asset_id: &'a str,
    start_time: &'a str,
    end_time: &'a str,
}

#[derive(Debug, Deserialize)]
struct TrimReply {
    #[serde(rename = "trimmedUrl")]
    trimmed_url: String,
}

/// reqwest-backed media service client
pub struct HttpMediaServiceAdapter {
    client: Client,
    config: ServiceConfig,
}

impl HttpMediaServiceAdapter {
    /// Create new HTTP adapter
    pub fn new(config: ServiceConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::BadArgs(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn check_status(response: Response) -> Result<Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        Err(DomainError::ServiceRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode_upload(response: Response) -> Result<IngestResult, DomainError> {
        let body = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(transport)?;
        let envelope: UploadEnvelope = serde_json::from_slice(&body)
            .map_err(|e| DomainError::MalformedResponse(e.to_string()))?;
        Ok(envelope.upload.into())
    }
}

fn transport(error: reqwest::Error) -> DomainError {
    DomainError::TransportFailure(error.to_string())
}

#[async_trait]
impl MediaServicePort for HttpMediaServiceAdapter {
    async fn ingest_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<IngestResult, DomainError> {
        let url = self.endpoint(&self.config.upload_path);
        tracing::debug!(%url, file_name, size = bytes.len(), "Uploading media");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        Self::decode_upload(response).await
    }

    async fn ingest_url(&self, source: &str) -> Result<IngestResult, DomainError> {
        let url = self.endpoint(&self.config.upload_url_path);
        tracing::debug!(%url, source, "Requesting remote ingestion");

        let response = self
            .client
            .post(&url)
            .json(&IngestUrlBody { url: source })
            .send()
            .await
            .map_err(transport)?;
        Self::decode_upload(response).await
    }

    async fn trim(&self, request: &TrimRequest) -> Result<TrimResult, DomainError> {
        let url = self.endpoint(&self.config.trim_path);
        tracing::debug!(
            %url,
            content_id = %request.content_id,
            start = %request.start_timecode,
            end = %request.end_timecode,
            "Requesting trim"
        );

        let body = TrimBody {
            public_id: &request.content_id,
            asset_id: &request.version_id,
            start_time: &request.start_timecode,
            end_time: &request.end_timecode,
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let body = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(transport)?;
        let reply: TrimReply = serde_json::from_slice(&body)
            .map_err(|e| DomainError::MalformedResponse(e.to_string()))?;

        Ok(TrimResult {
            url: reply.trimmed_url,
        })
    }
}

#[async_trait]
impl ArtifactFetchPort for HttpMediaServiceAdapter {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        let bytes = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(transport)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let adapter = HttpMediaServiceAdapter::new(ServiceConfig {
            base_url: "http://media.local:3000/".to_string(),
            ..ServiceConfig::default()
        })
        .unwrap();
        assert_eq!(adapter.endpoint("/trim"), "http://media.local:3000/trim");
        assert_eq!(adapter.endpoint("upload"), "http://media.local:3000/upload");
    }

    #[test]
    fn test_upload_envelope_maps_identifier_pair() {
        let envelope: UploadEnvelope = serde_json::from_str(
            r#"{"cloudinaryUploadResponse":{"public_id":"c1","asset_id":"v1","url":"u1","bytes":42}}"#,
        )
        .unwrap();
        let result: IngestResult = envelope.upload.into();
        assert_eq!(
            result,
            IngestResult {
                content_id: "c1".to_string(),
                version_id: "v1".to_string(),
                preview_url: "u1".to_string(),
            }
        );
    }

    #[test]
    fn test_trim_body_uses_wire_names() {
        let body = serde_json::to_value(TrimBody {
            public_id: "c1",
            asset_id: "v1",
            start_time: "0:05",
            end_time: "0:10",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "public_id": "c1",
                "asset_id": "v1",
                "start_time": "0:05",
                "end_time": "0:10"
            })
        );
    }
}
