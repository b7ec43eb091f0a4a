use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::{FileSource, SelectedFile},
    protocol::{
        ConversionResult, HealthResponse, SupportedFormatsResponse, CONVERT_PATH, HEALTH_PATH,
        SUPPORTED_FORMATS_PATH, UPLOAD_FIELD,
    },
};
use tracing::{debug, info};
use url::Url;

pub mod error;
pub use error::ClientError;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote side of a conversion: one buffered request, one buffered response.
#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Uploads `file` as the sole multipart field and decodes the JSON reply.
    ///
    /// A reply with `success: false` is still `Ok`; only failures to build,
    /// send, or decode the exchange are errors.
    async fn convert(&self, file: &SelectedFile) -> Result<ConversionResult, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
    async fn supported_formats(&self) -> Result<SupportedFormatsResponse, ClientError>;
}

pub struct ConversionClient {
    http: Client,
    service_url: Url,
}

impl ConversionClient {
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let service_url = parse_service_url(service_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, service_url })
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.service_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl {
                url: format!("{}{path}", self.service_url),
                reason: err.to_string(),
            })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}

#[async_trait]
impl ConversionService for ConversionClient {
    async fn convert(&self, file: &SelectedFile) -> Result<ConversionResult, ClientError> {
        let url = self.endpoint(CONVERT_PATH)?;
        let bytes = read_file_bytes(file).await?;
        let size_bytes = bytes.len();
        let form = build_upload_form(&file.name, bytes)?;

        debug!(filename = %file.name, size_bytes, %url, "uploading document for conversion");
        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        // Rejections (400/500) still carry a JSON body the UI shows verbatim.
        let body = response.bytes().await?;
        let result: ConversionResult =
            serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
                status: status.as_u16(),
                source,
            })?;

        info!(
            filename = %file.name,
            status = status.as_u16(),
            success = result.success,
            text_len = result.text.len(),
            "conversion response received"
        );
        Ok(result)
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json(HEALTH_PATH).await
    }

    async fn supported_formats(&self) -> Result<SupportedFormatsResponse, ClientError> {
        self.get_json(SUPPORTED_FORMATS_PATH).await
    }
}

pub fn parse_service_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

async fn read_file_bytes(file: &SelectedFile) -> Result<Vec<u8>, ClientError> {
    match &file.source {
        FileSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| ClientError::ReadFile {
                    path: path.clone(),
                    source,
                })
        }
        FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}

fn build_upload_form(filename: &str, bytes: Vec<u8>) -> Result<Form, ClientError> {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    let part = Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(mime.essence_str())?;
    Ok(Form::new().part(UPLOAD_FIELD, part))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
