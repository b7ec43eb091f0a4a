use serde::{Deserialize, Serialize};

pub const CONVERT_PATH: &str = "/api/convert";
pub const HEALTH_PATH: &str = "/api/health";
pub const SUPPORTED_FORMATS_PATH: &str = "/api/supported-formats";

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "file";

pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Outcome of one conversion attempt as returned by the conversion service.
///
/// Every field is optional on the wire: rejected uploads come back as a bare
/// `{"error": "..."}` body, which still decodes as a failed result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn network_error() -> Self {
        Self {
            success: false,
            text: String::new(),
            filename: String::new(),
            error: Some(NETWORK_ERROR_MESSAGE.to_string()),
        }
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedFormatsResponse {
    pub formats: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_successful_conversion() {
        let result: ConversionResult = serde_json::from_str(
            r#"{"success":true,"text":"Hello world","filename":"report.pdf"}"#,
        )
        .expect("decode");
        assert!(result.success);
        assert_eq!(result.text, "Hello world");
        assert_eq!(result.filename, "report.pdf");
        assert_eq!(result.error, None);
    }

    #[test]
    fn decodes_bare_error_body_as_failure() {
        let result: ConversionResult =
            serde_json::from_str(r#"{"error":"File type not allowed"}"#).expect("decode");
        assert!(!result.success);
        assert_eq!(result.error_message(), "File type not allowed");
        assert!(result.text.is_empty());
        assert!(result.filename.is_empty());
    }

    #[test]
    fn network_error_has_fixed_shape() {
        assert_eq!(
            ConversionResult::network_error(),
            ConversionResult {
                success: false,
                text: String::new(),
                filename: String::new(),
                error: Some("Network error occurred".to_string()),
            }
        );
    }
}
