use crate::error::{EdgevalError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Request body for the detection server's DetectAnomalies call
#[derive(Serialize)]
struct DetectAnomaliesRequest<'a> {
    model_id: &'a str,
    bitmap_bytes: String,
}

/// Verdict for one image
#[derive(Debug, Clone, Deserialize)]
pub struct Detection {
    pub is_anomalous: bool,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Deserialize)]
struct DetectAnomaliesResponse {
    detect_anomaly_result: Detection,
}

/// Client for a binary anomaly-detection inference server.
///
/// Bound to one endpoint and one model identifier for its whole lifetime;
/// evaluating another model means constructing another client. The image
/// file's bytes are forwarded undecoded — pixel formats are the server's
/// concern.
pub struct DetectorClient {
    client: Client,
    endpoint: String,
    model_id: String,
}

impl DetectorClient {
    /// Create a new detector client for `model_id` served at `endpoint`.
    ///
    /// # Panics
    ///
    /// Panics if HTTP client cannot be created (should not happen in normal operation)
    pub fn new(endpoint: String, model_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model_id,
        }
    }

    /// Ask the server whether the image at `image_path` is anomalous.
    pub async fn detect_anomalies(&self, image_path: &Path) -> Result<Detection> {
        let bytes = std::fs::read(image_path)?;
        let request = DetectAnomaliesRequest {
            model_id: &self.model_id,
            bitmap_bytes: BASE64.encode(&bytes),
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(format!("{}/DetectAnomalies", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| EdgevalError::Inference(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(EdgevalError::Inference(format!(
                "Detection server error {}: {}",
                status, body
            )));
        }

        let result: DetectAnomaliesResponse = response
            .json()
            .await
            .map_err(|e| EdgevalError::Parse(format!("Invalid DetectAnomalies response: {}", e)))?;

        log::debug!(
            "DetectAnomalies on {} took {:?}",
            image_path.display(),
            start.elapsed()
        );
        Ok(result.detect_anomaly_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_new() {
        let client = DetectorClient::new(
            "http://127.0.0.1:8503/".to_string(),
            "arn:model-1".to_string(),
        );
        assert_eq!(client.endpoint, "http://127.0.0.1:8503");
        assert_eq!(client.model_id, "arn:model-1");
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(DetectAnomaliesRequest {
            model_id: "arn:model-1",
            bitmap_bytes: BASE64.encode(b"raw"),
        })
        .unwrap();
        assert_eq!(json["model_id"], "arn:model-1");
        assert_eq!(json["bitmap_bytes"], BASE64.encode(b"raw"));
    }

    #[test]
    fn test_response_shape() {
        let json = r#"{"detect_anomaly_result": {"is_anomalous": true, "confidence": 0.93}}"#;
        let parsed: DetectAnomaliesResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.detect_anomaly_result.is_anomalous);
        assert!((parsed.detect_anomaly_result.confidence - 0.93).abs() < 1e-6);
    }

    #[test]
    fn test_response_confidence_optional() {
        let json = r#"{"detect_anomaly_result": {"is_anomalous": false}}"#;
        let parsed: DetectAnomaliesResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.detect_anomaly_result.is_anomalous);
        assert_eq!(parsed.detect_anomaly_result.confidence, 0.0);
    }
}
