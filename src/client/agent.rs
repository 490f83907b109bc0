use crate::error::{EdgevalError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Request body for the agent's LoadModel call
#[derive(Serialize)]
struct LoadModelRequest<'a> {
    url: &'a str,
    name: &'a str,
}

/// Request body for the agent's DescribeModel call
#[derive(Serialize)]
struct DescribeModelRequest<'a> {
    name: &'a str,
}

/// Request body for the agent's UnLoadModel call
#[derive(Serialize)]
struct UnLoadModelRequest<'a> {
    name: &'a str,
}

/// Tensor shape/type metadata published by the agent for a loaded model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorMetadata {
    pub name: String,
    pub data_type: i32,
    #[serde(default)]
    pub shape: Vec<i64>,
}

/// Model description returned by DescribeModel and ListModels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub input_tensor_metadatas: Vec<TensorMetadata>,
    #[serde(default)]
    pub output_tensor_metadatas: Vec<TensorMetadata>,
}

/// One input tensor of a Predict request
#[derive(Serialize)]
struct Tensor<'a> {
    tensor_metadata: &'a TensorMetadata,
    byte_data: String,
}

/// Request body for the agent's Predict call
#[derive(Serialize)]
struct PredictRequest<'a> {
    name: &'a str,
    tensors: Vec<Tensor<'a>>,
}

/// One output tensor of a prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputTensor {
    #[serde(default)]
    pub tensor_metadata: Option<TensorMetadata>,
    #[serde(default)]
    pub byte_data: Option<String>,
}

/// Response body of the agent's Predict call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub tensors: Vec<OutputTensor>,
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelDescription>,
}

/// Client for the on-device model-management/inference agent.
///
/// The request/response schema is owned by the agent; the types above only
/// mirror it for marshaling. Every call is a single attempt — the agent
/// runs on the same device, so there is no retry policy here.
pub struct AgentClient {
    client: Client,
    endpoint: String,
}

impl AgentClient {
    /// Create a new agent client bound to `endpoint`
    /// (e.g. "http://127.0.0.1:8602").
    ///
    /// # Panics
    ///
    /// Panics if HTTP client cannot be created (should not happen in normal operation)
    pub fn new(endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.endpoint, method)
    }

    /// Load the model stored at `url` under `name`.
    ///
    /// A conflict response maps to [`EdgevalError::ModelAlreadyLoaded`] so
    /// callers can treat the repeated-load case as non-fatal and continue.
    pub async fn load_model(&self, url: &str, name: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("LoadModel"))
            .json(&LoadModelRequest { url, name })
            .send()
            .await
            .map_err(|e| EdgevalError::Agent(format!("Network error: {}", e)))?;

        if response.status() == StatusCode::CONFLICT {
            return Err(EdgevalError::ModelAlreadyLoaded(name.to_string()));
        }
        Self::check_status(response).await?;
        log::info!("Loaded model '{}' from {}", name, url);
        Ok(())
    }

    /// Fetch the description (tensor metadata included) of a loaded model.
    pub async fn describe_model(&self, name: &str) -> Result<ModelDescription> {
        let response = self
            .client
            .post(self.url("DescribeModel"))
            .json(&DescribeModelRequest { name })
            .send()
            .await
            .map_err(|e| EdgevalError::Agent(format!("Network error: {}", e)))?;

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| EdgevalError::Parse(format!("Invalid DescribeModel response: {}", e)))
    }

    /// List every model currently loaded on the agent.
    pub async fn list_models(&self) -> Result<Vec<ModelDescription>> {
        let response = self
            .client
            .post(self.url("ListModels"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| EdgevalError::Agent(format!("Network error: {}", e)))?;

        let response = Self::check_status(response).await?;
        let result: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| EdgevalError::Parse(format!("Invalid ListModels response: {}", e)))?;
        Ok(result.models)
    }

    /// Unload a model by name.
    pub async fn unload_model(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("UnLoadModel"))
            .json(&UnLoadModelRequest { name })
            .send()
            .await
            .map_err(|e| EdgevalError::Agent(format!("Network error: {}", e)))?;

        Self::check_status(response).await?;
        log::info!("Unloaded model '{}'", name);
        Ok(())
    }

    /// Run prediction over one image file.
    ///
    /// The input tensor is built from the model description's first
    /// input-tensor metadata; the image file's raw bytes travel base64-encoded
    /// inside the JSON body and are decoded by the agent.
    pub async fn predict(
        &self,
        model: &ModelDescription,
        image_path: &Path,
    ) -> Result<PredictResponse> {
        let metadata = model.input_tensor_metadatas.first().ok_or_else(|| {
            EdgevalError::Agent(format!(
                "model '{}' has no input tensor metadata",
                model.name
            ))
        })?;

        let bytes = std::fs::read(image_path)?;
        let request = PredictRequest {
            name: &model.name,
            tensors: vec![Tensor {
                tensor_metadata: metadata,
                byte_data: BASE64.encode(&bytes),
            }],
        };

        let response = self
            .client
            .post(self.url("Predict"))
            .json(&request)
            .send()
            .await
            .map_err(|e| EdgevalError::Agent(format!("Network error: {}", e)))?;

        let response = Self::check_status(response).await?;
        log::debug!("Predict on {} sent {} bytes", image_path.display(), bytes.len());
        response
            .json()
            .await
            .map_err(|e| EdgevalError::Parse(format!("Invalid Predict response: {}", e)))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(EdgevalError::Agent(format!(
                "Agent error {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}
