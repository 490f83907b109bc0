//! HTTP clients for the on-device agent and the anomaly-detection server.

pub mod agent;
pub mod detector;

pub use agent::{AgentClient, ModelDescription, OutputTensor, PredictResponse, TensorMetadata};
pub use detector::{Detection, DetectorClient};
