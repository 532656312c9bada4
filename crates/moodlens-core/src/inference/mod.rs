//! Inference gateway
//!
//! One call to [`InferenceGateway::classify`] sends one image to the
//! facial-expression endpoint. The only condition it retries is a model
//! that is still loading; every other failure is returned at once.

mod gateway;
mod transport;
mod types;


pub use gateway::InferenceGateway;
pub use transport::{HttpTransport, InferenceTransport};
pub use types::{AnalysisResult, InferenceRequest, LOADING_MARKER, TransportResponse};
