//! Request and response DTOs for the REST endpoints.

pub mod request;
pub mod response;

pub use request::RegisterDeviceTokenRequest;
pub use response::{ApiResponse, DetailedHealthResponse, HealthResponse, MessageResponse};
