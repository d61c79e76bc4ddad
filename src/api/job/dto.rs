use serde::{Deserialize, Serialize};

/// Response envelope shared by the processor endpoints
///
/// Exactly one of `data` and `error` is set; the other serializes as null.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// Error details carried in the envelope
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiError {
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ApiError {
                message: message.into(),
            }),
        }
    }
}
