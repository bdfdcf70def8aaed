use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("HTTP {status}: {body}")]
	Status { status: u16, body: String },
	#[error("unexpected response: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("not signed in")]
	Unauthenticated,
}

impl ApiError {
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, ApiError::Unauthenticated | ApiError::Status { status: 401, .. })
	}
}

pub type ApiResult<T> = Result<T, ApiError>;
