#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayFault {
    #[error("admin api request failed: {0}")]
    Transport(String),
    #[error("admin api request timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("admin api rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("admin api response could not be decoded: {0}")]
    Decode(String),
    #[error("admin api request could not be encoded: {0}")]
    Encode(String),
}
