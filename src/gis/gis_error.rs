use thiserror::Error;

#[derive(Debug, Error)]
pub enum GisError {
    /// The request never produced a response (DNS, connect, timeout, reading the body).
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-2xx status.
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the JSON shape we expect.
    #[error("unparseable response: {0}")]
    Unparseable(String),

    /// The body parsed, but carried an ArcGIS `error` descriptor.
    #[error("upstream service error ({code}): {message}")]
    Service { code: i64, message: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl GisError {
    /// True when the service did not respond usefully at the HTTP level, as
    /// opposed to responding with something wrong.
    pub fn is_transport(&self) -> bool {
        matches!(self, GisError::Unreachable(_) | GisError::Status { .. })
    }
}
