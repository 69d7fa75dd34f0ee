// errors.rs
use crate::gis::GisError;
use crate::mailer::MailerError;
use crate::pipeline::PipelineError;
use thiserror::Error;

/// Anything that can end a run early. Each layer keeps its own error type;
/// this is where they meet for `main`.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("full dump stopped early (resume with --start-offset {resume_at}): {source}")]
    Dump {
        resume_at: u64,
        #[source]
        source: GisError,
    },

    #[error("GIS client error: {0}")]
    Gis(#[from] GisError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// True when the county GIS could not be reached or answered with a bad
    /// HTTP status. Worth a retry later, unlike a malformed response.
    pub fn is_transport(&self) -> bool {
        match self {
            ReportError::Pipeline(e) => e.source.is_transport(),
            ReportError::Dump { source, .. } | ReportError::Gis(source) => source.is_transport(),
            ReportError::Mail(_) | ReportError::Io(_) | ReportError::Json(_) => false,
        }
    }
}
