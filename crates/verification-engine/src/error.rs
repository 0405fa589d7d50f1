use shared_pdf::IngestError;
use thiserror::Error;

/// Stage failures that end a run early. Mapped to the fallback report by the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Normalization worker failed: {0}")]
    WorkerFailed(String),
}
