use thiserror::Error;

/// Pipeline-wide error taxonomy. The whole batch fails on the first
/// schema or category error; there is no partial-failure recovery.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("schema error in column '{column}': {detail}")]
    Schema { column: String, detail: String },

    #[error("unknown {field} value: '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    #[error("input contains no orders")]
    EmptyInput,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
