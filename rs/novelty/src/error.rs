use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    /// Caller configuration mistake, e.g. `k == 0` or a budget larger than the pool.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cannot update a model from an empty batch")]
    EmptyBatch,

    #[error("Cannot score items against an empty model")]
    EmptyModel,

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No finite reconstruction score among {0} remaining items")]
    NonFiniteScores(usize),

    #[error("SVD did not return left singular vectors")]
    MissingSingularVectors,

    #[error("Ranking was cancelled")]
    Cancelled,

    #[error("Linear algebra failure: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, RankingError>;
