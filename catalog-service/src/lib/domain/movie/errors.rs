use thiserror::Error;

use crate::domain::errors::StorageError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("must be provided")]
    Empty,

    #[error("must not be more than {max} bytes long")]
    TooLong { max: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum YearError {
    #[error("must be greater than {min}")]
    TooEarly { min: i32 },

    #[error("must not be in the future")]
    InFuture,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("must be a positive integer")]
    NotPositive,

    #[error("invalid runtime format")]
    Format,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenresError {
    #[error("must contain at least 1 genre")]
    Empty,

    #[error("must not contain more than {max} genres")]
    TooMany { max: usize },

    #[error("must not contain blank genres")]
    Blank,

    #[error("must not contain duplicate values")]
    Duplicate,
}

/// Rejected list query parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("page must be between 1 and {max}")]
    Page { max: u32 },

    #[error("page_size must be between 1 and {max}")]
    PageSize { max: u32 },

    #[error("invalid sort value: {0}")]
    Sort(String),
}

/// Top-level error for all movie-related operations
#[derive(Debug, Clone, Error)]
pub enum MovieError {
    #[error("title {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("year {0}")]
    InvalidYear(#[from] YearError),

    #[error("runtime {0}")]
    InvalidRuntime(#[from] RuntimeError),

    #[error("genres {0}")]
    InvalidGenres(#[from] GenresError),

    #[error("{0}")]
    InvalidFilter(#[from] FilterError),

    #[error("the requested resource could not be found")]
    NotFound,

    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
