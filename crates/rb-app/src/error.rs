//! Error types for the rb-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build {what}: {message}")]
    Build { what: String, message: String },

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub(crate) fn build(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AppError::Build {
            what: what.into(),
            message: err.to_string(),
        }
    }
}

impl From<rb_project::ProjectError> for AppError {
    fn from(err: rb_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<rb_project::ValidationError> for AppError {
    fn from(err: rb_project::ValidationError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<rb_solver::SolverError> for AppError {
    fn from(err: rb_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Results(err.to_string())
    }
}
