use crate::data::models::product::ProductId;
use thiserror::Error;

/// Failures reported by the product repository and category provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Product {0} not found")]
    NotFound(ProductId),
    #[error("Product rejected: {0}")]
    Validation(String),
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(String),
    #[error("Upload failed: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown list field '{0}'")]
pub struct UnknownFieldError(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("Product form is not ready ({0})")]
    NotReady(&'static str),
    #[error("Product could not be loaded: {0}")]
    LoadFailed(String),
    #[error("Submission is only possible from the last step")]
    NotOnFinalStep,
    #[error("No image at index {index} (gallery holds {len})")]
    ImageIndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
