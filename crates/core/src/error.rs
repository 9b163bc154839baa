#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown registration field: {0}")]
    UnknownField(String),
    #[error("{0}")]
    DraftSchema(String),
    #[error("invalid text catalogue: {0}")]
    Catalogue(String),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;
