#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Speech synthesis is not supported in this environment.")]
    UnsupportedEnvironment,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid discovery config: {0}")]
    Config(String),
    #[error("Invalid utterance: {0}")]
    InvalidUtterance(String),
    #[error("Speech platform error: {0}")]
    Platform(String),
}
