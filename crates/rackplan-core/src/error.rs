use thiserror::Error;

#[derive(Error, Debug)]
pub enum RackError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RackError {
    pub fn device_not_found(index: usize) -> Self {
        RackError::NotFound(format!("no device at index {}", index))
    }

    pub fn device_type_not_found(slug: &str) -> Self {
        RackError::NotFound(format!("device type '{}'", slug))
    }
}
