use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    DuplicateUsername,
    InvalidCredentials,
    Decode(String),
    Inference(String),
    Storage(String),
    Unauthorized,
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::DuplicateUsername => write!(f, "Username already exists! Choose another."),
            // Deliberately identical for unknown username and wrong password
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::Decode(msg) => write!(f, "Could not read image: {}", msg),
            AppError::Inference(msg) => write!(f, "Prediction error: {}", msg),
            AppError::Storage(msg) => write!(f, "Database error: {}", msg),
            AppError::Unauthorized => write!(f, "Login required"),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
