use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Invalid cart item: {0}")]
    InvalidItem(String),
}

pub type Result<T> = std::result::Result<T, CartError>;
