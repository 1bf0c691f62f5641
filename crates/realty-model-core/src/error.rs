use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtyModelError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {field} — {reason}")]
    Configuration { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RealtyModelError {
    /// A computed amount left the range `Decimal` can represent.
    pub fn overflow(field: &str) -> Self {
        RealtyModelError::InvalidInput {
            field: field.into(),
            reason: "Computed value exceeds representable range".into(),
        }
    }
}

impl From<serde_json::Error> for RealtyModelError {
    fn from(e: serde_json::Error) -> Self {
        RealtyModelError::SerializationError(e.to_string())
    }
}
