use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type Result<T> = std::result::Result<T, StudioError>;

/// Failures raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("class {0} does not exist")]
    ClassNotFound(i64),
    /// The conditional decrement found no slot left to take.
    #[error("class {0} has no available slots")]
    SlotsExhausted(i64),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Self::Backend("connection pool timed out".to_string()),
            sqlx::Error::PoolClosed => Self::Backend("connection pool closed".to_string()),
            _ => Self::Backend(err.to_string()),
        }
    }
}

/// Outcome of a core operation. The HTTP layer decides how each kind is
/// rendered; nothing in here knows about status codes.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("class {0} not found")]
    NotFound(i64),
    #[error("class {0} is fully booked")]
    Capacity(i64),
    #[error("unknown timezone: {0}")]
    UnknownZone(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for StudioError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ClassNotFound(id) => Self::NotFound(id),
            StoreError::SlotsExhausted(id) => Self::Capacity(id),
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}

impl From<validator::ValidationErrors> for StudioError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.field_errors().into_keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        Self::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_core_taxonomy() {
        assert!(matches!(StudioError::from(StoreError::ClassNotFound(3)), StudioError::NotFound(3)));
        assert!(matches!(StudioError::from(StoreError::SlotsExhausted(3)), StudioError::Capacity(3)));
        assert!(matches!(
            StudioError::from(StoreError::Backend("boom".into())),
            StudioError::Storage(msg) if msg == "boom"
        ));
    }

    #[test]
    fn pool_timeout_is_a_backend_failure() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
