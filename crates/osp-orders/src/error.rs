use osp_portfolio::ValidationError;

/// Failure of [`crate::OrderService::create_order`].
///
/// Validation failures are the caller's fault and carry a stable code; storage
/// failures are internal.
#[derive(Debug)]
pub enum OrderError {
    Validation(ValidationError),
    Storage(anyhow::Error),
}

impl OrderError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::Validation(e) => e.code(),
            OrderError::Storage(_) => "STORAGE_FAILURE",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, OrderError::Validation(_))
    }
}

impl From<ValidationError> for OrderError {
    fn from(e: ValidationError) -> Self {
        OrderError::Validation(e)
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::Validation(e) => write!(f, "{e}"),
            OrderError::Storage(e) => write!(f, "order store failure: {e:#}"),
        }
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderError::Validation(e) => Some(e),
            OrderError::Storage(e) => Some(&**e),
        }
    }
}
