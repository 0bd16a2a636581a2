use thiserror::Error;

/// Errors raised while turning an expense into splits.
///
/// Aggregation and settlement never fail; only input handling does.
/// Both kinds are recoverable and are meant to reach the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettleError {
    /// Malformed or inconsistent input, e.g. explicit splits that do not
    /// add up to the expense total.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A domain rule was violated, e.g. a non-member was referenced.
    #[error("business rule violated: {0}")]
    BusinessRule(String),
}

impl SettleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::BusinessRule(_))
    }
}

pub type Result<T> = std::result::Result<T, SettleError>;
