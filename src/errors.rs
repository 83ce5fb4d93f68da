use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::PlanStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("invalid transition: cannot {operation} a {current} plan")]
    InvalidTransition {
        current: PlanStatus,
        operation: &'static str,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment exceeds balance due: balance {balance}, offered {amount}")]
    PaymentExceedsBalance {
        balance: Money,
        amount: Money,
    },

    #[error("sale creation failed: {message}")]
    SaleCreationFailed {
        message: String,
    },

    #[error("plan creation failed after sale {sale_number} was created: {message}")]
    PlanCreationFailed {
        sale_id: Uuid,
        sale_number: String,
        message: String,
    },

    #[error("plan not found: {id}")]
    PlanNotFound {
        id: Uuid,
    },

    #[error("upstream service error: {message}")]
    Upstream {
        message: String,
    },
}

impl PlanError {
    /// validation error naming the offending field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PlanError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
