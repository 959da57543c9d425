//! Unified error codes for the storefront order sync
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Customer (party) errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so non-Rust consumers can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order number already taken (concurrent allocation)
    OrderNumberConflict = 4010,
    /// Order header or lines could not be persisted
    OrderAssemblyFailed = 4011,
    /// An order line has no resolved catalog item
    OrderLineUnmatched = 4012,
    /// Status update rejected by the store
    OrderStatusRejected = 4013,

    // ==================== 5xxx: Customer ====================
    /// Customer could not be found or created
    PartyResolutionFailed = 5001,
    /// Customer email already registered (concurrent creation)
    PartyEmailConflict = 5002,

    // ==================== 6xxx: Catalog ====================
    /// Catalog item could not be found or created
    CatalogResolutionFailed = 6001,
    /// SKU already registered (concurrent creation)
    CatalogSkuConflict = 6002,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Record store unreachable
    StoreUnavailable = 9003,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a `u16` does not name a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            4001 => Self::OrderNotFound,
            4010 => Self::OrderNumberConflict,
            4011 => Self::OrderAssemblyFailed,
            4012 => Self::OrderLineUnmatched,
            4013 => Self::OrderStatusRejected,
            5001 => Self::PartyResolutionFailed,
            5002 => Self::PartyEmailConflict,
            6001 => Self::CatalogResolutionFailed,
            6002 => Self::CatalogSkuConflict,
            9002 => Self::DatabaseError,
            9003 => Self::StoreUnavailable,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
