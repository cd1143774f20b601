//! Common error infrastructure for fulfillment-core.
//!
//! Every fallible engine operation reports a [`FulfillmentError`]. Helper
//! failures (missing landmarks, empty search rings, unusable containers) are
//! absorbed by the fallback tiers that produced them; only conditions that
//! make the whole order impossible surface here.
//!
//! # Severity
//!
//! - **Recoverable**: the order may succeed later (e.g. once fog lifts)
//! - **Validation**: the order itself is malformed and must not be retried as-is
//! - **Internal**: state inconsistency that should be investigated
//! - **Fatal**: no simulation to deliver into

use crate::state::{EntityId, ItemHandle, RegionId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all engine errors.
///
/// Gives callers a uniform way to classify failures for logging and refunds.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, stable across releases.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Terminal failure of a single fulfillment call.
///
/// When one of these is returned, no item of the order has been constructed,
/// so the caller must not charge for it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FulfillmentError {
    /// No region is available at all (no active simulation).
    #[error("no region available for delivery")]
    NoRegion,

    #[error("{0} does not exist")]
    UnknownRegion(RegionId),

    #[error("{0} is not in the catalog")]
    UnknownItem(ItemHandle),

    #[error("order quantity must be at least one")]
    EmptyOrder,

    #[error("requester {0} not found in any region")]
    RequesterNotFound(EntityId),

    /// Material is not a substance, or the item cannot be made from it.
    #[error("{material} is not a valid material for {item}")]
    InvalidMaterial {
        item: ItemHandle,
        material: ItemHandle,
    },

    /// Item must be made from a substance but none was given or defaulted.
    #[error("{0} requires a material")]
    MaterialRequired(ItemHandle),

    /// No cell in the region satisfies the drop predicate.
    #[error("no safe position in {0}")]
    NoSafePosition(RegionId),
}

impl EngineError for FulfillmentError {
    fn severity(&self) -> ErrorSeverity {
        use FulfillmentError::*;
        match self {
            NoRegion => ErrorSeverity::Fatal,
            UnknownRegion(_) => ErrorSeverity::Internal,
            UnknownItem(_) | EmptyOrder | RequesterNotFound(_) | InvalidMaterial { .. }
            | MaterialRequired(_) => ErrorSeverity::Validation,
            NoSafePosition(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use FulfillmentError::*;
        match self {
            NoRegion => "FULFILL_NO_REGION",
            UnknownRegion(_) => "FULFILL_UNKNOWN_REGION",
            UnknownItem(_) => "FULFILL_UNKNOWN_ITEM",
            EmptyOrder => "FULFILL_EMPTY_ORDER",
            RequesterNotFound(_) => "FULFILL_REQUESTER_NOT_FOUND",
            InvalidMaterial { .. } => "FULFILL_INVALID_MATERIAL",
            MaterialRequired(_) => "FULFILL_MATERIAL_REQUIRED",
            NoSafePosition(_) => "FULFILL_NO_SAFE_POSITION",
        }
    }
}
