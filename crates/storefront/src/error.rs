use fulfillment_core::{EngineError, ErrorSeverity, FulfillmentError, ItemHandle};

/// Why a purchase was refused or failed.
///
/// Every variant means nothing was delivered and nothing should be charged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("{0} is not sold here")]
    NotListed(ItemHandle),

    #[error("{0} is currently not for sale")]
    Disabled(ItemHandle),

    #[error("order quantity must be at least one")]
    ZeroQuantity,

    #[error("{requested} units of {item} exceed the per-order cap of {cap}")]
    QuantityExceedsCap {
        item: ItemHandle,
        requested: u32,
        cap: u32,
    },

    #[error(transparent)]
    Fulfillment(#[from] FulfillmentError),
}

impl EngineError for PurchaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Fulfillment(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotListed(_) => "PURCHASE_NOT_LISTED",
            Self::Disabled(_) => "PURCHASE_DISABLED",
            Self::ZeroQuantity => "PURCHASE_ZERO_QUANTITY",
            Self::QuantityExceedsCap { .. } => "PURCHASE_QUANTITY_EXCEEDS_CAP",
            Self::Fulfillment(inner) => inner.error_code(),
        }
    }
}
