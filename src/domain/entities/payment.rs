use crate::{
    domain::entities::{promotional_offer::PromotionalOffer, store_transaction::StoreTransaction},
    errors::IapError,
};

/// The purchasing API generation the runtime supports.
///
/// Selecting `Modern` on a runtime without signed-transaction support is a
/// caller contract violation, not a recoverable error; the SDK does not probe
/// the platform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGeneration {
    /// The legacy payment-queue generation.
    Legacy,
    /// The signed-transaction generation.
    Modern,
}

/// A caller's request to purchase a product.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub product_identifier: String,
    pub quantity: u32,
    /// Opaque username hash forwarded to the store for fraud detection.
    pub application_username: Option<String>,
    /// Simulate the ask-to-buy flow in the sandbox environment.
    pub simulates_ask_to_buy_in_sandbox: bool,
    /// Promotional offer to redeem with the payment, if any.
    pub offer: Option<PromotionalOffer>,
}

impl PaymentRequest {
    pub fn new(product_identifier: impl Into<String>) -> Self {
        Self {
            product_identifier: product_identifier.into(),
            quantity: 1,
            application_username: None,
            simulates_ask_to_buy_in_sandbox: false,
            offer: None,
        }
    }
}

/// A single observation of an in-flight payment.
///
/// The vendor queue may deliver zero or more of these per purchase, in any
/// order, so callers consume them as a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentState {
    /// The payment was handed to the store and is being processed.
    Purchasing,
    /// The payment is waiting on an external action, e.g. parental approval.
    /// Terminal for now; a later callback may still complete or fail it.
    Deferred,
    /// The store completed the purchase.
    Purchased(StoreTransaction),
    /// The store rejected or aborted the purchase.
    Failed(IapError),
}

/// Resolution of a single-shot purchase call.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Purchased(StoreTransaction),
    /// The purchase is pending an external action. Callers interested in the
    /// eventual result should consume the payment update stream instead.
    Deferred,
}
