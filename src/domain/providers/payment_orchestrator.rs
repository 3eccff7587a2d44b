use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    data::models::payment_model::PaymentModel,
    domain::entities::{
        payment::{PaymentRequest, PaymentState, PurchaseOutcome},
        product::Product,
        store_transaction::StoreTransaction,
    },
    errors::IapError,
};

/// Synchronous predicate deciding whether a storefront-initiated payment may
/// proceed. Invoked on the vendor queue's dispatch context; must be cheap.
/// Shared, so it is never invoked while internal state is locked and may
/// itself install a replacement handler.
pub type ShouldAddStorePaymentHandler = Arc<dyn Fn(&PaymentModel, &Product) -> bool + Send + Sync>;

/// Converts asynchronous vendor queue callbacks into single-shot or streaming
/// results routed back to callers.
#[async_trait]
pub trait PaymentOrchestrator: Send + Sync {
    /// Submits a payment and returns the stream of its state changes.
    ///
    /// The vendor may deliver zero or more updates per purchase, in any
    /// order. Completed and failed purchases end the stream; a deferred
    /// purchase keeps it open for a later independent callback. At most one
    /// purchase per product identifier may be in flight.
    fn add_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<mpsc::UnboundedReceiver<PaymentState>, IapError>;

    /// Submits a payment and waits for its first terminal-for-now state.
    async fn purchase(&self, request: PaymentRequest) -> Result<PurchaseOutcome, IapError>;

    /// Re-delivers completed transactions, resolving with everything restored
    /// once the queue reports completion. Concurrent callers join the
    /// in-flight restore.
    async fn restore(&self) -> Result<Vec<StoreTransaction>, IapError>;

    /// Refreshes the local receipt. Concurrent callers join the in-flight
    /// refresh.
    async fn refresh_receipt(&self) -> Result<(), IapError>;

    /// Installs the storefront-payment predicate. Without one, payments
    /// initiated outside the app are suppressed.
    fn set_should_add_store_payment_handler(&self, handler: ShouldAddStorePaymentHandler);

    /// Stream receiving updates for storefront-initiated payments that the
    /// predicate allowed through. Replaces any previous subscription.
    fn external_payment_updates(&self) -> mpsc::UnboundedReceiver<PaymentState>;
}
