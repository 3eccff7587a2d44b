use std::sync::Weak;

use crate::{
    data::models::payment_model::PaymentModel,
    domain::entities::{product::Product, store_transaction::StoreTransaction},
    errors::IapError,
};

/// Callbacks delivered by the vendor payment queue.
///
/// The queue is an opaque event source: the SDK only registers a handler and
/// reacts. Callbacks may arrive on any thread, in any order, and a single
/// purchase may produce zero or more transaction updates. Implementations
/// must therefore be `Send + Sync` and must not block.
pub trait PaymentQueueObserver: Send + Sync {
    /// A products request completed.
    ///
    /// request_id:
    ///   The correlation token the request was started with; used to route
    ///   the result to the waiting caller and never interpreted.
    fn products_received(&self, request_id: &str, result: Result<Vec<Product>, IapError>);

    /// The state of a payment transaction changed.
    fn payment_transaction_updated(&self, update: TransactionUpdate);

    /// All restorable transactions have been delivered as `Restored` updates.
    fn restore_completed(&self);

    /// The restore operation failed as a whole.
    fn restore_failed(&self, error: IapError);

    /// The queue asks whether a payment initiated outside the app (e.g. from
    /// the storefront) should proceed.
    ///
    /// Must complete synchronously and cheaply; the queue blocks its dispatch
    /// decision on the return value. Returning false suppresses the purchase.
    fn should_add_store_payment(&self, payment: &PaymentModel, product: &Product) -> bool;

    /// A receipt refresh request finished.
    fn receipt_refreshed(&self, result: Result<(), IapError>);
}

/// Operations the SDK dispatches to the vendor payment queue.
///
/// All dispatch is fire-and-forget; outcomes come back through the registered
/// [`PaymentQueueObserver`]. In-flight requests cannot be cancelled once
/// submitted.
pub trait PaymentQueueDatasource: Send + Sync + 'static {
    /// Registers the single observer the queue delivers callbacks to.
    ///
    /// Held weakly so the queue does not keep the SDK alive.
    fn register_observer(&self, observer: Weak<dyn PaymentQueueObserver>);

    /// Starts a catalog request for the given product identifiers.
    ///
    /// request_id:
    ///   Opaque correlation token echoed back in `products_received`.
    fn start_products_request(&self, product_ids: Vec<String>, request_id: &str);

    /// Submits a payment to the queue.
    fn add_payment(&self, payment: PaymentModel);

    /// Asks the queue to re-deliver all completed transactions.
    fn restore_completed_transactions(&self);

    /// Asks the queue to refresh the local receipt.
    fn refresh_receipt(&self);

    /// Marks a delivered transaction as finished so the queue stops
    /// redelivering it.
    fn finish_transaction(&self, transaction: &StoreTransaction);
}

/// A single transaction callback from the vendor queue.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub transaction: StoreTransaction,
    pub state: TransactionState,
}

/// Vendor-reported state of a transaction at the time of an update.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionState {
    Purchasing,
    Deferred,
    Purchased,
    Failed(IapError),
    /// Redelivered by a restore operation.
    Restored,
}
