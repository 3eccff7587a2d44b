use std::{
    collections::HashSet,
    sync::{Arc, Weak},
};

use tokio::sync::mpsc;

use crate::{
    data::{
        datasources::payment_queue_datasource::{
            PaymentQueueDatasource, PaymentQueueObserver, TransactionUpdate,
        },
        models::payment_model::PaymentModel,
        repositories::{
            payment_orchestrator_impl::PaymentOrchestratorImpl,
            product_provider_impl::ProductProviderImpl,
        },
    },
    domain::{
        entities::{
            payment::{ApiGeneration, PaymentRequest, PaymentState, PurchaseOutcome},
            product::Product,
            store_transaction::StoreTransaction,
        },
        providers::{
            payment_orchestrator::{PaymentOrchestrator, ShouldAddStorePaymentHandler},
            product_provider::ProductProvider,
        },
    },
    errors::IapError,
};

/// Configuration of the purchasing client.
#[derive(Debug, Clone, Copy)]
pub struct IapConfig {
    /// The purchasing API generation the runtime supports. Determines which
    /// offer redemption shape is dispatched with payments.
    pub generation: ApiGeneration,
    /// Finish completed, failed and restored transactions with the vendor
    /// queue automatically.
    pub finish_transactions_automatically: bool,
}

impl Default for IapConfig {
    fn default() -> Self {
        Self {
            generation: ApiGeneration::Modern,
            finish_transactions_automatically: true,
        }
    }
}

/// Entry point of the purchasing SDK.
///
/// Wires the product provider and the payment orchestrator over a single
/// vendor queue datasource and routes the queue's callbacks to whichever of
/// the two owns the correlation. Construct once and keep the `Arc` alive; the
/// queue only holds a weak reference back.
pub struct IapClient<D: PaymentQueueDatasource> {
    products: ProductProviderImpl<D>,
    payments: PaymentOrchestratorImpl<D>,
}

impl<D: PaymentQueueDatasource> IapClient<D> {
    pub fn new(datasource: Arc<D>, config: IapConfig) -> Arc<Self> {
        let client = Arc::new(Self {
            products: ProductProviderImpl::new(datasource.clone()),
            payments: PaymentOrchestratorImpl::new(
                datasource.clone(),
                config.generation,
                config.finish_transactions_automatically,
            ),
        });
        let observer = Arc::downgrade(&client);
        let observer: Weak<dyn PaymentQueueObserver> = observer;
        datasource.register_observer(observer);
        client
    }

    /// Fetches catalog products. See [`ProductProvider::fetch`].
    pub async fn fetch(
        &self,
        product_ids: HashSet<String>,
        request_id: &str,
    ) -> Result<Vec<Product>, IapError> {
        self.products.fetch(product_ids, request_id).await
    }

    /// Whether a product fetch for `request_id` is still awaiting its
    /// callback.
    pub fn has_pending_product_request(&self, request_id: &str) -> bool {
        self.products.has_pending(request_id)
    }

    /// Submits a payment and returns its update stream. See
    /// [`PaymentOrchestrator::add_payment`].
    pub fn add_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<mpsc::UnboundedReceiver<PaymentState>, IapError> {
        self.payments.add_payment(request)
    }

    /// Purchases a product, resolving at the first terminal-for-now state.
    pub async fn purchase(&self, request: PaymentRequest) -> Result<PurchaseOutcome, IapError> {
        self.payments.purchase(request).await
    }

    /// Restores previously completed transactions.
    pub async fn restore(&self) -> Result<Vec<StoreTransaction>, IapError> {
        self.payments.restore().await
    }

    /// Refreshes the local receipt.
    pub async fn refresh_receipt(&self) -> Result<(), IapError> {
        self.payments.refresh_receipt().await
    }

    /// Installs the storefront-payment predicate.
    pub fn set_should_add_store_payment_handler(&self, handler: ShouldAddStorePaymentHandler) {
        self.payments.set_should_add_store_payment_handler(handler);
    }

    /// Subscribes to updates of storefront-initiated payments.
    pub fn external_payment_updates(&self) -> mpsc::UnboundedReceiver<PaymentState> {
        self.payments.external_payment_updates()
    }
}

impl<D: PaymentQueueDatasource> PaymentQueueObserver for IapClient<D> {
    fn products_received(&self, request_id: &str, result: Result<Vec<Product>, IapError>) {
        self.products.products_received(request_id, result);
    }

    fn payment_transaction_updated(&self, update: TransactionUpdate) {
        self.payments.transaction_updated(update);
    }

    fn restore_completed(&self) {
        self.payments.restore_completed();
    }

    fn restore_failed(&self, error: IapError) {
        self.payments.restore_failed(error);
    }

    fn should_add_store_payment(&self, payment: &PaymentModel, product: &Product) -> bool {
        self.payments.should_add_store_payment(payment, product)
    }

    fn receipt_refreshed(&self, result: Result<(), IapError>) {
        self.payments.receipt_refreshed(result);
    }
}
