use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::{
    data::{
        datasources::payment_queue_datasource::{
            PaymentQueueDatasource, TransactionState, TransactionUpdate,
        },
        models::payment_model::{OfferRedemptionModel, PaymentModel},
    },
    domain::{
        entities::{
            payment::{ApiGeneration, PaymentRequest, PaymentState, PurchaseOutcome},
            product::Product,
            promotional_offer::PromotionalOffer,
            store_transaction::StoreTransaction,
        },
        providers::payment_orchestrator::{PaymentOrchestrator, ShouldAddStorePaymentHandler},
    },
    errors::IapError,
};

/// Per-purchase state machine over the vendor queue callbacks.
///
/// Purchases move initiated -> awaiting vendor callback -> completed, failed
/// or deferred. Deferred is terminal-for-now: the routing entry stays alive
/// so a later independent callback can still complete or fail the purchase.
/// All correlation tables are lock-guarded; locks are never held across a
/// dispatch into the datasource, which may deliver callbacks re-entrantly.
pub struct PaymentOrchestratorImpl<D: PaymentQueueDatasource> {
    datasource: Arc<D>,
    generation: ApiGeneration,
    finish_automatically: bool,
    purchases: Mutex<HashMap<String, mpsc::UnboundedSender<PaymentState>>>,
    restore: Mutex<Option<RestoreSession>>,
    receipt_waiters: Mutex<Vec<oneshot::Sender<Result<(), IapError>>>>,
    store_payment_handler: Mutex<Option<ShouldAddStorePaymentHandler>>,
    external_updates: Mutex<Option<mpsc::UnboundedSender<PaymentState>>>,
}

struct RestoreSession {
    waiters: Vec<oneshot::Sender<Result<Vec<StoreTransaction>, IapError>>>,
    restored: Vec<StoreTransaction>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<D: PaymentQueueDatasource> PaymentOrchestratorImpl<D> {
    pub fn new(datasource: Arc<D>, generation: ApiGeneration, finish_automatically: bool) -> Self {
        Self {
            datasource,
            generation,
            finish_automatically,
            purchases: Mutex::new(HashMap::new()),
            restore: Mutex::new(None),
            receipt_waiters: Mutex::new(Vec::new()),
            store_payment_handler: Mutex::new(None),
            external_updates: Mutex::new(None),
        }
    }

    /// Projects an offer into the redemption shape of the configured API
    /// generation. The modern path can fail before anything is dispatched.
    fn offer_redemption(&self, offer: &PromotionalOffer) -> Result<OfferRedemptionModel, IapError> {
        match self.generation {
            ApiGeneration::Legacy => Ok(OfferRedemptionModel::Legacy(
                offer.signed_data.payment_discount(),
            )),
            ApiGeneration::Modern => Ok(OfferRedemptionModel::Modern(
                offer.signed_data.purchase_option()?,
            )),
        }
    }

    /// Routes a transaction callback to the stream of the purchase it belongs
    /// to, keyed by product identifier.
    pub fn transaction_updated(&self, update: TransactionUpdate) {
        let TransactionUpdate { transaction, state } = update;
        match state {
            TransactionState::Purchasing => {
                self.route(transaction.product_identifier(), PaymentState::Purchasing, false);
            }
            TransactionState::Deferred => {
                self.route(transaction.product_identifier(), PaymentState::Deferred, false);
            }
            TransactionState::Purchased => {
                let product_id = transaction.product_identifier().to_owned();
                self.finish_if_configured(&transaction);
                self.route(&product_id, PaymentState::Purchased(transaction), true);
            }
            TransactionState::Failed(error) => {
                self.finish_if_configured(&transaction);
                self.route(
                    transaction.product_identifier(),
                    PaymentState::Failed(error),
                    true,
                );
            }
            TransactionState::Restored => {
                self.finish_if_configured(&transaction);
                let mut session = lock(&self.restore);
                match session.as_mut() {
                    Some(session) => session.restored.push(transaction),
                    None => tracing::warn!(
                        product_id = transaction.product_identifier(),
                        "restored transaction outside a restore session"
                    ),
                }
            }
        }
    }

    /// Resolves every waiter of the in-flight restore with the accumulated
    /// transactions.
    pub fn restore_completed(&self) {
        match lock(&self.restore).take() {
            Some(session) => {
                for waiter in session.waiters {
                    let _ = waiter.send(Ok(session.restored.clone()));
                }
            }
            None => tracing::warn!("restore completion without a restore session"),
        }
    }

    /// Fails every waiter of the in-flight restore.
    pub fn restore_failed(&self, error: IapError) {
        match lock(&self.restore).take() {
            Some(session) => {
                for waiter in session.waiters {
                    let _ = waiter.send(Err(error.clone()));
                }
            }
            None => tracing::warn!("restore failure without a restore session"),
        }
    }

    /// Resolves every waiter of the in-flight receipt refresh.
    pub fn receipt_refreshed(&self, result: Result<(), IapError>) {
        let waiters = std::mem::take(&mut *lock(&self.receipt_waiters));
        if waiters.is_empty() {
            tracing::warn!("receipt refresh callback without a pending refresh");
        }
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
    }

    /// Answers the queue's storefront-payment question. Runs the configured
    /// predicate synchronously; accepted payments are routed into the
    /// external updates stream for their subsequent callbacks.
    ///
    /// Declined outright while a purchase of the same product is in flight:
    /// the queue keys callbacks by product identifier, so accepting would
    /// steal the updates the pending purchase is waiting on.
    pub fn should_add_store_payment(&self, payment: &PaymentModel, product: &Product) -> bool {
        if lock(&self.purchases).contains_key(&payment.product_identifier) {
            tracing::warn!(
                product_id = payment.product_identifier.as_str(),
                "storefront payment declined, a purchase of this product is already pending"
            );
            return false;
        }
        // Clone the handler out so the predicate runs unlocked and may
        // reinstall itself.
        let handler = lock(&self.store_payment_handler).clone();
        let accepted = match handler {
            Some(handler) => handler(payment, product),
            None => false,
        };
        if accepted {
            let sink = lock(&self.external_updates).clone();
            match sink {
                Some(sink) => {
                    lock(&self.purchases).insert(payment.product_identifier.clone(), sink);
                }
                None => tracing::warn!(
                    product_id = payment.product_identifier.as_str(),
                    "storefront payment accepted with no external updates subscriber"
                ),
            }
        }
        accepted
    }

    fn finish_if_configured(&self, transaction: &StoreTransaction) {
        if self.finish_automatically {
            self.datasource.finish_transaction(transaction);
        }
    }

    fn route(&self, product_id: &str, state: PaymentState, terminal: bool) {
        let mut purchases = lock(&self.purchases);
        let remove = match purchases.get(product_id) {
            Some(sender) => {
                if sender.send(state).is_err() {
                    // Caller dropped the stream; the vendor request still ran
                    // to completion, so clean the entry up here.
                    tracing::debug!(product_id, "payment stream abandoned, dropping entry");
                    true
                } else {
                    terminal
                }
            }
            None => {
                tracing::warn!(product_id, "transaction update without a pending payment");
                false
            }
        };
        if remove {
            purchases.remove(product_id);
        }
    }
}

#[async_trait]
impl<D: PaymentQueueDatasource> PaymentOrchestrator for PaymentOrchestratorImpl<D> {
    fn add_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<mpsc::UnboundedReceiver<PaymentState>, IapError> {
        let offer = request
            .offer
            .as_ref()
            .map(|offer| self.offer_redemption(offer))
            .transpose()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        {
            let mut purchases = lock(&self.purchases);
            if purchases.contains_key(&request.product_identifier) {
                return Err(IapError::PurchaseFailed {
                    reason: format!(
                        "a purchase of {} is already pending",
                        request.product_identifier
                    ),
                });
            }
            purchases.insert(request.product_identifier.clone(), sender);
        }
        tracing::debug!(
            product_id = request.product_identifier.as_str(),
            "submitting payment"
        );
        self.datasource.add_payment(PaymentModel {
            product_identifier: request.product_identifier,
            quantity: request.quantity,
            application_username: request.application_username,
            simulates_ask_to_buy_in_sandbox: request.simulates_ask_to_buy_in_sandbox,
            offer,
        });
        Ok(receiver)
    }

    async fn purchase(&self, request: PaymentRequest) -> Result<PurchaseOutcome, IapError> {
        let mut updates = self.add_payment(request)?;
        while let Some(state) = updates.recv().await {
            match state {
                PaymentState::Purchasing => continue,
                PaymentState::Deferred => return Ok(PurchaseOutcome::Deferred),
                PaymentState::Purchased(transaction) => {
                    return Ok(PurchaseOutcome::Purchased(transaction))
                }
                PaymentState::Failed(error) => return Err(error),
            }
        }
        Err(IapError::PurchaseFailed {
            reason: "payment updates ended without a terminal state".to_owned(),
        })
    }

    async fn restore(&self) -> Result<Vec<StoreTransaction>, IapError> {
        let (sender, receiver) = oneshot::channel();
        let start_restore = {
            let mut session = lock(&self.restore);
            match session.as_mut() {
                Some(session) => {
                    session.waiters.push(sender);
                    false
                }
                None => {
                    *session = Some(RestoreSession {
                        waiters: vec![sender],
                        restored: Vec::new(),
                    });
                    true
                }
            }
        };
        if start_restore {
            self.datasource.restore_completed_transactions();
        }
        receiver.await.map_err(|_| IapError::RestoreFailed {
            reason: "restore was dropped before the queue reported completion".to_owned(),
        })?
    }

    async fn refresh_receipt(&self) -> Result<(), IapError> {
        let (sender, receiver) = oneshot::channel();
        let start_refresh = {
            let mut waiters = lock(&self.receipt_waiters);
            waiters.push(sender);
            waiters.len() == 1
        };
        if start_refresh {
            self.datasource.refresh_receipt();
        }
        receiver.await.map_err(|_| IapError::ReceiptRefreshFailed {
            reason: "receipt refresh was dropped before the queue responded".to_owned(),
        })?
    }

    fn set_should_add_store_payment_handler(&self, handler: ShouldAddStorePaymentHandler) {
        *lock(&self.store_payment_handler) = Some(handler);
    }

    fn external_payment_updates(&self) -> mpsc::UnboundedReceiver<PaymentState> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *lock(&self.external_updates) = Some(sender);
        receiver
    }
}
