#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, Weak,
    },
};

use chrono::{TimeZone, Utc};
use iap_client::{
    data::{
        datasources::payment_queue_datasource::{
            PaymentQueueDatasource, PaymentQueueObserver, TransactionState, TransactionUpdate,
        },
        models::payment_model::PaymentModel,
    },
    domain::entities::{
        locale::LocaleContext,
        product::{DiscountPaymentMode, DiscountType, Product, ProductDiscount},
        store_environment::StoreEnvironment,
        store_transaction::{LegacyTransaction, SignedTransaction, StoreTransaction},
    },
    errors::IapError,
};
use rust_decimal::Decimal;

/// Scripted behavior of a restore pass.
pub enum RestoreScript {
    Success(Vec<StoreTransaction>),
    Failure(IapError),
}

/// In-memory stand-in for the vendor payment queue.
///
/// Records every dispatch and, where a canned response or script was
/// installed, delivers the matching callbacks synchronously from within the
/// dispatch call, the way a re-entrant queue might. Callbacks can also be
/// driven manually through the `deliver_*` helpers.
#[derive(Default)]
pub struct FakePaymentQueue {
    observer: Mutex<Option<Weak<dyn PaymentQueueObserver>>>,
    product_responses: Mutex<HashMap<String, Result<Vec<Product>, IapError>>>,
    payment_scripts: Mutex<HashMap<String, Vec<TransactionState>>>,
    restore_script: Mutex<Option<RestoreScript>>,
    receipt_response: Mutex<Option<Result<(), IapError>>>,
    pub started_requests: Mutex<Vec<(Vec<String>, String)>>,
    pub payments: Mutex<Vec<PaymentModel>>,
    pub finished: Mutex<Vec<String>>,
    pub restore_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
}

impl FakePaymentQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn observer(&self) -> Arc<dyn PaymentQueueObserver> {
        self.observer
            .lock()
            .unwrap()
            .as_ref()
            .and_then(Weak::upgrade)
            .expect("no observer registered or client dropped")
    }

    /// Installs a canned products response delivered when a request with
    /// `request_id` is started.
    pub fn respond_to_products(&self, request_id: &str, response: Result<Vec<Product>, IapError>) {
        self.product_responses
            .lock()
            .unwrap()
            .insert(request_id.to_owned(), response);
    }

    /// Installs the transaction states delivered when a payment for
    /// `product_id` is submitted.
    pub fn script_payment(&self, product_id: &str, states: Vec<TransactionState>) {
        self.payment_scripts
            .lock()
            .unwrap()
            .insert(product_id.to_owned(), states);
    }

    pub fn script_restore(&self, script: RestoreScript) {
        *self.restore_script.lock().unwrap() = Some(script);
    }

    pub fn respond_to_receipt_refresh(&self, result: Result<(), IapError>) {
        *self.receipt_response.lock().unwrap() = Some(result);
    }

    pub fn deliver_products(&self, request_id: &str, result: Result<Vec<Product>, IapError>) {
        self.observer().products_received(request_id, result);
    }

    pub fn deliver_update(&self, update: TransactionUpdate) {
        self.observer().payment_transaction_updated(update);
    }

    pub fn complete_restore(&self) {
        self.observer().restore_completed();
    }

    pub fn fail_restore(&self, error: IapError) {
        self.observer().restore_failed(error);
    }

    fn update_for(&self, product_id: &str, state: TransactionState) -> TransactionUpdate {
        let transaction = match state {
            TransactionState::Purchased | TransactionState::Restored => {
                signed_transaction(product_id)
            }
            _ => pending_transaction(product_id),
        };
        TransactionUpdate { transaction, state }
    }
}

impl PaymentQueueDatasource for FakePaymentQueue {
    fn register_observer(&self, observer: Weak<dyn PaymentQueueObserver>) {
        *self.observer.lock().unwrap() = Some(observer);
    }

    fn start_products_request(&self, product_ids: Vec<String>, request_id: &str) {
        self.started_requests
            .lock()
            .unwrap()
            .push((product_ids, request_id.to_owned()));
        let response = self.product_responses.lock().unwrap().remove(request_id);
        if let Some(response) = response {
            self.observer().products_received(request_id, response);
        }
    }

    fn add_payment(&self, payment: PaymentModel) {
        let product_id = payment.product_identifier.clone();
        self.payments.lock().unwrap().push(payment);
        let script = self.payment_scripts.lock().unwrap().remove(&product_id);
        if let Some(states) = script {
            for state in states {
                let update = self.update_for(&product_id, state);
                self.observer().payment_transaction_updated(update);
            }
        }
    }

    fn restore_completed_transactions(&self) {
        self.restore_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.restore_script.lock().unwrap().take();
        match script {
            Some(RestoreScript::Success(transactions)) => {
                for transaction in transactions {
                    self.observer().payment_transaction_updated(TransactionUpdate {
                        transaction,
                        state: TransactionState::Restored,
                    });
                }
                self.observer().restore_completed();
            }
            Some(RestoreScript::Failure(error)) => self.observer().restore_failed(error),
            None => {}
        }
    }

    fn refresh_receipt(&self) {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.receipt_response.lock().unwrap().take();
        if let Some(result) = response {
            self.observer().receipt_refreshed(result);
        }
    }

    fn finish_transaction(&self, transaction: &StoreTransaction) {
        self.finished
            .lock()
            .unwrap()
            .push(transaction.product_identifier().to_owned());
    }
}

pub fn product(id: &str) -> Product {
    Product {
        product_identifier: id.to_owned(),
        localized_title: id.to_owned(),
        localized_description: format!("{id} description"),
        price: Decimal::new(999, 2),
        currency_code: Some("USD".to_owned()),
        discounts: Vec::new(),
    }
}

pub fn discount(id: &str) -> ProductDiscount {
    ProductDiscount {
        identifier: id.to_owned(),
        price: Decimal::new(499, 2),
        payment_mode: DiscountPaymentMode::PayAsYouGo,
        discount_type: DiscountType::Promotional,
        number_of_periods: 3,
    }
}

pub fn signed_transaction(product_id: &str) -> StoreTransaction {
    StoreTransaction::Signed(SignedTransaction {
        product_identifier: product_id.to_owned(),
        purchase_date: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        transaction_identifier: format!("txn-{product_id}"),
        quantity: 1,
        price: Some(Decimal::new(999, 2)),
        currency: Some("USD".to_owned()),
        jws_representation: "eyJhbGciOiJFUzI1NiJ9.e30.sig".to_owned(),
        environment: StoreEnvironment::Sandbox,
        locale: LocaleContext::default(),
    })
}

pub fn pending_transaction(product_id: &str) -> StoreTransaction {
    StoreTransaction::Legacy(LegacyTransaction {
        product_identifier: product_id.to_owned(),
        purchase_date: None,
        transaction_identifier: None,
        quantity: 1,
        price: None,
        currency: None,
        locale: LocaleContext::default(),
    })
}

pub fn storefront_payment(product_id: &str) -> PaymentModel {
    PaymentModel {
        product_identifier: product_id.to_owned(),
        quantity: 1,
        application_username: None,
        simulates_ask_to_buy_in_sandbox: false,
        offer: None,
    }
}
