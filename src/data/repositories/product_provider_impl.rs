use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;

use crate::{
    data::{
        datasources::payment_queue_datasource::PaymentQueueDatasource,
        repositories::pending_requests::PendingRequests,
    },
    domain::{entities::product::Product, providers::product_provider::ProductProvider},
    errors::IapError,
};

/// Fetches catalog products through the vendor queue, reconciling the
/// asynchronous callback into a single result keyed by request id.
pub struct ProductProviderImpl<D: PaymentQueueDatasource> {
    datasource: Arc<D>,
    pending: PendingRequests<Result<Vec<Product>, IapError>>,
}

impl<D: PaymentQueueDatasource> ProductProviderImpl<D> {
    pub fn new(datasource: Arc<D>) -> Self {
        Self {
            datasource,
            pending: PendingRequests::new(),
        }
    }

    /// Routes a vendor products callback to the caller waiting on
    /// `request_id`. Exactly one delivery resolves each fetch; the pending
    /// entry is removed here even when the caller has already given up.
    pub fn products_received(&self, request_id: &str, result: Result<Vec<Product>, IapError>) {
        if !self.pending.complete(request_id, result) {
            tracing::warn!(request_id, "products callback without a pending request");
        }
    }

    /// Whether a fetch for `request_id` is still awaiting its callback.
    pub fn has_pending(&self, request_id: &str) -> bool {
        self.pending.contains(request_id)
    }
}

#[async_trait]
impl<D: PaymentQueueDatasource> ProductProvider for ProductProviderImpl<D> {
    async fn fetch(
        &self,
        product_ids: HashSet<String>,
        request_id: &str,
    ) -> Result<Vec<Product>, IapError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rx = self.pending.insert(request_id);
        let mut ids: Vec<String> = product_ids.into_iter().collect();
        ids.sort();
        tracing::debug!(request_id, count = ids.len(), "starting products request");
        self.datasource.start_products_request(ids, request_id);
        rx.await.map_err(|_| IapError::FetchFailed {
            reason: "product request was superseded or dropped before a response arrived"
                .to_owned(),
        })?
    }
}
