use std::collections::HashSet;

use async_trait::async_trait;

use crate::{domain::entities::product::Product, errors::IapError};

/// Fetches catalog products by identifier set.
#[async_trait]
pub trait ProductProvider: Send + Sync {
    /// Fetches the products for `product_ids`.
    ///
    /// request_id:
    ///   Opaque correlation token threaded through to the underlying vendor
    ///   request so the eventual callback can be routed back to this call;
    ///   the provider does not interpret it.
    ///
    /// Completes exactly once, on an unspecified context. An empty identifier
    /// set resolves to an empty list without touching the store; duplicates
    /// are collapsed by set semantics. The result preserves the vendor
    /// response order. Fetch is all-or-nothing: there is no partial success,
    /// and no retries happen at this layer.
    async fn fetch(
        &self,
        product_ids: HashSet<String>,
        request_id: &str,
    ) -> Result<Vec<Product>, IapError>;
}
