use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::entities::{
    locale::{default_currency, LocaleContext},
    store_environment::StoreEnvironment,
};

/// A purchase event normalized over the two purchasing API generations.
///
/// Exactly one concrete variant backs each instance. Fields that are not
/// meaningful for that variant read back as absent rather than a sentinel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum StoreTransaction {
    /// Backed by the legacy payment-queue API generation.
    Legacy(LegacyTransaction),
    /// Backed by the signed-transaction API generation.
    Signed(SignedTransaction),
}

/// A transaction recorded by the legacy payment-queue generation.
///
/// The old queue cannot always supply a purchase date or a transaction
/// identifier (it synthesizes the identifier late in the transaction's
/// lifecycle), so both are optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    pub product_identifier: String,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transaction_identifier: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Locale context captured by the bridge when the transaction was
    /// observed; used for the best-effort currency fallback.
    #[serde(default)]
    pub locale: LocaleContext,
}

/// A transaction from the signed-transaction generation. Date and identifier
/// are always known, and the raw signed representation and the server
/// environment are always present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    pub product_identifier: String,
    pub purchase_date: DateTime<Utc>,
    pub transaction_identifier: String,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    /// The raw JWS representation of the transaction, as received from the
    /// store. Receipt validation against a server consumes this string; the
    /// SDK performs no verification of its own.
    pub jws_representation: String,
    pub environment: StoreEnvironment,
    #[serde(default)]
    pub locale: LocaleContext,
}

impl StoreTransaction {
    /// The unique identifier of the purchased product.
    pub fn product_identifier(&self) -> &str {
        match self {
            Self::Legacy(t) => &t.product_identifier,
            Self::Signed(t) => &t.product_identifier,
        }
    }

    /// The date the transaction occurred, when known.
    pub fn purchase_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Legacy(t) => t.purchase_date,
            Self::Signed(t) => Some(t.purchase_date),
        }
    }

    /// Whether the purchase date is known. Always true for the signed
    /// generation.
    pub fn has_known_purchase_date(&self) -> bool {
        match self {
            Self::Legacy(t) => t.purchase_date.is_some(),
            Self::Signed(_) => true,
        }
    }

    /// The unique identifier of the transaction, when known.
    pub fn transaction_identifier(&self) -> Option<&str> {
        match self {
            Self::Legacy(t) => t.transaction_identifier.as_deref(),
            Self::Signed(t) => Some(&t.transaction_identifier),
        }
    }

    /// Whether the transaction identifier is known. Always true for the
    /// signed generation.
    pub fn has_known_transaction_identifier(&self) -> bool {
        match self {
            Self::Legacy(t) => t.transaction_identifier.is_some(),
            Self::Signed(_) => true,
        }
    }

    /// The quantity of the product involved in the transaction.
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Legacy(t) => t.quantity,
            Self::Signed(t) => t.quantity,
        }
    }

    /// The price the store recorded in the transaction, when available.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Self::Legacy(t) => t.price,
            Self::Signed(t) => t.price,
        }
    }

    /// The currency of the recorded price.
    ///
    /// When the store did not report one, this falls back to the currency of
    /// the locale captured with the transaction. The fallback is best-effort
    /// and not derived from the transaction itself; callers needing the
    /// authoritative currency must rely on variant-specific data.
    pub fn currency(&self) -> Option<String> {
        match self {
            Self::Legacy(t) => t.currency.clone().or_else(|| default_currency(&t.locale)),
            Self::Signed(t) => t.currency.clone().or_else(|| default_currency(&t.locale)),
        }
    }

    /// The raw JWS representation of the transaction.
    ///
    /// Only available for signed-generation transactions.
    pub fn jws_representation(&self) -> Option<&str> {
        match self {
            Self::Legacy(_) => None,
            Self::Signed(t) => Some(&t.jws_representation),
        }
    }

    /// The server environment where the transaction was generated.
    ///
    /// Only available for signed-generation transactions.
    pub fn environment(&self) -> Option<StoreEnvironment> {
        match self {
            Self::Legacy(_) => None,
            Self::Signed(t) => Some(t.environment.clone()),
        }
    }
}
