use rust_decimal::Decimal;
use serde::Deserialize;

/// A product fetched from the store catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The unique identifier of the product.
    pub product_identifier: String,
    /// The localized display name of the product.
    pub localized_title: String,
    /// The localized description of the product.
    pub localized_description: String,
    /// The price in the storefront currency. Kept as an arbitrary-precision
    /// decimal; currency amounts are never binary floats.
    pub price: Decimal,
    /// The three-letter ISO 4217 currency code of the price, when the
    /// storefront reported one.
    #[serde(default)]
    pub currency_code: Option<String>,
    /// Introductory and promotional discounts configured for the product.
    #[serde(default)]
    pub discounts: Vec<ProductDiscount>,
}

/// Details of an introductory offer or a promotional offer configured for a
/// product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscount {
    /// The identifier of the discount, agreed upon with the store.
    pub identifier: String,
    /// The discounted price.
    pub price: Decimal,
    /// How the customer pays over the discount period.
    pub payment_mode: DiscountPaymentMode,
    /// The kind of offer the discount represents.
    pub discount_type: DiscountType,
    /// The number of billing periods the discount applies for.
    pub number_of_periods: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountPaymentMode {
    /// A payment mode that indicates a free trial.
    FreeTrial,
    /// The customer pays over a single or multiple billing periods.
    PayAsYouGo,
    /// The customer pays up front.
    PayUpFront,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// An introductory offer.
    Introductory,
    /// A promotional offer.
    Promotional,
    /// An offer redeemed with a subscription offer code.
    OfferCode,
    /// A win-back offer.
    WinBack,
}
