use serde::Serialize;

use super::{
    payment_discount_model::PaymentDiscountModel, purchase_option_model::PurchaseOptionModel,
};

/// A payment as submitted to the vendor queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentModel {
    pub product_identifier: String,
    pub quantity: u32,
    pub application_username: Option<String>,
    pub simulates_ask_to_buy_in_sandbox: bool,
    /// Offer redemption data, already projected to the shape of the
    /// purchasing API generation the orchestrator was configured for.
    pub offer: Option<OfferRedemptionModel>,
}

/// The two vendor shapes an offer redemption can take.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OfferRedemptionModel {
    Legacy(PaymentDiscountModel),
    Modern(PurchaseOptionModel),
}
