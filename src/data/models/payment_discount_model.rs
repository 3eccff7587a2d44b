use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::promotional_offer::SignedData;

/// Signed-discount bundle in the shape required by the legacy purchasing API.
///
/// The vendor carries the signature timestamp as an arbitrary-precision
/// number in this shape, while [`SignedData`] stores a plain integer of
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDiscountModel {
    pub identifier: String,
    pub key_identifier: String,
    pub nonce: Uuid,
    pub signature: String,
    pub timestamp: Decimal,
}

impl SignedData {
    /// Copies the five signature fields out of a legacy discount bundle.
    ///
    /// The vendor timestamp is an arbitrary-precision number. Values outside
    /// the signed 64-bit millisecond range saturate to `i64::MIN`/`i64::MAX`
    /// rather than wrapping, so the round trip back to the legacy shape is
    /// lossy past that range.
    pub fn from_payment_discount(discount: &PaymentDiscountModel) -> Self {
        let truncated = discount.timestamp.trunc();
        let timestamp = truncated.to_i64().unwrap_or(if truncated.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        Self::new(
            discount.identifier.clone(),
            discount.key_identifier.clone(),
            discount.nonce,
            discount.signature.clone(),
            timestamp,
        )
    }

    /// Projects the signed data into the legacy discount shape, round-tripping
    /// all five fields.
    pub fn payment_discount(&self) -> PaymentDiscountModel {
        PaymentDiscountModel {
            identifier: self.identifier.clone(),
            key_identifier: self.key_identifier.clone(),
            nonce: self.nonce,
            signature: self.signature.clone(),
            timestamp: Decimal::from(self.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_data() -> SignedData {
        SignedData::new(
            "com.app.pro.offer",
            "A1B2C3D4E5",
            Uuid::new_v4(),
            "c2lnbmF0dXJl",
            1_717_243_200_000,
        )
    }

    #[test]
    fn test_legacy_projection_round_trips_all_fields() {
        let original = signed_data();
        let discount = original.payment_discount();
        let restored = SignedData::from_payment_discount(&discount);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_vendor_timestamp_within_range_survives_round_trip() {
        let mut discount = signed_data().payment_discount();
        discount.timestamp = Decimal::from(i64::MAX);
        let restored = SignedData::from_payment_discount(&discount);
        assert_eq!(restored.timestamp, i64::MAX);
        assert_eq!(restored.payment_discount().timestamp, Decimal::from(i64::MAX));
    }

    #[test]
    fn test_vendor_timestamp_past_integer_range_saturates() {
        // Known non-round-trip edge: the vendor shape can carry a timestamp
        // wider than 64 bits.
        let mut discount = signed_data().payment_discount();
        discount.timestamp = Decimal::from_i128_with_scale(i64::MAX as i128 + 1, 0);
        let restored = SignedData::from_payment_discount(&discount);
        assert_eq!(restored.timestamp, i64::MAX);

        discount.timestamp = Decimal::from_i128_with_scale(i64::MIN as i128 - 1, 0);
        let restored = SignedData::from_payment_discount(&discount);
        assert_eq!(restored.timestamp, i64::MIN);
    }

    #[test]
    fn test_fractional_vendor_timestamp_truncates_toward_zero() {
        let mut discount = signed_data().payment_discount();
        discount.timestamp = Decimal::new(17_172_432_001, 1); // 1717243200.1
        let restored = SignedData::from_payment_discount(&discount);
        assert_eq!(restored.timestamp, 1_717_243_200);
    }
}
