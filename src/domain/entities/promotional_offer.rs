use uuid::Uuid;

use crate::domain::entities::product::ProductDiscount;

/// A promotional offer ready to be attached to a payment.
///
/// Pairs the product-discount descriptor with the signed data authorizing the
/// discounted price. Immutable once constructed; callers keep ownership and
/// pass it by reference into a purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionalOffer {
    /// The details of the introductory or promotional discount being applied.
    pub discount: ProductDiscount,
    /// The signed discount applied to the payment.
    pub signed_data: SignedData,
}

impl PromotionalOffer {
    pub fn new(discount: ProductDiscount, signed_data: SignedData) -> Self {
        Self {
            discount,
            signed_data,
        }
    }
}

/// The signed discount applied to a payment.
///
/// All five fields are agreed upon with the store when the offer signature is
/// generated, are required, and are set once at construction. Equality is by
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData {
    /// The identifier of the discount, agreed upon with the store.
    pub identifier: String,
    /// The identifier of the public/private key pair the signature was
    /// generated with.
    pub key_identifier: String,
    /// One-time use random entropy-adding value.
    pub nonce: Uuid,
    /// The cryptographic signature, base64 encoded.
    pub signature: String,
    /// Milliseconds since epoch at which the signature was created.
    pub timestamp: i64,
}

impl SignedData {
    pub fn new(
        identifier: impl Into<String>,
        key_identifier: impl Into<String>,
        nonce: Uuid,
        signature: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            key_identifier: key_identifier.into(),
            nonce,
            signature: signature.into(),
            timestamp,
        }
    }
}
