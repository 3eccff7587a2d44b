use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use uuid::Uuid;

use crate::{domain::entities::promotional_offer::SignedData, errors::IapError};

/// Promotional-offer redemption option in the shape required by the modern
/// purchasing API, with the signature carried as decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOptionModel {
    pub offer_identifier: String,
    pub key_identifier: String,
    pub nonce: Uuid,
    pub signature: Vec<u8>,
    pub timestamp: i64,
}

impl SignedData {
    /// Projects the signed data into the modern redemption-option shape.
    ///
    /// The signature must decode as valid base64; otherwise this fails with
    /// [`IapError::FailedToDecodeSignature`] without constructing a partial
    /// option. The projection is only meaningful on runtimes that support the
    /// modern purchasing API generation; selecting it is the caller's
    /// responsibility.
    pub fn purchase_option(&self) -> Result<PurchaseOptionModel, IapError> {
        let signature =
            STANDARD
                .decode(&self.signature)
                .map_err(|_| IapError::FailedToDecodeSignature {
                    signature: self.signature.clone(),
                })?;
        Ok(PurchaseOptionModel {
            offer_identifier: self.identifier.clone(),
            key_identifier: self.key_identifier.clone(),
            nonce: self.nonce,
            signature,
            timestamp: self.timestamp,
        })
    }
}
