//! # Payment callback signatures
//!
//! When a checkout completes, the payment gateway redirects the customer back to the site with three values: the
//! gateway order id, the gateway payment id, and a signature. The client posts these to the verification endpoint,
//! so they cannot be trusted as-is. The signature proves that the gateway, and not the client, produced the pair.
//!
//! ## Message format
//!
//! ```text
//!    {order_id}|{payment_id}
//! ```
//!
//! The message is signed with HMAC-SHA256 using the merchant key secret that is shared with the gateway. The signature
//! is the lowercase hex encoding of the 32-byte MAC.
//!
//! There is no default key. A verifier can only be constructed from a non-blank secret, so a deployment that forgot to
//! configure one cannot accidentally accept signatures made with a well-known key.

use hmac::{Hmac, Mac};
use log::{trace, warn};
use sha2::Sha256;
use spg_common::Secret;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEX_LEN: usize = 64;

#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    #[error("The payment signing secret is not configured")]
    MissingSecret,
}

#[derive(Clone, Debug)]
pub struct SignatureVerifier {
    secret: Secret<String>,
}

impl SignatureVerifier {
    pub fn new(secret: Secret<String>) -> Result<Self, SignatureError> {
        if secret.is_blank() {
            return Err(SignatureError::MissingSecret);
        }
        Ok(Self { secret })
    }

    /// Checks that `signature` is the gateway's signature over `order_id|payment_id`.
    ///
    /// A missing signature is not an error, it simply never verifies. Such payments are recorded as requiring manual
    /// verification.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: Option<&str>) -> bool {
        let Some(signature) = signature else {
            trace!("🔐️ No signature supplied for order {order_id}, payment {payment_id}");
            return false;
        };
        // Only the canonical lowercase encoding is accepted
        let well_formed = signature.len() == SIGNATURE_HEX_LEN &&
            signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            warn!("🔐️ Malformed signature supplied for order {order_id}, payment {payment_id}");
            return false;
        }
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let valid = self.mac_for(order_id, payment_id).verify_slice(&expected).is_ok();
        if valid {
            trace!("🔐️ Signature for order {order_id}, payment {payment_id} ✅️");
        } else {
            warn!("🔐️ Signature mismatch for order {order_id}, payment {payment_id}");
        }
        valid
    }

    /// The hex-encoded signature the gateway would produce for this order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.mac_for(order_id, payment_id).finalize().into_bytes())
    }

    fn mac_for(&self, order_id: &str, payment_id: &str) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.secret.reveal().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts keys of any length"));
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac
    }
}
