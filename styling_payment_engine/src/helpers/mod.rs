mod payment_signature;

pub use payment_signature::{SignatureError, SignatureVerifier};
