pub mod crypto;

pub use crypto::algorithms::{adjust_key, Algorithm, AlgorithmInfo};
pub use crypto::cipher_context::{construct_context, CipherContext};
pub use crypto::cipher_traits::*;
pub use crypto::cipher_types::*;
pub use crypto::errors::CryptoError;
pub use crypto::progress::{TransformHandle, TransformOutcome, TransformState};
