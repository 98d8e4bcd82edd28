//! Shared security code guarding collection writes

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{QrError, Result};

/// The single accepted security code - zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecurityCode {
    value: String,
}

impl SecurityCode {
    /// Wrap a configured code. Empty codes are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(QrError::InvalidConfig(
                "security code must not be empty".to_string(),
            ));
        }
        Ok(Self { value })
    }

    /// Compare a candidate in constant time
    pub fn verify(&self, candidate: &str) -> bool {
        self.value.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    /// Get the code (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for SecurityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityCode")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
