//! Verification code generation

use rand::{rngs::OsRng, Rng};

/// Produces verification codes
///
/// Outside production-app mode every code is the configured fixed code, so
/// test and staging flows can verify without reading a delivery.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    production_app: bool,
    fixed_code: String,
}

impl CodeGenerator {
    pub fn new(production_app: bool, fixed_code: impl Into<String>) -> Self {
        Self {
            production_app,
            fixed_code: fixed_code.into(),
        }
    }

    /// Generate a code of `length` digits (leading zeros included), or the
    /// fixed code outside production-app mode
    pub fn generate(&self, length: usize) -> String {
        if !self.production_app {
            return self.fixed_code.clone();
        }

        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}
