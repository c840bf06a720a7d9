use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "core_test.rs"]
mod core_test;

/// The byte length of an [`Address`].
pub const ADDRESS_LENGTH: usize = 20;

/// The address of an account, derived from its public key.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({self})")
    }
}
