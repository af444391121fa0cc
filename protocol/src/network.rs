//! Network identity.
//!
//! Each ledger network is named by a human-readable passphrase. Its 32-byte
//! identifier, `SHA-256(passphrase)`, prefixes every signature base, so a
//! transaction signed for one network can never be replayed on another.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{self, FUTURENET_PASSPHRASE, PUBLIC_NETWORK_PASSPHRASE, TESTNET_PASSPHRASE};
use crate::crypto::hash::sha256;

/// A ledger network, identified by its passphrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    passphrase: String,
}

impl Network {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// The public production network.
    pub fn public() -> Self {
        Self::new(PUBLIC_NETWORK_PASSPHRASE)
    }

    /// The public test network.
    pub fn testnet() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }

    pub fn futurenet() -> Self {
        Self::new(FUTURENET_PASSPHRASE)
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// `SHA-256(passphrase)`.
    pub fn network_id(&self) -> [u8; 32] {
        sha256(self.passphrase.as_bytes())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(config::network_name(&self.passphrase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_id_matches_published_value() {
        assert_eq!(
            hex::encode(Network::testnet().network_id()),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
    }

    #[test]
    fn public_id_matches_published_value() {
        assert_eq!(
            hex::encode(Network::public().network_id()),
            "7ac33997544e3175d266bd022439b22cdb16508c01163f26e5cb2a3e1045a979"
        );
    }

    #[test]
    fn different_passphrases_different_ids() {
        assert_ne!(
            Network::new("a").network_id(),
            Network::new("b").network_id()
        );
    }

    #[test]
    fn display_uses_friendly_name() {
        assert_eq!(Network::testnet().to_string(), "testnet");
        assert_eq!(Network::new("private").to_string(), "custom");
    }
}
