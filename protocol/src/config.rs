//! # Protocol Configuration & Constants
//!
//! Every wire discriminant, fee floor and length limit used by the envelope
//! codecs lives here. These values are fixed by the network's XDR schema;
//! changing one produces envelopes that validators reject.

// ---------------------------------------------------------------------------
// Networks
// ---------------------------------------------------------------------------

/// Passphrase of the public production network.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the public test network.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Passphrase of the future-protocol staging network.
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

// ---------------------------------------------------------------------------
// Fees & Limits
// ---------------------------------------------------------------------------

/// Minimum per-operation fee, in stroops. The builder multiplies this by the
/// operation count unless a higher base fee is requested.
pub const MIN_BASE_FEE: u32 = 100;

/// Upper bound on operations in a single transaction (`operations<100>`).
pub const MAX_OPERATIONS: usize = 100;

/// Upper bound on signatures attached to one envelope (`signatures<20>`).
pub const MAX_SIGNATURES: usize = 20;

/// Maximum signature length in bytes (`Signature = opaque<64>`). Hash-x
/// preimages share the same slot, so they obey the same limit.
pub const MAX_SIGNATURE_LENGTH: usize = 64;

/// Length of a signature hint (`SignatureHint = opaque[4]`).
pub const SIGNATURE_HINT_LENGTH: usize = 4;

/// Maximum `MEMO_TEXT` length in bytes (`string<28>`).
pub const MAX_MEMO_TEXT_LENGTH: usize = 28;

/// Maximum `ManageData` entry name length (`string64`).
pub const MAX_DATA_NAME_LENGTH: usize = 64;

/// Maximum `ManageData` entry value length (`DataValue = opaque<64>`).
pub const MAX_DATA_VALUE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Envelope Discriminants
// ---------------------------------------------------------------------------

/// `ENVELOPE_TYPE_TX_V0`: legacy envelope with a bare Ed25519 source key.
pub const ENVELOPE_TYPE_TX_V0: i32 = 0;

/// `ENVELOPE_TYPE_TX`: current envelope with a multiplexed source account.
pub const ENVELOPE_TYPE_TX: i32 = 2;

/// `ENVELOPE_TYPE_TX_FEE_BUMP`: fee-bump envelope wrapping a v1 envelope.
pub const ENVELOPE_TYPE_TX_FEE_BUMP: i32 = 5;

// ---------------------------------------------------------------------------
// Key Discriminants
// ---------------------------------------------------------------------------

/// `PUBLIC_KEY_TYPE_ED25519` arm of the `PublicKey` union.
pub const PUBLIC_KEY_TYPE_ED25519: i32 = 0;

/// `KEY_TYPE_ED25519` arm of the `MuxedAccount` union.
pub const KEY_TYPE_ED25519: i32 = 0;

/// `KEY_TYPE_MUXED_ED25519` arm of the `MuxedAccount` union.
pub const KEY_TYPE_MUXED_ED25519: i32 = 0x100;

// ---------------------------------------------------------------------------
// Memo Discriminants
// ---------------------------------------------------------------------------

pub const MEMO_NONE: i32 = 0;
pub const MEMO_TEXT: i32 = 1;
pub const MEMO_ID: i32 = 2;
pub const MEMO_HASH: i32 = 3;
pub const MEMO_RETURN: i32 = 4;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns a friendly name for a well-known passphrase, mainly for logging.
pub fn network_name(passphrase: &str) -> &'static str {
    match passphrase {
        PUBLIC_NETWORK_PASSPHRASE => "public",
        TESTNET_PASSPHRASE => "testnet",
        FUTURENET_PASSPHRASE => "futurenet",
        _ => "custom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_discriminants_are_distinct() {
        assert_ne!(ENVELOPE_TYPE_TX_V0, ENVELOPE_TYPE_TX);
        assert_ne!(ENVELOPE_TYPE_TX, ENVELOPE_TYPE_TX_FEE_BUMP);
        assert_ne!(ENVELOPE_TYPE_TX_V0, ENVELOPE_TYPE_TX_FEE_BUMP);
    }

    #[test]
    fn test_network_name_formatting() {
        assert_eq!(network_name(PUBLIC_NETWORK_PASSPHRASE), "public");
        assert_eq!(network_name(TESTNET_PASSPHRASE), "testnet");
        assert_eq!(network_name("my private ledger"), "custom");
    }

    #[test]
    fn test_limits_sanity() {
        assert_eq!(MIN_BASE_FEE, 100);
        assert!(MAX_OPERATIONS > 0);
        assert!(MAX_SIGNATURES > 0);
        assert_eq!(SIGNATURE_HINT_LENGTH, 4);
    }
}
