//! # CLI Interface
//!
//! Defines the command-line argument structure for `meridian-tool` using
//! `clap` derive. Every subcommand works offline on a base64 envelope.

use clap::{Args, Parser, Subcommand};

use meridian_protocol::config::TESTNET_PASSPHRASE;

use crate::logging::LogFormat;

/// Offline toolkit for Meridian transaction envelopes.
///
/// Decodes, hashes, signs and fee-bumps base64 XDR envelopes. Nothing is
/// ever submitted to the network.
#[derive(Parser, Debug)]
#[command(
    name = "meridian-tool",
    about = "Inspect, hash, sign and fee-bump Meridian transaction envelopes",
    version,
    propagate_version = true
)]
pub struct MeridianCli {
    /// Passphrase of the network the envelope belongs to. It determines the
    /// transaction hash.
    #[arg(
        long,
        global = true,
        env = "MERIDIAN_NETWORK_PASSPHRASE",
        default_value = TESTNET_PASSPHRASE
    )]
    pub network_passphrase: String,

    /// Log output format (logs go to stderr).
    #[arg(
        long,
        global = true,
        env = "MERIDIAN_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the decoded transaction as JSON.
    Decode(EnvelopeArg),
    /// Print the hex transaction hash.
    Hash(EnvelopeArg),
    /// Append a signature and print the new envelope.
    Sign(SignArgs),
    /// Wrap a transaction in a fee bump paid and signed by the given key.
    FeeBump(FeeBumpArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct EnvelopeArg {
    /// Base64 XDR envelope, or `-` to read it from stdin.
    pub envelope: String,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub input: EnvelopeArg,

    /// Hex-encoded 32-byte Ed25519 secret key.
    ///
    /// Prefer the environment variable over the flag; flags end up in shell
    /// history.
    #[arg(long, env = "MERIDIAN_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

#[derive(Args, Debug)]
pub struct FeeBumpArgs {
    #[command(flatten)]
    pub input: EnvelopeArg,

    /// Per-operation base fee in stroops; the inner operation count plus
    /// one is charged at this rate.
    #[arg(long)]
    pub base_fee: i64,

    /// Hex-encoded secret key of the fee-paying account.
    #[arg(long, env = "MERIDIAN_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        MeridianCli::command().debug_assert();
    }

    #[test]
    fn network_defaults_to_testnet() {
        let cli = MeridianCli::try_parse_from(["meridian-tool", "hash", "AAAA"]).unwrap();
        assert_eq!(cli.network_passphrase, TESTNET_PASSPHRASE);
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(matches!(cli.command, Commands::Hash(ref a) if a.envelope == "AAAA"));
    }

    #[test]
    fn fee_bump_requires_base_fee() {
        let parsed = MeridianCli::try_parse_from([
            "meridian-tool",
            "fee-bump",
            "AAAA",
            "--secret-key",
            "00",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = MeridianCli::try_parse_from([
            "meridian-tool",
            "decode",
            "-",
            "--log-format",
            "json",
            "--network-passphrase",
            "private net",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.network_passphrase, "private net");
    }
}
