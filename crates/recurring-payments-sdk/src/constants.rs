//! Seed namespaces and fixed field widths shared with the on-chain program.

/// Seed for the singleton program configuration PDA.
pub const CONFIG_SEED: &[u8] = b"config";
/// Seed for gateway PDAs, keyed by the gateway authority.
pub const GATEWAY_SEED: &[u8] = b"gateway";
/// Seed for per-(owner, mint) user payment PDAs.
pub const USER_PAYMENT_SEED: &[u8] = b"user_payment";
/// Seed for payment policy PDAs, keyed by parent user payment and policy id.
pub const PAYMENT_POLICY_SEED: &[u8] = b"payment_policy";
/// Seed for the payments delegate PDA that is approved to pull funds.
pub const PAYMENTS_SEED: &[u8] = b"payments";

/// Width of the fixed-size policy memo field.
pub const MEMO_LEN: usize = 64;
/// Width of the fixed-size gateway name field.
pub const GATEWAY_NAME_LEN: usize = 32;
/// Width of the fixed-size gateway url field.
pub const GATEWAY_URL_LEN: usize = 64;

/// Fee ceiling for gateway and protocol fees.
pub const MAX_FEE_BPS: u16 = 10_000;
