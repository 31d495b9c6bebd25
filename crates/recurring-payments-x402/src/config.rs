//! Route monetization terms and credential signing configuration.

use std::fmt;

use recurring_payments_sdk::{ExpectedSubscription, PaymentFrequency};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::error::X402Error;

/// The only payment scheme this layer settles: a signed, unsubmitted
/// transaction handed over in the payment header.
pub const DEFERRED_SCHEME: &str = "deferred";

/// Issued credentials stay valid for a year; revocation happens on-chain
/// by pausing or deleting the policy, which every request re-checks.
pub const JWT_VALIDITY_SECS: u64 = 365 * 24 * 60 * 60;

/// HMAC secret for credential signing. Short secrets are rejected at
/// construction so a weak key never reaches the signer.
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn try_new(secret: impl Into<String>) -> Result<Self, X402Error> {
        let secret = secret.into();
        if secret.len() < 32 {
            return Err(X402Error::Config(
                "JWT secret must be at least 32 bytes".to_string(),
            ));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

/// Everything a protected route needs: the subscription terms offered in
/// quotes, the network the payment must target, and the signing secret.
#[derive(Debug)]
pub struct X402Config {
    pub network: String,
    pub resource: String,
    pub terms_url: String,
    /// Cluster query parameter for explorer links, e.g. `devnet`.
    pub explorer_cluster: String,
    pub amount: u64,
    pub currency: String,
    pub recipient: Pubkey,
    pub gateway: Pubkey,
    pub token_mint: Pubkey,
    pub payment_frequency: PaymentFrequency,
    pub auto_renew: bool,
    pub max_renewals: Option<u32>,
    pub jwt_secret: JwtSecret,
}

impl X402Config {
    /// The on-chain terms a subscription must match to unlock the route.
    pub fn expected_subscription(&self) -> ExpectedSubscription {
        ExpectedSubscription {
            amount: self.amount,
            token_mint: self.token_mint,
            gateway: self.gateway,
            recipient: self.recipient,
        }
    }

    pub fn explorer_url(&self, signature: &Signature) -> String {
        format!(
            "https://explorer.solana.com/tx/{signature}?cluster={}",
            self.explorer_cluster
        )
    }
}
