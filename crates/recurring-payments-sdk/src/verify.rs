//! Subscription verification against on-chain ground truth.
//!
//! Off-chain services grant access based on what the ledger says, never on
//! what a request claims. Verification resolves the owner's policies via
//! the filtered listing, picks the most recently created one, and checks it
//! against the expected terms in a fixed order so callers always see the
//! same first failure.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use tracing::debug;

use crate::client::PaymentsClient;
use crate::error::SdkError;
use crate::state::PaymentStatus;

/// The terms a subscription must match to be accepted.
#[derive(Debug, Clone)]
pub struct ExpectedSubscription {
    pub amount: u64,
    pub token_mint: Pubkey,
    pub gateway: Pubkey,
    pub recipient: Pubkey,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("no payment policy found for owner")]
    NoPolicyFound,
    #[error("policy is {actual}, not active")]
    PolicyNotActive { actual: PaymentStatus },
    #[error("policy amount {actual} does not match expected {expected}")]
    AmountMismatch { actual: u64, expected: u64 },
    #[error("policy token mint {actual} does not match expected {expected}")]
    TokenMintMismatch { actual: Pubkey, expected: Pubkey },
    #[error("policy gateway {actual} does not match expected {expected}")]
    GatewayMismatch { actual: Pubkey, expected: Pubkey },
    #[error("policy recipient {actual} does not match expected {expected}")]
    RecipientMismatch { actual: Pubkey, expected: Pubkey },
    #[error(transparent)]
    Ledger(#[from] SdkError),
}

/// Confirms `owner` holds a live subscription matching `expected` and
/// returns the policy address.
///
/// Only the newest policy (by creation time) is considered; an older
/// matching policy does not satisfy a newer, different agreement.
pub async fn verify_subscription(
    client: &PaymentsClient,
    owner: &Pubkey,
    expected: &ExpectedSubscription,
) -> Result<Pubkey, VerificationError> {
    let (user_payment_pda, _) = client.user_payment_address(owner, &expected.token_mint);
    let mut policies = client.get_payment_policies_by_user(&user_payment_pda).await?;
    policies.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
    let (address, policy) = policies
        .into_iter()
        .next()
        .ok_or(VerificationError::NoPolicyFound)?;
    debug!(policy = %address, owner = %owner, "verifying newest policy");

    if policy.status != PaymentStatus::Active {
        return Err(VerificationError::PolicyNotActive {
            actual: policy.status,
        });
    }

    let actual_amount = policy.policy_type.amount();
    if actual_amount != expected.amount {
        return Err(VerificationError::AmountMismatch {
            actual: actual_amount,
            expected: expected.amount,
        });
    }

    // The PDA already binds the mint, but the stored field is the record of
    // truth, so check it too.
    let user_payment = client
        .get_user_payment(&policy.user_payment)
        .await?
        .ok_or_else(|| {
            SdkError::AccountNotFound(format!("user payment {}", policy.user_payment))
        })?;
    if user_payment.token_mint != expected.token_mint {
        return Err(VerificationError::TokenMintMismatch {
            actual: user_payment.token_mint,
            expected: expected.token_mint,
        });
    }

    if policy.gateway != expected.gateway {
        return Err(VerificationError::GatewayMismatch {
            actual: policy.gateway,
            expected: expected.gateway,
        });
    }

    if policy.recipient != expected.recipient {
        return Err(VerificationError::RecipientMismatch {
            actual: policy.recipient,
            expected: expected.recipient,
        });
    }

    Ok(address)
}
