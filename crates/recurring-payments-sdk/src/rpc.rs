//! Ledger RPC surface.
//!
//! [`LedgerRpc`] is the narrow slice of the ledger the client consumes:
//! nullable account fetch, size/offset-filtered listing, simulation,
//! submission and confirmation. The trait keeps the composer and verifier
//! testable against an in-memory ledger; [`SolanaLedgerRpc`] is the
//! production implementation over the nonblocking `solana-client`.

use std::time::Duration;

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_account_decoder::UiAccountEncoding;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{debug, warn};

use crate::error::SdkError;

/// Result of simulating a transaction against current ledger state.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Ledger-side rejection, if any. `None` means the simulation passed.
    pub err: Option<String>,
    /// Program logs emitted during simulation.
    pub logs: Vec<String>,
}

impl SimulationOutcome {
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }
}

/// The ledger operations the protocol client depends on.
///
/// Reads treat absence as a value: a missing account is `Ok(None)`, never
/// an error. Only transport failures and explicit ledger rejections map to
/// [`SdkError`].
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetches raw account data, or `None` if the account does not exist.
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SdkError>;

    /// Lists program accounts constrained by exact data size and an optional
    /// byte-offset equality match.
    async fn list_program_accounts(
        &self,
        program_id: &Pubkey,
        data_size: u64,
        memcmp: Option<(usize, Vec<u8>)>,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, SdkError>;

    /// Simulates a signed transaction without submitting it.
    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulationOutcome, SdkError>;

    /// Submits a signed transaction. Duplicate signatures are rejected by
    /// the ledger itself, which makes identical resubmission safe.
    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, SdkError>;

    /// Waits until the signature reaches the configured commitment or the
    /// transaction is known to have failed.
    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), SdkError>;
}

/// Bounded retry policy applied to transport-level failures only.
///
/// Simulation rejections and on-chain failures are never retried; they are
/// decisions, not transient conditions.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// No retries; every transport failure surfaces immediately.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff delay before the given (1-based) attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

fn is_transient(error: &ClientError) -> bool {
    matches!(
        error.kind(),
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) | ClientErrorKind::Middleware(_)
    )
}

/// Retries a transport-level RPC call per the configured policy, then maps
/// the terminal error through `$map`.
macro_rules! retry_rpc {
    ($self:ident, $op:literal, $call:expr, $map:expr) => {{
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match $call.await {
                Ok(value) => break value,
                Err(error) if attempt < $self.retry.max_attempts && is_transient(&error) => {
                    let delay = $self.retry.delay_for_attempt(attempt);
                    warn!(op = $op, attempt, error = %error, ?delay, "transient rpc failure, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err($map(error)),
            }
        }
    }};
}

/// Production [`LedgerRpc`] over a pooled JSON-RPC connection. Safe for
/// concurrent use by multiple in-flight requests.
pub struct SolanaLedgerRpc {
    rpc: RpcClient,
    commitment: CommitmentConfig,
    retry: RetryPolicy,
    confirm_polls: u32,
    confirm_poll_interval: Duration,
}

impl SolanaLedgerRpc {
    pub fn new(url: impl ToString) -> Self {
        Self::with_commitment(url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(url: impl ToString, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(url.to_string(), commitment),
            commitment,
            retry: RetryPolicy::default(),
            confirm_polls: 30,
            confirm_poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl LedgerRpc for SolanaLedgerRpc {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SdkError> {
        let response = retry_rpc!(
            self,
            "get_account",
            self.rpc.get_account_with_commitment(address, self.commitment),
            |e: ClientError| SdkError::Rpc(e.to_string())
        );
        Ok(response.value.map(|account| account.data))
    }

    async fn list_program_accounts(
        &self,
        program_id: &Pubkey,
        data_size: u64,
        memcmp: Option<(usize, Vec<u8>)>,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, SdkError> {
        let mut filters = vec![RpcFilterType::DataSize(data_size)];
        if let Some((offset, bytes)) = memcmp {
            filters.push(RpcFilterType::Memcmp(Memcmp::new_raw_bytes(offset, bytes)));
        }
        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = retry_rpc!(
            self,
            "get_program_accounts",
            self.rpc
                .get_program_accounts_with_config(program_id, config.clone()),
            |e: ClientError| SdkError::Rpc(e.to_string())
        );
        debug!(program = %program_id, data_size, count = accounts.len(), "listed program accounts");
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulationOutcome, SdkError> {
        // Simulation failures are terminal; only the transport is retried.
        let response = retry_rpc!(
            self,
            "simulate_transaction",
            self.rpc.simulate_transaction(tx),
            |e: ClientError| SdkError::Rpc(e.to_string())
        );
        Ok(SimulationOutcome {
            err: response.value.err.map(|e| e.to_string()),
            logs: response.value.logs.unwrap_or_default(),
        })
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, SdkError> {
        let signature = retry_rpc!(
            self,
            "send_transaction",
            self.rpc.send_transaction(tx),
            |e: ClientError| SdkError::Submission(e.to_string())
        );
        debug!(%signature, "transaction submitted");
        Ok(signature)
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), SdkError> {
        for _ in 0..self.confirm_polls {
            let response = retry_rpc!(
                self,
                "get_signature_statuses",
                self.rpc.get_signature_statuses(&[*signature]),
                |e: ClientError| SdkError::Rpc(e.to_string())
            );
            if let Some(Some(status)) = response.value.first().cloned() {
                if let Some(err) = status.err {
                    return Err(SdkError::Confirmation(err.to_string()));
                }
                if status.satisfies_commitment(self.commitment) {
                    return Ok(());
                }
            }
            tokio::time::sleep(self.confirm_poll_interval).await;
        }
        Err(SdkError::Confirmation(format!(
            "timed out waiting for confirmation of {signature}"
        )))
    }
}
