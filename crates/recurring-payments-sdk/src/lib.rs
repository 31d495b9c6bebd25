//! Client SDK for the recurring payments program.
//!
//! The on-chain program enforces balance checks, delegation limits and the
//! atomic fee split. This crate is the read/compose side of the protocol:
//! deterministic PDA derivation, typed account state, filtered account
//! listings, ordered instruction sequences for every state-changing
//! operation, and subscription verification against on-chain ground truth.

pub mod client;
pub mod constants;
pub mod error;
pub mod instructions;
pub mod pda;
pub mod rpc;
pub mod state;
#[cfg(test)]
pub(crate) mod testutil;
pub mod util;
pub mod verify;

use anchor_lang::prelude::*;

pub use anchor_lang::{AccountDeserialize, AccountSerialize, AnchorDeserialize, AnchorSerialize};
pub use client::{ExecutePaymentParams, PaymentsClient, SubscriptionParams};
pub use constants::*;
pub use error::SdkError;
pub use rpc::{LedgerRpc, RetryPolicy, SimulationOutcome, SolanaLedgerRpc};
pub use state::*;
pub use verify::{verify_subscription, ExpectedSubscription, VerificationError};

declare_id!("TRibg8W8zmPHQqWtyAD1rEBRXEdyU13Mu6qX1Sg42tJ");
