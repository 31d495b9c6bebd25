//! Typed account records, one file per record.
//!
//! Each record is the single source of truth for its on-ledger byte layout:
//! the serialized size constant used by `dataSize` filters and the memcmp
//! offset constants live next to the struct they describe, so the encoder
//! and the filter constants cannot drift independently.

pub mod config;
pub mod gateway;
pub mod payment_policy;
pub mod user_payment;

pub use config::*;
pub use gateway::*;
pub use payment_policy::*;
pub use user_payment::*;
