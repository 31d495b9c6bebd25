//! Deferred-payment (x402) verification layer.
//!
//! Monetizes HTTP routes with on-chain subscriptions: requests without
//! credentials receive a 402 quote describing the required subscription,
//! requests carrying a signed (unsubmitted) payment transaction get it
//! settled and verified, and requests with a previously issued JWT are
//! checked against live policy state before they reach the handler.

pub mod claims;
pub mod config;
pub mod error;
pub mod middleware;
pub mod types;

pub use claims::SubscriptionClaims;
pub use config::{JwtSecret, X402Config, DEFERRED_SCHEME};
pub use error::X402Error;
pub use middleware::{x402_middleware, X402State, PAYMENT_HEADER, PAYMENT_RESPONSE_HEADER};
pub use types::{
    AccessGranted, PaymentEnvelope, PaymentOffer, PaymentPayload, QuoteResponse,
    SubscriptionDetails,
};
