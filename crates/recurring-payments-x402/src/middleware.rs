//! The request gate.
//!
//! Three branches, checked in order:
//! 1. `Authorization: Bearer <jwt>` — decode the credential and re-check
//!    the referenced policy on-chain; only a live, active policy passes.
//! 2. `X-Payment` — settle a deferred payment: validate the envelope,
//!    simulate, submit, confirm, verify the resulting subscription, and
//!    mint a credential.
//! 3. Neither — respond 402 with a quote describing the required terms.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use recurring_payments_sdk::{
    verify_subscription, PaymentStatus, PaymentsClient, SdkError, VerificationError,
};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{info, warn};
use uuid::Uuid;

use crate::claims::SubscriptionClaims;
use crate::config::{X402Config, DEFERRED_SCHEME, JWT_VALIDITY_SECS};
use crate::error::X402Error;
use crate::types::{
    AccessGranted, PaymentOffer, PaymentPayload, QuoteResponse, SubscriptionDetails,
};

pub const PAYMENT_HEADER: &str = "X-Payment";
pub const PAYMENT_RESPONSE_HEADER: &str = "Payment-Response";

/// Shared state for the gate. Cheap to clone per request.
#[derive(Clone)]
pub struct X402State {
    pub config: Arc<X402Config>,
    pub client: Arc<PaymentsClient>,
}

pub async fn x402_middleware(
    State(state): State<X402State>,
    request: Request,
    next: Next,
) -> Response {
    // Only a `Bearer `-prefixed header is a credential; anything else in
    // Authorization falls through to the payment and quote branches.
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::to_owned);
    if let Some(token) = token {
        return match check_bearer(&state, &token).await {
            Ok(()) => next.run(request).await,
            Err(error) => error.into_response(),
        };
    }

    if let Some(value) = request.headers().get(PAYMENT_HEADER) {
        let header = value.to_str().map(str::to_owned);
        return match header {
            Ok(header) => match settle_payment(&state, &header).await {
                Ok(response) => response,
                Err(error) => error.into_response(),
            },
            Err(_) => {
                X402Error::payment_required("Invalid X-PAYMENT header format").into_response()
            }
        };
    }

    quote(&state).into_response()
}

/// A credential is only as good as the policy it points at.
async fn check_bearer(state: &X402State, token: &str) -> Result<(), X402Error> {
    let claims = SubscriptionClaims::decode(token, &state.config.jwt_secret)?;
    let policy_address: Pubkey = claims
        .policy_address
        .parse()
        .map_err(|_| X402Error::Unauthorized("Invalid JWT token".to_string()))?;
    let policy = state
        .client
        .get_payment_policy(&policy_address)
        .await
        .map_err(|e| X402Error::Internal(e.to_string()))?;
    match policy {
        Some(policy) if policy.status == PaymentStatus::Active => Ok(()),
        _ => Err(X402Error::payment_required(
            "Invalid or inactive subscription",
        )),
    }
}

async fn settle_payment(state: &X402State, header: &str) -> Result<Response, X402Error> {
    let decoded = BASE64
        .decode(header)
        .map_err(|_| X402Error::payment_required("Invalid X-PAYMENT header format"))?;
    let payload: PaymentPayload = serde_json::from_slice(&decoded)
        .map_err(|_| X402Error::payment_required("Invalid X-PAYMENT header format"))?;

    // Envelope validation happens before anything touches the ledger.
    if payload.scheme != DEFERRED_SCHEME {
        return Err(X402Error::payment_required(format!(
            "Unsupported payment scheme: {}",
            payload.scheme
        )));
    }
    if payload.network != state.config.network {
        return Err(X402Error::payment_required(format!(
            "Unsupported network: {}",
            payload.network
        )));
    }

    let tx_bytes = BASE64
        .decode(&payload.payload.serialized_transaction)
        .map_err(|_| X402Error::payment_required("Invalid serialized transaction"))?;
    let tx: Transaction = bincode::deserialize(&tx_bytes)
        .map_err(|_| X402Error::payment_required("Invalid serialized transaction"))?;

    let owner = fee_payer_of(&tx)?;

    let expected = state.config.expected_subscription();

    // An already-live subscription grants access without a second charge.
    if let Ok(policy_address) = verify_subscription(&state.client, &owner, &expected).await {
        info!(%owner, %policy_address, "subscription already active, skipping submission");
        return grant(state, &policy_address, &payload.id, None);
    }

    let outcome = state
        .client
        .rpc()
        .simulate_transaction(&tx)
        .await
        .map_err(ledger_error)?;
    if let Some(err) = outcome.err {
        warn!(%owner, error = %err, "payment transaction failed simulation");
        return Err(X402Error::PaymentRequired {
            error: "Transaction simulation failed".to_string(),
            details: Some(json!({ "err": err, "logs": outcome.logs })),
        });
    }

    let signature = state
        .client
        .rpc()
        .send_transaction(&tx)
        .await
        .map_err(ledger_error)?;
    state
        .client
        .rpc()
        .confirm_transaction(&signature)
        .await
        .map_err(ledger_error)?;
    info!(%owner, %signature, "payment transaction confirmed");

    // The grant is driven by what actually landed on-chain, not by what
    // the transaction claimed to do.
    let policy_address = verify_subscription(&state.client, &owner, &expected)
        .await
        .map_err(|error| match error {
            VerificationError::Ledger(e) => X402Error::Internal(e.to_string()),
            other => X402Error::payment_required(other.to_string()),
        })?;
    grant(state, &policy_address, &payload.id, Some(signature))
}

/// Identifies the payer from the still-unverified message. This only
/// selects whose subscription to verify; the ledger's signature check at
/// submission is what authenticates the transaction.
fn fee_payer_of(tx: &Transaction) -> Result<Pubkey, X402Error> {
    tx.message
        .account_keys
        .first()
        .copied()
        .ok_or_else(|| X402Error::payment_required("Transaction has no fee payer"))
}

fn ledger_error(error: SdkError) -> X402Error {
    match error {
        SdkError::Submission(message) => X402Error::PaymentRequired {
            error: "Transaction submission failed".to_string(),
            details: Some(json!({ "err": message })),
        },
        SdkError::Confirmation(message) => X402Error::PaymentRequired {
            error: "Transaction confirmation failed".to_string(),
            details: Some(json!({ "err": message })),
        },
        other => X402Error::Internal(other.to_string()),
    }
}

/// Mints the credential and builds the grant response. The payer's request
/// id rides along unchanged into the claims, the details and the receipt.
fn grant(
    state: &X402State,
    policy_address: &Pubkey,
    request_id: &str,
    signature: Option<Signature>,
) -> Result<Response, X402Error> {
    let config = &state.config;
    let claims = SubscriptionClaims {
        policy_address: policy_address.to_string(),
        subscription_id: request_id.to_string(),
        amount: config.amount,
        recipient: config.recipient.to_string(),
        gateway: config.gateway.to_string(),
        token_mint: config.token_mint.to_string(),
        payment_frequency: config.payment_frequency.to_string(),
        auto_renew: config.auto_renew,
        exp: unix_now().saturating_add(JWT_VALIDITY_SECS),
    };
    let jwt = claims.encode(&config.jwt_secret)?;

    let message = if signature.is_some() {
        "Subscription created successfully"
    } else {
        "Existing subscription verified"
    };
    let body = AccessGranted {
        jwt,
        message: message.to_string(),
        subscription_details: SubscriptionDetails {
            policy_address: policy_address.to_string(),
            subscription_id: request_id.to_string(),
            signature: signature.map(|s| s.to_string()),
            explorer_url: signature.map(|s| config.explorer_url(&s)),
        },
    };

    let receipt = json!({
        "success": true,
        "scheme": DEFERRED_SCHEME,
        "network": config.network,
        "id": request_id,
        "timestamp": unix_now(),
        "transaction": signature.map(|s| s.to_string()),
    });
    let receipt = BASE64.encode(
        serde_json::to_vec(&receipt).map_err(|e| X402Error::Internal(e.to_string()))?,
    );

    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&receipt) {
        response.headers_mut().insert(PAYMENT_RESPONSE_HEADER, value);
    }
    Ok(response)
}

/// 402 quote: how to pay for this resource.
fn quote(state: &X402State) -> (StatusCode, Json<QuoteResponse>) {
    let config = &state.config;
    let offer = PaymentOffer {
        scheme: DEFERRED_SCHEME.to_string(),
        network: config.network.clone(),
        resource: config.resource.clone(),
        id: offer_id(),
        terms_url: config.terms_url.clone(),
        amount: config.amount,
        currency: config.currency.clone(),
        recipient: config.recipient.to_string(),
        gateway: config.gateway.to_string(),
        token_mint: config.token_mint.to_string(),
        payment_frequency: config.payment_frequency.to_string(),
        auto_renew: config.auto_renew,
        max_renewals: config.max_renewals,
    };
    (
        StatusCode::PAYMENT_REQUIRED,
        Json(QuoteResponse {
            x402_version: 1,
            error: "X-PAYMENT header is required".to_string(),
            accepts: vec![offer],
        }),
    )
}

fn offer_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("sub_{millis}_{}", Uuid::new_v4().simple())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
