//! Wire types for the quote, payment and grant exchanges. Field names
//! follow the x402 convention of camelCase JSON.

use serde::{Deserialize, Serialize};

/// One way the client may pay for the resource. The quote carries every
/// term needed to compose the subscription transaction client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOffer {
    pub scheme: String,
    pub network: String,
    pub resource: String,
    /// Correlation id for this quote, unique per issuance.
    pub id: String,
    pub terms_url: String,
    pub amount: u64,
    pub currency: String,
    pub recipient: String,
    pub gateway: String,
    pub token_mint: String,
    pub payment_frequency: String,
    pub auto_renew: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_renewals: Option<u32>,
}

/// Body of the 402 issued when a request carries no credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub x402_version: u8,
    pub error: String,
    pub accepts: Vec<PaymentOffer>,
}

/// Payment header contents: base64 of this JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u8,
    pub scheme: String,
    pub network: String,
    /// Echo of the quote's offer id; carried into the minted credential.
    pub id: String,
    pub payload: PaymentEnvelope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEnvelope {
    /// Base64 of the signed, unsubmitted transaction wire bytes.
    pub serialized_transaction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetails {
    pub policy_address: String,
    /// The request id the payer presented, echoed back verbatim.
    pub subscription_id: String,
    /// Absent when an existing subscription satisfied the request and no
    /// transaction was submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

/// Successful settlement response: the credential for future requests
/// plus what was verified on-chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGranted {
    pub jwt: String,
    pub message: String,
    pub subscription_details: SubscriptionDetails,
}
