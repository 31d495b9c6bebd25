//! Demo server: one JWT/x402-gated route backed by a real RPC endpoint.
//!
//! Configuration is environment-driven; see `required` calls below for the
//! mandatory variables.

use std::env;
use std::error::Error;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use recurring_payments_sdk::{PaymentFrequency, PaymentsClient, SolanaLedgerRpc};
use recurring_payments_x402::{x402_middleware, JwtSecret, X402Config, X402State};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let rpc_url =
        env::var("RPC_URL").unwrap_or_else(|_| "https://api.devnet.solana.com".to_string());
    let gateway_authority: Pubkey = required("GATEWAY_AUTHORITY")?.parse()?;
    let token_mint: Pubkey = required("USDC_MINT")?.parse()?;
    let recipient: Pubkey = required("RECIPIENT_WALLET")?.parse()?;
    let jwt_secret = JwtSecret::try_new(required("JWT_SECRET")?)?;

    let amount: u64 = env::var("SUBSCRIPTION_AMOUNT")
        .unwrap_or_else(|_| "10000000".to_string())
        .parse()?;
    let frequency_label = env::var("PAYMENT_FREQUENCY").unwrap_or_else(|_| "monthly".to_string());
    let custom_interval = env::var("CUSTOM_INTERVAL_SECONDS")
        .ok()
        .map(|value| value.parse())
        .transpose()?;
    let payment_frequency = PaymentFrequency::parse(&frequency_label, custom_interval)?;
    let auto_renew = env::var("AUTO_RENEW").map(|v| v == "true").unwrap_or(true);
    let max_renewals = env::var("MAX_RENEWALS")
        .ok()
        .map(|value| value.parse())
        .transpose()?;

    let rpc = Arc::new(SolanaLedgerRpc::new(&rpc_url));
    let client = Arc::new(PaymentsClient::new(rpc));
    let (gateway, _) = client.gateway_address(&gateway_authority);

    let config = Arc::new(X402Config {
        network: env::var("NETWORK").unwrap_or_else(|_| "solana-devnet".to_string()),
        resource: "/premium".to_string(),
        terms_url: env::var("TERMS_URL").unwrap_or_else(|_| "/terms".to_string()),
        explorer_cluster: env::var("EXPLORER_CLUSTER").unwrap_or_else(|_| "devnet".to_string()),
        amount,
        currency: "USDC".to_string(),
        recipient,
        gateway,
        token_mint,
        payment_frequency,
        auto_renew,
        max_renewals,
        jwt_secret,
    });
    let state = X402State { config, client };

    let app = Router::new()
        .route("/premium", get(premium))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            x402_middleware,
        ))
        .layer(TraceLayer::new_for_http());

    let addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, %rpc_url, "serving gated content");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn premium() -> Json<Value> {
    Json(json!({ "content": "premium content unlocked" }))
}

fn required(name: &str) -> Result<String, Box<dyn Error>> {
    env::var(name).map_err(|_| format!("missing required environment variable {name}").into())
}
