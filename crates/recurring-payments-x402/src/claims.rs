//! Signed credential claims.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSecret;
use crate::error::X402Error;

/// Claims embedded in an access credential. The policy address is the
/// anchor: bearer checks re-read that account, so a paused or deleted
/// policy invalidates the credential long before `exp` does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionClaims {
    pub policy_address: String,
    /// Request id from the payment that minted this credential.
    pub subscription_id: String,
    pub amount: u64,
    pub recipient: String,
    pub gateway: String,
    pub token_mint: String,
    pub payment_frequency: String,
    pub auto_renew: bool,
    pub exp: u64,
}

impl SubscriptionClaims {
    pub fn encode(&self, secret: &JwtSecret) -> Result<String, X402Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| X402Error::Internal(format!("failed to sign credential: {e}")))
    }

    /// Any decode failure (bad signature, malformed token, expired) is the
    /// same to the caller: the credential is not valid.
    pub fn decode(token: &str, secret: &JwtSecret) -> Result<Self, X402Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| X402Error::Unauthorized("Invalid JWT token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> JwtSecret {
        JwtSecret::try_new("0123456789abcdef0123456789abcdef").unwrap()
    }

    fn claims() -> SubscriptionClaims {
        SubscriptionClaims {
            policy_address: "11111111111111111111111111111111".to_string(),
            subscription_id: "sub_1700000000_abc".to_string(),
            amount: 10_000,
            recipient: "11111111111111111111111111111111".to_string(),
            gateway: "11111111111111111111111111111111".to_string(),
            token_mint: "11111111111111111111111111111111".to_string(),
            payment_frequency: "monthly".to_string(),
            auto_renew: true,
            exp: u64::MAX / 2,
        }
    }

    #[test]
    fn issued_credentials_decode() {
        let token = claims().encode(&secret()).unwrap();
        let decoded = SubscriptionClaims::decode(&token, &secret()).unwrap();
        assert_eq!(decoded.subscription_id, "sub_1700000000_abc");
        assert_eq!(decoded.payment_frequency, "monthly");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = claims().encode(&secret()).unwrap();
        let other = JwtSecret::try_new("ffffffffffffffffffffffffffffffff").unwrap();
        assert!(matches!(
            SubscriptionClaims::decode(&token, &other),
            Err(X402Error::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_credentials_are_rejected() {
        let mut expired = claims();
        expired.exp = 1;
        let token = expired.encode(&secret()).unwrap();
        assert!(SubscriptionClaims::decode(&token, &secret()).is_err());
    }
}
