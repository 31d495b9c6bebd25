use std::fmt;

use anchor_lang::prelude::*;

use crate::error::SdkError;
use crate::util::decode_fixed_str;

/// The PolicyType enum implements the payment schemes. The initial policy
/// is a subscription payment that enables regular payment on a schedule.
///
/// IMPORTANT: all variants MUST serialize to exactly 128 bytes so accounts
/// keep a consistent size and future variants can be added without breaking
/// existing accounts. `OneTime` and `Installment` variants are reserved.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub enum PolicyType {
    Subscription {
        amount: u64,                         // 8 bytes
        auto_renew: bool,                    // 1 byte
        max_renewals: Option<u32>,           // 5 bytes (1 + 4)
        payment_frequency: PaymentFrequency, // 9 bytes (1 + 8)
        next_payment_due: i64,               // 8 bytes
        padding: [u8; 97],                   // 97 bytes padding
    },
}

impl PolicyType {
    /// Each variant serializes to exactly this size (excluding the enum tag).
    pub const VARIANT_SIZE: usize = 128;

    /// Total size including the enum tag.
    pub const TOTAL_SIZE: usize = 1 + Self::VARIANT_SIZE;

    /// Subscription constructor that fills the reserved padding.
    pub fn subscription(
        amount: u64,
        auto_renew: bool,
        max_renewals: Option<u32>,
        payment_frequency: PaymentFrequency,
        next_payment_due: i64,
    ) -> Self {
        PolicyType::Subscription {
            amount,
            auto_renew,
            max_renewals,
            payment_frequency,
            next_payment_due,
            padding: [0u8; 97],
        }
    }

    /// The recurring amount carried by this policy.
    pub fn amount(&self) -> u64 {
        match self {
            PolicyType::Subscription { amount, .. } => *amount,
        }
    }

    /// Next timestamp at which a payment becomes due. Only ever moves
    /// forward on execution.
    pub fn next_payment_due(&self) -> i64 {
        match self {
            PolicyType::Subscription {
                next_payment_due, ..
            } => *next_payment_due,
        }
    }
}

/// Status of an installed payment policy. Transitions only between
/// `Active` and `Paused`; deletion is terminal, not a status.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Active,
    Paused,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Active => f.write_str("active"),
            PaymentStatus::Paused => f.write_str("paused"),
        }
    }
}

/// Payment schedule, with a custom period (in seconds) escape hatch.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
    Custom(u64),
}

impl PaymentFrequency {
    /// Parses a frequency label. `custom` requires an interval in seconds;
    /// unknown labels are rejected at the boundary.
    pub fn parse(
        label: &str,
        custom_interval_seconds: Option<u64>,
    ) -> std::result::Result<Self, SdkError> {
        match label {
            "daily" => Ok(PaymentFrequency::Daily),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "semiAnnually" => Ok(PaymentFrequency::SemiAnnually),
            "annually" => Ok(PaymentFrequency::Annually),
            "custom" => custom_interval_seconds
                .filter(|interval| *interval > 0)
                .map(PaymentFrequency::Custom)
                .ok_or(SdkError::MissingCustomInterval),
            other => Err(SdkError::UnknownFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFrequency::Daily => f.write_str("daily"),
            PaymentFrequency::Weekly => f.write_str("weekly"),
            PaymentFrequency::Monthly => f.write_str("monthly"),
            PaymentFrequency::Quarterly => f.write_str("quarterly"),
            PaymentFrequency::SemiAnnually => f.write_str("semiAnnually"),
            PaymentFrequency::Annually => f.write_str("annually"),
            PaymentFrequency::Custom(_) => f.write_str("custom"),
        }
    }
}

/// One recurring obligation: payer to recipient, via a gateway, on a
/// schedule. Policy ids are a 1-based sequence within the parent
/// [`crate::state::UserPayment`].
#[account]
#[derive(Debug, PartialEq)]
pub struct PaymentPolicy {
    pub user_payment: Pubkey,
    pub recipient: Pubkey,
    pub gateway: Pubkey,
    pub policy_type: PolicyType,
    pub status: PaymentStatus,
    pub memo: [u8; 64],
    pub total_paid: u64,
    pub payment_count: u32,
    pub created_at: i64,
    pub updated_at: i64,
    pub policy_id: u32,
    pub bump: u8,
    pub padding: [u8; 256],
}

impl PaymentPolicy {
    /// Serialized account size including the 8-byte discriminator.
    pub const SIZE: usize = 8 + // discriminator
        32 + // user_payment: Pubkey
        32 + // recipient: Pubkey
        32 + // gateway: Pubkey
        PolicyType::VARIANT_SIZE + // policy_type
        1 + // status
        64 + // memo
        8 + // total_paid: u64
        4 + // payment_count: u32
        8 + // created_at: i64
        8 + // updated_at: i64
        4 + // policy_id: u32
        1 + // bump: u8
        256; // padding

    /// Byte offset of `user_payment`, the memcmp filter for per-user lookups.
    pub const USER_PAYMENT_OFFSET: usize = 8;
    /// Byte offset of `recipient`.
    pub const RECIPIENT_OFFSET: usize = 8 + 32;
    /// Byte offset of `gateway`.
    pub const GATEWAY_OFFSET: usize = 8 + 32 + 32;

    /// Policy memo with trailing zero padding stripped.
    pub fn memo_str(&self) -> String {
        decode_fixed_str(&self.memo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::{AccountSerialize, Discriminator};

    fn sample(user_payment: Pubkey, recipient: Pubkey, gateway: Pubkey) -> PaymentPolicy {
        PaymentPolicy {
            user_payment,
            recipient,
            gateway,
            policy_type: PolicyType::subscription(
                10_000,
                true,
                Some(12),
                PaymentFrequency::Monthly,
                1_700_000_000,
            ),
            status: PaymentStatus::Active,
            memo: [0u8; 64],
            total_paid: 0,
            payment_count: 0,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            policy_id: 1,
            bump: 255,
            padding: [0u8; 256],
        }
    }

    #[test]
    fn allocated_size_covers_subscription_encoding() {
        // Borsh encodes Option and the frequency enum with variable width;
        // narrower values leave zeroed tail bytes inside the allocated
        // account, so the serialized form never exceeds the allocation the
        // deployed program uses for its dataSize filter.
        let record = sample(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        let mut buf = Vec::new();
        record.try_serialize(&mut buf).unwrap();
        assert!(buf.len() <= PaymentPolicy::SIZE);
        assert_eq!(PaymentPolicy::SIZE, 586);
    }

    #[test]
    fn filter_offsets_point_at_indexed_fields() {
        let user_payment = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let gateway = Pubkey::new_unique();
        let record = sample(user_payment, recipient, gateway);
        let mut buf = Vec::new();
        record.try_serialize(&mut buf).unwrap();

        let range = |offset: usize| &buf[offset..offset + 32];
        assert_eq!(range(PaymentPolicy::USER_PAYMENT_OFFSET), user_payment.as_ref());
        assert_eq!(range(PaymentPolicy::RECIPIENT_OFFSET), recipient.as_ref());
        assert_eq!(range(PaymentPolicy::GATEWAY_OFFSET), gateway.as_ref());
    }

    #[test]
    fn policy_type_encoding_stays_within_variant_size() {
        let narrow = PolicyType::subscription(1, false, None, PaymentFrequency::Daily, 0);
        let bytes = anchor_lang::AnchorSerialize::try_to_vec(&narrow).unwrap();
        assert!(bytes.len() <= PolicyType::TOTAL_SIZE);

        // Option and Custom interval are the widest encodings.
        let widest = PolicyType::subscription(
            u64::MAX,
            true,
            Some(u32::MAX),
            PaymentFrequency::Custom(86_400),
            i64::MAX,
        );
        let bytes = anchor_lang::AnchorSerialize::try_to_vec(&widest).unwrap();
        assert_eq!(bytes.len(), PolicyType::TOTAL_SIZE);
    }

    #[test]
    fn discriminator_matches_deployed_program() {
        assert_eq!(PaymentPolicy::DISCRIMINATOR, &[48, 74, 183, 94, 41, 92, 52, 44]);
    }

    #[test]
    fn frequency_labels_round_trip() {
        for label in ["daily", "weekly", "monthly", "quarterly", "semiAnnually", "annually"] {
            let frequency = PaymentFrequency::parse(label, None).unwrap();
            assert_eq!(frequency.to_string(), label);
        }
        assert!(matches!(
            PaymentFrequency::parse("custom", Some(3_600)),
            Ok(PaymentFrequency::Custom(3_600))
        ));
        assert!(matches!(
            PaymentFrequency::parse("custom", None),
            Err(crate::error::SdkError::MissingCustomInterval)
        ));
        assert!(matches!(
            PaymentFrequency::parse("fortnightly", None),
            Err(crate::error::SdkError::UnknownFrequency(_))
        ));
    }
}
