use anchor_lang::prelude::*;

use crate::util::decode_fixed_str;

/// A gateway operator runs the service that triggers payments and takes a
/// fee cut on each execution.
#[account]
#[derive(Debug, PartialEq)]
pub struct PaymentGateway {
    /// This key is considered the owner. It cannot be changed.
    pub authority: Pubkey,
    /// Which key receives the gateway fees.
    pub fee_recipient: Pubkey,
    pub gateway_fee_bps: u16,
    pub is_active: bool,
    pub total_processed: u64,
    pub created_at: i64,
    pub bump: u8,
    pub name: [u8; 32],
    pub url: [u8; 64],
    /// Rotatable key used by the operator to execute payments.
    pub signer: Pubkey,
    pub padding: [u8; 128],
}

impl PaymentGateway {
    /// Serialized account size including the 8-byte discriminator.
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority: Pubkey
        32 + // fee_recipient: Pubkey
        2 + // gateway_fee_bps: u16
        1 + // is_active: bool
        8 + // total_processed: u64
        8 + // created_at: i64
        1 + // bump: u8
        32 + // name
        64 + // url
        32 + // signer: Pubkey
        128; // padding

    /// Gateway name with trailing zero padding stripped.
    pub fn name_str(&self) -> String {
        decode_fixed_str(&self.name)
    }

    /// Gateway url with trailing zero padding stripped.
    pub fn url_str(&self) -> String {
        decode_fixed_str(&self.url)
    }
}
