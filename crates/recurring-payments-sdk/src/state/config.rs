use anchor_lang::prelude::*;

/// Singleton global protocol configuration, managed by the admin.
#[account]
#[derive(Debug, PartialEq)]
pub struct ProgramConfig {
    pub admin: Pubkey,
    pub fee_recipient: Pubkey,
    pub protocol_fee_bps: u16,
    pub max_policies_per_user: u32,
    pub emergency_pause: bool,
    pub bump: u8,
    /// Reserved for layout-compatible additions. Not exposed to callers.
    pub padding: [u8; 256],
}

impl ProgramConfig {
    /// Serialized account size including the 8-byte discriminator.
    pub const SIZE: usize = 8 + // discriminator
        32 + // admin: Pubkey
        32 + // fee_recipient: Pubkey
        2 + // protocol_fee_bps: u16
        4 + // max_policies_per_user: u32
        1 + // emergency_pause: bool
        1 + // bump: u8
        256; // padding
}
