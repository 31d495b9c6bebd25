use anchor_lang::prelude::*;

/// Per-(owner, mint) account aggregating that owner's payment policies for
/// one token. Created lazily on first policy creation and never deleted by
/// this layer.
#[account]
#[derive(Debug, PartialEq)]
pub struct UserPayment {
    pub owner: Pubkey,
    pub token_account: Pubkey,
    pub token_mint: Pubkey,
    pub active_policies_count: u32,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_active: bool,
    pub bump: u8,
    pub padding: [u8; 256],
}

impl UserPayment {
    /// Serialized account size including the 8-byte discriminator.
    pub const SIZE: usize = 8 + // discriminator
        32 + // owner: Pubkey
        32 + // token_account: Pubkey
        32 + // token_mint: Pubkey
        4 + // active_policies_count: u32
        8 + // created_at: i64
        8 + // updated_at: i64
        1 + // is_active: bool
        1 + // bump: u8
        256; // padding

    /// Byte offset of `owner`, used as the memcmp filter for owner lookups.
    pub const OWNER_OFFSET: usize = 8;
}
