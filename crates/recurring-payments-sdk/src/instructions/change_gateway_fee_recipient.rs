use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

pub const DISCRIMINATOR: [u8; 8] = [73, 254, 67, 5, 32, 147, 202, 101];

/// Points gateway fees at a new recipient. Gateway authority only.
pub fn build(
    program_id: &Pubkey,
    authority: &Pubkey,
    gateway: &Pubkey,
    new_fee_recipient: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*gateway, false),
            AccountMeta::new_readonly(*new_fee_recipient, false),
        ],
        data: DISCRIMINATOR.to_vec(),
    }
}
