use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

pub const DISCRIMINATOR: [u8; 8] = [222, 101, 255, 134, 63, 41, 248, 139];

/// Unregisters a gateway. Admin only.
pub fn build(
    program_id: &Pubkey,
    admin: &Pubkey,
    authority: &Pubkey,
    gateway: &Pubkey,
    config: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(*authority, false),
            AccountMeta::new(*gateway, false),
            AccountMeta::new_readonly(*config, false),
        ],
        data: DISCRIMINATOR.to_vec(),
    }
}
