use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

pub const DISCRIMINATOR: [u8; 8] = [212, 253, 96, 169, 171, 244, 137, 144];

/// Rotates the gateway's executor key. Gateway authority only.
pub fn build(
    program_id: &Pubkey,
    authority: &Pubkey,
    gateway: &Pubkey,
    new_signer: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*gateway, false),
            AccountMeta::new_readonly(*new_signer, false),
        ],
        data: DISCRIMINATOR.to_vec(),
    }
}
