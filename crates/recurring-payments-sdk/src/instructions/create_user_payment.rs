use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

pub const DISCRIMINATOR: [u8; 8] = [115, 54, 209, 72, 127, 194, 206, 49];

/// Creates the per-(owner, mint) user payment account.
#[allow(clippy::too_many_arguments)]
pub fn build(
    program_id: &Pubkey,
    owner: &Pubkey,
    user_payment: &Pubkey,
    token_account: &Pubkey,
    token_mint: &Pubkey,
    config: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*user_payment, false),
            AccountMeta::new_readonly(*token_account, false),
            AccountMeta::new_readonly(*token_mint, false),
            AccountMeta::new_readonly(*config, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: DISCRIMINATOR.to_vec(),
    }
}
