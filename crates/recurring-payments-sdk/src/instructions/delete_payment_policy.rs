use anchor_lang::prelude::borsh;
use anchor_lang::AnchorSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use super::instruction_data;

pub const DISCRIMINATOR: [u8; 8] = [146, 180, 143, 169, 50, 40, 146, 86];

#[derive(AnchorSerialize)]
struct Args {
    policy_id: u32,
}

/// Deletes a policy. Terminal; the program decrements the parent's
/// active-policy count.
pub fn build(
    program_id: &Pubkey,
    owner: &Pubkey,
    user_payment: &Pubkey,
    token_mint: &Pubkey,
    payment_policy: &Pubkey,
    policy_id: u32,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*user_payment, false),
            AccountMeta::new_readonly(*token_mint, false),
            AccountMeta::new(*payment_policy, false),
        ],
        data: instruction_data(DISCRIMINATOR, &Args { policy_id }),
    }
}
