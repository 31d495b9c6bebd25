use anchor_lang::prelude::borsh;
use anchor_lang::AnchorSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use super::instruction_data;
use crate::state::PaymentStatus;

pub const DISCRIMINATOR: [u8; 8] = [250, 83, 53, 119, 200, 114, 9, 132];

#[derive(AnchorSerialize)]
struct Args {
    policy_id: u32,
    new_status: PaymentStatus,
}

/// Pauses or resumes a policy. Owner only.
pub fn build(
    program_id: &Pubkey,
    owner: &Pubkey,
    user_payment: &Pubkey,
    token_mint: &Pubkey,
    payment_policy: &Pubkey,
    policy_id: u32,
    new_status: PaymentStatus,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(*user_payment, false),
            AccountMeta::new_readonly(*token_mint, false),
            AccountMeta::new(*payment_policy, false),
        ],
        data: instruction_data(
            DISCRIMINATOR,
            &Args {
                policy_id,
                new_status,
            },
        ),
    }
}
