use anchor_lang::prelude::borsh;
use anchor_lang::AnchorSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use super::instruction_data;
use crate::state::PolicyType;

pub const DISCRIMINATOR: [u8; 8] = [32, 50, 29, 251, 174, 23, 112, 121];

#[derive(AnchorSerialize)]
struct Args {
    policy_id: u32,
    policy_type: PolicyType,
    memo: [u8; 64],
}

/// Creates a payment policy under an existing user payment account.
///
/// `policy_id` must be `active_policies_count + 1`; the program validates
/// it against the policy PDA seed.
#[allow(clippy::too_many_arguments)]
pub fn build(
    program_id: &Pubkey,
    user: &Pubkey,
    user_payment: &Pubkey,
    recipient: &Pubkey,
    token_mint: &Pubkey,
    gateway: &Pubkey,
    config: &Pubkey,
    payment_policy: &Pubkey,
    policy_id: u32,
    policy_type: &PolicyType,
    memo: [u8; 64],
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(*user_payment, false),
            AccountMeta::new_readonly(*recipient, false),
            AccountMeta::new_readonly(*token_mint, false),
            AccountMeta::new_readonly(*gateway, false),
            AccountMeta::new_readonly(*config, false),
            AccountMeta::new(*payment_policy, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: instruction_data(
            DISCRIMINATOR,
            &Args {
                policy_id,
                policy_type: policy_type.clone(),
                memo,
            },
        ),
    }
}
