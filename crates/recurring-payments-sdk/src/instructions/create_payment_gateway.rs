use anchor_lang::prelude::borsh;
use anchor_lang::AnchorSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use super::instruction_data;

pub const DISCRIMINATOR: [u8; 8] = [186, 227, 210, 95, 154, 36, 146, 9];

#[derive(AnchorSerialize)]
struct Args {
    gateway_fee_bps: u16,
    name: [u8; 32],
    url: [u8; 64],
}

/// Registers a gateway operator. Admin only; the gateway PDA is keyed by
/// the operator authority.
#[allow(clippy::too_many_arguments)]
pub fn build(
    program_id: &Pubkey,
    admin: &Pubkey,
    authority: &Pubkey,
    gateway: &Pubkey,
    config: &Pubkey,
    fee_recipient: &Pubkey,
    gateway_fee_bps: u16,
    name: [u8; 32],
    url: [u8; 64],
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(*authority, false),
            AccountMeta::new(*gateway, false),
            AccountMeta::new_readonly(*config, false),
            AccountMeta::new_readonly(*fee_recipient, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: instruction_data(
            DISCRIMINATOR,
            &Args {
                gateway_fee_bps,
                name,
                url,
            },
        ),
    }
}
