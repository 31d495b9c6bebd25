use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

pub const DISCRIMINATOR: [u8; 8] = [86, 4, 7, 7, 120, 139, 232, 139];

/// Resolved account set for one payment execution.
///
/// Due-date and status enforcement happen in the program at submission
/// time; this builder is only responsible for correct instruction shape.
pub struct ExecutePaymentAccounts {
    pub fee_payer: Pubkey,
    pub payments_delegate: Pubkey,
    pub payment_policy: Pubkey,
    pub user_payment: Pubkey,
    pub gateway: Pubkey,
    pub config: Pubkey,
    pub user_token_account: Pubkey,
    pub recipient_token_account: Pubkey,
    pub gateway_fee_account: Pubkey,
    pub protocol_fee_account: Pubkey,
}

pub fn build(program_id: &Pubkey, accounts: &ExecutePaymentAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(accounts.fee_payer, true),
            AccountMeta::new_readonly(accounts.payments_delegate, false),
            AccountMeta::new(accounts.payment_policy, false),
            AccountMeta::new(accounts.user_payment, false),
            AccountMeta::new(accounts.gateway, false),
            AccountMeta::new_readonly(accounts.config, false),
            AccountMeta::new(accounts.user_token_account, false),
            AccountMeta::new(accounts.recipient_token_account, false),
            AccountMeta::new(accounts.gateway_fee_account, false),
            AccountMeta::new(accounts.protocol_fee_account, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ],
        data: DISCRIMINATOR.to_vec(),
    }
}
