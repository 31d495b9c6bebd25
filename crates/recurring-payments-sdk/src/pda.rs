//! Deterministic program-derived addresses.
//!
//! Every derivation here mirrors the seed layout declared by the on-chain
//! program. A deviation does not fail loudly, it silently addresses the
//! wrong account, so the byte layout per namespace is fixed:
//!
//! - `config`
//! - `gateway`        ++ authority
//! - `user_payment`   ++ owner ++ token mint
//! - `payment_policy` ++ user payment ++ policy id (u32 LE)
//! - `payments`

use anchor_lang::prelude::Pubkey;

use crate::constants::{
    CONFIG_SEED, GATEWAY_SEED, PAYMENTS_SEED, PAYMENT_POLICY_SEED, USER_PAYMENT_SEED,
};

/// Address of the singleton program configuration.
pub fn config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// Address of the gateway account owned by `authority`.
pub fn gateway_address(authority: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GATEWAY_SEED, authority.as_ref()], program_id)
}

/// Address of the per-(owner, mint) user payment account.
pub fn user_payment_address(
    owner: &Pubkey,
    token_mint: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[USER_PAYMENT_SEED, owner.as_ref(), token_mint.as_ref()],
        program_id,
    )
}

/// Address of a payment policy under its parent user payment account.
///
/// Policy ids are a 1-based sequence within the parent; the id is encoded
/// as 4 little-endian bytes in the seed.
pub fn payment_policy_address(
    user_payment: &Pubkey,
    policy_id: u32,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PAYMENT_POLICY_SEED,
            user_payment.as_ref(),
            &policy_id.to_le_bytes(),
        ],
        program_id,
    )
}

/// Address of the payments delegate, the authority approved on user token
/// accounts so the program can pull funds when a payment is due.
pub fn payments_delegate_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PAYMENTS_SEED], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let a = user_payment_address(&owner, &mint, &crate::ID);
        let b = user_payment_address(&owner, &mint, &crate::ID);
        assert_eq!(a, b);

        let c = config_address(&crate::ID);
        let d = config_address(&crate::ID);
        assert_eq!(c, d);
    }

    #[test]
    fn policy_ids_map_to_distinct_addresses() {
        let user_payment = Pubkey::new_unique();
        let mut seen = std::collections::HashSet::new();
        for id in 1..=16u32 {
            let (address, _) = payment_policy_address(&user_payment, id, &crate::ID);
            assert!(seen.insert(address), "collision for policy id {id}");
        }
    }

    #[test]
    fn namespaces_do_not_collide() {
        let key = Pubkey::new_unique();
        let (gateway, _) = gateway_address(&key, &crate::ID);
        let (user_payment, _) = user_payment_address(&key, &key, &crate::ID);
        let (delegate, _) = payments_delegate_address(&crate::ID);
        let (config, _) = config_address(&crate::ID);
        assert_ne!(gateway, user_payment);
        assert_ne!(delegate, config);
    }
}
