//! Pure instruction builders, one module per program instruction.
//!
//! Each builder assembles the Anchor discriminator, borsh-encoded args and
//! the exact account ordering the deployed program declares. Builders do no
//! I/O; prerequisite reads and ordering decisions live in
//! [`crate::client::PaymentsClient`].

pub mod change_gateway_fee_recipient;
pub mod change_gateway_signer;
pub mod change_payment_policy_status;
pub mod create_payment_gateway;
pub mod create_payment_policy;
pub mod create_user_payment;
pub mod delete_payment_gateway;
pub mod delete_payment_policy;
pub mod execute_payment;
pub mod initialize;

use anchor_lang::AnchorSerialize;

/// Discriminator followed by borsh args. Writing into a `Vec` cannot fail.
fn instruction_data<T: AnchorSerialize>(discriminator: [u8; 8], args: &T) -> Vec<u8> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .expect("borsh serialization into Vec");
    data
}
