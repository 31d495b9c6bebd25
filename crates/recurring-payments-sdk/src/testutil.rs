//! In-memory ledger and account fixtures shared across unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anchor_lang::AccountSerialize;
use async_trait::async_trait;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use spl_token::solana_program::program_option::COption;
use spl_token::state::{Account as TokenAccount, AccountState};

use crate::error::SdkError;
use crate::rpc::{LedgerRpc, SimulationOutcome};

/// HashMap-backed ledger. Listing filters by data size and memcmp the way
/// the RPC node does, so records must be inserted at their allocated size.
#[derive(Default)]
pub struct MockLedger {
    pub accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
}

impl MockLedger {
    /// Serializes a program record and pads it to its allocated size.
    pub fn insert_record<T: AccountSerialize>(&self, address: Pubkey, record: &T, size: usize) {
        let mut data = Vec::new();
        record.try_serialize(&mut data).unwrap();
        assert!(data.len() <= size, "record larger than its allocation");
        data.resize(size, 0);
        self.accounts.lock().unwrap().insert(address, data);
    }

    /// Inserts a packed SPL token account, optionally with a delegation.
    pub fn insert_token_account(
        &self,
        address: Pubkey,
        owner: Pubkey,
        mint: Pubkey,
        amount: u64,
        delegation: Option<(Pubkey, u64)>,
    ) {
        let account = TokenAccount {
            mint,
            owner,
            amount,
            delegate: delegation.map_or(COption::None, |(delegate, _)| COption::Some(delegate)),
            state: AccountState::Initialized,
            is_native: COption::None,
            delegated_amount: delegation.map_or(0, |(_, delegated)| delegated),
            close_authority: COption::None,
        };
        let mut data = vec![0u8; TokenAccount::LEN];
        TokenAccount::pack(account, &mut data).unwrap();
        self.accounts.lock().unwrap().insert(address, data);
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SdkError> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn list_program_accounts(
        &self,
        _program_id: &Pubkey,
        data_size: u64,
        memcmp: Option<(usize, Vec<u8>)>,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, SdkError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .filter(|(_, data)| data.len() as u64 == data_size)
            .filter(|(_, data)| match &memcmp {
                None => true,
                Some((offset, bytes)) => {
                    data.get(*offset..offset + bytes.len()) == Some(bytes.as_slice())
                }
            })
            .map(|(address, data)| (*address, data.clone()))
            .collect())
    }

    async fn simulate_transaction(&self, _tx: &Transaction) -> Result<SimulationOutcome, SdkError> {
        Ok(SimulationOutcome {
            err: None,
            logs: Vec::new(),
        })
    }

    async fn send_transaction(&self, _tx: &Transaction) -> Result<Signature, SdkError> {
        Ok(Signature::default())
    }

    async fn confirm_transaction(&self, _signature: &Signature) -> Result<(), SdkError> {
        Ok(())
    }
}
