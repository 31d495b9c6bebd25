//! High-level protocol client: typed reads over the ledger and ordered,
//! idempotent instruction sequences for every state-changing operation.
//!
//! Every operation takes the acting signer explicitly; the client itself
//! holds no wallet and no mutable state, so one instance is safe to share
//! across concurrent requests.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anchor_lang::AccountDeserialize;
use solana_sdk::instruction::Instruction;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account;
use tracing::debug;

use crate::error::SdkError;
use crate::instructions;
use crate::instructions::execute_payment::ExecutePaymentAccounts;
use crate::pda;
use crate::rpc::LedgerRpc;
use crate::state::{
    PaymentGateway, PaymentPolicy, PaymentStatus, PolicyType, ProgramConfig, UserPayment,
};
use crate::util::{encode_fixed_str, encode_memo};

/// Parameters for composing a full subscription setup.
#[derive(Debug, Clone)]
pub struct SubscriptionParams {
    pub token_mint: Pubkey,
    pub recipient: Pubkey,
    pub gateway: Pubkey,
    pub amount: u64,
    pub auto_renew: bool,
    pub max_renewals: Option<u32>,
    pub payment_frequency: crate::state::PaymentFrequency,
    pub memo: String,
    /// First due timestamp; defaults to "now".
    pub start_time: Option<i64>,
    /// When set, a delegation approval for this amount is appended unless
    /// the current delegation already matches.
    pub approval_amount: Option<u64>,
    /// Append the execute-payment sequence for the policy being created.
    pub execute_immediately: bool,
}

/// Caller-supplied fallbacks for payment execution. Fields resolved from
/// the policy account take precedence.
#[derive(Debug, Clone, Default)]
pub struct ExecutePaymentParams {
    pub recipient: Option<Pubkey>,
    pub token_mint: Option<Pubkey>,
    pub gateway: Option<Pubkey>,
    pub user: Option<Pubkey>,
}

/// Protocol client over a shared ledger connection.
pub struct PaymentsClient {
    rpc: Arc<dyn LedgerRpc>,
    program_id: Pubkey,
}

impl PaymentsClient {
    pub fn new(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self::with_program_id(rpc, crate::ID)
    }

    pub fn with_program_id(rpc: Arc<dyn LedgerRpc>, program_id: Pubkey) -> Self {
        Self { rpc, program_id }
    }

    pub fn rpc(&self) -> &Arc<dyn LedgerRpc> {
        &self.rpc
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    // ---- Address derivation -------------------------------------------

    pub fn config_address(&self) -> (Pubkey, u8) {
        pda::config_address(&self.program_id)
    }

    pub fn gateway_address(&self, authority: &Pubkey) -> (Pubkey, u8) {
        pda::gateway_address(authority, &self.program_id)
    }

    pub fn user_payment_address(&self, owner: &Pubkey, token_mint: &Pubkey) -> (Pubkey, u8) {
        pda::user_payment_address(owner, token_mint, &self.program_id)
    }

    pub fn payment_policy_address(&self, user_payment: &Pubkey, policy_id: u32) -> (Pubkey, u8) {
        pda::payment_policy_address(user_payment, policy_id, &self.program_id)
    }

    pub fn payments_delegate_address(&self) -> (Pubkey, u8) {
        pda::payments_delegate_address(&self.program_id)
    }

    // ---- Reads ---------------------------------------------------------

    async fn fetch<T: AccountDeserialize>(&self, address: &Pubkey) -> Result<Option<T>, SdkError> {
        match self.rpc.fetch_account(address).await? {
            None => Ok(None),
            Some(data) => T::try_deserialize(&mut data.as_slice())
                .map(Some)
                .map_err(|e| SdkError::InvalidAccountData(format!("{address}: {e}"))),
        }
    }

    async fn list_accounts<T: AccountDeserialize>(
        &self,
        data_size: usize,
        memcmp: Option<(usize, Vec<u8>)>,
    ) -> Result<Vec<(Pubkey, T)>, SdkError> {
        let raw = self
            .rpc
            .list_program_accounts(&self.program_id, data_size as u64, memcmp)
            .await?;
        raw.into_iter()
            .map(|(address, data)| {
                T::try_deserialize(&mut data.as_slice())
                    .map(|record| (address, record))
                    .map_err(|e| SdkError::InvalidAccountData(format!("{address}: {e}")))
            })
            .collect()
    }

    /// Fetches the singleton program configuration.
    pub async fn get_program_config(&self) -> Result<Option<ProgramConfig>, SdkError> {
        let (config, _) = self.config_address();
        self.fetch(&config).await
    }

    pub async fn get_payment_gateway(
        &self,
        address: &Pubkey,
    ) -> Result<Option<PaymentGateway>, SdkError> {
        self.fetch(address).await
    }

    pub async fn get_user_payment(&self, address: &Pubkey) -> Result<Option<UserPayment>, SdkError> {
        self.fetch(address).await
    }

    pub async fn get_payment_policy(
        &self,
        address: &Pubkey,
    ) -> Result<Option<PaymentPolicy>, SdkError> {
        self.fetch(address).await
    }

    pub async fn get_all_payment_gateways(
        &self,
    ) -> Result<Vec<(Pubkey, PaymentGateway)>, SdkError> {
        self.list_accounts(PaymentGateway::SIZE, None).await
    }

    pub async fn get_all_user_payments(&self) -> Result<Vec<(Pubkey, UserPayment)>, SdkError> {
        self.list_accounts(UserPayment::SIZE, None).await
    }

    pub async fn get_user_payments_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<(Pubkey, UserPayment)>, SdkError> {
        self.list_accounts(
            UserPayment::SIZE,
            Some((UserPayment::OWNER_OFFSET, owner.to_bytes().to_vec())),
        )
        .await
    }

    pub async fn get_payment_policies_by_user(
        &self,
        user_payment: &Pubkey,
    ) -> Result<Vec<(Pubkey, PaymentPolicy)>, SdkError> {
        self.list_accounts(
            PaymentPolicy::SIZE,
            Some((
                PaymentPolicy::USER_PAYMENT_OFFSET,
                user_payment.to_bytes().to_vec(),
            )),
        )
        .await
    }

    pub async fn get_payment_policies_by_recipient(
        &self,
        recipient: &Pubkey,
    ) -> Result<Vec<(Pubkey, PaymentPolicy)>, SdkError> {
        self.list_accounts(
            PaymentPolicy::SIZE,
            Some((
                PaymentPolicy::RECIPIENT_OFFSET,
                recipient.to_bytes().to_vec(),
            )),
        )
        .await
    }

    pub async fn get_payment_policies_by_gateway(
        &self,
        gateway: &Pubkey,
    ) -> Result<Vec<(Pubkey, PaymentPolicy)>, SdkError> {
        self.list_accounts(
            PaymentPolicy::SIZE,
            Some((PaymentPolicy::GATEWAY_OFFSET, gateway.to_bytes().to_vec())),
        )
        .await
    }

    // ---- Composition ---------------------------------------------------

    /// Creates the program configuration. Admin only.
    pub fn initialize(&self, admin: &Pubkey) -> Instruction {
        let (config, _) = self.config_address();
        instructions::initialize::build(&self.program_id, admin, &config)
    }

    /// Creates the per-(owner, mint) user payment account.
    pub fn create_user_payment(&self, owner: &Pubkey, token_mint: &Pubkey) -> Instruction {
        let (user_payment, _) = self.user_payment_address(owner, token_mint);
        let (config, _) = self.config_address();
        let token_account = get_associated_token_address(owner, token_mint);
        instructions::create_user_payment::build(
            &self.program_id,
            owner,
            &user_payment,
            &token_account,
            token_mint,
            &config,
        )
    }

    /// Registers a gateway operator. Admin only.
    #[allow(clippy::too_many_arguments)]
    pub fn create_payment_gateway(
        &self,
        admin: &Pubkey,
        authority: &Pubkey,
        fee_recipient: &Pubkey,
        gateway_fee_bps: u16,
        name: &str,
        url: &str,
    ) -> Instruction {
        let (gateway, _) = self.gateway_address(authority);
        let (config, _) = self.config_address();
        instructions::create_payment_gateway::build(
            &self.program_id,
            admin,
            authority,
            &gateway,
            &config,
            fee_recipient,
            gateway_fee_bps,
            encode_fixed_str(name),
            encode_fixed_str(url),
        )
    }

    /// Creates a single payment policy, computing the next policy id from
    /// the parent user payment account (1 when it does not exist yet).
    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment_policy(
        &self,
        user: &Pubkey,
        token_mint: &Pubkey,
        recipient: &Pubkey,
        gateway: &Pubkey,
        policy_type: &PolicyType,
        memo: &str,
    ) -> Result<Instruction, SdkError> {
        let (user_payment_pda, _) = self.user_payment_address(user, token_mint);
        let user_payment: Option<UserPayment> = self.fetch(&user_payment_pda).await?;
        let policy_id = next_policy_id(user_payment.as_ref());
        Ok(self.build_create_policy(
            user,
            token_mint,
            recipient,
            gateway,
            &user_payment_pda,
            policy_id,
            policy_type,
            memo,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_create_policy(
        &self,
        user: &Pubkey,
        token_mint: &Pubkey,
        recipient: &Pubkey,
        gateway: &Pubkey,
        user_payment: &Pubkey,
        policy_id: u32,
        policy_type: &PolicyType,
        memo: &str,
    ) -> Instruction {
        let (config, _) = self.config_address();
        let (payment_policy, _) = self.payment_policy_address(user_payment, policy_id);
        instructions::create_payment_policy::build(
            &self.program_id,
            user,
            user_payment,
            recipient,
            token_mint,
            gateway,
            &config,
            &payment_policy,
            policy_id,
            policy_type,
            encode_memo(memo),
        )
    }

    /// Composes the full ordered sequence for a subscription: token account
    /// creation if absent, user payment creation if absent, the policy
    /// itself, an optional (idempotent) delegation approval, and optionally
    /// the immediate first execution.
    ///
    /// All decisions here are informational reads; failures surface only at
    /// submission time.
    pub async fn create_subscription(
        &self,
        user: &Pubkey,
        params: &SubscriptionParams,
    ) -> Result<Vec<Instruction>, SdkError> {
        let (user_payment_pda, _) = self.user_payment_address(user, &params.token_mint);
        let mut sequence = Vec::new();

        // Created accounts must precede every instruction referencing them.
        let owner_token_account = get_associated_token_address(user, &params.token_mint);
        let token_account_data = self.rpc.fetch_account(&owner_token_account).await?;
        if token_account_data.is_none() {
            sequence.push(create_associated_token_account(
                user,
                user,
                &params.token_mint,
                &spl_token::ID,
            ));
        }

        let user_payment: Option<UserPayment> = self.fetch(&user_payment_pda).await?;
        if user_payment.is_none() {
            sequence.push(self.create_user_payment(user, &params.token_mint));
        }
        let policy_id = next_policy_id(user_payment.as_ref());

        let next_payment_due = params.start_time.unwrap_or_else(unix_now);
        let policy_type = PolicyType::subscription(
            params.amount,
            params.auto_renew,
            params.max_renewals,
            params.payment_frequency,
            next_payment_due,
        );
        let (policy_pda, _) = self.payment_policy_address(&user_payment_pda, policy_id);
        sequence.push(self.build_create_policy(
            user,
            &params.token_mint,
            &params.recipient,
            &params.gateway,
            &user_payment_pda,
            policy_id,
            &policy_type,
            &params.memo,
        ));

        if let Some(approval_amount) = params.approval_amount {
            if self.needs_delegation_approval(token_account_data.as_deref(), approval_amount) {
                let (payments_delegate, _) = self.payments_delegate_address();
                let approve = spl_token::instruction::approve(
                    &spl_token::ID,
                    &owner_token_account,
                    &payments_delegate,
                    user,
                    &[],
                    approval_amount,
                )
                .expect("approve instruction for static token program id");
                sequence.push(approve);
            } else {
                debug!(%owner_token_account, "delegation already in place, skipping approval");
            }
        }

        if params.execute_immediately {
            let fallback = ExecutePaymentParams {
                recipient: Some(params.recipient),
                token_mint: Some(params.token_mint),
                gateway: Some(params.gateway),
                user: Some(*user),
            };
            let mut execution = self.execute_payment(user, &policy_pda, &fallback).await?;
            sequence.append(&mut execution);
        }

        debug!(user = %user, policy_id, instructions = sequence.len(), "composed subscription sequence");
        Ok(sequence)
    }

    /// An approval is only needed when no delegate is set, the delegate is
    /// not the payments delegate, or the delegated amount differs.
    fn needs_delegation_approval(&self, token_account: Option<&[u8]>, approval_amount: u64) -> bool {
        let Some(data) = token_account else {
            return true;
        };
        let Ok(account) = spl_token::state::Account::unpack(data) else {
            return true;
        };
        let (payments_delegate, _) = self.payments_delegate_address();
        match account.delegate {
            spl_token::solana_program::program_option::COption::Some(delegate) => {
                delegate.to_bytes() != payments_delegate.to_bytes()
                    || account.delegated_amount != approval_amount
            }
            spl_token::solana_program::program_option::COption::None => true,
        }
    }

    /// Composes the execution sequence for one due payment.
    ///
    /// Missing parameters are resolved from the policy and its parent user
    /// payment account; policy fields take precedence over the caller's
    /// fallbacks. Destination token accounts for the recipient, the gateway
    /// fee recipient and the protocol fee recipient are created lazily.
    pub async fn execute_payment(
        &self,
        fee_payer: &Pubkey,
        payment_policy: &Pubkey,
        fallback: &ExecutePaymentParams,
    ) -> Result<Vec<Instruction>, SdkError> {
        let policy: Option<PaymentPolicy> = self.fetch(payment_policy).await?;

        let mut recipient = None;
        let mut gateway = None;
        let mut token_mint = None;
        let mut user = None;
        if let Some(policy) = &policy {
            recipient = Some(policy.recipient);
            gateway = Some(policy.gateway);
            if let Some(user_payment) = self.get_user_payment(&policy.user_payment).await? {
                token_mint = Some(user_payment.token_mint);
                user = Some(user_payment.owner);
            }
        }

        let token_mint = token_mint
            .or(fallback.token_mint)
            .ok_or(SdkError::MissingField("token_mint"))?;
        let recipient = recipient
            .or(fallback.recipient)
            .ok_or(SdkError::MissingField("recipient"))?;
        let gateway = gateway
            .or(fallback.gateway)
            .ok_or(SdkError::MissingField("gateway"))?;
        let user = user.or(fallback.user).ok_or(SdkError::MissingField("user"))?;

        let gateway_account = self
            .get_payment_gateway(&gateway)
            .await?
            .ok_or_else(|| SdkError::AccountNotFound(format!("gateway {gateway}")))?;
        let config = self
            .get_program_config()
            .await?
            .ok_or_else(|| SdkError::AccountNotFound("program config".to_string()))?;

        let mut sequence = Vec::new();
        let recipient_token_account = self
            .ensure_token_account(&mut sequence, fee_payer, &recipient, &token_mint)
            .await?;
        let gateway_fee_account = self
            .ensure_token_account(
                &mut sequence,
                fee_payer,
                &gateway_account.fee_recipient,
                &token_mint,
            )
            .await?;
        let protocol_fee_account = self
            .ensure_token_account(&mut sequence, fee_payer, &config.fee_recipient, &token_mint)
            .await?;

        let (user_payment_pda, _) = self.user_payment_address(&user, &token_mint);
        let (config_pda, _) = self.config_address();
        let (payments_delegate, _) = self.payments_delegate_address();
        sequence.push(instructions::execute_payment::build(
            &self.program_id,
            &ExecutePaymentAccounts {
                fee_payer: *fee_payer,
                payments_delegate,
                payment_policy: *payment_policy,
                user_payment: user_payment_pda,
                gateway,
                config: config_pda,
                user_token_account: get_associated_token_address(&user, &token_mint),
                recipient_token_account,
                gateway_fee_account,
                protocol_fee_account,
            },
        ));
        Ok(sequence)
    }

    /// Derives the associated token account and prepends a creation
    /// instruction when it does not exist yet.
    async fn ensure_token_account(
        &self,
        sequence: &mut Vec<Instruction>,
        fee_payer: &Pubkey,
        owner: &Pubkey,
        token_mint: &Pubkey,
    ) -> Result<Pubkey, SdkError> {
        let token_account = get_associated_token_address(owner, token_mint);
        if self.rpc.fetch_account(&token_account).await?.is_none() {
            sequence.push(create_associated_token_account(
                fee_payer,
                owner,
                token_mint,
                &spl_token::ID,
            ));
        }
        Ok(token_account)
    }

    /// Pauses or resumes a policy owned by `owner`.
    pub fn change_payment_policy_status(
        &self,
        owner: &Pubkey,
        token_mint: &Pubkey,
        policy_id: u32,
        new_status: PaymentStatus,
    ) -> Instruction {
        let (user_payment, _) = self.user_payment_address(owner, token_mint);
        let (payment_policy, _) = self.payment_policy_address(&user_payment, policy_id);
        instructions::change_payment_policy_status::build(
            &self.program_id,
            owner,
            &user_payment,
            token_mint,
            &payment_policy,
            policy_id,
            new_status,
        )
    }

    /// Deletes a policy owned by `owner`.
    pub fn delete_payment_policy(
        &self,
        owner: &Pubkey,
        token_mint: &Pubkey,
        policy_id: u32,
    ) -> Instruction {
        let (user_payment, _) = self.user_payment_address(owner, token_mint);
        let (payment_policy, _) = self.payment_policy_address(&user_payment, policy_id);
        instructions::delete_payment_policy::build(
            &self.program_id,
            owner,
            &user_payment,
            token_mint,
            &payment_policy,
            policy_id,
        )
    }

    /// Unregisters a gateway. Admin only.
    pub fn delete_payment_gateway(&self, admin: &Pubkey, authority: &Pubkey) -> Instruction {
        let (gateway, _) = self.gateway_address(authority);
        let (config, _) = self.config_address();
        instructions::delete_payment_gateway::build(
            &self.program_id,
            admin,
            authority,
            &gateway,
            &config,
        )
    }

    /// Rotates a gateway's executor key.
    pub fn change_gateway_signer(&self, authority: &Pubkey, new_signer: &Pubkey) -> Instruction {
        let (gateway, _) = self.gateway_address(authority);
        instructions::change_gateway_signer::build(&self.program_id, authority, &gateway, new_signer)
    }

    /// Points a gateway's fees at a new recipient.
    pub fn change_gateway_fee_recipient(
        &self,
        authority: &Pubkey,
        new_fee_recipient: &Pubkey,
    ) -> Instruction {
        let (gateway, _) = self.gateway_address(authority);
        instructions::change_gateway_fee_recipient::build(
            &self.program_id,
            authority,
            &gateway,
            new_fee_recipient,
        )
    }
}

fn next_policy_id(user_payment: Option<&UserPayment>) -> u32 {
    user_payment.map_or(1, |record| record.active_policies_count + 1)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PaymentFrequency;
    use crate::testutil::MockLedger;

    fn client_over(ledger: &Arc<MockLedger>) -> PaymentsClient {
        PaymentsClient::new(Arc::clone(ledger) as Arc<dyn LedgerRpc>)
    }

    fn subscription_params(token_mint: Pubkey) -> SubscriptionParams {
        SubscriptionParams {
            token_mint,
            recipient: Pubkey::new_unique(),
            gateway: Pubkey::new_unique(),
            amount: 10_000,
            auto_renew: true,
            max_renewals: None,
            payment_frequency: PaymentFrequency::Monthly,
            memo: "premium".to_string(),
            start_time: Some(1_700_000_000),
            approval_amount: Some(120_000),
            execute_immediately: false,
        }
    }

    fn user_payment_record(owner: Pubkey, token_mint: Pubkey, count: u32) -> UserPayment {
        UserPayment {
            owner,
            token_account: get_associated_token_address(&owner, &token_mint),
            token_mint,
            active_policies_count: count,
            created_at: 1,
            updated_at: 1,
            is_active: true,
            bump: 255,
            padding: [0u8; 256],
        }
    }

    fn policy_id_of(ix: &Instruction) -> u32 {
        u32::from_le_bytes(ix.data[8..12].try_into().unwrap())
    }

    #[tokio::test]
    async fn fresh_user_gets_full_setup_sequence() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let user = Pubkey::new_unique();
        let params = subscription_params(Pubkey::new_unique());

        let sequence = client.create_subscription(&user, &params).await.unwrap();

        // Token account, user payment, policy, delegation approval.
        assert_eq!(sequence.len(), 4);
        assert_eq!(sequence[0].program_id, spl_associated_token_account::ID);
        assert_eq!(
            sequence[1].data[..8],
            instructions::create_user_payment::DISCRIMINATOR
        );
        assert_eq!(
            sequence[2].data[..8],
            instructions::create_payment_policy::DISCRIMINATOR
        );
        assert_eq!(policy_id_of(&sequence[2]), 1);
        assert_eq!(sequence[3].program_id, spl_token::ID);
        // Approve instruction tag, delegating to the payments PDA.
        assert_eq!(sequence[3].data[0], 4);
        let (payments_delegate, _) = client.payments_delegate_address();
        assert_eq!(sequence[3].accounts[1].pubkey, payments_delegate);
    }

    #[tokio::test]
    async fn policy_id_continues_the_sequence() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let user = Pubkey::new_unique();
        let params = subscription_params(Pubkey::new_unique());

        let (user_payment_pda, _) = client.user_payment_address(&user, &params.token_mint);
        ledger.insert_record(
            user_payment_pda,
            &user_payment_record(user, params.token_mint, 2),
            UserPayment::SIZE,
        );
        ledger.insert_token_account(
            get_associated_token_address(&user, &params.token_mint),
            user,
            params.token_mint,
            1_000_000,
            None,
        );

        let sequence = client.create_subscription(&user, &params).await.unwrap();

        // Existing accounts are not recreated; the approve follows the policy.
        assert_eq!(sequence.len(), 2);
        assert_eq!(
            sequence[0].data[..8],
            instructions::create_payment_policy::DISCRIMINATOR
        );
        assert_eq!(policy_id_of(&sequence[0]), 3);
        assert_eq!(sequence[1].program_id, spl_token::ID);
    }

    #[tokio::test]
    async fn matching_delegation_skips_the_approval() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let user = Pubkey::new_unique();
        let params = subscription_params(Pubkey::new_unique());

        let (user_payment_pda, _) = client.user_payment_address(&user, &params.token_mint);
        ledger.insert_record(
            user_payment_pda,
            &user_payment_record(user, params.token_mint, 0),
            UserPayment::SIZE,
        );
        let (payments_delegate, _) = client.payments_delegate_address();
        ledger.insert_token_account(
            get_associated_token_address(&user, &params.token_mint),
            user,
            params.token_mint,
            1_000_000,
            Some((payments_delegate, params.approval_amount.unwrap())),
        );

        let sequence = client.create_subscription(&user, &params).await.unwrap();
        assert_eq!(sequence.len(), 1);
        assert_eq!(
            sequence[0].data[..8],
            instructions::create_payment_policy::DISCRIMINATOR
        );
    }

    #[tokio::test]
    async fn changed_approval_amount_reapproves() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let user = Pubkey::new_unique();
        let params = subscription_params(Pubkey::new_unique());

        let (user_payment_pda, _) = client.user_payment_address(&user, &params.token_mint);
        ledger.insert_record(
            user_payment_pda,
            &user_payment_record(user, params.token_mint, 0),
            UserPayment::SIZE,
        );
        let (payments_delegate, _) = client.payments_delegate_address();
        ledger.insert_token_account(
            get_associated_token_address(&user, &params.token_mint),
            user,
            params.token_mint,
            1_000_000,
            Some((payments_delegate, 1)),
        );

        let sequence = client.create_subscription(&user, &params).await.unwrap();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[1].program_id, spl_token::ID);
    }

    fn seed_execution_fixture(
        ledger: &Arc<MockLedger>,
        client: &PaymentsClient,
        user: Pubkey,
        token_mint: Pubkey,
        gateway: Pubkey,
    ) -> Pubkey {
        let (user_payment_pda, _) = client.user_payment_address(&user, &token_mint);
        ledger.insert_record(
            user_payment_pda,
            &user_payment_record(user, token_mint, 1),
            UserPayment::SIZE,
        );
        ledger.insert_record(
            gateway,
            &PaymentGateway {
                authority: Pubkey::new_unique(),
                fee_recipient: Pubkey::new_unique(),
                gateway_fee_bps: 100,
                is_active: true,
                total_processed: 0,
                created_at: 1,
                bump: 255,
                name: [0u8; 32],
                url: [0u8; 64],
                signer: Pubkey::new_unique(),
                padding: [0u8; 128],
            },
            PaymentGateway::SIZE,
        );
        let (config_pda, bump) = client.config_address();
        ledger.insert_record(
            config_pda,
            &ProgramConfig {
                admin: Pubkey::new_unique(),
                fee_recipient: Pubkey::new_unique(),
                protocol_fee_bps: 50,
                max_policies_per_user: 100,
                emergency_pause: false,
                bump,
                padding: [0u8; 256],
            },
            ProgramConfig::SIZE,
        );
        let (policy_pda, _) = client.payment_policy_address(&user_payment_pda, 1);
        ledger.insert_record(
            policy_pda,
            &PaymentPolicy {
                user_payment: user_payment_pda,
                recipient: Pubkey::new_unique(),
                gateway,
                policy_type: PolicyType::subscription(
                    10_000,
                    true,
                    None,
                    PaymentFrequency::Monthly,
                    1_700_000_000,
                ),
                status: PaymentStatus::Active,
                memo: [0u8; 64],
                total_paid: 0,
                payment_count: 0,
                created_at: 1,
                updated_at: 1,
                policy_id: 1,
                bump: 255,
                padding: [0u8; 256],
            },
            PaymentPolicy::SIZE,
        );
        policy_pda
    }

    #[tokio::test]
    async fn execution_resolves_everything_from_the_policy() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let user = Pubkey::new_unique();
        let fee_payer = Pubkey::new_unique();
        let token_mint = Pubkey::new_unique();
        let gateway = Pubkey::new_unique();
        let policy_pda =
            seed_execution_fixture(&ledger, &client, user, token_mint, gateway);

        // No fallbacks: every parameter comes from chain state.
        let sequence = client
            .execute_payment(&fee_payer, &policy_pda, &ExecutePaymentParams::default())
            .await
            .unwrap();

        // Recipient, gateway fee and protocol fee token accounts are all
        // missing, so three creations precede the execution.
        assert_eq!(sequence.len(), 4);
        for creation in &sequence[..3] {
            assert_eq!(creation.program_id, spl_associated_token_account::ID);
        }
        let execute = &sequence[3];
        assert_eq!(
            execute.data[..8],
            instructions::execute_payment::DISCRIMINATOR
        );
        assert_eq!(execute.accounts[0].pubkey, fee_payer);
        assert!(execute.accounts[0].is_signer);
        assert_eq!(execute.accounts[2].pubkey, policy_pda);
        assert_eq!(execute.accounts[4].pubkey, gateway);
    }

    #[tokio::test]
    async fn execution_requires_resolvable_parameters() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let policy_pda = Pubkey::new_unique();

        let fallback = ExecutePaymentParams {
            recipient: Some(Pubkey::new_unique()),
            token_mint: Some(Pubkey::new_unique()),
            gateway: None,
            user: Some(Pubkey::new_unique()),
        };
        let err = client
            .execute_payment(&Pubkey::new_unique(), &policy_pda, &fallback)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::MissingField("gateway")));
    }

    #[tokio::test]
    async fn execution_fails_without_gateway_account() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let policy_pda = Pubkey::new_unique();

        let fallback = ExecutePaymentParams {
            recipient: Some(Pubkey::new_unique()),
            token_mint: Some(Pubkey::new_unique()),
            gateway: Some(Pubkey::new_unique()),
            user: Some(Pubkey::new_unique()),
        };
        let err = client
            .execute_payment(&Pubkey::new_unique(), &policy_pda, &fallback)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn owner_listing_filters_by_owner_bytes() {
        let ledger = Arc::new(MockLedger::default());
        let client = client_over(&ledger);
        let owner = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (mine, _) = client.user_payment_address(&owner, &mint);
        ledger.insert_record(
            mine,
            &user_payment_record(owner, mint, 1),
            UserPayment::SIZE,
        );
        let (theirs, _) = client.user_payment_address(&other, &mint);
        ledger.insert_record(
            theirs,
            &user_payment_record(other, mint, 1),
            UserPayment::SIZE,
        );

        let listed = client.get_user_payments_by_owner(&owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, mine);
        assert_eq!(listed[0].1.owner, owner);
    }
}
