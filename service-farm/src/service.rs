// =====================================================================================
// File: service-farm/src/service.rs
// Description: Orchestrates load -> reconcile -> temporal-check -> replay -> persist ->
//              audit for /save, and tax -> sign for /withdraw (C6, C7 I/O halves)
// =====================================================================================

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_farm_engine::{prepare_withdrawal, reconcile, replay_batch, Action, WithdrawalPayload};
use hex::encode as hex_encode;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{Network, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::{Chain, EventStore, Repository, Signer, Wallet, Whitelist};
use crate::ports::{FarmDocument, SignatureBundle};

fn new_session() -> String {
    hex_encode(Uuid::new_v4().as_bytes())
}

#[async_trait]
pub trait SaveService: Send + Sync {
    async fn save(
        &self,
        farm_id: u64,
        sender: &str,
        signature: &str,
        actions: Vec<Action>,
    ) -> ServiceResult<core_farm_engine::FarmState>;

    async fn withdraw(
        &self,
        farm_id: u64,
        session_id: &str,
        sender: &str,
        signature: &str,
        sfl: Decimal,
        ids: Vec<u32>,
        amounts: Vec<String>,
    ) -> ServiceResult<WithdrawOutcome>;
}

/// Bundles the signer's verbatim response with the tax basis points the
/// core computed, so the handler can report both without recomputing.
pub struct WithdrawOutcome {
    pub bundle: SignatureBundle,
    pub tax_bps: u32,
}

pub struct SaveServiceImpl {
    repository: Arc<dyn Repository>,
    event_store: Arc<dyn EventStore>,
    chain: Arc<dyn Chain>,
    signer: Arc<dyn Signer>,
    wallet: Arc<dyn Wallet>,
    whitelist: Arc<dyn Whitelist>,
    network: Network,
    max_batch_actions: usize,
}

impl SaveServiceImpl {
    pub fn new(
        repository: Arc<dyn Repository>,
        event_store: Arc<dyn EventStore>,
        chain: Arc<dyn Chain>,
        signer: Arc<dyn Signer>,
        wallet: Arc<dyn Wallet>,
        whitelist: Arc<dyn Whitelist>,
        network: Network,
        max_batch_actions: usize,
    ) -> Self {
        Self {
            repository,
            event_store,
            chain,
            signer,
            wallet,
            whitelist,
            network,
            max_batch_actions,
        }
    }

    pub fn from_config(
        repository: Arc<dyn Repository>,
        event_store: Arc<dyn EventStore>,
        chain: Arc<dyn Chain>,
        signer: Arc<dyn Signer>,
        wallet: Arc<dyn Wallet>,
        whitelist: Arc<dyn Whitelist>,
        config: &ServiceConfig,
    ) -> Self {
        Self::new(
            repository,
            event_store,
            chain,
            signer,
            wallet,
            whitelist,
            config.network,
            config.max_batch_actions,
        )
    }
}

#[async_trait]
impl SaveService for SaveServiceImpl {
    async fn save(
        &self,
        farm_id: u64,
        sender: &str,
        signature: &str,
        actions: Vec<Action>,
    ) -> ServiceResult<core_farm_engine::FarmState> {
        if actions.len() > self.max_batch_actions {
            return Err(ServiceError::BatchTooLarge(actions.len(), self.max_batch_actions));
        }

        // step 1: load + ownership check
        let doc = self
            .repository
            .get_farm_by_id(farm_id)
            .await?
            .ok_or(ServiceError::FarmNotFound)?;

        let owner = self.chain.owner_of(farm_id).await?;
        if owner != sender || doc.address != sender {
            return Err(ServiceError::NotOwner);
        }

        let verified = self
            .wallet
            .verify(sender, signature, &format!("save:{farm_id}"))
            .await?;
        if !verified {
            return Err(ServiceError::BadSignature);
        }

        if self.network == Network::Mainnet && !self.whitelist.is_allowed(sender).await? {
            return Err(ServiceError::NotWhitelisted);
        }

        // step 2: reconcile on-chain truth
        let mut working = doc.state.clone();
        let onchain_balance = self.chain.load_balance(sender).await?;
        let onchain_inventory = self.chain.load_inventory(sender).await?;
        reconcile(&mut working, &onchain_balance, &onchain_inventory)?;

        // steps 3-4: temporal gate + replay, all-or-nothing
        let now = Utc::now();
        let replayed = replay_batch(working, &actions, now)?;

        // step 5: persist with CAS on session
        let new_session = new_session();
        let new_doc = FarmDocument {
            id: doc.id,
            address: doc.address.clone(),
            session: new_session.clone(),
            state: replayed.clone(),
        };
        self.repository.update_game_state(&new_doc, &doc.session).await?;

        // step 6: audit
        self.event_store.append(farm_id, &new_session, &actions).await?;

        info!(farm_id, actions = actions.len(), "save committed");
        Ok(replayed)
    }

    async fn withdraw(
        &self,
        farm_id: u64,
        session_id: &str,
        sender: &str,
        signature: &str,
        sfl: Decimal,
        ids: Vec<u32>,
        amounts: Vec<String>,
    ) -> ServiceResult<WithdrawOutcome> {
        let verified = self
            .wallet
            .verify(sender, signature, &format!("withdraw:{farm_id}"))
            .await?;
        if !verified {
            return Err(ServiceError::BadSignature);
        }

        let payload: WithdrawalPayload = prepare_withdrawal(sender, farm_id, session_id, sfl, &ids, &amounts)?;
        let bundle = self.signer.withdraw_signature(&payload).await?;
        warn!(farm_id, tax_bps = payload.tax_bps, "withdrawal signed");
        Ok(WithdrawOutcome {
            bundle,
            tax_bps: payload.tax_bps,
        })
    }
}
