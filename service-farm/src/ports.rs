// =====================================================================================
// File: service-farm/src/ports.rs
// Description: Consumed interfaces (C8): repository, event store, chain reads, signer,
//              wallet verification. These are trait boundaries only; production
//              implementations (a real document store, a real chain RPC client, a real
//              signer) live outside this workspace's scope (spec section 1 Non-goals).
// =====================================================================================

use async_trait::async_trait;
use core_farm_engine::{Action, FarmState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PortError {
    #[error("farm does not exist")]
    FarmNotFound,
    #[error("compare-and-swap on session failed")]
    SessionConflict,
    #[error("external dependency unavailable: {0}")]
    Unavailable(String),
}

/// A farm document as persisted by the repository: same shape as
/// `FarmState` but versioned by a session token (spec section 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmDocument {
    pub id: u64,
    pub address: String,
    pub session: String,
    pub state: FarmState,
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_farm_by_id(&self, id: u64) -> Result<Option<FarmDocument>, PortError>;

    /// Persist `doc` iff the stored session still equals `old_session`.
    /// `doc.session` is the new session to install atomically with the
    /// update. Returns `SessionConflict` on CAS loss.
    async fn update_game_state(&self, doc: &FarmDocument, old_session: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append(&self, farm_id: u64, session: &str, actions: &[Action]) -> Result<(), PortError>;
}

#[async_trait]
pub trait Chain: Send + Sync {
    async fn load_balance(&self, address: &str) -> Result<String, PortError>;
    async fn load_inventory(&self, address: &str) -> Result<Vec<String>, PortError>;
    async fn owner_of(&self, farm_id: u64) -> Result<String, PortError>;
}

#[async_trait]
pub trait Signer: Send + Sync {
    async fn withdraw_signature(
        &self,
        payload: &core_farm_engine::WithdrawalPayload,
    ) -> Result<SignatureBundle, PortError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureBundle {
    pub signature: String,
    pub deadline: i64,
}

#[async_trait]
pub trait Wallet: Send + Sync {
    async fn verify(&self, address: &str, signature: &str, message: &str) -> Result<bool, PortError>;
}

/// The whitelist of addresses eligible for sync (spec section 1: an external
/// collaborator; the core only reads it through this trait). Only consulted
/// when `Network::Mainnet` is active (spec section 6).
#[async_trait]
pub trait Whitelist: Send + Sync {
    async fn is_allowed(&self, address: &str) -> Result<bool, PortError>;
}

pub mod inmemory {
    //! Deterministic in-memory implementations of the C8 ports, used by
    //! tests and the bundled demo server. Never a substitute for the real
    //! repository/chain/signer infrastructure (spec section 1 Non-goals).

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryRepository {
        farms: Mutex<HashMap<u64, FarmDocument>>,
    }

    impl InMemoryRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, doc: FarmDocument) {
            self.farms.lock().unwrap().insert(doc.id, doc);
        }
    }

    #[async_trait]
    impl Repository for InMemoryRepository {
        async fn get_farm_by_id(&self, id: u64) -> Result<Option<FarmDocument>, PortError> {
            Ok(self.farms.lock().unwrap().get(&id).cloned())
        }

        async fn update_game_state(&self, doc: &FarmDocument, old_session: &str) -> Result<(), PortError> {
            let mut farms = self.farms.lock().unwrap();
            match farms.get(&doc.id) {
                Some(existing) if existing.session == old_session => {
                    farms.insert(doc.id, doc.clone());
                    Ok(())
                }
                Some(_) => Err(PortError::SessionConflict),
                None => Err(PortError::FarmNotFound),
            }
        }
    }

    #[derive(Default)]
    pub struct InMemoryEventStore {
        events: Mutex<Vec<(u64, String, Action)>>,
    }

    impl InMemoryEventStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.events.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl EventStore for InMemoryEventStore {
        async fn append(&self, farm_id: u64, session: &str, actions: &[Action]) -> Result<(), PortError> {
            let mut events = self.events.lock().unwrap();
            for action in actions {
                events.push((farm_id, session.to_string(), action.clone()));
            }
            Ok(())
        }
    }

    /// A chain facade that always reports zero balance/inventory and a
    /// fixed owner, unless seeded otherwise. Useful for tests that don't
    /// care about reconcile dominance.
    pub struct InMemoryChain {
        pub balance_wei: Mutex<String>,
        pub inventory_wei: Mutex<Vec<String>>,
        pub owners: Mutex<HashMap<u64, String>>,
    }

    impl Default for InMemoryChain {
        fn default() -> Self {
            Self {
                balance_wei: Mutex::new("0".to_string()),
                inventory_wei: Mutex::new(Vec::new()),
                owners: Mutex::new(HashMap::new()),
            }
        }
    }

    impl InMemoryChain {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_owner(&self, farm_id: u64, address: &str) {
            self.owners.lock().unwrap().insert(farm_id, address.to_string());
        }

        pub fn set_balance_wei(&self, wei: &str) {
            *self.balance_wei.lock().unwrap() = wei.to_string();
        }

        pub fn set_inventory_wei(&self, wei: Vec<String>) {
            *self.inventory_wei.lock().unwrap() = wei;
        }
    }

    #[async_trait]
    impl Chain for InMemoryChain {
        async fn load_balance(&self, _address: &str) -> Result<String, PortError> {
            Ok(self.balance_wei.lock().unwrap().clone())
        }

        async fn load_inventory(&self, _address: &str) -> Result<Vec<String>, PortError> {
            Ok(self.inventory_wei.lock().unwrap().clone())
        }

        async fn owner_of(&self, farm_id: u64) -> Result<String, PortError> {
            self.owners
                .lock()
                .unwrap()
                .get(&farm_id)
                .cloned()
                .ok_or(PortError::FarmNotFound)
        }
    }

    #[derive(Default)]
    pub struct InMemorySigner;

    impl InMemorySigner {
        pub fn new() -> Self {
            Self
        }
    }

    #[async_trait]
    impl Signer for InMemorySigner {
        async fn withdraw_signature(
            &self,
            payload: &core_farm_engine::WithdrawalPayload,
        ) -> Result<SignatureBundle, PortError> {
            Ok(SignatureBundle {
                signature: format!("test-signature-{}-{}", payload.farm_id, payload.session_id),
                deadline: 0,
            })
        }
    }

    #[derive(Default)]
    pub struct InMemoryWallet;

    impl InMemoryWallet {
        pub fn new() -> Self {
            Self
        }
    }

    #[async_trait]
    impl Wallet for InMemoryWallet {
        async fn verify(&self, _address: &str, _signature: &str, _message: &str) -> Result<bool, PortError> {
            Ok(true)
        }
    }

    /// Allows every address by default; seed `denied` to simulate a real
    /// whitelist rejecting a sender.
    #[derive(Default)]
    pub struct InMemoryWhitelist {
        denied: Mutex<std::collections::HashSet<String>>,
    }

    impl InMemoryWhitelist {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn deny(&self, address: &str) {
            self.denied.lock().unwrap().insert(address.to_string());
        }
    }

    #[async_trait]
    impl Whitelist for InMemoryWhitelist {
        async fn is_allowed(&self, address: &str) -> Result<bool, PortError> {
            Ok(!self.denied.lock().unwrap().contains(address))
        }
    }
}
