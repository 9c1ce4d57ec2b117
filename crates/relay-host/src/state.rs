//! Accounts and journaled substates
//!
//! [`WorldState`] is the single mutable resource of the host. Every frame
//! opens a substate on entry and closes it with [`MergeStrategy::Commit`] on
//! success or [`MergeStrategy::Discard`] on failure, so a failed frame leaves
//! no storage, balance or event behind.

use crate::error::HostError;
use crate::logging::EventLog;
use crate::unit::Unit;
use relay_abi::{Address, SlotKey, StorageValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One account: optional code, private storage and a balance
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub code: Option<Arc<dyn Unit>>,
    pub storage: BTreeMap<SlotKey, StorageValue>,
    pub balance: u128,
    pub nonce: u64,
}

impl Account {
    /// Whether this account holds executable code
    #[must_use]
    pub fn has_code(&self) -> bool {
        self.code.is_some()
    }
}

/// How a closing substate merges into its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    Commit,
    Discard,
}

/// Checkpointing over the host state
pub trait TransactionalState {
    fn push_substate(&mut self);
    fn pop_substate(&mut self, strategy: MergeStrategy);
}

/// Undo record of one open substate
///
/// `touched` holds each account as it was before its first write inside the
/// substate (`None` if it did not exist). The log is append-only, so its
/// length is enough to roll it back.
#[derive(Debug, Default)]
struct Checkpoint {
    touched: BTreeMap<Address, Option<Account>>,
    log_len: usize,
}

/// All accounts plus the event log
#[derive(Debug, Default)]
pub struct WorldState {
    accounts: BTreeMap<Address, Account>,
    log: EventLog,
    checkpoints: Vec<Checkpoint>,
}

impl WorldState {
    #[must_use]
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub(crate) fn account_mut(&mut self, address: Address) -> &mut Account {
        if let Some(checkpoint) = self.checkpoints.last_mut() {
            if !checkpoint.touched.contains_key(&address) {
                checkpoint
                    .touched
                    .insert(address, self.accounts.get(&address).cloned());
            }
        }
        self.accounts.entry(address).or_default()
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    #[must_use]
    pub fn code(&self, address: &Address) -> Option<Arc<dyn Unit>> {
        self.accounts.get(address).and_then(|a| a.code.clone())
    }

    #[must_use]
    pub fn has_code(&self, address: &Address) -> bool {
        self.accounts.get(address).is_some_and(Account::has_code)
    }

    #[must_use]
    pub fn balance(&self, address: &Address) -> u128 {
        self.accounts.get(address).map_or(0, |a| a.balance)
    }

    #[must_use]
    pub fn load(&self, address: &Address, key: &SlotKey) -> Option<&StorageValue> {
        self.accounts.get(address).and_then(|a| a.storage.get(key))
    }

    pub(crate) fn store(&mut self, address: Address, key: SlotKey, value: StorageValue) {
        self.account_mut(address).storage.insert(key, value);
    }

    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
    ) -> Result<(), HostError> {
        if value == 0 {
            return Ok(());
        }
        let available = self.balance(&from);
        if available < value {
            return Err(HostError::InsufficientBalance {
                available,
                required: value,
            });
        }
        self.account_mut(from).balance = available - value;
        let receiver = self.account_mut(to);
        receiver.balance = receiver.balance.saturating_add(value);
        Ok(())
    }

    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub(crate) fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Number of open substates
    #[must_use]
    pub fn depth(&self) -> usize {
        self.checkpoints.len()
    }
}

impl TransactionalState for WorldState {
    fn push_substate(&mut self) {
        self.checkpoints.push(Checkpoint {
            touched: BTreeMap::new(),
            log_len: self.log.len(),
        });
    }

    fn pop_substate(&mut self, strategy: MergeStrategy) {
        let Some(checkpoint) = self.checkpoints.pop() else {
            return;
        };
        match strategy {
            MergeStrategy::Commit => {
                // The parent keeps its own, older snapshot of an account.
                if let Some(parent) = self.checkpoints.last_mut() {
                    for (address, before) in checkpoint.touched {
                        parent.touched.entry(address).or_insert(before);
                    }
                }
            }
            MergeStrategy::Discard => {
                for (address, before) in checkpoint.touched {
                    match before {
                        Some(account) => {
                            self.accounts.insert(address, account);
                        }
                        None => {
                            self.accounts.remove(&address);
                        }
                    }
                }
                self.log.truncate(checkpoint.log_len);
            }
        }
        tracing::debug!(?strategy, open = self.checkpoints.len(), "substate closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discard_restores_storage_and_events() {
        let mut state = WorldState::default();
        let addr = Address::from_label("acct");
        state.store(addr, SlotKey::field(0), StorageValue::Uint(1));

        state.push_substate();
        state.store(addr, SlotKey::field(0), StorageValue::Uint(2));
        state.log_mut().append(addr, "Changed", json!(null));
        state.pop_substate(MergeStrategy::Discard);

        assert_eq!(state.load(&addr, &SlotKey::field(0)), Some(&StorageValue::Uint(1)));
        assert!(state.log().is_empty());
    }

    #[test]
    fn nested_commit_then_outer_discard() {
        let mut state = WorldState::default();
        let addr = Address::from_label("acct");

        state.push_substate();
        state.push_substate();
        state.store(addr, SlotKey::field(0), StorageValue::Bool(true));
        state.pop_substate(MergeStrategy::Commit);
        assert_eq!(state.depth(), 1);
        assert!(state.load(&addr, &SlotKey::field(0)).is_some());
        state.pop_substate(MergeStrategy::Discard);

        assert!(state.load(&addr, &SlotKey::field(0)).is_none());
    }

    #[test]
    fn outer_discard_restores_value_from_before_committed_child() {
        let mut state = WorldState::default();
        let addr = Address::from_label("acct");
        state.store(addr, SlotKey::field(0), StorageValue::Uint(1));
        state.log_mut().append(addr, "Kept", json!(null));

        state.push_substate();
        state.store(addr, SlotKey::field(0), StorageValue::Uint(2));
        state.push_substate();
        state.store(addr, SlotKey::field(0), StorageValue::Uint(3));
        state.log_mut().append(addr, "Inner", json!(null));
        state.pop_substate(MergeStrategy::Commit);
        state.pop_substate(MergeStrategy::Discard);

        assert_eq!(state.load(&addr, &SlotKey::field(0)), Some(&StorageValue::Uint(1)));
        assert_eq!(state.log().len(), 1);
        assert!(state.log().verify_integrity().is_ok());
    }

    #[test]
    fn discard_removes_accounts_created_inside() {
        let mut state = WorldState::default();
        let outside = Address::from_label("outside");
        let inside = Address::from_label("inside");
        state.account_mut(outside).balance = 5;

        state.push_substate();
        state.account_mut(inside).nonce = 1;
        state.transfer(outside, inside, 5).unwrap();
        state.pop_substate(MergeStrategy::Discard);

        assert!(state.account(&inside).is_none());
        assert_eq!(state.balance(&outside), 5);
    }

    #[test]
    fn untouched_accounts_are_not_snapshotted() {
        let mut state = WorldState::default();
        let a = Address::from_label("a");
        let b = Address::from_label("b");
        state.store(a, SlotKey::field(0), StorageValue::Bool(true));
        state.store(b, SlotKey::field(0), StorageValue::Bool(true));

        state.push_substate();
        state.store(a, SlotKey::field(1), StorageValue::Bool(false));
        assert_eq!(state.checkpoints[0].touched.len(), 1);
        assert_eq!(state.checkpoints[0].log_len, 0);
        state.pop_substate(MergeStrategy::Commit);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut state = WorldState::default();
        let a = Address::from_label("a");
        let b = Address::from_label("b");
        state.account_mut(a).balance = 10;

        state.transfer(a, b, 4).unwrap();
        assert_eq!(state.balance(&a), 6);
        assert_eq!(state.balance(&b), 4);

        let err = state.transfer(a, b, 7).unwrap_err();
        assert_eq!(
            err,
            HostError::InsufficientBalance { available: 6, required: 7 }
        );
    }
}
