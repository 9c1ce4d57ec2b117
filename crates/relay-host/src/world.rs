use crate::config::HostConfig;
use crate::context::{construct_frame, execute_frame, CallKind, Frame};
use crate::logging::EventLog;
use crate::state::{Account, WorldState};
use crate::unit::Unit;
use relay_abi::{Address, Revert, SlotKey, StorageValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The execution host
///
/// Owns every account and runs top-level transactions. Each transaction and
/// each deployment is all-or-nothing.
#[derive(Debug, Default)]
pub struct World {
    config: HostConfig,
    state: WorldState,
}

impl World {
    /// Create a host with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    /// Create a host with custom configuration
    #[must_use]
    pub fn with_config(config: HostConfig) -> Self {
        Self {
            config,
            state: WorldState::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Register an externally-owned account named `label`
    ///
    /// The account receives the configured genesis balance once.
    pub fn create_account(&mut self, label: &str) -> Address {
        let address = Address::from_label(label);
        if self.state.account(&address).is_none() {
            self.state.account_mut(address).balance = u128::from(self.config.genesis_balance);
            tracing::debug!(%address, label, "account created");
        }
        address
    }

    /// Credit `amount` to `address` out of thin air
    pub fn fund(&mut self, address: Address, amount: u128) {
        let account = self.state.account_mut(address);
        account.balance = account.balance.saturating_add(amount);
    }

    /// Deploy `code` from `deployer`, running its constructor with `args`
    ///
    /// The deployer's nonce advances even when the constructor fails.
    ///
    /// # Errors
    /// Returns the constructor's failure payload; nothing is deployed.
    pub fn deploy(
        &mut self,
        deployer: Address,
        code: Arc<dyn Unit>,
        args: &[u8],
    ) -> Result<Address, Revert> {
        let deployer_account = self.state.account_mut(deployer);
        let nonce = deployer_account.nonce;
        deployer_account.nonce += 1;

        let address = Address::derive(&deployer, nonce);
        let frame = Frame {
            address,
            code_address: address,
            caller: deployer,
            value: 0,
            depth: 0,
            kind: CallKind::Create,
        };
        let name = code.name().to_string();
        construct_frame(&mut self.state, &self.config, frame, code, args)?;
        tracing::info!(%address, unit = %name, %deployer, "deployed");
        Ok(address)
    }

    /// Run one top-level call
    ///
    /// # Errors
    /// Returns the failure payload; every write made during the call is
    /// discarded.
    pub fn transact(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        input: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        let frame = Frame {
            address: to,
            code_address: to,
            caller: from,
            value,
            depth: 0,
            kind: CallKind::Call,
        };
        execute_frame(&mut self.state, &self.config, frame, input)
    }

    #[must_use]
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.state.account(address)
    }

    #[must_use]
    pub fn has_code(&self, address: &Address) -> bool {
        self.state.has_code(address)
    }

    /// Name of the unit deployed at `address`, if any
    #[must_use]
    pub fn code_name(&self, address: &Address) -> Option<String> {
        self.state.code(address).map(|c| c.name().to_string())
    }

    #[must_use]
    pub fn balance(&self, address: &Address) -> u128 {
        self.state.balance(address)
    }

    /// Raw storage read, bypassing any code
    #[must_use]
    pub fn storage_at(&self, address: &Address, key: &SlotKey) -> Option<&StorageValue> {
        self.state.load(address, key)
    }

    /// Snapshot of an account's whole storage
    #[must_use]
    pub fn storage_of(&self, address: &Address) -> BTreeMap<SlotKey, StorageValue> {
        self.state
            .account(address)
            .map(|a| a.storage.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        self.state.log()
    }
}
