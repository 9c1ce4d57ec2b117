//! Testing utilities for the relay workspace
//!
//! Shared fixtures, scripted test units and call helpers.

#![allow(missing_docs)]

use relay_abi::{decode_args, decode_return, encode_call, Address, Revert, SlotKey, StorageValue};
use relay_backends::{ValueStoreV1, ValueStoreV2};
use relay_host::{CallContext, HostConfig, Unit, World};
use relay_proxy::{AdminController, Frontend, FrontendInit, Operator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Install a test-writer subscriber honoring `RUST_LOG`; repeated calls are
/// ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A V1 value store behind a frontend whose admin is a controller owned by
/// `operator`. V2 is deployed but not installed.
#[derive(Debug)]
pub struct Deployment {
    pub world: World,
    pub operator: Address,
    pub owner: Address,
    pub stranger: Address,
    pub v1: Address,
    pub v2: Address,
    pub controller: Address,
    pub frontend: Address,
}

impl Deployment {
    #[must_use]
    pub fn operator_handle(&self) -> Operator {
        Operator::new(self.operator, self.controller)
    }

    /// Call the frontend as `from`
    pub fn call<A: Serialize + ?Sized>(
        &mut self,
        from: Address,
        signature: &str,
        args: &A,
    ) -> Result<Vec<u8>, Revert> {
        let input = encode_call(signature, args).unwrap();
        self.world.transact(from, self.frontend, 0, &input)
    }

    /// Call a no-argument getter on the frontend and decode its result
    pub fn read<R: DeserializeOwned>(&mut self, signature: &str) -> R {
        let output = self.call(self.stranger, signature, &()).unwrap();
        decode_return(&output).unwrap()
    }

    /// Install V2 through the controller
    pub fn upgrade_to_v2(&mut self) {
        let (frontend, v2) = (self.frontend, self.v2);
        self.operator_handle()
            .upgrade(
                &mut self.world,
                frontend,
                &ValueStoreV1::new(),
                v2,
                &ValueStoreV2::new(),
            )
            .unwrap();
    }

    #[must_use]
    pub fn backend(&self) -> Option<Address> {
        Frontend::backend_of(&self.world, &self.frontend)
    }

    #[must_use]
    pub fn admin(&self) -> Option<Address> {
        Frontend::admin_of(&self.world, &self.frontend)
    }

    /// Raw value of backend field `index` in the frontend's storage
    #[must_use]
    pub fn field(&self, index: u64) -> Option<StorageValue> {
        self.world
            .storage_at(&self.frontend, &SlotKey::field(index))
            .cloned()
    }
}

pub fn setup_deployment() -> Deployment {
    setup_deployment_with_config(HostConfig::default())
}

pub fn setup_deployment_with_config(config: HostConfig) -> Deployment {
    init_tracing();
    let mut world = World::with_config(config);
    let operator = world.create_account("operator");
    let owner = world.create_account("owner");
    let stranger = world.create_account("stranger");

    let v1 = world.deploy(operator, Arc::new(ValueStoreV1::new()), &[]).unwrap();
    let v2 = world.deploy(operator, Arc::new(ValueStoreV2::new()), &[]).unwrap();
    let controller = world
        .deploy(operator, Arc::new(AdminController::new()), &[])
        .unwrap();

    let init = FrontendInit {
        backend: v1,
        admin: controller,
        init_payload: encode_call("initialize(address)", &(owner,)).unwrap(),
    };
    let frontend = world
        .deploy(operator, Arc::new(Frontend::new()), &init.encode().unwrap())
        .unwrap();

    Deployment {
        world,
        operator,
        owner,
        stranger,
        v1,
        v2,
        controller,
        frontend,
    }
}

/// Backend that writes field 0, emits, then fails with a fixed raw payload.
#[derive(Debug)]
pub struct FailingBackend;

impl FailingBackend {
    pub const PAYLOAD: &'static [u8] = b"\x00custom failure\xff";
}

impl Unit for FailingBackend {
    fn name(&self) -> &str {
        "FailingBackend"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Vec<u8>, Revert> {
        ctx.store(SlotKey::field(0), StorageValue::Uint(13));
        ctx.emit("Doomed", serde_json::Value::Null);
        Err(Revert::raw(Self::PAYLOAD))
    }
}

/// Admin stand-in that swaps a frontend's backend and then calls back into
/// the same frontend within one outer invocation.
///
/// Input: `run(address,address,bytes)` with frontend, new backend, and the
/// call to make after the swap. Returns that call's output.
#[derive(Debug)]
pub struct SwapThenCall;

impl Unit for SwapThenCall {
    fn name(&self) -> &str {
        "SwapThenCall"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let (frontend, backend, payload): (Address, Address, Vec<u8>) =
            decode_args(input).map_err(|e| Revert::raw(e.to_string()))?;
        let swap = Frontend::swap_backend_call(backend).map_err(|e| Revert::raw(e.to_string()))?;
        ctx.call(frontend, 0, &swap)?;
        ctx.call(frontend, 0, &payload)
    }
}

#[must_use]
pub fn deploy_unit(world: &mut World, deployer: Address, unit: Arc<dyn Unit>) -> Address {
    world.deploy(deployer, unit, &[]).unwrap()
}
