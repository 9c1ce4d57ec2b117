//! The V1 to V2 upgrade scenario

use crate::report::{Report, Step};
use anyhow::{ensure, Context, Result};
use relay_abi::{decode_return, encode_call, Address};
use relay_backends::{ValueStoreV1, ValueStoreV2};
use relay_host::{HostConfig, World};
use relay_proxy::{AdminController, Frontend, FrontendInit, Operator, ProxyError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Inputs of one scenario run
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub initial_value: u128,
    pub message: String,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            initial_value: 42,
            message: "hello from v2".to_string(),
        }
    }
}

struct Session {
    world: World,
    frontend: Address,
}

impl Session {
    fn call<A: Serialize + ?Sized>(&mut self, from: Address, signature: &str, args: &A) -> Result<Vec<u8>> {
        let input = encode_call(signature, args)?;
        let output = self
            .world
            .transact(from, self.frontend, 0, &input)
            .with_context(|| format!("{signature} failed"))?;
        Ok(output)
    }

    fn read<R: DeserializeOwned>(&mut self, from: Address, signature: &str) -> Result<R> {
        let output = self.call(from, signature, &())?;
        Ok(decode_return(&output)?)
    }
}

/// Deploy V1 behind a frontend, use it, upgrade to V2 and use it again
///
/// # Errors
/// Returns error if any step the scenario depends on fails outright; checks
/// that merely disagree with expectations are recorded in the report.
pub fn run_scenario(config: HostConfig, params: &ScenarioParams) -> Result<Report> {
    let mut world = World::with_config(config);
    let operator = world.create_account("operator");
    let owner = world.create_account("owner");
    let user = world.create_account("user");

    let v1 = world.deploy(operator, Arc::new(ValueStoreV1::new()), &[])?;
    let v2 = world.deploy(operator, Arc::new(ValueStoreV2::new()), &[])?;
    let controller = world.deploy(operator, Arc::new(AdminController::new()), &[])?;
    let init = FrontendInit {
        backend: v1,
        admin: controller,
        init_payload: encode_call("initialize(address)", &(owner,))?,
    };
    let frontend = world
        .deploy(operator, Arc::new(Frontend::new()), &init.encode()?)
        .context("frontend deployment failed")?;
    tracing::info!(%frontend, %v1, %v2, %controller, "deployment ready");

    let mut report = Report::new(frontend);
    let mut session = Session { world, frontend };

    session.call(owner, "setValue(uint128)", &(params.initial_value,))?;
    let before: u128 = session.read(user, "value()")?;
    let version: u64 = session.read(user, "version()")?;
    report.push(Step::check(
        "v1 stores value",
        before == params.initial_value && version == ValueStoreV1::VERSION,
        format!("value={before} version={version}"),
    ));

    let attempt = session
        .world
        .transact(user, frontend, 0, &Frontend::swap_backend_call(v2)?);
    let rejected = attempt
        .err()
        .and_then(|revert| revert.decode::<ProxyError>())
        == Some(ProxyError::Unauthorized);
    report.push(Step::check(
        "non-admin swap rejected",
        rejected && Frontend::backend_of(&session.world, &frontend) == Some(v1),
        format!("backend={}", v1.short()),
    ));

    Operator::new(operator, controller).upgrade(
        &mut session.world,
        frontend,
        &ValueStoreV1::new(),
        v2,
        &ValueStoreV2::new(),
    )?;
    let installed = Frontend::backend_of(&session.world, &frontend);
    ensure!(installed == Some(v2), "backend not swapped");

    let after: u128 = session.read(user, "value()")?;
    let version: u64 = session.read(user, "version()")?;
    report.push(Step::check(
        "value survives upgrade",
        after == before && version == ValueStoreV2::VERSION,
        format!("value={after} version={version}"),
    ));

    session.call(owner, "setMessage(string)", &(params.message.clone(),))?;
    let message: String = session.read(user, "message()")?;
    report.push(Step::check(
        "v2 stores message",
        message == params.message,
        format!("message={message:?}"),
    ));

    let log = session.world.events();
    report.push(Step::check(
        "event log verifies",
        log.verify_integrity().is_ok(),
        format!("{} events", log.len()),
    ));

    report.backend_before = Some(v1);
    report.backend_after = installed;
    report.final_value = after;
    report.final_message = message;
    report.events = log.len();
    Ok(report)
}
