//! Frame semantics of the host: storage context, caller identity, rollback
//! and depth limits.

use relay_abi::{decode_return, encode_return, Address, Revert, SlotKey, StorageValue};
use relay_host::{CallContext, HostConfig, HostError, Unit, World};
use std::sync::Arc;

/// Writes its caller into field 0 and returns the frame address.
#[derive(Debug)]
struct Recorder;

impl Unit for Recorder {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Vec<u8>, Revert> {
        ctx.store(SlotKey::field(0), ctx.caller());
        ctx.emit("Recorded", serde_json::json!({ "caller": ctx.caller() }));
        Ok(encode_return(&ctx.address()).unwrap())
    }
}

/// Delegates every call to the address stored in field 9.
#[derive(Debug)]
struct Delegator;

impl Unit for Delegator {
    fn name(&self) -> &str {
        "Delegator"
    }

    fn construct(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> Result<(), Revert> {
        let target = Address::from_slice(args).map_err(|e| Revert::raw(e.to_string()))?;
        ctx.store(SlotKey::field(9), target);
        Ok(())
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let target = ctx
            .load(&SlotKey::field(9))
            .and_then(|v| v.as_address())
            .unwrap_or(Address::ZERO);
        ctx.delegate_call(target, input)
    }
}

/// Writes, emits, then fails with a fixed payload.
#[derive(Debug)]
struct WriteThenFail;

impl Unit for WriteThenFail {
    fn name(&self) -> &str {
        "WriteThenFail"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Vec<u8>, Revert> {
        ctx.store(SlotKey::field(0), StorageValue::Uint(99));
        ctx.emit("Doomed", serde_json::Value::Null);
        Err(Revert::raw(b"boom".to_vec()))
    }
}

/// Calls itself until the host refuses.
#[derive(Debug)]
struct Recursive;

impl Unit for Recursive {
    fn name(&self) -> &str {
        "Recursive"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        ctx.store(SlotKey::field(ctx.depth() as u64), StorageValue::Bool(true));
        let me = ctx.address();
        ctx.call(me, 0, input)
    }
}

fn fail_on_construct() -> Arc<dyn Unit> {
    #[derive(Debug)]
    struct Refuses;
    impl Unit for Refuses {
        fn name(&self) -> &str {
            "Refuses"
        }
        fn construct(&self, ctx: &mut CallContext<'_>, _args: &[u8]) -> Result<(), Revert> {
            ctx.store(SlotKey::field(0), StorageValue::Bool(true));
            Err(Revert::raw(b"no".to_vec()))
        }
        fn execute(&self, _ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Vec<u8>, Revert> {
            Ok(Vec::new())
        }
    }
    Arc::new(Refuses)
}

#[test]
fn call_runs_in_callee_storage() {
    let mut world = World::new();
    let user = world.create_account("user");
    let recorder = world.deploy(user, Arc::new(Recorder), &[]).unwrap();

    let out = world.transact(user, recorder, 0, b"x").unwrap();
    assert_eq!(decode_return::<Address>(&out).unwrap(), recorder);
    assert_eq!(
        world.storage_at(&recorder, &SlotKey::field(0)),
        Some(&StorageValue::Address(user))
    );
}

#[test]
fn delegate_call_borrows_caller_storage_and_identity() {
    let mut world = World::new();
    let user = world.create_account("user");
    let recorder = world.deploy(user, Arc::new(Recorder), &[]).unwrap();
    let delegator = world
        .deploy(user, Arc::new(Delegator), recorder.as_bytes())
        .unwrap();

    let out = world.transact(user, delegator, 0, b"x").unwrap();

    // Recorder's code ran as the delegator and saw the original caller.
    assert_eq!(decode_return::<Address>(&out).unwrap(), delegator);
    assert_eq!(
        world.storage_at(&delegator, &SlotKey::field(0)),
        Some(&StorageValue::Address(user))
    );
    assert_eq!(world.storage_at(&recorder, &SlotKey::field(0)), None);

    let events: Vec<_> = world.events().by_topic(delegator, "Recorded").collect();
    assert_eq!(events.len(), 1);
}

#[test]
fn delegate_call_to_codeless_account_fails() {
    let mut world = World::new();
    let user = world.create_account("user");
    let nobody = world.create_account("nobody");
    let delegator = world
        .deploy(user, Arc::new(Delegator), nobody.as_bytes())
        .unwrap();

    let err = world.transact(user, delegator, 0, b"x").unwrap_err();
    assert_eq!(err.decode::<HostError>(), Some(HostError::NoCode(nobody)));
}

#[test]
fn failed_call_discards_writes_and_events() {
    let mut world = World::new();
    let user = world.create_account("user");
    let failing = world.deploy(user, Arc::new(WriteThenFail), &[]).unwrap();
    let events_before = world.events().len();

    let err = world.transact(user, failing, 0, b"x").unwrap_err();

    assert_eq!(err.as_bytes(), b"boom");
    assert_eq!(world.storage_at(&failing, &SlotKey::field(0)), None);
    assert_eq!(world.events().len(), events_before);
}

#[test]
fn value_moves_with_call_and_returns_on_failure() {
    let mut world = World::with_config(HostConfig {
        genesis_balance: 100,
        ..HostConfig::default()
    });
    let user = world.create_account("user");
    let payee = world.create_account("payee");
    let failing = world.deploy(user, Arc::new(WriteThenFail), &[]).unwrap();

    world.transact(user, payee, 30, &[]).unwrap();
    assert_eq!(world.balance(&user), 70);
    assert_eq!(world.balance(&payee), 130);

    assert!(world.transact(user, failing, 10, b"x").is_err());
    assert_eq!(world.balance(&user), 70);
    assert_eq!(world.balance(&failing), 0);

    let err = world.transact(user, payee, 1_000, &[]).unwrap_err();
    assert!(matches!(
        err.decode::<HostError>(),
        Some(HostError::InsufficientBalance { available: 70, required: 1_000 })
    ));
}

#[test]
fn recursion_stops_at_depth_limit_and_rolls_back() {
    let mut world = World::with_config(HostConfig {
        max_call_depth: 4,
        ..HostConfig::default()
    });
    let user = world.create_account("user");
    let recursive = world.deploy(user, Arc::new(Recursive), &[]).unwrap();

    let err = world.transact(user, recursive, 0, b"go").unwrap_err();
    assert_eq!(
        err.decode::<HostError>(),
        Some(HostError::CallDepthExceeded { depth: 5, limit: 4 })
    );
    assert!(world.storage_of(&recursive).is_empty());
}

#[test]
fn failed_constructor_deploys_nothing() {
    let mut world = World::new();
    let user = world.create_account("user");

    let err = world.deploy(user, fail_on_construct(), &[]).unwrap_err();
    assert_eq!(err.as_bytes(), b"no");

    let attempted = Address::derive(&user, 0);
    assert!(!world.has_code(&attempted));
    assert!(world.storage_of(&attempted).is_empty());

    // The nonce still advanced.
    let next = world.deploy(user, Arc::new(Recorder), &[]).unwrap();
    assert_eq!(next, Address::derive(&user, 1));
}

#[test]
fn event_log_stays_verifiable() {
    let mut world = World::new();
    let user = world.create_account("user");
    let recorder = world.deploy(user, Arc::new(Recorder), &[]).unwrap();
    for _ in 0..3 {
        world.transact(user, recorder, 0, b"x").unwrap();
    }
    assert_eq!(world.events().len(), 3);
    assert!(world.events().verify_integrity().is_ok());
}
