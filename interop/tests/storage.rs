mod common;

use std::collections::BTreeMap;

use common::*;
use ledger_common::{storage::StorageItem, trigger::TriggerType};
use ledger_interop::{
    syscall_names::*,
    vm::StackItem,
    EventLog, InteropContext, InteropError, Ledger, LedgerWriter, MemoryLedger, StorageContext,
};
use proptest::prelude::*;

const SCRIPT: &[u8] = &[0x00, 0x51, 0x66];

#[test]
fn test_balance_scenario() {
    let mut ledger = MemoryLedger::new();
    let hash = deploy(&mut ledger, storage_contract(SCRIPT));
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();

    let staged = {
        let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);
        let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
        call(
            &mut ctx,
            &mut engine,
            NEO_STORAGE_PUT,
            vec![sc.clone(), StackItem::from(b"balance".as_slice()), StackItem::from(100u32)],
        )
        .unwrap();
        assert!(engine.evaluation_stack().is_empty());

        let value = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET, vec![sc.clone(), b"balance".as_slice().into()]);
        assert_eq!(value.try_integer().unwrap(), 100.into());

        // Same value through a read only view, writes refused
        let ro = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_READ_ONLY_CONTEXT, vec![]);
        let value = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET, vec![ro.clone(), b"balance".as_slice().into()]);
        assert_eq!(value.try_integer().unwrap(), 100.into());
        assert!(matches!(
            call(
                &mut ctx,
                &mut engine,
                NEO_STORAGE_PUT,
                vec![ro.clone(), b"balance".as_slice().into(), StackItem::from(1u32)]
            ),
            Err(InteropError::ReadOnlyContext)
        ));
        ctx.into_staged()
    };

    // Nothing reaches the ledger before commit
    assert_eq!(ledger.storage_len(&hash), 0);
    staged.commit(&mut ledger).unwrap();
    assert_eq!(ledger.storage_len(&hash), 1);
}

#[test]
fn test_faulted_execution_commits_nothing() {
    let mut ledger = MemoryLedger::new();
    let hash = deploy(&mut ledger, storage_contract(SCRIPT));
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    {
        let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);
        let sc = call_ok(&mut ctx, &mut engine, SYSTEM_STORAGE_GET_CONTEXT, vec![]);
        call(&mut ctx, &mut engine, SYSTEM_STORAGE_PUT, vec![sc.clone(), b"a".as_slice().into(), b"1".as_slice().into()]).unwrap();
        let too_long = vec![0u8; 1025];
        assert!(matches!(
            call(&mut ctx, &mut engine, SYSTEM_STORAGE_PUT, vec![sc, too_long.into(), b"1".as_slice().into()]),
            Err(InteropError::KeyTooLarge { len: 1025, max: 1024 })
        ));
        // The context is dropped with its overlay
    }
    assert_eq!(ledger.storage_len(&hash), 0);
}

#[test]
fn test_const_items() {
    let mut ledger = MemoryLedger::new();
    deploy(&mut ledger, storage_contract(SCRIPT));
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

    let sc = call_ok(&mut ctx, &mut engine, SYSTEM_STORAGE_GET_CONTEXT, vec![]);
    call(
        &mut ctx,
        &mut engine,
        SYSTEM_STORAGE_PUT_EX,
        vec![sc.clone(), b"owner".as_slice().into(), b"alice".as_slice().into(), StackItem::from(1u8)],
    )
    .unwrap();

    assert!(matches!(
        call(&mut ctx, &mut engine, SYSTEM_STORAGE_PUT, vec![sc.clone(), b"owner".as_slice().into(), b"bob".as_slice().into()]),
        Err(InteropError::ConstViolation)
    ));
    assert!(matches!(
        call(&mut ctx, &mut engine, SYSTEM_STORAGE_DELETE, vec![sc.clone(), b"owner".as_slice().into()]),
        Err(InteropError::ConstViolation)
    ));

    // Flag 0 keeps the item mutable
    call(
        &mut ctx,
        &mut engine,
        SYSTEM_STORAGE_PUT_EX,
        vec![sc.clone(), b"count".as_slice().into(), b"1".as_slice().into(), StackItem::from(0u8)],
    )
    .unwrap();
    call(&mut ctx, &mut engine, SYSTEM_STORAGE_DELETE, vec![sc, b"count".as_slice().into()]).unwrap();
}

#[test]
fn test_delete_hides_committed_value() {
    let mut ledger = MemoryLedger::new();
    let hash = deploy(&mut ledger, storage_contract(SCRIPT));
    ledger
        .put_storage_item(&hash, b"k", StorageItem::new(b"committed".to_vec(), false))
        .unwrap();
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

    let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
    call(&mut ctx, &mut engine, NEO_STORAGE_DELETE, vec![sc.clone(), b"k".as_slice().into()]).unwrap();
    let value = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET, vec![sc, b"k".as_slice().into()]);
    assert!(value.is_empty_bytes());
}

#[test]
fn test_as_read_only_is_idempotent() {
    let ledger = MemoryLedger::new();
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

    let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
    let once = call_ok(&mut ctx, &mut engine, NEO_STORAGE_CONTEXT_AS_READ_ONLY, vec![sc]);
    let twice = call_ok(&mut ctx, &mut engine, SYSTEM_STORAGE_CONTEXT_AS_READ_ONLY, vec![once.clone()]);
    assert_eq!(once, twice);
    assert!(handle::<StorageContext>(&twice).is_read_only());
}

#[test]
fn test_storage_needs_capability() {
    let mut ledger = MemoryLedger::new();
    deploy(
        &mut ledger,
        contract(SCRIPT, ledger_common::contract::ContractProperties::NONE),
    );
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

    let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
    assert!(matches!(
        call(&mut ctx, &mut engine, NEO_STORAGE_GET, vec![sc, b"k".as_slice().into()]),
        Err(InteropError::NoStorageCapability(_))
    ));
}

#[test]
fn test_verification_cannot_write() {
    let mut ledger = MemoryLedger::new();
    deploy(&mut ledger, storage_contract(SCRIPT));
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Verification, &ledger, &mut events);

    let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
    assert!(matches!(
        call(&mut ctx, &mut engine, NEO_STORAGE_PUT, vec![sc.clone(), b"k".as_slice().into(), b"v".as_slice().into()]),
        Err(InteropError::TriggerNotApplication { current: TriggerType::Verification })
    ));
    // Reads are fine
    let value = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET, vec![sc, b"k".as_slice().into()]);
    assert!(value.is_empty_bytes());
}

#[test]
fn test_find_iteration() {
    let mut ledger = MemoryLedger::new();
    let hash = deploy(&mut ledger, storage_contract(SCRIPT));
    for (key, value) in [(b"ab".to_vec(), b"2"), (b"aa".to_vec(), b"1"), (b"b".to_vec(), b"3")] {
        ledger
            .put_storage_item(&hash, &key, StorageItem::new(value.to_vec(), false))
            .unwrap();
    }
    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

    let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
    // Staged writes are not part of find results
    call(&mut ctx, &mut engine, NEO_STORAGE_PUT, vec![sc.clone(), b"ac".as_slice().into(), b"9".as_slice().into()]).unwrap();
    let iterator = call_ok(&mut ctx, &mut engine, NEO_STORAGE_FIND, vec![sc, b"a".as_slice().into()]);

    // Nothing to read before the first move
    assert!(matches!(
        call(&mut ctx, &mut engine, NEO_ITERATOR_KEY, vec![iterator.clone()]),
        Err(InteropError::IndexOutOfRange { index: -1, len: 2 })
    ));

    let mut seen = Vec::new();
    while call_ok(&mut ctx, &mut engine, NEO_ITERATOR_NEXT, vec![iterator.clone()]).to_bool() {
        let key = call_ok(&mut ctx, &mut engine, NEO_ITERATOR_KEY, vec![iterator.clone()]);
        let value = call_ok(&mut ctx, &mut engine, NEO_ENUMERATOR_VALUE, vec![iterator.clone()]);
        seen.push((bytes(&key), bytes(&value)));
    }
    assert_eq!(seen, vec![(b"aa".to_vec(), b"1".to_vec()), (b"ab".to_vec(), b"2".to_vec())]);
    assert!(!call_ok(&mut ctx, &mut engine, NEO_ENUMERATOR_NEXT, vec![iterator]).to_bool());
}

#[test]
fn test_find_sorts_unordered_backend_results() {
    let mut committed = MemoryLedger::new();
    let hash = deploy(&mut committed, storage_contract(SCRIPT));
    for key in [b"k1".as_slice(), b"k2", b"k3", b"k10", b"x"] {
        committed
            .put_storage_item(&hash, key, StorageItem::new(key.to_vec(), false))
            .unwrap();
    }
    let ledger = ScrambledLedger::new(committed, 1);
    let scan = ledger.get_storage_items_with_prefix(&hash, b"k").unwrap();
    let scanned: Vec<Vec<u8>> = scan.into_iter().map(|(key, _)| key).collect();
    assert_ne!(scanned, vec![b"k1".to_vec(), b"k10".to_vec(), b"k2".to_vec(), b"k3".to_vec()]);

    let mut engine = engine_for(SCRIPT);
    let mut events = EventLog::new();
    let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);
    let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
    let iterator = call_ok(&mut ctx, &mut engine, NEO_STORAGE_FIND, vec![sc, b"k".as_slice().into()]);

    let mut found = Vec::new();
    while call_ok(&mut ctx, &mut engine, NEO_ITERATOR_NEXT, vec![iterator.clone()]).to_bool() {
        found.push(bytes(&call_ok(&mut ctx, &mut engine, NEO_ITERATOR_KEY, vec![iterator.clone()])));
    }
    assert_eq!(found, vec![b"k1".to_vec(), b"k10".to_vec(), b"k2".to_vec(), b"k3".to_vec()]);
}

proptest! {
    #[test]
    fn test_put_then_get_returns_last_write(
        writes in prop::collection::vec(
            (prop::collection::vec(any::<u8>(), 1..16), prop::collection::vec(1u8..=255, 1..32)),
            1..32,
        ),
    ) {
        let mut ledger = MemoryLedger::new();
        deploy(&mut ledger, storage_contract(SCRIPT));
        let mut engine = engine_for(SCRIPT);
        let mut events = EventLog::new();
        let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);
        let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);

        let mut expected = BTreeMap::new();
        for (key, value) in &writes {
            call(&mut ctx, &mut engine, NEO_STORAGE_PUT, vec![sc.clone(), key.clone().into(), value.clone().into()]).unwrap();
            expected.insert(key.clone(), value.clone());
        }
        for (key, value) in expected {
            let got = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET, vec![sc.clone(), key.into()]);
            prop_assert_eq!(bytes(&got), value);
        }
    }

    #[test]
    fn test_find_is_strictly_ascending(
        keys in prop::collection::btree_set(prop::collection::vec(any::<u8>(), 1..8), 0..40),
        seed in any::<usize>(),
    ) {
        let mut committed = MemoryLedger::new();
        let hash = deploy(&mut committed, storage_contract(SCRIPT));
        for key in &keys {
            committed.put_storage_item(&hash, key, StorageItem::new(vec![1], false)).unwrap();
        }
        // The backend hands the scan back in no particular order
        let ledger = ScrambledLedger::new(committed, seed);
        let mut engine = engine_for(SCRIPT);
        let mut events = EventLog::new();
        let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);
        let sc = call_ok(&mut ctx, &mut engine, NEO_STORAGE_GET_CONTEXT, vec![]);
        let iterator = call_ok(&mut ctx, &mut engine, NEO_STORAGE_FIND, vec![sc, StackItem::empty()]);

        let mut found = Vec::new();
        while call_ok(&mut ctx, &mut engine, NEO_ITERATOR_NEXT, vec![iterator.clone()]).to_bool() {
            found.push(bytes(&call_ok(&mut ctx, &mut engine, NEO_ITERATOR_KEY, vec![iterator.clone()])));
        }
        prop_assert!(found.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(found.len(), keys.len());
    }
}
