use ergoquest_common::error::{LedgerError, LedgerErrorKind};
use ergoquest_common::selection::selector::{select, BoxSelector};
use ergoquest_common::selection::strategies::{strategy_for, FirstFitStrategy, LargestFirstStrategy, Strategy};
use ergoquest_common::selection::types::{SelectionResult, SelectionStrategy, SelectionTarget};
use ergoquest_common::types::{Asset, ValueRecord};
use num_bigint::BigUint;

const SIGUSD: &str = "03faf2cb329f2e90d6d23b58d91bbb6c046aa143261cc21f52fbe2824bfcbf04";

fn record(id: &str, value: u64) -> ValueRecord {
    ValueRecord::with_value(id, value).unwrap()
}

fn token_record(id: &str, value: u64, token: &str, amount: u64) -> ValueRecord {
    ValueRecord::new(id, BigUint::from(value), vec![Asset::new(token, BigUint::from(amount))]).unwrap()
}

fn sample_pool() -> Vec<ValueRecord> {
    vec![record("box-100", 100), record("box-200", 200), record("box-300", 300)]
}

fn values(result: &SelectionResult) -> Vec<u64> {
    result
        .chosen
        .iter()
        .map(|r| r.value().to_string().parse::<u64>().unwrap())
        .collect()
}

#[test]
fn test_first_fit_does_not_backtrack() {
    let pool = sample_pool();
    let target = SelectionTarget::value(BigUint::from(250u32));

    let result = select(&pool, &target, SelectionStrategy::FirstFit).expect("selection should succeed");

    assert_eq!(values(&result), vec![100, 200]);
    assert_eq!(result.total_value, BigUint::from(300u32));
}

#[test]
fn test_largest_first_picks_single_largest() {
    let pool = sample_pool();
    let target = SelectionTarget::value(BigUint::from(250u32));

    let result = select(&pool, &target, SelectionStrategy::LargestFirst).expect("selection should succeed");

    assert_eq!(values(&result), vec![300]);
    assert_eq!(result.total_value, BigUint::from(300u32));
}

#[test]
fn test_exact_match_stops_immediately() {
    let pool = sample_pool();
    let target = SelectionTarget::value(BigUint::from(100u32));

    let result = select(&pool, &target, SelectionStrategy::FirstFit).unwrap();
    assert_eq!(result.ids(), vec!["box-100"]);
    assert_eq!(result.excess_value(&target), BigUint::from(0u32));
}

#[test]
fn test_zero_target_consumes_nothing() {
    let pool = sample_pool();
    let target = SelectionTarget::value(BigUint::from(0u32));

    for strategy in SelectionStrategy::ALL {
        let result = select(&pool, &target, strategy).unwrap();
        assert!(result.is_empty(), "{} should select nothing", strategy);
        assert_eq!(result.total_value, BigUint::from(0u32));
    }
}

#[test]
fn test_empty_pool() {
    let pool: Vec<ValueRecord> = Vec::new();

    // Nothing required: an empty pool is fine
    let result = select(&pool, &SelectionTarget::default(), SelectionStrategy::FirstFit).unwrap();
    assert!(result.is_empty());

    // Anything required: immediate failure
    let err = select(&pool, &SelectionTarget::value(BigUint::from(1u32)), SelectionStrategy::FirstFit).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientFunds {
            asset_id: None,
            required: BigUint::from(1u32),
            available: BigUint::from(0u32),
        }
    );
}

#[test]
fn test_insufficient_funds_reports_pool_totals() {
    let pool = sample_pool();
    let target = SelectionTarget::value(BigUint::from(1_000u32));

    for strategy in SelectionStrategy::ALL {
        match select(&pool, &target, strategy) {
            Err(LedgerError::InsufficientFunds { asset_id, required, available }) => {
                assert_eq!(asset_id, None);
                assert_eq!(required, BigUint::from(1_000u32));
                assert_eq!(available, BigUint::from(600u32));
            }
            other => panic!("Expected insufficient funds, got {:?}", other),
        }
    }
}

#[test]
fn test_asset_target_is_independent_of_value_target() {
    let pool = vec![
        record("plain-1", 5_000_000_000),
        token_record("token-box", 1_000_000, SIGUSD, 500),
        record("plain-2", 2_000_000_000),
    ];

    // Value alone is met by the first record, but the token needs the second
    let target = SelectionTarget::value(BigUint::from(1_000_000_000u64)).with_asset(SIGUSD, BigUint::from(100u32));

    let result = select(&pool, &target, SelectionStrategy::FirstFit).unwrap();
    assert_eq!(result.ids(), vec!["plain-1", "token-box"]);
    assert_eq!(result.total_assets.get(SIGUSD), Some(&BigUint::from(500u32)));
}

#[test]
fn test_asset_only_target_with_zero_value() {
    let pool = vec![record("plain", 3_000_000), token_record("token-box", 1_000_000, SIGUSD, 10)];
    let target = SelectionTarget::value(BigUint::from(0u32)).with_asset(SIGUSD, BigUint::from(10u32));

    let result = select(&pool, &target, SelectionStrategy::LargestFirst).unwrap();

    // Largest-first visits "plain" first and keeps it, since it walks a prefix
    assert_eq!(result.ids(), vec!["plain", "token-box"]);
    assert_eq!(result.total_assets.get(SIGUSD), Some(&BigUint::from(10u32)));
}

#[test]
fn test_missing_asset_reports_asset_shortfall() {
    let pool = vec![token_record("token-box", 1_000_000, SIGUSD, 3), record("plain", 9_000_000)];
    let target = SelectionTarget::value(BigUint::from(2_000_000u64)).with_asset(SIGUSD, BigUint::from(5u32));

    let err = select(&pool, &target, SelectionStrategy::FirstFit).unwrap_err();
    assert_eq!(err.kind(), LedgerErrorKind::InsufficientFunds);
    assert_eq!(
        err,
        LedgerError::InsufficientFunds {
            asset_id: Some(SIGUSD.to_string()),
            required: BigUint::from(5u32),
            available: BigUint::from(3u32),
        }
    );
}

#[test]
fn test_largest_first_is_stable_on_ties() {
    let pool = vec![record("a", 50), record("b", 100), record("c", 100), record("d", 100)];
    let target = SelectionTarget::value(BigUint::from(150u32));

    let result = LargestFirstStrategy::new().select(&pool, &target).unwrap();
    assert_eq!(result.ids(), vec!["b", "c"]);
}

#[test]
fn test_selection_does_not_mutate_pool() {
    let pool = sample_pool();
    let before = pool.clone();

    let _ = select(&pool, &SelectionTarget::value(BigUint::from(250u32)), SelectionStrategy::LargestFirst);
    let _ = select(&pool, &SelectionTarget::value(BigUint::from(10_000u32)), SelectionStrategy::FirstFit);

    assert_eq!(pool, before);
}

#[test]
fn test_box_selector_uses_default_strategy() {
    let pool = sample_pool();
    let target = SelectionTarget::value(BigUint::from(250u32));

    let selector = BoxSelector::new();
    assert_eq!(selector.strategy(), SelectionStrategy::FirstFit);
    assert_eq!(selector.select(&pool, &target).unwrap().len(), 2);

    let selector = BoxSelector::with_strategy(SelectionStrategy::LargestFirst);
    assert_eq!(selector.select(&pool, &target).unwrap().len(), 1);

    // Explicit strategy overrides the default
    let result = selector.select_with(&pool, &target, SelectionStrategy::FirstFit).unwrap();
    assert_eq!(result.ids(), vec!["box-100", "box-200"]);
}

#[test]
fn test_strategy_lookup_and_names() {
    assert_eq!(strategy_for(SelectionStrategy::FirstFit).name(), FirstFitStrategy::new().name());
    assert_eq!(strategy_for(SelectionStrategy::LargestFirst).name(), "LargestFirst");

    assert_eq!("first-fit".parse::<SelectionStrategy>().unwrap(), SelectionStrategy::FirstFit);
    assert_eq!("Largest_First".parse::<SelectionStrategy>().unwrap(), SelectionStrategy::LargestFirst);
    assert!("random".parse::<SelectionStrategy>().is_err());

    assert_eq!(SelectionStrategy::LargestFirst.to_string(), "largest-first");
}

#[test]
fn test_selection_from_many_threads() {
    use std::sync::Arc;
    use std::thread;

    let pool = Arc::new((1..=50u64).map(|i| record(&format!("box-{}", i), i * 1_000)).collect::<Vec<_>>());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let target = SelectionTarget::value(BigUint::from(120_000u32));
                select(&pool, &target, SelectionStrategy::LargestFirst).unwrap()
            })
        })
        .collect();

    let results: Vec<SelectionResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results {
        assert_eq!(result, &results[0]);
    }
    assert_eq!(results[0].ids(), vec!["box-50", "box-49", "box-48"]);
}

#[test]
fn test_largest_first_can_take_more_records_for_asset_targets() {
    // The only token sits in the smallest record, so value order picks the large box first
    let pool = vec![token_record("a", 1, SIGUSD, 1), record("b", 100)];
    let target = SelectionTarget::value(BigUint::from(1u32)).with_asset(SIGUSD, BigUint::from(1u32));

    let first_fit = select(&pool, &target, SelectionStrategy::FirstFit).unwrap();
    let largest = select(&pool, &target, SelectionStrategy::LargestFirst).unwrap();

    assert_eq!(first_fit.ids(), vec!["a"]);
    assert_eq!(largest.ids(), vec!["b", "a"]);
    assert!(largest.len() > first_fit.len());
}
