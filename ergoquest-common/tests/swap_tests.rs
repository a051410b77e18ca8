use ergoquest_common::error::{LedgerError, LedgerErrorKind};
use ergoquest_common::swap::{apply_slippage, input_after_fee, minimum_received, swap_output, BasisPoints, PoolState};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

/// ERG/SigUSD pool used throughout the DeFi lesson
fn erg_sigusd_pool() -> PoolState {
    PoolState::new(big(100_000_000_000_000), big(21_500_000_000), 30).expect("valid pool")
}

#[test]
fn test_erg_to_sigusd_quote() {
    let pool = erg_sigusd_pool();
    let quote = swap_output(&pool, &big(10_000_000_000)).unwrap();

    assert_eq!(quote.input_amount, big(10_000_000_000));
    assert_eq!(quote.input_after_fee, big(9_970_000_000));
    assert_eq!(quote.output_amount, big(2_143_336));
    assert!(quote.output_amount < *pool.reserve_out());

    // Spot price is exact
    assert_eq!(
        quote.spot_price,
        BigRational::new(BigInt::from(21_500_000_000u64), BigInt::from(100_000_000_000_000u64))
    );

    let impact = quote.price_impact_display().unwrap();
    assert!((impact - 0.309953488372093).abs() < 1e-9, "unexpected price impact {}", impact);

    let min_out = minimum_received(&quote, BasisPoints::new(50).unwrap());
    assert_eq!(min_out, big(2_132_619));
}

#[test]
fn test_small_pool_quote() {
    let pool = PoolState::new(big(1_000_000), big(1_000_000), 30).unwrap();
    let quote = swap_output(&pool, &big(10_000)).unwrap();

    assert_eq!(quote.input_after_fee, big(9_970));
    assert_eq!(quote.output_amount, big(9_871));
}

#[test]
fn test_zero_fee_pool() {
    let pool = PoolState::new(big(1_000), big(1_000), 0).unwrap();
    let quote = swap_output(&pool, &big(1_000)).unwrap();

    // 1000 * 1000 / 2000
    assert_eq!(quote.input_after_fee, big(1_000));
    assert_eq!(quote.output_amount, big(500));
}

#[test]
fn test_zero_input_is_rejected() {
    let pool = erg_sigusd_pool();
    let err = swap_output(&pool, &big(0)).unwrap_err();
    assert_eq!(err.kind(), LedgerErrorKind::InvalidInput);
}

#[test]
fn test_invalid_pool_states_are_rejected() {
    match PoolState::new(big(0), big(1_000), 30) {
        Err(LedgerError::InvalidPoolState { reserve_in, .. }) => assert_eq!(reserve_in, big(0)),
        other => panic!("Expected invalid pool state, got {:?}", other),
    }

    assert_eq!(
        PoolState::new(big(1_000), big(0), 30).unwrap_err().kind(),
        LedgerErrorKind::InvalidPoolState
    );

    // A fee of 100% or more leaves nothing to trade
    assert!(PoolState::new(big(1_000), big(1_000), 10_000).is_err());
    assert!(PoolState::new(big(1_000), big(1_000), 9_999).is_ok());
}

#[test]
fn test_pool_state_json_is_validated() {
    let pool: PoolState =
        serde_json::from_str(r#"{"reserve_in":"1000","reserve_out":"2000","fee_rate_bps":30}"#).unwrap();
    assert_eq!(pool.reserve_out(), &big(2_000));

    let json = serde_json::to_string(&pool).unwrap();
    assert!(json.contains("\"reserve_in\":\"1000\""));

    let bad = serde_json::from_str::<PoolState>(r#"{"reserve_in":"0","reserve_out":"2000","fee_rate_bps":30}"#);
    assert!(bad.is_err());
}

#[test]
fn test_after_swap_keeps_constant_product() {
    let pool = erg_sigusd_pool();
    let quote = swap_output(&pool, &big(10_000_000_000)).unwrap();
    let next = pool.after_swap(&quote).unwrap();

    assert_eq!(next.reserve_in(), &big(100_010_000_000_000));
    assert_eq!(next.reserve_out(), &(big(21_500_000_000) - big(2_143_336)));
    assert!(next.constant_product() >= pool.constant_product());

    // Quoting again after the trade pays less for the same input
    let second = swap_output(&next, &big(10_000_000_000)).unwrap();
    assert!(second.output_amount < quote.output_amount);
}

#[test]
fn test_after_swap_rejects_foreign_quote() {
    let big_pool = PoolState::new(big(1_000_000), big(1_000_000), 30).unwrap();
    let tiny_pool = PoolState::new(big(1_000_000), big(100), 30).unwrap();

    let quote = swap_output(&big_pool, &big(500_000)).unwrap();
    assert!(quote.output_amount >= *tiny_pool.reserve_out());
    assert!(tiny_pool.after_swap(&quote).is_err());
}

#[test]
fn test_reversed_pool_swaps_sides() {
    let pool = erg_sigusd_pool();
    let reversed = pool.reversed();

    assert_eq!(reversed.reserve_in(), pool.reserve_out());
    assert_eq!(reversed.reserve_out(), pool.reserve_in());
    assert_eq!(reversed.fee_rate_bps(), pool.fee_rate_bps());
    assert_eq!(reversed.constant_product(), pool.constant_product());
}

#[test]
fn test_slippage_bounds() {
    let amount = big(2_143_336);

    assert_eq!(apply_slippage(&amount, BasisPoints::ZERO), amount);
    assert_eq!(apply_slippage(&amount, BasisPoints::MAX), big(0));
    assert_eq!(apply_slippage(&big(10_000), BasisPoints::new(100).unwrap()), big(9_900));

    assert!(BasisPoints::new(10_001).is_err());
    assert_eq!(BasisPoints::new(10_000).unwrap(), BasisPoints::MAX);
}

#[test]
fn test_input_after_fee_truncates() {
    // 999 * 9970 / 10000 = 996.003
    assert_eq!(input_after_fee(&big(999), 30), big(996));
    assert_eq!(input_after_fee(&big(1), 30), big(0));
}

#[test]
fn test_dust_input_gets_nothing() {
    let pool = erg_sigusd_pool();
    let quote = swap_output(&pool, &big(1)).unwrap();
    assert_eq!(quote.output_amount, big(0));
}
