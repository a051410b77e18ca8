use ergoquest_common::error::LedgerErrorKind;
use ergoquest_common::types::{output_asset_totals, record_asset_totals, Asset, OutputCandidate, ValueRecord};
use num_bigint::BigUint;

#[test]
fn test_record_validation() {
    assert!(ValueRecord::with_value("box", 1u32).is_ok());

    // Empty id
    let err = ValueRecord::with_value("  ", 1u32).unwrap_err();
    assert_eq!(err.kind(), LedgerErrorKind::InvalidRecord);

    // Degenerate record
    assert!(ValueRecord::new("box", BigUint::from(0u32), vec![]).is_err());

    // Zero value is fine when the record carries assets
    let tokens_only = ValueRecord::new("box", BigUint::from(0u32), vec![Asset::new("t", BigUint::from(1u32))]);
    assert!(tokens_only.is_ok());

    // Zero-amount assets do not count as content
    let empty_assets = ValueRecord::new("box", BigUint::from(0u32), vec![Asset::new("t", BigUint::from(0u32))]);
    assert_eq!(empty_assets.unwrap_err().kind(), LedgerErrorKind::InvalidRecord);

    // Repeated asset id
    let repeated = ValueRecord::new(
        "box",
        BigUint::from(1_000_000u32),
        vec![Asset::new("t", BigUint::from(1u32)), Asset::new("t", BigUint::from(2u32))],
    );
    assert_eq!(repeated.unwrap_err().kind(), LedgerErrorKind::InvalidRecord);

    // Empty asset id
    let blank = ValueRecord::new("box", BigUint::from(1u32), vec![Asset::new("", BigUint::from(2u32))]);
    assert!(blank.is_err());
}

#[test]
fn test_record_accessors() {
    let record = ValueRecord::new(
        "box-1",
        BigUint::from(5_000_000u32),
        vec![Asset::new("a", BigUint::from(7u32)), Asset::new("b", BigUint::from(0u32))],
    )
    .unwrap();

    assert_eq!(record.id(), "box-1");
    assert_eq!(record.value(), &BigUint::from(5_000_000u32));
    assert_eq!(record.assets().len(), 2);
    assert_eq!(record.asset_amount("a"), BigUint::from(7u32));
    assert_eq!(record.asset_amount("missing"), BigUint::from(0u32));
    assert!(record.has_asset("a"));
    assert!(!record.has_asset("b"));
}

#[test]
fn test_record_json_uses_string_amounts() {
    let record = ValueRecord::new(
        "box-1",
        BigUint::from(1_500_000_000u64),
        vec![Asset::new("token", BigUint::from(42u32))],
    )
    .unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["value"], "1500000000");
    assert_eq!(json["assets"][0]["amount"], "42");

    let parsed: ValueRecord = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn test_record_json_is_validated() {
    // Plain numbers are accepted for hand-written fixtures, assets default to empty
    let record: ValueRecord = serde_json::from_str(r#"{"id":"box","value":1000000}"#).unwrap();
    assert_eq!(record.value(), &BigUint::from(1_000_000u32));
    assert!(record.assets().is_empty());

    // Amounts beyond u64 survive as strings
    let huge: ValueRecord = serde_json::from_str(r#"{"id":"box","value":"340282366920938463463374607431768211456"}"#).unwrap();
    assert_eq!(huge.value().bits(), 129);

    assert!(serde_json::from_str::<ValueRecord>(r#"{"id":"","value":"1"}"#).is_err());
    assert!(serde_json::from_str::<ValueRecord>(r#"{"id":"box","value":"0"}"#).is_err());
    assert!(serde_json::from_str::<ValueRecord>(r#"{"id":"box","value":"-5"}"#).is_err());
    assert!(serde_json::from_str::<ValueRecord>(r#"{"id":"box","value":"1.5"}"#).is_err());
}

#[test]
fn test_asset_totals() {
    let records = vec![
        ValueRecord::new("a", BigUint::from(1u32), vec![Asset::new("x", BigUint::from(3u32))]).unwrap(),
        ValueRecord::new(
            "b",
            BigUint::from(1u32),
            vec![Asset::new("y", BigUint::from(1u32)), Asset::new("x", BigUint::from(4u32))],
        )
        .unwrap(),
    ];
    let totals = record_asset_totals(&records);
    assert_eq!(totals.get("x"), Some(&BigUint::from(7u32)));
    assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["x", "y"]);

    let outputs = vec![
        OutputCandidate::new(1u32).with_asset("x", 2u32),
        OutputCandidate::new(1u32).with_asset("x", 2u32).with_asset("z", 9u32),
    ];
    let totals = output_asset_totals(&outputs);
    assert_eq!(totals.get("x"), Some(&BigUint::from(4u32)));
    assert_eq!(totals.get("z"), Some(&BigUint::from(9u32)));
}
