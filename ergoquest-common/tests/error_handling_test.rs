use ergoquest_common::error::{
    config_error, progress_error_with_source, with_io_context, ErrorCategory, LedgerError, LedgerErrorKind, QuestError,
};
use num_bigint::BigUint;
use std::io;

const TOKEN: &str = "03faf2cb329f2e90d6d23b58d91bbb6c046aa143261cc21f52fbe2824bfcbf04";

#[test]
fn test_insufficient_value_message() {
    let err = LedgerError::InsufficientFunds {
        asset_id: None,
        required: BigUint::from(5_000_000_000u64),
        available: BigUint::from(3_000_000_000u64),
    };
    assert_eq!(err.user_message(), "need 5 ERG, have 3 ERG");
    assert!(err.to_string().contains("required 5000000000"));
}

#[test]
fn test_insufficient_token_message_truncates_id() {
    let err = LedgerError::InsufficientFunds {
        asset_id: Some(TOKEN.to_string()),
        required: BigUint::from(10u32),
        available: BigUint::from(4u32),
    };
    assert_eq!(err.user_message(), "need 10 of token 03fa...bf04, have 4");
}

#[test]
fn test_error_kinds() {
    let cases = vec![
        (LedgerError::invalid_input("bad"), LedgerErrorKind::InvalidInput, "invalid_input"),
        (LedgerError::invalid_record("bad"), LedgerErrorKind::InvalidRecord, "invalid_record"),
        (
            LedgerError::DustOutput {
                value: BigUint::from(1u32),
                minimum: BigUint::from(2u32),
            },
            LedgerErrorKind::DustOutput,
            "dust_output",
        ),
        (
            LedgerError::UncarriedAssets {
                asset_count: 2,
                minimum: BigUint::from(1_000_000u32),
            },
            LedgerErrorKind::UncarriedAssets,
            "uncarried_assets",
        ),
    ];

    for (err, kind, name) in cases {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.kind().as_str(), name);
        assert_eq!(kind.to_string(), name);
    }
}

#[test]
fn test_dust_message_in_erg() {
    let err = LedgerError::DustOutput {
        value: BigUint::from(500_000u32),
        minimum: BigUint::from(1_000_000u32),
    };
    assert_eq!(
        err.user_message(),
        "output of 0.0005 ERG is below the minimum box value of 0.001 ERG"
    );
}

#[test]
fn test_quest_error_categories() {
    let ledger: QuestError = LedgerError::invalid_input("zero amount").into();
    assert_eq!(ledger.category(), ErrorCategory::Ledger);
    assert_eq!(ledger.ledger_kind(), Some(LedgerErrorKind::InvalidInput));
    assert_eq!(ledger.user_message(), "Invalid input: zero amount");

    let config = config_error("missing section");
    assert_eq!(config.category(), ErrorCategory::Config);
    assert_eq!(config.ledger_kind(), None);
    assert_eq!(config.user_message(), "Configuration error: missing section");

    let io_err: QuestError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert_eq!(io_err.category().as_str(), "Io");

    let progress = progress_error_with_source("could not save", io::Error::new(io::ErrorKind::Other, "disk full"));
    assert_eq!(progress.category(), ErrorCategory::Progress);
    assert!(std::error::Error::source(&progress).is_some());
}

#[test]
fn test_io_context() {
    let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    let err = with_io_context(result, "writing progress.json").unwrap_err();

    match &err {
        QuestError::Io { context, source } => {
            assert_eq!(context, "writing progress.json");
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("Expected I/O error, got {:?}", other),
    }
    assert_eq!(err.user_message(), "File operation error: writing progress.json");
}

#[test]
fn test_serialization_errors_convert() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: QuestError = json_err.into();
    assert_eq!(err.category(), ErrorCategory::Serialization);

    let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
    let err: QuestError = toml_err.into();
    assert!(err.to_string().starts_with("Serialization error: TOML"));
}
