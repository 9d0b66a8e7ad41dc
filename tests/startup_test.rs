//! Startup wiring: exchange selection from arguments and configuration.

use std::io::Write;

use coinsh::adapters::file_config_adapter::FileConfigAdapter;
use coinsh::cli::select_exchange;
use coinsh::domain::error::CoinshError;
use tempfile::NamedTempFile;

fn config(content: &str) -> FileConfigAdapter {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    FileConfigAdapter::from_file(file.path()).unwrap()
}

#[test]
fn defaults_to_mtgox() {
    let exchange = select_exchange(None, None).unwrap();
    assert_eq!(exchange.short_name(), "mtgox");
    assert_eq!(exchange.name(), "Mt. Gox");
}

#[test]
fn command_line_override_wins_over_config() {
    let config = config("[shell]\nexchange = nonexchange\n");
    let exchange = select_exchange(Some("mtgox"), Some(&config)).unwrap();
    assert_eq!(exchange.short_name(), "mtgox");
}

#[test]
fn config_selects_the_exchange() {
    let config = config("[shell]\nexchange = mtgox\n");
    let exchange = select_exchange(None, Some(&config)).unwrap();
    assert_eq!(exchange.short_name(), "mtgox");
}

#[test]
fn unknown_exchange_is_an_error() {
    let err = select_exchange(Some("bitstamp"), None).unwrap_err();
    match err {
        CoinshError::UnknownExchange { name } => assert_eq!(name, "bitstamp"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_base_url_fails_client_construction() {
    let config = config("[mtgox]\nbase_url = not a url\n");
    let err = select_exchange(None, Some(&config)).unwrap_err();
    assert!(matches!(err, CoinshError::Client { .. }));
}
