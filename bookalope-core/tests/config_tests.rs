//! Configuration from the process environment.
//!
//! Environment variables are process-wide, so every case runs inside one
//! test to keep them from racing each other.

use bookalope_core::{BookalopeError, ClientConfig, ValidationError, BETA_HOST, PRODUCTION_HOST};
use std::env;

const TOKEN: &str = "0123456789abcdef0123456789abcdef";

fn clear_env() {
    for var in ["BOOKALOPE_TOKEN", "BOOKALOPE_HOST", "BOOKALOPE_BETA"] {
        env::remove_var(var);
    }
}

#[test]
fn test_from_env() {
    clear_env();
    match ClientConfig::from_env() {
        Err(BookalopeError::Config(message)) => assert!(message.contains("BOOKALOPE_TOKEN")),
        other => panic!("Expected a config error, got {other:?}"),
    }

    env::set_var("BOOKALOPE_TOKEN", "not-a-token");
    assert!(matches!(
        ClientConfig::from_env(),
        Err(BookalopeError::Validation(ValidationError::InvalidToken(_)))
    ));

    env::set_var("BOOKALOPE_TOKEN", format!("  {TOKEN}\n"));
    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.token.as_str(), TOKEN);
    assert_eq!(config.host, PRODUCTION_HOST);

    env::set_var("BOOKALOPE_BETA", "yes");
    assert_eq!(ClientConfig::from_env().unwrap().host, BETA_HOST);
    env::set_var("BOOKALOPE_BETA", "0");
    assert_eq!(ClientConfig::from_env().unwrap().host, PRODUCTION_HOST);

    // An explicit host wins over the beta switch
    env::set_var("BOOKALOPE_BETA", "1");
    env::set_var("BOOKALOPE_HOST", "http://localhost:6543/");
    assert_eq!(ClientConfig::from_env().unwrap().host, "http://localhost:6543");

    env::set_var("BOOKALOPE_HOST", "localhost:6543");
    assert!(matches!(
        ClientConfig::from_env(),
        Err(BookalopeError::InvalidUrl(_))
    ));

    clear_env();
}
