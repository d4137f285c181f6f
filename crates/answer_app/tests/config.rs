use std::collections::HashMap;
use std::path::PathBuf;

use answer_app::logging::LogDestination;
use answer_app::{parse_command, AppConfig, Command};
use answer_client::TransportSettings;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_unset() {
    let config = AppConfig::from_lookup(lookup(&[]));
    assert_eq!(config.transport.base_url, TransportSettings::default().base_url);
    assert_eq!(config.transport.token, None);
    assert!(config.state_dir.ends_with(".answer"));
    assert_eq!(config.log_destination, LogDestination::File);
}

#[test]
fn environment_overrides_are_trimmed() {
    let config = AppConfig::from_lookup(lookup(&[
        ("ANSWER_API_BASE", " http://localhost:8000 "),
        ("ANSWER_API_TOKEN", "abc\n"),
        ("ANSWER_STATE_DIR", "/tmp/answer"),
        ("ANSWER_LOG", "Both"),
    ]));
    assert_eq!(config.transport.base_url, "http://localhost:8000");
    assert_eq!(config.transport.token.as_deref(), Some("abc"));
    assert_eq!(config.state_dir, PathBuf::from("/tmp/answer"));
    assert_eq!(config.log_destination, LogDestination::Both);
}

#[test]
fn blank_token_means_no_auth() {
    let config = AppConfig::from_lookup(lookup(&[("ANSWER_API_TOKEN", "  ")]));
    assert_eq!(config.transport.token, None);
}

#[test]
fn commands_are_parsed() {
    assert_eq!(parse_command("  /stop "), Command::Stop);
    assert_eq!(parse_command("/reset"), Command::Reset);
    assert_eq!(parse_command("/clear"), Command::Reset);
    assert_eq!(parse_command("/quit"), Command::Quit);
    assert_eq!(parse_command("   "), Command::Empty);
    assert_eq!(
        parse_command(" حکم نماز؟ "),
        Command::Ask("حکم نماز؟".to_string())
    );
}
