// tests/logging_levels.rs

use initdag::cli::LogLevel;
use initdag::logging::{parse_level_str, resolve_level};
use tracing::Level;

#[test]
fn cli_level_beats_everything() {
    let level = resolve_level(Some(LogLevel::Trace), Some("error"), Some("warn"));
    assert_eq!(level, Level::TRACE);
}

#[test]
fn env_beats_config() {
    assert_eq!(resolve_level(None, Some("debug"), Some("warn")), Level::DEBUG);
}

#[test]
fn invalid_sources_fall_through() {
    assert_eq!(resolve_level(None, Some("loud"), Some("warn")), Level::WARN);
    assert_eq!(resolve_level(None, None, Some("nonsense")), Level::INFO);
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!(parse_level_str(" WARNING "), Some(Level::WARN));
    assert_eq!(parse_level_str("Info"), Some(Level::INFO));
    assert_eq!(parse_level_str(""), None);
}
