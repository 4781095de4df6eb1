//! Tests for engine configuration loading.

use std::io::Write;
use std::time::Duration;

use equation_challengers::{BoardLayout, EngineConfig, GameRules, LlmProvider, PlayerColor};

#[test]
fn test_defaults() {
    let config = EngineConfig::default();
    assert_eq!(*config.commit_attempts(), 5);
    assert_eq!(config.decision_timeout(), None);
    assert_eq!(*config.invitation_retention(), None);
    assert_eq!(config.completion_timeout(), Duration::from_secs(10));
    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(config.rules(), &GameRules::default());
    assert_eq!(config.layout(), BoardLayout::uniform(20));
}

#[test]
fn test_empty_file_is_valid() {
    let config = EngineConfig::from_toml("").expect("parse");
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_partial_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        r#"
commit_attempts = 2
decision_timeout_secs = 30
llm_provider = "anthropic"
llm_model = "claude-sonnet-4-5"

[rules]
turn_limit = 10
board_size = 12
"#
    )
    .expect("write");

    let config = EngineConfig::from_file(file.path()).expect("load");
    assert_eq!(*config.commit_attempts(), 2);
    assert_eq!(config.decision_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
    assert_eq!(config.llm_model(), "claude-sonnet-4-5");
    assert_eq!(*config.rules().turn_limit(), 10);
    assert_eq!(*config.rules().board_size(), 12);
    assert_eq!(*config.rules().property_cost(), 1000);
    assert_eq!(config.layout().size(), 12);
}

#[test]
fn test_board_layout_overrides_board_size() {
    let config = EngineConfig::from_toml(
        r#"
board_layout = ["blue", "blue", "red"]
"#,
    )
    .expect("parse");
    let layout = config.layout();
    assert_eq!(layout.size(), 3);
    assert_eq!(layout.color_at(0), PlayerColor::Blue);
    assert_eq!(layout.color_at(5), PlayerColor::Red);
}

#[test]
fn test_empty_board_layout_is_rejected() {
    assert!(EngineConfig::from_toml("board_layout = []").is_err());
}

#[test]
fn test_render_and_reload() {
    let config = EngineConfig::default()
        .with_rules(GameRules::default().with_turn_limit(8))
        .with_invitation_retention(3)
        .with_seed(42);
    let rendered = config.to_toml().expect("render");
    let reloaded = EngineConfig::from_toml(&rendered).expect("parse");
    assert_eq!(reloaded, config);
}

#[test]
fn test_invalid_files_report_errors() {
    let missing = EngineConfig::from_file("/definitely/not/here.toml").expect_err("missing");
    assert!(missing.message.contains("Failed to read config file"));

    let malformed = EngineConfig::from_toml("commit_attempts = \"many\"").expect_err("malformed");
    assert!(malformed.message.contains("Failed to parse config"));
}
