use std::collections::HashMap;
use std::io::Write;

use super::load::read_config;
use super::*;
use crate::error::CvError;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (config, exists) = read_config(&dir.path().join("absent.toml")).unwrap();

    assert!(!exists);
    assert_eq!(config.agent.backend, AgentBackend::Remote);
    assert_eq!(config.agent.api_key_env, "AIP_API_KEY");
    assert_eq!(config.evaluator.model, "openai/gpt-4o-mini");
    assert_eq!(config.local.max_tool_rounds, 8);
    assert_eq!(config.pipeline.csv_file, "cv_agent_results.csv");
    assert_eq!(config.pipeline.document, "sample_cv.pdf");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[agent]
backend = "local"
api_url = "https://agents.example.com/api"

[pipeline]
document = "cvs/jane.pdf"
checkpoint = true

[logging]
path = "/tmp/cv-reader.log"
"#
    )
    .unwrap();

    let (config, exists) = read_config(file.path()).unwrap();

    assert!(exists);
    assert_eq!(config.agent.backend, AgentBackend::Local);
    assert_eq!(config.agent.require_api_url().unwrap(), "https://agents.example.com/api");
    assert_eq!(config.pipeline.document, "cvs/jane.pdf");
    assert!(config.pipeline.checkpoint);
    assert!(!config.pipeline.skip_evaluation);
    assert_eq!(config.logging.path.as_deref(), Some("/tmp/cv-reader.log"));
    assert_eq!(config.logging.rotate_keep, 5);
}

#[test]
fn malformed_file_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[agent\nbackend = 3").unwrap();
    assert!(matches!(read_config(file.path()), Err(CvError::Config(_))));
}

#[test]
fn environment_overrides_file_values() {
    let mut config: AppConfig = toml::from_str(
        r#"
[agent]
api_url = "https://file.example.com"
api_key = "from-file"

[evaluator]
api_key_env = "JUDGE_KEY"
"#,
    )
    .unwrap();

    config.apply_env(env(&[
        ("AIP_API_URL", "https://env.example.com"),
        ("AIP_API_KEY", ""),
        ("OPENAI_API_KEY", "sk-local"),
        ("JUDGE_KEY", "sk-judge"),
        ("CV_READER_LOG", "debug"),
    ]));

    assert_eq!(config.agent.require_api_url().unwrap(), "https://env.example.com");
    assert_eq!(config.agent.require_api_key().unwrap(), "from-file");
    assert_eq!(config.local.require_api_key().unwrap(), "sk-local");
    assert_eq!(config.evaluator.require_api_key().unwrap(), "sk-judge");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn missing_credentials_are_auth_errors() {
    let config = AppConfig::default();
    assert!(matches!(config.agent.require_api_key(), Err(CvError::AuthError(_))));
    assert!(matches!(config.evaluator.require_api_key(), Err(CvError::AuthError(_))));
    assert!(matches!(config.agent.require_api_url(), Err(CvError::Config(_))));
}

#[test]
fn explicit_path_sets_config_dir() {
    let paths = ConfigPaths::resolve(Some("/etc/cv-reader/custom.toml".into())).unwrap();
    assert_eq!(paths.config_file, std::path::Path::new("/etc/cv-reader/custom.toml"));
    assert_eq!(paths.config_dir, std::path::Path::new("/etc/cv-reader"));
}
