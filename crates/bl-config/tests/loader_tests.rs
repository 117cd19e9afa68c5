//! Config loader tests
//!
//! Overrides are fed through `load_with` so tests never touch the process environment.

use std::collections::HashMap;
use std::io::Write;

use bl_config::{ConfigError, ConfigLoader, StorageBackend};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_values_are_loaded() {
    let file = write_config(
        r#"
[http]
port = 4000

[auth.jwt]
secret = "from-file"
token_expiry_secs = 120
"#,
    );

    let config = ConfigLoader::with_path(file.path())
        .load_with(lookup(&[]))
        .unwrap();

    assert_eq!(config.http.port, 4000);
    assert_eq!(config.auth.jwt.secret, "from-file");
    assert_eq!(config.auth.jwt.token_expiry_secs, 120);
    assert_eq!(config.storage.backend, StorageBackend::Mongodb);
}

#[test]
fn test_env_overrides_file() {
    let file = write_config("[auth.jwt]\nsecret = \"from-file\"\n");

    let config = ConfigLoader::with_path(file.path())
        .load_with(lookup(&[
            ("BLOGLIST_JWT_SECRET", "from-env"),
            ("BLOGLIST_HTTP_PORT", "8081"),
            ("BLOGLIST_STORAGE_BACKEND", "memory"),
            ("BLOGLIST_CORS_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

    assert_eq!(config.auth.jwt.secret, "from-env");
    assert_eq!(config.http.port, 8081);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
}

#[test]
fn test_unparseable_port_is_ignored() {
    let config = ConfigLoader::with_path("/nonexistent/bloglist.toml")
        .load_with(lookup(&[
            ("BLOGLIST_JWT_SECRET", "s3cret"),
            ("BLOGLIST_HTTP_PORT", "not-a-port"),
        ]))
        .unwrap();

    assert_eq!(config.http.port, 3003);
}

#[test]
fn test_unknown_backend_is_an_error() {
    let err = ConfigLoader::with_path("/nonexistent/bloglist.toml")
        .load_with(lookup(&[
            ("BLOGLIST_JWT_SECRET", "s3cret"),
            ("BLOGLIST_STORAGE_BACKEND", "cassandra"),
        ]))
        .unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_oversized_token_expiry_fails_validation() {
    let err = ConfigLoader::with_path("/nonexistent/bloglist.toml")
        .load_with(lookup(&[
            ("BLOGLIST_JWT_SECRET", "s3cret"),
            ("BLOGLIST_JWT_EXPIRY_SECS", "10000000000000000"),
        ]))
        .unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_missing_secret_fails_validation() {
    let err = ConfigLoader::with_path("/nonexistent/bloglist.toml")
        .load_with(lookup(&[]))
        .unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let file = write_config("[http\nport = ");

    let err = ConfigLoader::with_path(file.path())
        .load_with(lookup(&[]))
        .unwrap_err();

    assert!(matches!(err, ConfigError::ParseError(_)));
}
