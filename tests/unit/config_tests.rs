//! Configuration parsing and validation tests.

use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use fitclub::config::GlobalConfig;
use fitclub::AppError;

const FULL_CONFIG: &str = r#"
http_host = "0.0.0.0"
http_port = 9000
db_path = "data/club.db"

[database]
max_connections = 8
busy_timeout_seconds = 12

[scheduling]
eligible_room_type = "PT Studio"
"#;

#[test]
fn minimal_config_falls_back_to_defaults() {
    let config =
        GlobalConfig::from_toml_str(r#"db_path = "data/fitclub.db""#).expect("config parses");

    assert_eq!(config.db_path, PathBuf::from("data/fitclub.db"));
    assert_eq!(config.http_host, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.database.busy_timeout(), Duration::from_secs(5));
    assert_eq!(config.scheduling.eligible_room_type, "Personal Training");
}

#[test]
fn full_config_overrides_every_default() {
    let config = GlobalConfig::from_toml_str(FULL_CONFIG).expect("config parses");

    assert_eq!(config.http_port, 9000);
    assert_eq!(config.database.max_connections, 8);
    assert_eq!(config.database.busy_timeout(), Duration::from_secs(12));
    assert_eq!(config.scheduling.eligible_room_type, "PT Studio");
    assert_eq!(
        config.bind_addr(),
        "0.0.0.0:9000".parse::<SocketAddr>().expect("addr")
    );
}

#[test]
fn missing_db_path_is_rejected() {
    let result = GlobalConfig::from_toml_str("http_port = 8080");
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn empty_db_path_is_rejected() {
    let result = GlobalConfig::from_toml_str(r#"db_path = """#);
    assert!(matches!(result, Err(AppError::Config(ref msg)) if msg.contains("db_path")));
}

#[test]
fn zero_max_connections_is_rejected() {
    let raw = r#"
db_path = "club.db"

[database]
max_connections = 0
"#;
    let result = GlobalConfig::from_toml_str(raw);
    assert!(matches!(result, Err(AppError::Config(ref msg)) if msg.contains("max_connections")));
}

#[test]
fn blank_eligible_room_type_is_rejected() {
    let raw = r#"
db_path = "club.db"

[scheduling]
eligible_room_type = "   "
"#;
    let result = GlobalConfig::from_toml_str(raw);
    assert!(
        matches!(result, Err(AppError::Config(ref msg)) if msg.contains("eligible_room_type"))
    );
}

#[test]
fn malformed_host_is_a_config_error() {
    let raw = r#"
http_host = "not-an-ip"
db_path = "club.db"
"#;
    assert!(matches!(
        GlobalConfig::from_toml_str(raw),
        Err(AppError::Config(_))
    ));
}

#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(FULL_CONFIG.as_bytes()).expect("write config");

    let config = GlobalConfig::load_from_path(file.path()).expect("config loads");
    assert_eq!(config.http_port, 9000);
    assert_eq!(config.db_path, PathBuf::from("data/club.db"));
}

#[test]
fn load_from_missing_path_is_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = GlobalConfig::load_from_path(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AppError::Config(ref msg)) if msg.contains("failed to read")));
}
