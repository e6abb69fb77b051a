use std::env;
use std::fs;
use std::path::Path;

use barberbook_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

/// One reported setting and the environment variables that can set it,
/// highest precedence first.
struct Field<'a> {
    key: &'static str,
    value: String,
    env_keys: &'a [&'static str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key: "storage.data_dir",
            value: config.storage.data_dir.display().to_string(),
            env_keys: &["BARBERBOOK_STORAGE_DATA_DIR"],
        },
        Field {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["BARBERBOOK_SERVER_BIND_ADDRESS"],
        },
        Field {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["BARBERBOOK_SERVER_PORT", "PORT"],
        },
        Field {
            key: "server.static_dir",
            value: config.server.static_dir.display().to_string(),
            env_keys: &["BARBERBOOK_SERVER_STATIC_DIR"],
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["BARBERBOOK_LOGGING_LEVEL", "BARBERBOOK_LOG_LEVEL"],
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["BARBERBOOK_LOGGING_FORMAT", "BARBERBOOK_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        let source =
            field_source(field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", field.key, field.value));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field<'_>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_key = field
        .env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
