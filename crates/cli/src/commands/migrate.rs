use crate::commands::{storage_runtime, CommandResult};
use barberbook_core::config::{AppConfig, LoadOptions};
use barberbook_db::{connect, provision};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match storage_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let store = connect(&config.storage.data_dir);
    match runtime.block_on(provision(&store)) {
        Ok(report) => CommandResult::success(
            "migrate",
            format!(
                "provisioned `{}` (created: {}; already present: {})",
                config.storage.data_dir.display(),
                list_or_none(&report.created),
                list_or_none(&report.skipped),
            ),
        ),
        Err(error) => CommandResult::failure("migrate", "storage", error.to_string(), 4),
    }
}

fn list_or_none(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
