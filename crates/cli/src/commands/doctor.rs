use barberbook_core::config::{AppConfig, LoadOptions};
use barberbook_db::{connect, Collection};
use serde::Serialize;

use crate::commands::{storage_runtime, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_data_dir(&config));
            checks.push(check_collections(&config));
            checks.push(check_static_dir(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["data_dir", "collections_readable", "static_assets"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_data_dir(config: &AppConfig) -> DoctorCheck {
    let data_dir = &config.storage.data_dir;
    let (status, details) = if data_dir.is_dir() {
        (CheckStatus::Pass, format!("`{}` exists", data_dir.display()))
    } else if data_dir.exists() {
        (CheckStatus::Fail, format!("`{}` is not a directory", data_dir.display()))
    } else {
        (
            CheckStatus::Fail,
            format!("`{}` does not exist; run `barberbook migrate`", data_dir.display()),
        )
    };
    DoctorCheck { name: "data_dir", status, details }
}

fn check_collections(config: &AppConfig) -> DoctorCheck {
    let runtime = match storage_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "collections_readable",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let store = connect(&config.storage.data_dir);
    let result = runtime.block_on(async {
        let mut counts = Vec::new();
        for collection in Collection::ALL {
            let count = store.probe(collection).await.map_err(|error| error.to_string())?;
            counts.push(format!("{collection}={count}"));
        }
        Ok::<Vec<String>, String>(counts)
    });

    match result {
        Ok(counts) => DoctorCheck {
            name: "collections_readable",
            status: CheckStatus::Pass,
            details: format!("records: {}", counts.join(", ")),
        },
        Err(error) => {
            DoctorCheck { name: "collections_readable", status: CheckStatus::Fail, details: error }
        }
    }
}

fn check_static_dir(config: &AppConfig) -> DoctorCheck {
    let static_dir = &config.server.static_dir;
    if static_dir.is_dir() {
        DoctorCheck {
            name: "static_assets",
            status: CheckStatus::Pass,
            details: format!("serving `{}`", static_dir.display()),
        }
    } else {
        DoctorCheck {
            name: "static_assets",
            status: CheckStatus::Skipped,
            details: format!("`{}` not found; only the API will be served", static_dir.display()),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
