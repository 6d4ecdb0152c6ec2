use leetdraw_core::config::{AppConfig, LoadOptions};
use leetdraw_leetcode::LeetCodeClient;
use secrecy::ExposeSecret;
use serde::Serialize;

use super::{escape_json, CommandResult};

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
            checks.push(check_discord_token(&config));
            checks.push(check_leetcode_client(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["discord_token_readiness", "leetcode_client"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Bot tokens are three dot-separated segments: encoded user id, timestamp, signature.
fn check_discord_token(config: &AppConfig) -> DoctorCheck {
    let token = config.discord.bot_token.expose_secret();
    let segments: Vec<&str> = token.split('.').collect();
    let well_formed = segments.len() == 3 && segments.iter().all(|segment| !segment.is_empty());

    if well_formed {
        DoctorCheck {
            name: "discord_token_readiness",
            status: CheckStatus::Pass,
            details: "token has the expected three-segment shape".to_string(),
        }
    } else {
        DoctorCheck {
            name: "discord_token_readiness",
            status: CheckStatus::Fail,
            details: format!(
                "token has {} segment(s); expected `<id>.<timestamp>.<signature>` from the Bot page",
                segments.len()
            ),
        }
    }
}

fn check_leetcode_client(config: &AppConfig) -> DoctorCheck {
    match LeetCodeClient::new(&config.leetcode) {
        Ok(client) => DoctorCheck {
            name: "leetcode_client",
            status: CheckStatus::Pass,
            details: format!(
                "client ready for `{}` and `{}` ({}s timeout)",
                client.catalog_url(),
                client.graphql_url(),
                config.leetcode.timeout_secs
            ),
        },
        Err(error) => DoctorCheck {
            name: "leetcode_client",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
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
