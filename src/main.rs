/// Command-line front end for the coastal risk engine.
///
/// Usage:
///   coastal_risk classify <parameter> <value>
///   coastal_risk assess <snapshot.json>
///
/// Configuration is read from the file named by `COASTAL_RISK_CONFIG`
/// (built-in thresholds otherwise). `COASTAL_RISK_LOG_LEVEL` and
/// `COASTAL_RISK_LOG_FILE` control logging. Console log lines go to stderr
/// so stdout carries only the command's result.

use std::env;
use std::fs;
use std::process::ExitCode;

use coastal_risk::alert::classify;
use coastal_risk::config::EngineConfig;
use coastal_risk::ingest::parse_snapshot;
use coastal_risk::logging::{self, Component, LogLevel};
use coastal_risk::model::ParameterKind;

const USAGE: &str = "usage:\n  coastal_risk classify <parameter> <value>\n  coastal_risk assess <snapshot.json>";

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let level = env::var("COASTAL_RISK_LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::Warning);
    let log_file = env::var("COASTAL_RISK_LOG_FILE").ok();
    logging::init_stderr_logger(level, log_file.as_deref(), log_file.is_some());

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            logging::error(Component::System, None, &message);
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    let config = EngineConfig::from_env().map_err(|e| e.to_string())?;

    match args {
        [cmd, parameter, value] if cmd == "classify" => {
            let kind = parameter
                .parse::<ParameterKind>()
                .map_err(|e| e.to_string())?;
            let value = parse_value(value)?;
            let tier = classify(value, kind, &config.thresholds).map_err(|e| e.to_string())?;
            Ok(tier.to_string())
        }
        [cmd, path] if cmd == "assess" => {
            let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            let snapshot = parse_snapshot(&json, &config.thresholds).map_err(|e| e.to_string())?;
            let assessment = snapshot.assess(&config.risk).map_err(|e| e.to_string())?;
            logging::log_assessment_summary(&assessment);
            serde_json::to_string_pretty(&assessment).map_err(|e| e.to_string())
        }
        _ => Err("unrecognized arguments".to_string()),
    }
}

/// Reading values are finite; `NaN` and infinities are rejected here since
/// they would fall through every threshold comparison as normal.
fn parse_value(text: &str) -> Result<f64, String> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("value must be finite: {}", text)),
        Err(_) => Err(format!("not a number: {}", text)),
    }
}
