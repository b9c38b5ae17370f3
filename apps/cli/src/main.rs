mod input;

use std::path::PathBuf;
use std::time::Duration;

use chd_model::{
    body_mass_index, highlight_form, numeric_severity, validate, Field, ResultReport,
    ValidationErrors, FAILURE_MESSAGE,
};
use chd_predictor::{build_gateway, ConfigError, GatewayConfig, GatewayKind, GatewayOverrides};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use log::{debug, error, info};
use serde_json::{json, Value};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::input::{parse_form, read_source, InputError};

const CLI_VERSION: &str = "1.0";
const BAR_WIDTH: usize = 20;

const EXIT_OK: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_INVALID_INPUT: i32 = 3;
const EXIT_PREDICTION: i32 = 4;

/// Coronary heart disease risk questionnaire, scriptable edition.
#[derive(Parser, Debug)]
#[command(name = "chd", version)]
struct Cli {
    /// Wrap output in a JSON envelope.
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check an input document against the form rules.
    Validate { input: PathBuf },
    /// Show which values fall in a moderate or high risk band.
    Highlight { input: PathBuf },
    /// Validate the input and ask the predictor for a risk estimate.
    Predict {
        input: PathBuf,
        #[command(flatten)]
        gateway: GatewayArgs,
    },
    /// Body mass index from height and weight.
    Bmi {
        #[arg(long)]
        height_cm: f64,
        #[arg(long)]
        weight_kg: f64,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Validate { .. } => "validate",
            Command::Highlight { .. } => "highlight",
            Command::Predict { .. } => "predict",
            Command::Bmi { .. } => "bmi",
        }
    }
}

#[derive(Args, Debug)]
struct GatewayArgs {
    #[arg(long)]
    gateway: Option<GatewayKind>,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    mock_delay_ms: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
}

impl GatewayArgs {
    fn overrides(&self) -> GatewayOverrides {
        GatewayOverrides {
            kind: self.gateway,
            endpoint: self.endpoint.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            mock_delay: self.mock_delay_ms.map(Duration::from_millis),
            seed: self.seed,
        }
    }
}

#[derive(Debug)]
struct CliError {
    code: i32,
    command: String,
    kind: &'static str,
    message: String,
    details: Value,
}

impl CliError {
    fn new(code: i32, command: &str, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            command: command.to_string(),
            kind,
            message: message.into(),
            details: Value::Null,
        }
    }

    fn validation(cmd: &str, errors: &ValidationErrors) -> Self {
        let fields: Vec<Value> = errors
            .iter()
            .map(|e| json!({ "field": e.field.wire_name(), "message": e.to_string() }))
            .collect();
        Self {
            details: Value::from(fields),
            ..Self::new(EXIT_VALIDATION, cmd, "ValidationError", errors.to_string())
        }
    }

    fn input(cmd: &str, err: InputError) -> Self {
        match err {
            InputError::Io(_) => Self::new(EXIT_IO, cmd, "IoError", err.to_string()),
            _ => Self::new(EXIT_INVALID_INPUT, cmd, "InvalidInput", err.to_string()),
        }
    }

    fn config(cmd: &str, err: ConfigError) -> Self {
        Self::new(EXIT_INVALID_INPUT, cmd, "ConfigError", err.to_string())
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(EXIT_INVALID_INPUT, "unknown", "InvalidCommand", message)
    }
}

/// Command payload plus its plain-text rendering.
struct Output {
    data: Value,
    text: String,
}

fn main() {
    let json_requested = std::env::args().any(|a| a == "--json");
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => print_error(json_requested, CliError::invalid(e.to_string().trim_end())),
    };

    // Stderr carries the JSON error envelope in --json mode.
    let level = match (cli.verbose, cli.json) {
        (true, _) => LevelFilter::Debug,
        (false, true) => LevelFilter::Off,
        (false, false) => LevelFilter::Warn,
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Never);

    let name = cli.command.name();
    match run(cli.command) {
        Ok(output) => {
            print_success(cli.json, name, output);
            std::process::exit(EXIT_OK);
        }
        Err(err) => print_error(cli.json, err),
    }
}

fn run(command: Command) -> Result<Output, CliError> {
    let name = command.name();
    match command {
        Command::Validate { input } => {
            let form = read_source(&input)
                .and_then(|text| parse_form(&text))
                .map_err(|e| CliError::input(name, e))?;
            let checked = validate(&form).map_err(|e| CliError::validation(name, &e))?;
            Ok(Output {
                data: json!({ "valid": true, "input": checked }),
                text: "Input is valid.".to_string(),
            })
        }
        Command::Highlight { input } => {
            let form = read_source(&input)
                .and_then(|text| parse_form(&text))
                .map_err(|e| CliError::input(name, e))?;
            let levels = highlight_form(&form);
            let mut data = serde_json::Map::new();
            let mut text = Vec::new();
            for (field, severity) in levels.iter() {
                data.insert(field.wire_name().to_string(), Value::from(severity.as_str()));
                text.push(format!("{:<26}{}", field.label(), severity.as_str()));
            }
            Ok(Output {
                data: json!({ "levels": data, "highest": levels.highest().as_str() }),
                text: text.join("\n"),
            })
        }
        Command::Predict { input, gateway } => {
            let form = read_source(&input)
                .and_then(|text| parse_form(&text))
                .map_err(|e| CliError::input(name, e))?;
            let checked = validate(&form).map_err(|e| CliError::validation(name, &e))?;
            let config = GatewayConfig::from_env()
                .and_then(|c| c.with_overrides(gateway.overrides()))
                .map_err(|e| CliError::config(name, e))?;
            debug!("predictor config: {config:?}");

            let outcome = build_gateway(&config).and_then(|g| g.predict(&checked));
            let report = ResultReport::from_outcome(&outcome);
            match outcome {
                Ok(result) => {
                    info!("{} at {:.3}", result.classification.label(), result.probability);
                    Ok(Output {
                        text: report.to_text(BAR_WIDTH),
                        data: json!({ "input": checked, "result": result, "report": report }),
                    })
                }
                Err(e) => {
                    error!("prediction failed: {e}");
                    Err(CliError::new(
                        EXIT_PREDICTION,
                        name,
                        "PredictionError",
                        format!("{FAILURE_MESSAGE} ({e})"),
                    ))
                }
            }
        }
        Command::Bmi { height_cm, weight_kg } => {
            let bmi = body_mass_index(height_cm, weight_kg).ok_or_else(|| {
                CliError::new(
                    EXIT_INVALID_INPUT,
                    name,
                    "InvalidInput",
                    "height and weight must be positive numbers",
                )
            })?;
            let severity = numeric_severity(Field::Bmi, bmi);
            Ok(Output {
                data: json!({ "bmi": bmi, "severity": severity.as_str() }),
                text: format!("BMI {bmi:.2} ({})", severity.as_str()),
            })
        }
    }
}

fn print_success(json_mode: bool, command: &str, output: Output) {
    if json_mode {
        let response = json!({
            "status": "ok",
            "version": CLI_VERSION,
            "command": command,
            "data": output.data,
            "error": null
        });
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        println!("{}", output.text);
    }
}

fn print_error(json_mode: bool, err: CliError) -> ! {
    if json_mode {
        let response = json!({
            "status": "error",
            "version": CLI_VERSION,
            "command": err.command,
            "data": null,
            "error": {
                "code": err.code,
                "type": err.kind,
                "message": err.message,
                "details": err.details
            }
        });
        eprintln!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        eprintln!("Error: {}", err.message);
    }
    std::process::exit(err.code);
}
