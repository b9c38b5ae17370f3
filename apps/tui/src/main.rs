mod app;
mod controller;
mod event;
mod model;
mod tui;
mod view;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chd_predictor::{build_gateway, GatewayConfig, GatewayKind, GatewayOverrides};
use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::event::EventHandler;
use crate::tui::Tui;

/// Interactive coronary heart disease risk questionnaire.
#[derive(Parser, Debug)]
#[command(name = "chd-tui", version)]
struct Args {
    /// Prediction backend: `mock` or `http`.
    #[arg(long)]
    gateway: Option<GatewayKind>,
    /// URL of the remote `/predict` endpoint.
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Artificial latency of the mock predictor.
    #[arg(long)]
    mock_delay_ms: Option<u64>,
    /// Makes the mock predictor deterministic.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "chd-tui.log")]
    log_file: PathBuf,
    #[arg(long)]
    verbose: bool,
}

impl Args {
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

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file.display()))?;
    let _ = WriteLogger::init(level, Config::default(), log_file);

    let config = GatewayConfig::from_env()
        .and_then(|c| c.with_overrides(args.overrides()))
        .context("invalid predictor configuration")?;
    let gateway = build_gateway(&config).context("cannot start predictor")?;
    info!("session started with {} gateway", config.kind);

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = Tui::restore_terminal();
        default_hook(panic);
    }));

    let mut app = App::new(gateway);
    let mut tui = Tui::new()?;
    let event_handler = EventHandler::new();

    let outcome = run(&mut app, &mut tui, &event_handler);

    Tui::restore_terminal()?;
    info!("session ended with {} prediction(s)", app.controller.history().len());
    outcome
}

fn run(app: &mut App, tui: &mut Tui, events: &EventHandler) -> Result<()> {
    while app.state.is_running {
        tui.draw(app)?;
        let action = events.next(app.key_context())?;
        app.dispatch(action)?;
    }
    Ok(())
}
