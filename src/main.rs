use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stick2x::dispatch::DEFAULT_KEY_PROGRAM;
use stick2x::joystick::{JoystickDevice, ReconnectPolicy, ThreadSleeper, DEFAULT_DEVICE_PATH};
use stick2x::{MappingDocument, Mapper, ProcessDispatcher, Supervisor};

#[derive(Parser, Debug)]
#[command(name = "stick2x", version)]
#[command(about = "Map joystick buttons and axes to keystrokes and commands")]
struct Cli {
    /// YAML file with the `configurations` mapping
    config: PathBuf,

    /// Joystick device node
    #[arg(short, long, default_value = DEFAULT_DEVICE_PATH)]
    device: PathBuf,

    /// Name of the configuration to use
    #[arg(short, long, default_value = "global")]
    profile: String,

    /// Program invoked as `<program> key <name>` for key actions
    #[arg(long, default_value = DEFAULT_KEY_PROGRAM)]
    key_program: String,

    /// Delay added after every failed device probe (ms)
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u64).range(1..))]
    retry_step_ms: u64,

    /// Give up once the probe delay grows past this (ms)
    #[arg(long, default_value_t = 2000)]
    retry_ceiling_ms: u64,

    /// Pause after a disconnect before probing again (ms)
    #[arg(long, default_value_t = 1000)]
    disconnect_pause_ms: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            step: Duration::from_millis(self.retry_step_ms),
            ceiling: Duration::from_millis(self.retry_ceiling_ms),
            disconnect_pause: Duration::from_millis(self.disconnect_pause_ms),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version are not failures.
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let profile = MappingDocument::load(&cli.config)?
        .into_profile(&cli.profile)
        .with_context(|| format!("Selecting configuration from {}", cli.config.display()))?;

    let mut mapper = Mapper::new(profile);
    info!(
        "Loaded configuration \"{}\" with {} mapped controls",
        cli.profile,
        mapper.mapped_controls()
    );

    let policy = cli.reconnect_policy();
    let mut dispatcher = ProcessDispatcher::new(cli.key_program);
    let mut supervisor = Supervisor::new(JoystickDevice::new(cli.device), ThreadSleeper, policy);

    match supervisor.run(&mut mapper, &mut dispatcher) {
        Ok(never) => match never {},
        Err(err) => Err(err).context("Device connection retry timed out"),
    }
}
