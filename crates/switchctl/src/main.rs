use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use switchsim_core::ConfigurationUpdateRequest;
use tracing_subscriber::EnvFilter;

use switchctl::output::{render_changes, render_config, render_errors};
use switchctl::{Backend, Cli, Command, SetCommand, ShowArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        Command::Version => {
            println!("SwitchConfigSim v{}", env!("CARGO_PKG_VERSION"));
            println!("Simulates NVUE-style network switch management");
            Ok(ExitCode::SUCCESS)
        }
        Command::Show(args) => show(&Backend::connect(cli.server.as_deref())?, args).await,
        Command::Set(set) => apply(&Backend::connect(cli.server.as_deref())?, set).await,
    }
}

async fn show(backend: &Backend, args: ShowArgs) -> Result<ExitCode> {
    if args.live {
        let report = backend.live_status(args.section.map(Into::into)).await?;
        println!("{}", report.trim_end());
        return Ok(ExitCode::SUCCESS);
    }

    let config = backend.snapshot().await?;

    if args.json {
        let json = match args.section {
            Some(switchctl::Section::System) => serde_json::json!({
                "hostname": config.hostname,
                "status": config.status,
            }),
            Some(switchctl::Section::Interfaces) => serde_json::json!({
                "interfaces": config.interfaces,
            }),
            None => serde_json::to_value(&config)?,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print!("{}", render_config(&config, args.section));
    }

    Ok(ExitCode::SUCCESS)
}

async fn apply(backend: &Backend, set: SetCommand) -> Result<ExitCode> {
    let request = match set {
        SetCommand::Hostname { name } => ConfigurationUpdateRequest::new().with_hostname(name),
        SetCommand::Interface { name, state } => {
            ConfigurationUpdateRequest::new().with_interface(name, state.as_str())
        }
    };

    let outcome = backend.apply(request).await?;

    print!("{}", render_changes(&outcome));
    eprint!("{}", render_errors(&outcome.errors));

    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
