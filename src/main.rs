//! devbridge - device settings bridge
//!
//! This is the binary entry point. All logic lives in the library crates.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use devbridge::{run_headless, HeadlessSession};
use devbridge_app::config::{
    config_path, init_config_dir, load_settings_file_strict, load_settings_strict, Settings,
};
use devbridge_app::Method;
use devbridge_core::logging::{self, ChannelMode};
use devbridge_core::prelude::*;

/// devbridge - device settings and screen-content bridge
#[derive(Parser, Debug)]
#[command(name = "devbridge")]
#[command(about = "Device settings and screen-content bridge", long_about = None)]
struct Args {
    /// Config file (defaults to .devbridge/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Serve NDJSON on stdin/stdout without the startup banner
    #[arg(long)]
    headless: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a single method call and print the response line
    Call {
        /// Method name, e.g. setBrightness
        method: String,

        /// Arguments as a JSON object, e.g. '{"brightness": 75}'
        args: Option<String>,
    },

    /// Write a default .devbridge/config.toml
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    logging::init()?;

    let project_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if let Some(Command::Init) = &args.command {
        init_config_dir(&project_path)?;
        eprintln!("Wrote {}", config_path(&project_path).display());
        return Ok(());
    }

    let (settings, base) = load(&args, &project_path)?;
    let session = HeadlessSession::from_settings(&settings, &base)?;

    match args.command {
        Some(Command::Call { method, args: call_args }) => {
            let info = &session.bridge().host().info;
            logging::log_channel_start(ChannelMode::SingleCall, info.sdk_level, &info.package_name);
            let line = session.call(&method, call_args.as_deref())?;
            println!("{}", line);
        }
        Some(Command::Init) => {}
        None => {
            if !args.headless {
                print_banner();
            }
            run_headless(&session).await?;
        }
    }

    info!("devbridge exiting");
    Ok(())
}

/// Load settings strictly; config errors abort startup
fn load(args: &Args, project_path: &Path) -> Result<(Settings, PathBuf)> {
    match &args.config {
        Some(path) => {
            let settings = load_settings_file_strict(path)?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| project_path.to_path_buf());
            Ok((settings, base))
        }
        None => Ok((
            load_settings_strict(project_path)?,
            project_path.join(".devbridge"),
        )),
    }
}

fn print_banner() {
    eprintln!("devbridge: reading method calls from stdin, one JSON object per line");
    eprintln!("  e.g. {{\"id\":1,\"method\":\"setBrightness\",\"arguments\":{{\"brightness\":75}}}}");
    eprintln!(
        "  methods: {}",
        Method::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Ok(log) = logging::get_current_log_file() {
        eprintln!("  log: {}", log.display());
    }
}
