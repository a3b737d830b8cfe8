use cli::Args;
use log::{error, info, warn};
use lucent_core::{Config, LucentResult};
use std::process::ExitCode;

mod cli;
mod error_dialog;
mod logger;

fn load_config(args: &Args) -> LucentResult<Config> {
    let mut config = if args.use_defaults {
        info!("Using default configuration");
        Config::default()
    } else {
        let config = Config::load(args.config_path.as_deref(), true)?;
        if let Some(path) = &config.config_path {
            info!("Loaded config from {}", path.display());
        }
        config
    };

    if let Some(content) = &args.content_path {
        config.content_path = Some(std::path::absolute(content).unwrap_or_else(|_| content.clone()));
    }

    Ok(config)
}

fn main() -> ExitCode {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(args.quiet, args.verbose) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!("Starting Lucent {}", lucent_core::version());

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            error_dialog::show_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.dry_run {
        info!("Configuration is valid");
        info!("Overlay content: {}", config.content_path().display());
        info!(
            "Hotkeys: {} toggles, {} quits",
            config.toggle_hotkey, config.quit_hotkey
        );
        return ExitCode::SUCCESS;
    }

    if let Err(e) = ctrlc::set_handler(|| {
        info!("Termination requested, shutting down");
        lucent_core::request_shutdown();
    }) {
        warn!("Could not install the termination handler: {e}");
    }

    match lucent_core::start(config) {
        Ok(()) => {
            info!("Lucent stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            error_dialog::show_error(&e);
            ExitCode::FAILURE
        }
    }
}
