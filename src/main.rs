use clap::Parser;

use emoji_mosaic::cli::{self, Args, Command};
use emoji_mosaic::config::Config;

fn load_config(args: &Args) -> Config {
    // An explicit --config must load; the default location falls back to defaults
    match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) if args.config.is_some() => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config file: {}", e);
            eprintln!("Using default settings.\n");
            Config::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Command::Config { ref action } => {
            cli::handle_config_action(action.clone(), args.config.as_deref())
        }
        Command::Palettes { json } => cli::list_palettes(json),
        Command::Analyze(ref analyze) => cli::run_analyze(analyze.clone(), &load_config(&args)),
        Command::Convert(ref convert) => {
            let config = load_config(&args);
            run_async(cli::run_convert(convert.clone(), &config))
        }
        Command::Play(ref play) => {
            let config = load_config(&args);
            run_async(cli::run_play(play.clone(), &config))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_async<F>(future: F) -> Result<(), String>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;
    rt.block_on(future)
}
