use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use fretforge::api::DEFAULT_MAX_FRET;
use fretforge::config::Config;
use fretforge::error::FretResult;
use fretforge::geometry::{Fret, Tuning};
use fretforge::Fretboard;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tuning JSON (`{"name": .., "strings": [{"id": .., "openPitch": ..}]}`)
    #[arg(global = true, short, long)]
    tuning: Option<String>,

    #[arg(global = true, short, long, default_value_t = DEFAULT_MAX_FRET)]
    max_fret: Fret,

    /// Search/weight settings JSON; flags given on the command line win
    #[arg(global = true, long)]
    weights: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Resolve(cmd::resolve::ResolveArgs),
    Transpose(cmd::transpose::TransposeArgs),
    Shift(cmd::shift::ShiftArgs),
}

fn resolve_config(cli_config: &Config, weights: &Option<String>, sub_matches: &ArgMatches) -> FretResult<Config> {
    match weights {
        Some(path) => {
            info!("⚖️  Loading weights from: {}", path);
            let mut config = Config::read_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            config.validate()?;
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let tuning = match &cli.tuning {
        Some(path) => {
            info!("📂 Loading tuning: {}", path);
            Tuning::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            })
        }
        None => {
            warn!("⚠️  No tuning given, using standard guitar");
            Tuning::standard_guitar()
        }
    };

    let (cli_config, sub_name) = match &cli.command {
        Commands::Resolve(args) => (&args.config, "resolve"),
        Commands::Transpose(args) => (&args.config, "transpose"),
        Commands::Shift(args) => (&args.config, "shift"),
    };
    let Some(sub_matches) = matches.subcommand_matches(sub_name) else {
        error!("❌ Missing arguments for '{}'", sub_name);
        process::exit(2);
    };

    let config = resolve_config(cli_config, &cli.weights, sub_matches).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    let board = Fretboard::new(tuning, cli.max_fret, config).unwrap_or_else(|e| {
        error!("\n❌ FATAL ERROR INITIALIZING FRETBOARD:");
        error!("   {}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Resolve(args) => cmd::resolve::run(args, &board),
        Commands::Transpose(args) => cmd::transpose::run(args, &board),
        Commands::Shift(args) => cmd::shift::run(args, &board),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
