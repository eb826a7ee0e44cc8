use super::{load_events, write_json, IoArgs};
use crate::reports;
use clap::Args;
use fretforge::config::Config;
use fretforge::error::FretResult;
use fretforge::Fretboard;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct TransposeArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub io: IoArgs,

    #[arg(short, long, allow_hyphen_values = true)]
    pub semitones: i32,
}

pub fn run(args: TransposeArgs, board: &Fretboard) -> FretResult<()> {
    let events = load_events(&args.io.events)?;
    info!("🎼 Transposing by {} semitones", args.semitones);
    let transposed = board.transpose(&events, args.semitones)?;

    if args.io.report {
        let title = format!("Transposed {:+}", args.semitones);
        reports::print_events(&title, &transposed);
    }

    write_json(&transposed, &args.io.output)
}
