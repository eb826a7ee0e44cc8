use super::{load_events, write_json, IoArgs};
use crate::reports;
use clap::Args;
use fretforge::config::Config;
use fretforge::error::FretResult;
use fretforge::Fretboard;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ShiftArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub io: IoArgs,

    /// Strings to move by; positive moves toward the end of the string order
    #[arg(short = 'k', long, allow_hyphen_values = true)]
    pub offset: i32,

    /// Fall back to the widest feasible offset instead of giving up
    #[arg(long, default_value_t = false)]
    pub coerce: bool,
}

pub fn run(args: ShiftArgs, board: &Fretboard) -> FretResult<()> {
    let events = load_events(&args.io.events)?;

    let applied = if args.coerce {
        let coerced = board.coerce_shift_to_feasible(&events, args.offset);
        if coerced != args.offset {
            warn!(
                "⚠️  Offset {} is not feasible, using {} instead",
                args.offset, coerced
            );
        }
        coerced
    } else {
        args.offset
    };

    let outcome = board.shift_strings(&events, applied);
    if outcome.feasible {
        info!("🎸 Shifted by {} strings", applied);
    } else {
        warn!("⚠️  Shift by {} is not feasible; events left unchanged", applied);
    }

    if args.io.report {
        reports::print_shift_summary(args.offset, applied, outcome.feasible);
        reports::print_events("Shifted Positions", &outcome.events);
    }

    write_json(&outcome, &args.io.output)
}
