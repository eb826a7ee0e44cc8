use super::{load_events, write_json, IoArgs};
use crate::reports;
use clap::Args;
use fretforge::config::Config;
use fretforge::error::FretResult;
use fretforge::Fretboard;

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub io: IoArgs,
}

pub fn run(args: ResolveArgs, board: &Fretboard) -> FretResult<()> {
    let events = load_events(&args.io.events)?;
    let resolution = board.resolve_positions(&events)?;

    if args.io.report {
        reports::print_events("Resolved Positions", &resolution.events);
        reports::print_resolution_summary(&resolution);
    }

    write_json(&resolution, &args.io.output)
}
