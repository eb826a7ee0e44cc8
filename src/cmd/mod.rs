pub mod resolve;
pub mod shift;
pub mod transpose;

use clap::Args;
use fretforge::error::FretResult;
use fretforge::resolver::{JsonMeta, TabEvent};
use serde::Serialize;
use std::fs;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// JSON array of events, each with a `notes` list
    #[arg(short, long)]
    pub events: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print a summary table to stderr
    #[arg(long, default_value_t = false)]
    pub report: bool,
}

pub fn load_events(path: &str) -> FretResult<Vec<TabEvent<JsonMeta>>> {
    info!("📂 Loading events: {}", path);
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_json<T: Serialize>(value: &T, output: &Option<String>) -> FretResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!("💾 Wrote {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
