//! Set Game Binary
//!
//! Plays a game in the terminal. Humans press slots by typing
//! `<player> <slot>` lines; robots fill the remaining seats.

use clap::Parser;
use setgame::*;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about = "Play the card-matching game Set", long_about = None)]
struct Args {
    #[arg(long, help = "JSON configuration file")]
    config: Option<std::path::PathBuf>,
    #[arg(long)]
    players: Option<usize>,
    #[arg(long, help = "Number of keyboard players, seated first")]
    humans: Option<usize>,
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    columns: Option<usize>,
    #[arg(long, help = "Turn timeout: >0 counts down, 0 counts up, <0 shows nothing")]
    timeout: Option<i64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, help = "Log every set on the board after each deal")]
    hints: bool,
    #[arg(long, short, help = "Show DEBUG records on the terminal")]
    verbose: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<config::Config> {
        let mut config = match self.config {
            Some(ref path) => config::Config::load(path)?,
            None => config::Config::default(),
        };
        config.players = self.players.unwrap_or(config.players);
        config.humans = self.humans.unwrap_or(config.humans);
        config.rows = self.rows.unwrap_or(config.rows);
        config.columns = self.columns.unwrap_or(config.columns);
        config.turn_timeout_millis = self.timeout.unwrap_or(config.turn_timeout_millis);
        config.seed = self.seed.or(config.seed);
        config.hints |= self.hints;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log(args.verbose)?;
    let config = args.config()?;
    let names = (0..config.players).map(|p| config.name(p)).collect();
    let sink = Arc::new(gameroom::Console::new(names));
    let (dealer, controls) = gameroom::Dealer::new(config, sink)?;
    kys(controls.clone());
    brb(controls);
    let outcome = dealer.run().await;
    log::info!("final scores {:?}", outcome.scores);
    Ok(())
}
