use super::timing::TimerMode;
use crate::PlayerId;
use crate::cards::Rules;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Static game configuration, read once at construction.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
/// Durations are stored in milliseconds to keep the file format flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rows: usize,
    pub columns: usize,
    /// Values per feature; also the number of cards in a hand.
    pub feature_size: usize,
    /// Feature dimensions per card.
    pub feature_count: usize,
    /// Cards in play; `None` means the whole universe.
    pub deck_size: Option<usize>,
    /// Positive: countdown per round. Zero: elapsed display. Negative: no display.
    pub turn_timeout_millis: i64,
    pub turn_timeout_warning_millis: u64,
    pub point_freeze_millis: u64,
    pub penalty_freeze_millis: u64,
    /// Artificial delay before every card placement or removal.
    pub table_delay_millis: u64,
    /// Pause between two synthetic key presses of an AI driver.
    pub ai_delay_millis: u64,
    pub players: usize,
    /// The first `humans` players take external input; the rest are AI driven.
    pub humans: usize,
    pub names: Vec<String>,
    /// Log every set on the board after each deal.
    pub hints: bool,
    /// Seed for shuffles and AI choices; random when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 4,
            feature_size: 3,
            feature_count: 4,
            deck_size: None,
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            table_delay_millis: 100,
            ai_delay_millis: 10,
            players: 2,
            humans: 0,
            names: Vec::new(),
            hints: false,
            seed: None,
        }
    }
}

impl Config {
    /// Read a JSON file, filling absent keys with defaults, and validate it.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        let config = serde_json::from_str::<Self>(&text)
            .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.slots() > 0, "board has no slots");
        anyhow::ensure!(self.feature_size >= 2, "feature size must be at least 2");
        anyhow::ensure!(self.feature_count >= 1, "feature count must be at least 1");
        let universe = self
            .rules()
            .universe()
            .ok_or_else(|| anyhow::anyhow!("card universe overflows"))?;
        anyhow::ensure!(
            self.deck_size.unwrap_or(universe) <= universe,
            "deck of {} exceeds the {} distinct cards",
            self.deck_size.unwrap_or(universe),
            universe
        );
        anyhow::ensure!(
            self.slots() >= self.feature_size,
            "board of {} slots cannot hold a hand of {}",
            self.slots(),
            self.feature_size
        );
        anyhow::ensure!(self.players > 0, "no players");
        anyhow::ensure!(
            self.humans <= self.players,
            "{} humans among {} players",
            self.humans,
            self.players
        );
        anyhow::ensure!(
            self.names.len() <= self.players,
            "{} names for {} players",
            self.names.len(),
            self.players
        );
        Ok(())
    }
}

impl Config {
    pub fn slots(&self) -> usize {
        self.rows * self.columns
    }
    pub fn rules(&self) -> Rules {
        Rules::new(self.feature_size, self.feature_count)
    }
    /// Only meaningful on a validated config.
    pub fn deck(&self) -> usize {
        self.deck_size
            .or_else(|| self.rules().universe())
            .unwrap_or_default()
    }
    pub fn timer(&self) -> TimerMode {
        TimerMode::new(self.turn_timeout_millis, self.turn_timeout_warning_millis)
    }
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }
    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_millis)
    }
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_millis)
    }
    pub fn is_human(&self, player: PlayerId) -> bool {
        player < self.humans
    }
    pub fn name(&self, player: PlayerId) -> String {
        self.names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", player + 1))
    }
}
