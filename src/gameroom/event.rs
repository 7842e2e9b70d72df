use crate::PlayerId;
use crate::Score;
use crate::Slot;
use crate::cards::Card;
use std::time::Duration;

/// Notifications sent to the render sink.
/// The engine never reads anything back from the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    CardPlaced { card: Card, slot: Slot },
    CardRemoved { slot: Slot },
    TokenPlaced { player: PlayerId, slot: Slot },
    TokenRemoved { player: PlayerId, slot: Slot },
    /// Every token on one slot, or on the whole board when `None`.
    TokensCleared { slot: Option<Slot> },
    Score { player: PlayerId, score: Score },
    /// Remaining freeze; zero when the player is released.
    Freeze { player: PlayerId, remaining: Duration },
    Countdown { remaining: Duration, warn: bool },
    Elapsed { elapsed: Duration },
    Winners(Vec<PlayerId>),
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::CardPlaced { card, slot } => write!(f, "{} -> slot {}", card, slot),
            Event::CardRemoved { slot } => write!(f, "slot {} cleared", slot),
            Event::TokenPlaced { player, slot } => write!(f, "P{} token on {}", player, slot),
            Event::TokenRemoved { player, slot } => write!(f, "P{} token off {}", player, slot),
            Event::TokensCleared { slot: Some(slot) } => write!(f, "tokens cleared from {}", slot),
            Event::TokensCleared { slot: None } => write!(f, "all tokens cleared"),
            Event::Score { player, score } => write!(f, "P{} scores {}", player, score),
            Event::Freeze { player, remaining } if remaining.is_zero() => {
                write!(f, "P{} unfrozen", player)
            }
            Event::Freeze { player, remaining } => {
                write!(f, "P{} frozen {}s", player, remaining.as_secs_f32().ceil())
            }
            Event::Countdown { remaining, warn } => write!(
                f,
                "{:.1}s left{}",
                remaining.as_secs_f32(),
                if *warn { "!" } else { "" }
            ),
            Event::Elapsed { elapsed } => write!(f, "{}s elapsed", elapsed.as_secs()),
            Event::Winners(winners) => write!(
                f,
                "Winners: {}",
                winners
                    .iter()
                    .map(|p| format!("P{}", p))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
