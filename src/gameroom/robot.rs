use super::*;
use crate::PlayerId;
use crate::Slot;
use crate::board::Board;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Synthetic key presser for a computer player.
///
/// Waits for room in the player's queue, then presses a slot: one of its own
/// tokens when the hand is full, otherwise an occupied slot it has no token
/// on yet. Makes no judgement of its own.
pub struct Robot {
    id: PlayerId,
    board: Arc<Board>,
    outbox: mpsc::Sender<Action>,
    halt: Halt,
    delay: Duration,
    rng: SmallRng,
}

impl Robot {
    pub fn new(
        id: PlayerId,
        board: Arc<Board>,
        outbox: mpsc::Sender<Action>,
        halt: Halt,
        delay: Duration,
        rng: SmallRng,
    ) -> Self {
        Self {
            id,
            board,
            outbox,
            halt,
            delay,
            rng,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        log::info!("[robot P{}] starting", self.id);
        while !self.halt.is_set() {
            let permit = tokio::select! {
                biased;
                _ = self.halt.wait() => None,
                permit = self.outbox.reserve() => permit.ok(),
            };
            let Some(permit) = permit else {
                break;
            };
            let slot = Self::choose(self.id, &self.board, &mut self.rng);
            log::trace!("[robot P{}] presses {}", self.id, slot);
            permit.send(Action::Toggle(slot));
            let halted = tokio::select! {
                biased;
                _ = self.halt.wait() => true,
                _ = tokio::time::sleep(self.delay) => false,
            };
            if halted {
                break;
            }
        }
        let _ = self.outbox.try_send(Action::Shutdown);
        log::info!("[robot P{}] terminated", self.id);
    }

    fn choose(id: PlayerId, board: &Board, rng: &mut SmallRng) -> Slot {
        let tokens = board.tokens(id);
        if tokens.len() >= board.rules().size() {
            if let Some(slot) = tokens.choose(rng) {
                return *slot;
            }
        }
        board
            .occupied()
            .into_iter()
            .filter(|slot| !tokens.contains(slot))
            .collect::<Vec<_>>()
            .choose(rng)
            .copied()
            .unwrap_or_else(|| rng.random_range(0..board.slots()))
    }
}
