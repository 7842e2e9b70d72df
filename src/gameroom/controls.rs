use super::*;
use crate::PlayerId;
use crate::Slot;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// External handle on a running game: feeds slot presses to players and
/// requests an early stop. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Controls {
    stop: Arc<Stop>,
    inboxes: Vec<mpsc::Sender<Action>>,
}

impl Controls {
    pub fn new(stop: Stop, inboxes: Vec<mpsc::Sender<Action>>) -> Self {
        Self {
            stop: Arc::new(stop),
            inboxes,
        }
    }
    /// Queue a press for the player. Returns false when the press was dropped
    /// because the player's queue is full, the player is gone or unknown.
    pub fn press(&self, player: PlayerId, slot: Slot) -> bool {
        let Some(inbox) = self.inboxes.get(player) else {
            log::warn!("[controls] no player P{}", player);
            return false;
        };
        match inbox.try_send(Action::Toggle(slot)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::trace!("[controls] P{} queue full, dropped {}", player, slot);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
    pub fn stop(&self) {
        log::info!("[controls] stop requested");
        self.stop.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn full_queue_drops_presses() {
        let (tx, mut rx) = mpsc::channel(3);
        let (stop, halt) = signal();
        let controls = Controls::new(stop, vec![tx]);
        assert!((0..3).all(|s| controls.press(0, s)));
        assert!(!controls.press(0, 3));
        assert!(!controls.press(1, 0));
        assert_eq!(rx.try_recv().ok(), Some(Action::Toggle(0)));
        assert!(controls.press(0, 4));
        controls.stop();
        assert!(halt.is_set());
    }
}
