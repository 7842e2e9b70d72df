use crate::PlayerId;
use tokio::sync::oneshot;

/// Dealer's judgement of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The hand was a set; its cards are gone and the score is already raised.
    Point,
    /// The hand was complete but not a set.
    Penalty,
    /// The hand lost a card to an earlier claim before it was judged.
    Stale,
}

/// A player's claim that its current hand is a set.
/// Consumed exactly once by the dealer, which always answers it.
#[derive(Debug)]
pub struct Request {
    player: PlayerId,
    reply: oneshot::Sender<Verdict>,
}

impl Request {
    pub fn new(player: PlayerId) -> (Self, oneshot::Receiver<Verdict>) {
        let (reply, verdict) = oneshot::channel();
        (Self { player, reply }, verdict)
    }
    pub fn player(&self) -> PlayerId {
        self.player
    }
    pub fn reply(self, verdict: Verdict) {
        if self.reply.send(verdict).is_err() {
            log::trace!("[dealer] P{} left before hearing {:?}", self.player, verdict);
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Verdict::Point => write!(f, "point"),
            Verdict::Penalty => write!(f, "penalty"),
            Verdict::Stale => write!(f, "stale"),
        }
    }
}
