use crate::PlayerId;
use crate::Score;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Identity and score of one player, shared between its actor and the dealer.
/// Only the dealer raises the score.
#[derive(Debug)]
pub struct Seat {
    id: PlayerId,
    name: String,
    human: bool,
    score: AtomicUsize,
}

impl Seat {
    pub fn new(id: PlayerId, name: String, human: bool) -> Self {
        Self {
            id,
            name,
            human,
            score: AtomicUsize::new(0),
        }
    }
    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_human(&self) -> bool {
        self.human
    }
    pub fn score(&self) -> Score {
        self.score.load(Ordering::Acquire)
    }
    /// Credit one set, returning the new score.
    pub fn point(&self) -> Score {
        self.score.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} (P{})", self.name, self.id)
    }
}
