use crate::Slot;

/// Input queued to a player: a slot press, or the sentinel that wakes a
/// player so it can notice it is shutting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle(Slot),
    Shutdown,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Toggle(slot) => write!(f, "toggle {}", slot),
            Action::Shutdown => write!(f, "shutdown"),
        }
    }
}
