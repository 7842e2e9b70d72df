use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// A card is nothing more than its identity in `0..featureSize^featureCount`.
/// Features are recovered by [`super::Rules::features`], which knows the base.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card(usize);

impl Card {
    pub fn id(&self) -> usize {
        self.0
    }
}

/// usize isomorphism
impl From<usize> for Card {
    fn from(n: usize) -> Self {
        Self(n)
    }
}
impl From<Card> for usize {
    fn from(c: Card) -> usize {
        c.0
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "#{}", self.0)
    }
}
