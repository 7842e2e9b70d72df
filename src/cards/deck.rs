use super::card::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// Cards neither on the board nor claimed. Draws come off the top; cards
/// collected at the end of a round are put back and reshuffled before reuse.
#[derive(Debug, Clone, Default)]
pub struct Deck(Vec<Card>);

impl From<usize> for Deck {
    fn from(n: usize) -> Self {
        Self((0..n).map(Card::from).collect())
    }
}
impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

impl Deck {
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }
    /// remove the top card
    pub fn draw(&mut self) -> Option<Card> {
        self.0.pop()
    }
    /// return a card to the bottom
    pub fn put(&mut self, card: Card) {
        debug_assert!(!self.0.contains(&card), "{} already in deck", card);
        self.0.insert(0, card);
    }
    pub fn cards(&self) -> &[Card] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
