use super::card::Card;
use itertools::Itertools;

/// Set-math over cards whose features are the digits of their identity
/// in base `size`. A hand holds exactly `size` cards and is a set iff,
/// independently for every feature, the values are all equal or all distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    size: usize,
    count: usize,
}

impl Rules {
    pub fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }
    /// Cards per hand, which is also the number of values per feature.
    pub fn size(&self) -> usize {
        self.size
    }
    /// Feature dimensions per card.
    pub fn count(&self) -> usize {
        self.count
    }
    /// Number of distinct cards, or None if it overflows.
    pub fn universe(&self) -> Option<usize> {
        u32::try_from(self.count)
            .ok()
            .and_then(|count| self.size.checked_pow(count))
    }

    /// Digits of the card in base `size`, least significant first.
    pub fn features(&self, card: Card) -> Vec<usize> {
        let mut n = card.id();
        let mut digits = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            digits.push(n % self.size);
            n /= self.size;
        }
        digits
    }

    pub fn is_set(&self, cards: &[Card]) -> bool {
        if cards.len() != self.size || !cards.iter().all_unique() {
            return false;
        }
        let features = cards.iter().map(|c| self.features(*c)).collect::<Vec<_>>();
        (0..self.count)
            .map(|i| features.iter().map(|f| f[i]).unique().count())
            .all(|n| n == 1 || n == self.size)
    }

    /// Lazily enumerates every valid hand among `cards`.
    pub fn sets<'a>(&'a self, cards: &'a [Card]) -> impl Iterator<Item = Vec<Card>> + 'a {
        cards
            .iter()
            .copied()
            .combinations(self.size)
            .filter(|hand| self.is_set(hand))
    }

    /// At most `limit` valid hands among `cards`.
    pub fn find(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
        self.sets(cards).take(limit).collect()
    }

    pub fn has_set(&self, cards: &[Card]) -> bool {
        self.sets(cards).next().is_some()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(3, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(ids: &[usize]) -> Vec<Card> {
        ids.iter().copied().map(Card::from).collect()
    }

    #[test]
    fn features_are_base_digits() {
        let rules = Rules::default();
        assert_eq!(rules.features(Card::from(0)), vec![0, 0, 0, 0]);
        assert_eq!(rules.features(Card::from(5)), vec![2, 1, 0, 0]);
        assert_eq!(rules.features(Card::from(9)), vec![0, 0, 1, 0]);
        assert_eq!(rules.features(Card::from(80)), vec![2, 2, 2, 2]);
    }
    #[test]
    fn universe_size() {
        assert_eq!(Rules::default().universe(), Some(81));
        assert_eq!(Rules::new(4, 2).universe(), Some(16));
        assert_eq!(Rules::new(usize::MAX, 2).universe(), None);
    }
    #[test]
    fn all_distinct_in_one_feature_is_a_set() {
        assert!(Rules::default().is_set(&hand(&[0, 1, 2])));
    }
    #[test]
    fn all_distinct_in_every_feature_is_a_set() {
        // 0000, 1111, 2222
        assert!(Rules::default().is_set(&hand(&[0, 40, 80])));
    }
    #[test]
    fn two_equal_one_different_is_not_a_set() {
        // 0000, 0001, 0010
        assert!(!Rules::default().is_set(&hand(&[0, 1, 3])));
    }
    #[test]
    fn wrong_length_is_not_a_set() {
        assert!(!Rules::default().is_set(&hand(&[0, 1])));
        assert!(!Rules::default().is_set(&hand(&[0, 1, 2, 3])));
    }
    #[test]
    fn repeated_card_is_not_a_set() {
        assert!(!Rules::default().is_set(&hand(&[7, 7, 7])));
    }
    #[test]
    fn full_deck_has_1080_sets() {
        let deck = (0..81).map(Card::from).collect::<Vec<_>>();
        assert_eq!(Rules::default().sets(&deck).count(), 1080);
    }
    #[test]
    fn find_respects_limit() {
        let deck = (0..81).map(Card::from).collect::<Vec<_>>();
        assert_eq!(Rules::default().find(&deck, 5).len(), 5);
        assert!(Rules::default().has_set(&deck));
    }
    #[test]
    fn larger_hands_generalize() {
        let rules = Rules::new(4, 2);
        // 00, 11, 22, 33
        assert!(rules.is_set(&hand(&[0, 5, 10, 15])));
        // 00, 01, 02, 10
        assert!(!rules.is_set(&hand(&[0, 1, 2, 4])));
    }
    #[test]
    fn no_set_among_two_cards() {
        assert!(!Rules::default().has_set(&hand(&[0, 1])));
    }
}
