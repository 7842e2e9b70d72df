use crate::PlayerId;
use crate::Slot;
use crate::cards::Card;
use crate::cards::Rules;
use crate::gameroom::Event;
use crate::gameroom::Sink;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Which card sits in which slot, in both directions.
///
/// Invariant: `slots[s] == Some(c)` iff `cards[c] == s`.
#[derive(Debug)]
struct Cells {
    slots: Vec<Option<Card>>,
    cards: HashMap<Card, Slot>,
}

/// Shared game surface: cards on slots plus every player's tokens.
///
/// All operations are atomic with respect to each other. Operations that need
/// both occupancy and tokens always lock occupancy first, so removing a card
/// and stripping the tokens on it is observed as a single step and no token
/// can land on a slot that is being emptied.
pub struct Board {
    rules: Rules,
    cells: Mutex<Cells>,
    tokens: Mutex<Vec<Vec<Slot>>>,
    sink: Arc<dyn Sink>,
}

impl Board {
    pub fn new(slots: usize, players: usize, rules: Rules, sink: Arc<dyn Sink>) -> Self {
        Self {
            rules,
            sink,
            cells: Mutex::new(Cells {
                slots: vec![None; slots],
                cards: HashMap::new(),
            }),
            tokens: Mutex::new(vec![Vec::with_capacity(rules.size()); players]),
        }
    }
    pub fn rules(&self) -> Rules {
        self.rules
    }
    pub fn slots(&self) -> usize {
        self.occupancy().slots.len()
    }
    fn occupancy(&self) -> MutexGuard<'_, Cells> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }
    fn markers(&self) -> MutexGuard<'_, Vec<Vec<Slot>>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// card occupancy, mutated by the dealer only
impl Board {
    /// Put a card on an empty slot.
    pub fn place_card(&self, card: Card, slot: Slot) {
        let mut cells = self.occupancy();
        if slot >= cells.slots.len() {
            log::warn!("[board] {} placed off the board at {}", card, slot);
            return;
        }
        debug_assert!(cells.slots[slot].is_none(), "slot {} is occupied", slot);
        debug_assert!(!cells.cards.contains_key(&card), "{} is already placed", card);
        cells.slots[slot] = Some(card);
        cells.cards.insert(card, slot);
        self.sink.emit(Event::CardPlaced { card, slot });
    }

    /// Take the card off a slot, stripping every token on it.
    /// Returns the card, or None if the slot was already empty.
    pub fn remove_card(&self, slot: Slot) -> Option<Card> {
        let mut cells = self.occupancy();
        let card = cells.slots.get_mut(slot)?.take()?;
        cells.cards.remove(&card);
        let mut markers = self.markers();
        for (player, tokens) in markers.iter_mut().enumerate() {
            if let Some(i) = tokens.iter().position(|s| *s == slot) {
                tokens.remove(i);
                self.sink.emit(Event::TokenRemoved { player, slot });
            }
        }
        self.sink.emit(Event::CardRemoved { slot });
        Some(card)
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.occupancy().slots.get(slot).copied().flatten()
    }
    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        self.occupancy().cards.get(&card).copied()
    }
    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.occupancy().cards.len()
    }
    /// Cards on the board in slot order.
    pub fn cards(&self) -> Vec<Card> {
        self.occupancy().slots.iter().flatten().copied().collect()
    }
    pub fn occupied(&self) -> Vec<Slot> {
        self.occupancy()
            .slots
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(|(s, _)| s)
            .collect()
    }
    pub fn vacant(&self) -> Vec<Slot> {
        self.occupancy()
            .slots
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(s, _)| s)
            .collect()
    }
}

// tokens, mutated by their owning player
impl Board {
    /// Rejected when the hand is already full, the slot is off the board
    /// or empty, or the player already has a token there.
    pub fn place_token(&self, player: PlayerId, slot: Slot) -> bool {
        let cells = self.occupancy();
        let mut markers = self.markers();
        let Some(tokens) = markers.get_mut(player) else {
            return false;
        };
        let occupied = cells.slots.get(slot).is_some_and(Option::is_some);
        if !occupied || tokens.len() >= self.rules.size() || tokens.contains(&slot) {
            return false;
        }
        tokens.push(slot);
        self.sink.emit(Event::TokenPlaced { player, slot });
        true
    }

    /// True iff the player had a token on the slot.
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut markers = self.markers();
        let Some(tokens) = markers.get_mut(player) else {
            return false;
        };
        match tokens.iter().position(|s| *s == slot) {
            Some(i) => {
                tokens.remove(i);
                self.sink.emit(Event::TokenRemoved { player, slot });
                true
            }
            None => false,
        }
    }

    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.markers()
            .get(player)
            .is_some_and(|tokens| tokens.contains(&slot))
    }
    pub fn all_tokens_placed(&self, player: PlayerId) -> bool {
        self.markers()
            .get(player)
            .is_some_and(|tokens| tokens.len() == self.rules.size())
    }
    /// Slots holding the player's tokens, in placement order.
    pub fn tokens(&self, player: PlayerId) -> Vec<Slot> {
        self.markers().get(player).cloned().unwrap_or_default()
    }

    /// Snapshot of the player's hand for judgement: the cards under their
    /// tokens in placement order, or None unless the hand is complete.
    pub fn hand(&self, player: PlayerId) -> Option<Vec<Card>> {
        let cells = self.occupancy();
        let markers = self.markers();
        let hand = markers
            .get(player)?
            .iter()
            .filter_map(|s| cells.slots.get(*s).copied().flatten())
            .collect::<Vec<_>>();
        (hand.len() == self.rules.size()).then_some(hand)
    }
}

// set enumeration over the cards currently on the board
impl Board {
    pub fn sets(&self, limit: usize) -> Vec<Vec<Card>> {
        self.rules.find(&self.cards(), limit)
    }
    pub fn has_set(&self) -> bool {
        self.rules.has_set(&self.cards())
    }
    /// Sets on the board as sorted slot lists.
    pub fn hints(&self, limit: usize) -> Vec<Vec<Slot>> {
        let cells = self.occupancy();
        let cards = cells.slots.iter().flatten().copied().collect::<Vec<_>>();
        self.rules
            .find(&cards, limit)
            .into_iter()
            .map(|set| {
                let mut slots = set
                    .iter()
                    .filter_map(|c| cells.cards.get(c).copied())
                    .collect::<Vec<_>>();
                slots.sort();
                slots
            })
            .collect()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("rules", &self.rules)
            .field("cells", &*self.occupancy())
            .field("tokens", &*self.markers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameroom::Silent;
    use tokio::sync::mpsc::unbounded_channel;

    fn board(slots: usize, players: usize) -> Board {
        Board::new(slots, players, Rules::default(), Arc::new(Silent))
    }
    fn filled(slots: usize, players: usize) -> Board {
        let board = board(slots, players);
        (0..slots).for_each(|s| board.place_card(Card::from(s), s));
        board
    }
    fn assert_bijection(board: &Board) {
        let cells = board.occupancy();
        for (slot, card) in cells.slots.iter().enumerate() {
            if let Some(card) = card {
                assert_eq!(cells.cards.get(card), Some(&slot));
            }
        }
        for (card, slot) in cells.cards.iter() {
            assert_eq!(cells.slots[*slot], Some(*card));
        }
    }

    #[test]
    fn placing_cards_keeps_bijection() {
        let board = board(12, 2);
        board.place_card(Card::from(8), 2);
        board.place_card(Card::from(40), 7);
        assert_eq!(board.card_at(2), Some(Card::from(8)));
        assert_eq!(board.slot_of(Card::from(8)), Some(2));
        assert_eq!(board.slot_of(Card::from(40)), Some(7));
        assert_eq!(board.count(), 2);
        assert_eq!(board.occupied(), vec![2, 7]);
        assert_eq!(board.vacant().len(), 10);
        assert_bijection(&board);
    }
    #[test]
    fn removing_cards_breaks_bijection() {
        let board = filled(12, 2);
        assert_eq!(board.remove_card(3), Some(Card::from(3)));
        assert_eq!(board.card_at(3), None);
        assert_eq!(board.slot_of(Card::from(3)), None);
        assert_eq!(board.count(), 11);
        assert_bijection(&board);
    }
    #[test]
    fn removing_empty_slot_is_noop() {
        let board = filled(12, 2);
        board.remove_card(3);
        assert_eq!(board.remove_card(3), None);
        assert_eq!(board.remove_card(99), None);
        assert_eq!(board.count(), 11);
    }
    #[test]
    fn tokens_follow_placement_order() {
        let board = filled(12, 2);
        assert!(board.place_token(0, 3));
        assert!(board.place_token(0, 1));
        assert!(board.place_token(0, 7));
        assert_eq!(board.tokens(0), vec![3, 1, 7]);
        assert!(board.all_tokens_placed(0));
        assert!(!board.all_tokens_placed(1));
    }
    #[test]
    fn token_rejected_on_full_hand() {
        let board = filled(12, 1);
        (0..3).for_each(|s| assert!(board.place_token(0, s)));
        assert!(!board.place_token(0, 4));
        assert_eq!(board.tokens(0).len(), 3);
    }
    #[test]
    fn token_rejected_off_board_or_on_empty_slot() {
        let board = filled(12, 1);
        board.remove_card(5);
        assert!(!board.place_token(0, 5));
        assert!(!board.place_token(0, 12));
        assert!(!board.place_token(1, 0));
        assert!(board.tokens(0).is_empty());
    }
    #[test]
    fn token_rejected_when_already_held() {
        let board = filled(12, 1);
        assert!(board.place_token(0, 5));
        assert!(!board.place_token(0, 5));
        assert_eq!(board.tokens(0), vec![5]);
    }
    #[test]
    fn remove_token_reports_presence() {
        let board = filled(12, 1);
        assert!(!board.remove_token(0, 5));
        board.place_token(0, 5);
        assert!(board.has_token(0, 5));
        assert!(board.remove_token(0, 5));
        assert!(!board.has_token(0, 5));
    }
    #[test]
    fn removing_card_strips_every_token() {
        let (tx, mut rx) = unbounded_channel();
        let board = Board::new(12, 3, Rules::default(), Arc::new(tx));
        (0..12).for_each(|s| board.place_card(Card::from(s), s));
        board.place_token(0, 4);
        board.place_token(2, 4);
        board.place_token(1, 5);
        while rx.try_recv().is_ok() {}
        board.remove_card(4);
        assert!(!board.has_token(0, 4));
        assert!(!board.has_token(2, 4));
        assert!(board.has_token(1, 5));
        let events = std::iter::from_fn(|| rx.try_recv().ok()).collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                Event::TokenRemoved { player: 0, slot: 4 },
                Event::TokenRemoved { player: 2, slot: 4 },
                Event::CardRemoved { slot: 4 },
            ]
        );
    }
    #[test]
    fn hand_requires_full_token_set() {
        let board = filled(12, 2);
        board.place_token(0, 0);
        board.place_token(0, 1);
        assert_eq!(board.hand(0), None);
        board.place_token(0, 2);
        assert_eq!(
            board.hand(0),
            Some(vec![Card::from(0), Card::from(1), Card::from(2)])
        );
        board.remove_card(1);
        assert_eq!(board.hand(0), None);
    }
    #[test]
    fn hints_name_slots_of_sets() {
        let board = board(12, 1);
        board.place_card(Card::from(2), 0);
        board.place_card(Card::from(0), 5);
        board.place_card(Card::from(1), 9);
        board.place_card(Card::from(3), 11);
        assert_eq!(board.hints(usize::MAX), vec![vec![0, 5, 9]]);
        assert_eq!(board.sets(usize::MAX).len(), 1);
        assert!(board.has_set());
        board.remove_card(9);
        assert!(!board.has_set());
    }
    #[test]
    fn concurrent_toggles_and_removals_keep_invariants() {
        let board = filled(12, 4);
        std::thread::scope(|scope| {
            for player in 0..4 {
                let board = &board;
                scope.spawn(move || {
                    for i in 0..2000 {
                        let slot = (i * 7 + player) % 12;
                        if !board.remove_token(player, slot) {
                            board.place_token(player, slot);
                        }
                        assert!(board.tokens(player).len() <= 3);
                    }
                });
            }
            let board = &board;
            scope.spawn(move || {
                for i in 0..500 {
                    let slot = i % 12;
                    if let Some(card) = board.remove_card(slot) {
                        assert!((0..4).all(|p| !board.has_token(p, slot)));
                        board.place_card(card, slot);
                    }
                }
            });
        });
        assert_bijection(&board);
        for player in 0..4 {
            let tokens = board.tokens(player);
            assert!(tokens.len() <= 3);
            assert!(tokens.iter().all(|s| board.card_at(*s).is_some()));
        }
    }
}
