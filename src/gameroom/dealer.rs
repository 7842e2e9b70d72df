use super::*;
use crate::HINT_LIMIT;
use crate::PlayerId;
use crate::Score;
use crate::board::Board;
use crate::cards::Card;
use crate::cards::Deck;
use crate::cards::Rules;
use crate::config::Config;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinHandle;

/// Final standings of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub scores: Vec<Score>,
    /// Every player tied at the highest score.
    pub winners: Vec<PlayerId>,
    /// Cards never claimed, in deck order.
    pub leftover: Vec<Card>,
}

/// A player as the dealer sees it: its shared seat, its termination switch
/// and input queue, and the actor itself until it is spawned.
struct Chair {
    seat: Arc<Seat>,
    stop: Stop,
    inbox: mpsc::Sender<Action>,
    actor: Option<Player>,
    handle: Option<JoinHandle<()>>,
}

/// Central coordinator of a game.
///
/// Owns the deck and the round timer, and is the only writer of card
/// occupancy on the board. Claims arrive on a single FIFO channel and are
/// judged one at a time in submission order against the board as it is at
/// judgement time.
///
/// Rounds repeat until no set exists among the deck and the board:
/// - deal: fill empty slots from the freshly shuffled deck
/// - play: refresh the clock, judge claims as they arrive, refill slots
/// - collect: judge what is still queued, return the board to the deck
pub struct Dealer {
    config: Config,
    rules: Rules,
    board: Arc<Board>,
    deck: Deck,
    timer: Timer,
    chairs: Vec<Chair>,
    mailbox: UnboundedSender<Request>,
    requests: UnboundedReceiver<Request>,
    halt: Halt,
    sink: Arc<dyn Sink>,
    rng: SmallRng,
}

impl Dealer {
    /// Validates the configuration and seats every player.
    /// Players start running with [`Dealer::run`]. Dropping every
    /// [`Controls`] handle stops the game.
    pub fn new(config: Config, sink: Arc<dyn Sink>) -> anyhow::Result<(Self, Controls)> {
        config.validate()?;
        let rules = config.rules();
        let board = Arc::new(Board::new(
            config.slots(),
            config.players,
            rules,
            sink.clone(),
        ));
        let (mailbox, requests) = unbounded_channel();
        let (stop, halt) = signal();
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let chairs = (0..config.players)
            .map(|id| {
                let seat = Arc::new(Seat::new(id, config.name(id), config.is_human(id)));
                let (stop, halt) = signal();
                let (actor, inbox) = Player::new(
                    seat.clone(),
                    board.clone(),
                    mailbox.clone(),
                    halt,
                    sink.clone(),
                    &config,
                    SmallRng::seed_from_u64(rng.random()),
                );
                Chair {
                    seat,
                    stop,
                    inbox,
                    actor: Some(actor),
                    handle: None,
                }
            })
            .collect::<Vec<_>>();
        let controls = Controls::new(
            stop,
            chairs.iter().map(|chair| chair.inbox.clone()).collect(),
        );
        let dealer = Self {
            rules,
            board,
            mailbox,
            requests,
            halt,
            sink,
            rng,
            chairs,
            deck: Deck::from(config.deck()),
            timer: Timer::new(config.timer()),
            config,
        };
        Ok((dealer, controls))
    }

    /// Plays rounds until no set is left or a stop is requested, then
    /// terminates and joins every player before scoring.
    pub async fn run(mut self) -> Outcome {
        self.seat();
        while !self.should_finish() {
            self.deck.shuffle(&mut self.rng);
            self.deal().await;
            self.play().await;
            self.collect().await;
        }
        self.dismiss().await;
        self.announce()
    }
}

// game lifecycle
impl Dealer {
    fn seat(&mut self) {
        log::info!("[dealer] seating {} players", self.chairs.len());
        for chair in self.chairs.iter_mut() {
            chair.handle = chair.actor.take().map(Player::spawn);
        }
    }

    fn should_finish(&self) -> bool {
        if self.halt.is_set() {
            log::info!("[dealer] stopping on request");
            return true;
        }
        let cards = self
            .deck
            .cards()
            .iter()
            .copied()
            .chain(self.board.cards())
            .collect::<Vec<_>>();
        match self.rules.has_set(&cards) {
            true => false,
            false => {
                log::info!("[dealer] no set left among {} cards", cards.len());
                true
            }
        }
    }

    /// Terminates players in reverse seating order, joining each one.
    async fn dismiss(&mut self) {
        for chair in self.chairs.iter_mut().rev() {
            let id = chair.seat.id();
            chair.stop.stop();
            if chair.seat.is_human() {
                let _ = chair.inbox.try_send(Action::Shutdown);
            }
            if let Some(handle) = chair.handle.take() {
                if let Err(e) = handle.await {
                    log::warn!("[dealer] P{} failed: {}", id, e);
                }
            }
            log::debug!("[dealer] P{} joined", id);
        }
    }

    fn announce(&self) -> Outcome {
        let scores = self
            .chairs
            .iter()
            .map(|chair| chair.seat.score())
            .collect::<Vec<_>>();
        let best = scores.iter().copied().max().unwrap_or_default();
        let winners = scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score == best)
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        log::info!(
            "[dealer] winners with {}: {}",
            best,
            winners
                .iter()
                .map(|id| self.chairs[*id].seat.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.sink.emit(Event::Winners(winners.clone()));
        Outcome {
            scores,
            winners,
            leftover: self
                .deck
                .cards()
                .iter()
                .copied()
                .chain(self.board.cards())
                .collect(),
        }
    }
}

// round phases
impl Dealer {
    /// Fills empty slots, in random order, until the deck runs out.
    async fn deal(&mut self) {
        let mut vacant = self.board.vacant();
        vacant.shuffle(&mut self.rng);
        let mut dealt = 0;
        for slot in vacant {
            let Some(card) = self.deck.draw() else {
                break;
            };
            self.pause().await;
            self.board.place_card(card, slot);
            dealt += 1;
        }
        if dealt > 0 {
            log::debug!("[dealer] dealt {}, {} left in deck", dealt, self.deck.len());
            if self.config.hints {
                self.hint();
            }
        }
    }

    /// Sleeps until the display needs refreshing or a claim arrives,
    /// whichever comes first, until the round is over.
    async fn play(&mut self) {
        self.timer.reset();
        while !self.halt.is_set() && !self.round_over() {
            self.display();
            let nap = self.timer.tick();
            let claim = tokio::select! {
                biased;
                _ = self.halt.wait() => None,
                Some(request) = self.requests.recv() => Some(request),
                _ = tokio::time::sleep(nap) => None,
            };
            if let Some(request) = claim {
                self.judge(request).await;
            }
            self.drain().await;
            self.deal().await;
        }
        self.display();
    }

    /// Judges anything still queued, then returns the board to the deck.
    async fn collect(&mut self) {
        self.drain().await;
        let mut occupied = self.board.occupied();
        occupied.shuffle(&mut self.rng);
        for slot in occupied {
            self.pause().await;
            if let Some(card) = self.board.remove_card(slot) {
                self.deck.put(card);
            }
        }
        self.sink.emit(Event::TokensCleared { slot: None });
        log::debug!("[dealer] collected board, {} in deck", self.deck.len());
    }

    fn round_over(&self) -> bool {
        match self.timer.mode().is_countdown() {
            true => self.timer.expired(),
            false => !self.board.has_set(),
        }
    }
}

// judgement
impl Dealer {
    async fn drain(&mut self) {
        while let Ok(request) = self.requests.try_recv() {
            self.judge(request).await;
        }
    }

    /// A hand that lost a card to an earlier claim is stale: no credit,
    /// no penalty, but the player is still answered.
    async fn judge(&mut self, request: Request) {
        let player = request.player();
        let verdict = match self.board.hand(player) {
            None => Verdict::Stale,
            Some(hand) if self.rules.is_set(&hand) => {
                for card in hand {
                    if let Some(slot) = self.board.slot_of(card) {
                        self.pause().await;
                        self.board.remove_card(slot);
                    }
                }
                self.credit(player);
                Verdict::Point
            }
            Some(_) => Verdict::Penalty,
        };
        log::debug!("[dealer] P{} judged {}", player, verdict);
        request.reply(verdict);
    }

    /// A successful claim extends the round.
    fn credit(&mut self, player: PlayerId) {
        if let Some(chair) = self.chairs.get(player) {
            let score = chair.seat.point();
            log::info!("[dealer] {} scores {}", chair.seat, score);
            self.sink.emit(Event::Score { player, score });
        }
        self.timer.reset();
        self.display();
    }
}

// helpers
impl Dealer {
    fn display(&self) {
        if let Some(event) = self.timer.event() {
            self.sink.emit(event);
        }
    }

    fn hint(&self) {
        for slots in self.board.hints(HINT_LIMIT) {
            let features = slots
                .iter()
                .filter_map(|slot| self.board.card_at(*slot))
                .map(|card| self.rules.features(card))
                .collect::<Vec<_>>();
            log::info!("[dealer] hint: slots {:?} features {:?}", slots, features);
        }
    }

    /// Artificial delay before touching a card; always yields.
    async fn pause(&self) {
        match self.config.table_delay() {
            delay if delay.is_zero() => tokio::task::yield_now().await,
            delay => tokio::time::sleep(delay).await,
        }
    }
}
