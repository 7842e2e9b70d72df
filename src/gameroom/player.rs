use super::*;
use crate::FREEZE_TICK;
use crate::Slot;
use crate::VERDICT_POLL;
use crate::board::Board;
use crate::config::Config;
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Where a player is in its claim cycle.
///
/// ```text
/// Idle -> Toggle -> Idle
///              \-> Submit -> Awaiting -> Credited  -> Idle
///                                    \-> Penalized -> Idle
///                                    \-> Idle (stale)
/// ```
/// Every suspension point can move to `Terminated` instead.
#[derive(Debug)]
pub enum Phase {
    Idle,
    Toggle(Slot),
    Submit,
    Awaiting(oneshot::Receiver<Verdict>),
    Credited,
    Penalized,
    Terminated,
}

/// Actor task for one player.
///
/// Drains a bounded queue of slot presses, toggling its tokens on the board.
/// When a toggle completes a hand that differs from the last one submitted,
/// it sends exactly one [`Request`] to the dealer and waits for the verdict
/// before accepting further input. Credits and penalties freeze the player.
pub struct Player {
    seat: Arc<Seat>,
    board: Arc<Board>,
    inbox: mpsc::Receiver<Action>,
    dealer: UnboundedSender<Request>,
    halt: Halt,
    sink: Arc<dyn Sink>,
    robot: Option<Robot>,
    point_freeze: Duration,
    penalty_freeze: Duration,
    moved: bool,
}

impl Player {
    /// Builds the actor and the sending half of its action queue.
    /// Non-human players get a [`Robot`] writing to the same queue.
    pub fn new(
        seat: Arc<Seat>,
        board: Arc<Board>,
        dealer: UnboundedSender<Request>,
        halt: Halt,
        sink: Arc<dyn Sink>,
        config: &Config,
        rng: SmallRng,
    ) -> (Self, mpsc::Sender<Action>) {
        let (outbox, inbox) = mpsc::channel(board.rules().size());
        let robot = (!seat.is_human()).then(|| {
            Robot::new(
                seat.id(),
                board.clone(),
                outbox.clone(),
                halt.clone(),
                config.ai_delay(),
                rng,
            )
        });
        let player = Self {
            seat,
            board,
            inbox,
            dealer,
            halt,
            sink,
            robot,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            moved: true,
        };
        (player, outbox)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        log::info!("[player P{}] {} starting", self.id(), self.seat.name());
        let robot = self.robot.take().map(Robot::spawn);
        let mut phase = Phase::Idle;
        loop {
            log::trace!("[player P{}] {:?}", self.id(), phase);
            phase = match phase {
                Phase::Idle => self.idle().await,
                Phase::Toggle(slot) => self.toggle(slot),
                Phase::Submit => self.submit(),
                Phase::Awaiting(verdict) => self.judged(verdict).await,
                Phase::Credited => self.freeze(self.point_freeze).await,
                Phase::Penalized => self.freeze(self.penalty_freeze).await,
                Phase::Terminated => break,
            };
        }
        if let Some(handle) = robot {
            if let Err(e) = handle.await {
                log::warn!("[player P{}] robot failed: {}", self.id(), e);
            }
        }
        log::info!("[player P{}] terminated", self.id());
    }

    fn id(&self) -> crate::PlayerId {
        self.seat.id()
    }
}

// state transitions
impl Player {
    async fn idle(&mut self) -> Phase {
        if self.halt.is_set() {
            return Phase::Terminated;
        }
        let received = tokio::select! {
            biased;
            _ = self.halt.wait() => None,
            action = self.inbox.recv() => Some(action),
        };
        match received {
            None => Phase::Terminated,
            Some(Some(Action::Toggle(slot))) => Phase::Toggle(slot),
            Some(Some(Action::Shutdown)) if self.halt.is_set() => Phase::Terminated,
            Some(Some(Action::Shutdown)) => Phase::Idle,
            Some(None) => {
                self.halt.wait().await;
                Phase::Terminated
            }
        }
    }

    fn toggle(&mut self, slot: Slot) -> Phase {
        let id = self.id();
        if self.board.has_token(id, slot) {
            self.moved |= self.board.remove_token(id, slot);
        } else if self.board.all_tokens_placed(id) {
            log::trace!("[player P{}] hand full, discarding {}", id, slot);
        } else {
            self.moved |= self.board.place_token(id, slot);
        }
        match self.moved && self.board.all_tokens_placed(id) {
            true => Phase::Submit,
            false => Phase::Idle,
        }
    }

    fn submit(&mut self) -> Phase {
        let (request, verdict) = Request::new(self.id());
        self.moved = false;
        match self.dealer.send(request) {
            Ok(()) => {
                log::debug!("[player P{}] claims {:?}", self.id(), self.board.tokens(self.id()));
                Phase::Awaiting(verdict)
            }
            Err(_) => {
                log::warn!("[player P{}] no dealer to judge claim", self.id());
                Phase::Idle
            }
        }
    }

    /// Waits for the dealer, re-checking the terminate signal at least every
    /// [`VERDICT_POLL`].
    async fn judged(&mut self, mut verdict: oneshot::Receiver<Verdict>) -> Phase {
        loop {
            if self.halt.is_set() {
                return Phase::Terminated;
            }
            let outcome = tokio::select! {
                biased;
                _ = self.halt.wait() => None,
                polled = tokio::time::timeout(VERDICT_POLL, &mut verdict) => Some(polled),
            };
            match outcome {
                None => return Phase::Terminated,
                Some(Err(_)) => continue,
                Some(Ok(Ok(verdict))) => {
                    log::debug!("[player P{}] judged {}", self.id(), verdict);
                    return match verdict {
                        Verdict::Point => Phase::Credited,
                        Verdict::Penalty => Phase::Penalized,
                        Verdict::Stale => Phase::Idle,
                    };
                }
                Some(Ok(Err(_))) => return Phase::Idle,
            }
        }
    }

    /// Sits out `duration`, reporting the time left once per [`FREEZE_TICK`],
    /// then discards whatever input piled up meanwhile.
    async fn freeze(&mut self, duration: Duration) -> Phase {
        let player = self.id();
        let deadline = Instant::now() + duration;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.sink.emit(Event::Freeze { player, remaining });
            let halted = tokio::select! {
                biased;
                _ = self.halt.wait() => true,
                _ = tokio::time::sleep(remaining.min(FREEZE_TICK)) => false,
            };
            if halted {
                return Phase::Terminated;
            }
        }
        self.clear();
        self.sink.emit(Event::Freeze {
            player,
            remaining: Duration::ZERO,
        });
        Phase::Idle
    }

    fn clear(&mut self) {
        let mut dropped = 0;
        while self.inbox.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            log::trace!("[player P{}] dropped {} queued actions", self.id(), dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use rand::SeedableRng;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;

    struct Harness {
        board: Arc<Board>,
        seat: Arc<Seat>,
        keys: mpsc::Sender<Action>,
        claims: UnboundedReceiver<Request>,
        events: UnboundedReceiver<Event>,
        stop: Stop,
        handle: JoinHandle<()>,
    }

    /// One human player on a 3x4 board holding cards 0..12.
    fn harness() -> Harness {
        let config = Config {
            players: 1,
            humans: 1,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            ..Config::default()
        };
        let (tx, events) = unbounded_channel();
        let sink: Arc<dyn Sink> = Arc::new(tx);
        let board = Arc::new(Board::new(12, 1, config.rules(), sink.clone()));
        (0..12).for_each(|s| board.place_card(Card::from(s), s));
        let seat = Arc::new(Seat::new(0, config.name(0), true));
        let (dealer, claims) = unbounded_channel();
        let (stop, halt) = signal();
        let (player, keys) = Player::new(
            seat.clone(),
            board.clone(),
            dealer,
            halt,
            sink,
            &config,
            SmallRng::seed_from_u64(0),
        );
        Harness {
            board,
            seat,
            keys,
            claims,
            events,
            stop,
            handle: player.spawn(),
        }
    }

    impl Harness {
        async fn press(&self, slots: &[Slot]) {
            for slot in slots {
                self.keys.send(Action::Toggle(*slot)).await.unwrap();
                tokio::task::yield_now().await;
            }
        }
        async fn claim(&mut self) -> Request {
            self.claims.recv().await.unwrap()
        }
        async fn released(&mut self) -> Vec<Duration> {
            let mut freezes = Vec::new();
            while let Some(event) = self.events.recv().await {
                if let Event::Freeze { remaining, .. } = event {
                    freezes.push(remaining);
                    if remaining.is_zero() {
                        break;
                    }
                }
            }
            freezes
        }
        fn queue_is_empty(&self) -> bool {
            self.keys.capacity() == self.keys.max_capacity()
        }
        async fn shutdown(self) {
            self.stop.stop();
            self.handle.await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn complete_hand_submits_one_claim() {
        let mut h = harness();
        h.press(&[0, 1, 3]).await;
        let claim = h.claim().await;
        assert_eq!(claim.player(), 0);
        assert_eq!(h.board.tokens(0), vec![0, 1, 3]);
        assert!(h.claims.try_recv().is_err());
        claim.reply(Verdict::Penalty);
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn penalty_freezes_and_empties_queue() {
        let mut h = harness();
        h.press(&[0, 1, 3]).await;
        h.claim().await.reply(Verdict::Penalty);
        tokio::task::yield_now().await;
        let _ = h.keys.try_send(Action::Toggle(5));
        let _ = h.keys.try_send(Action::Toggle(6));
        let freezes = h.released().await;
        assert_eq!(freezes.first(), Some(&Duration::from_secs(3)));
        assert_eq!(freezes.last(), Some(&Duration::ZERO));
        assert_eq!(freezes.len(), 4);
        assert!(h.queue_is_empty());
        assert_eq!(h.seat.score(), 0);
        assert_eq!(h.board.tokens(0), vec![0, 1, 3]);
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn credit_freezes_for_point_duration() {
        let mut h = harness();
        h.press(&[0, 1, 2]).await;
        h.claim().await.reply(Verdict::Point);
        let freezes = h.released().await;
        assert_eq!(freezes, vec![Duration::from_secs(1), Duration::ZERO]);
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_hand_is_not_resubmitted() {
        let mut h = harness();
        h.press(&[0, 1, 3]).await;
        h.claim().await.reply(Verdict::Stale);
        h.press(&[7]).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.claims.try_recv().is_err());
        assert_eq!(h.board.tokens(0), vec![0, 1, 3]);
        h.press(&[3, 2]).await;
        let claim = h.claim().await;
        assert_eq!(h.board.tokens(0), vec![0, 1, 2]);
        claim.reply(Verdict::Penalty);
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_removes_own_token() {
        let mut h = harness();
        h.press(&[4, 4, 5]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.board.tokens(0), vec![5]);
        assert!(h.claims.try_recv().is_err());
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn terminate_releases_idle_player() {
        let h = harness();
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn terminate_releases_player_awaiting_verdict() {
        let mut h = harness();
        h.press(&[0, 1, 2]).await;
        let _claim = h.claim().await;
        tokio::time::sleep(VERDICT_POLL * 3).await;
        assert!(!h.handle.is_finished());
        h.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_claim_counts_as_stale() {
        let mut h = harness();
        h.press(&[0, 1, 2]).await;
        drop(h.claim().await);
        h.press(&[2, 3]).await;
        let claim = h.claim().await;
        assert_eq!(h.board.tokens(0), vec![0, 1, 3]);
        claim.reply(Verdict::Penalty);
        h.shutdown().await;
    }
}
