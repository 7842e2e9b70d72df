use super::event::Event;
use tokio::sync::mpsc::UnboundedSender;

/// One-way render surface. Implementations must not block: events are
/// emitted from inside the board's critical sections.
pub trait Sink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Sink for Silent {
    fn emit(&self, _: Event) {}
}

/// Forwards events to an external renderer over a channel.
impl Sink for UnboundedSender<Event> {
    fn emit(&self, event: Event) {
        if let Err(e) = self.send(event) {
            log::trace!("[sink] renderer gone, dropped {}", e.0);
        }
    }
}

/// Renders events as log lines, highlighting the ones a player cares about.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct Console {
    names: Vec<String>,
}

#[cfg(feature = "cli")]
impl Console {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
    fn name(&self, player: crate::PlayerId) -> String {
        self.names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("P{}", player))
    }
}

#[cfg(feature = "cli")]
impl Sink for Console {
    fn emit(&self, event: Event) {
        use colored::Colorize;
        match event {
            Event::Countdown { warn: true, .. } => log::debug!("{}", event.to_string().red()),
            Event::Countdown { .. } | Event::Elapsed { .. } => log::debug!("{}", event),
            Event::Score { player, score } => {
                log::info!("{} {} {}", self.name(player).bold(), "scores".green(), score)
            }
            Event::Freeze { .. } => log::info!("{}", event.to_string().yellow()),
            Event::Winners(ref winners) => log::info!(
                "{} {}",
                "winner(s):".green().bold(),
                winners
                    .iter()
                    .map(|p| self.name(*p))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            event => log::debug!("{}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;
    #[test]
    fn channel_sink_forwards_in_order() {
        let (tx, mut rx) = unbounded_channel();
        tx.emit(Event::CardRemoved { slot: 1 });
        tx.emit(Event::TokensCleared { slot: None });
        assert_eq!(rx.try_recv().ok(), Some(Event::CardRemoved { slot: 1 }));
        assert_eq!(rx.try_recv().ok(), Some(Event::TokensCleared { slot: None }));
    }
    #[test]
    fn channel_sink_tolerates_closed_renderer() {
        let (tx, rx) = unbounded_channel::<Event>();
        drop(rx);
        tx.emit(Event::Winners(vec![0]));
    }
}
