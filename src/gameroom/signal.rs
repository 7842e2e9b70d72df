use tokio::sync::watch;

/// Creates a connected cooperative-termination pair.
pub fn signal() -> (Stop, Halt) {
    let (tx, rx) = watch::channel(false);
    (Stop(tx), Halt(rx))
}

/// Raising side of a termination signal.
#[derive(Debug)]
pub struct Stop(watch::Sender<bool>);

impl Stop {
    pub fn stop(&self) {
        self.0.send_replace(true);
    }
}

/// Observing side of a termination signal. A dropped [`Stop`] counts as raised.
#[derive(Debug, Clone)]
pub struct Halt(watch::Receiver<bool>);

impl Halt {
    pub fn is_set(&self) -> bool {
        *self.0.borrow() || self.0.has_changed().is_err()
    }
    /// Resolves once the signal is raised. Cancel safe.
    pub async fn wait(&mut self) {
        let _ = self.0.wait_for(|halted| *halted).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn wait_resolves_after_stop() {
        let (stop, mut halt) = signal();
        assert!(!halt.is_set());
        let waiter = tokio::spawn(async move {
            halt.wait().await;
            halt.is_set()
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());
        stop.stop();
        assert!(waiter.await.unwrap());
    }
    #[tokio::test]
    async fn dropped_stop_counts_as_halt() {
        let (stop, mut halt) = signal();
        drop(stop);
        assert!(halt.is_set());
        halt.wait().await;
    }
    #[test]
    fn clones_share_the_signal() {
        let (stop, halt) = signal();
        let other = halt.clone();
        stop.stop();
        assert!(halt.is_set() && other.is_set());
    }
}
