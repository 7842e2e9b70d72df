//! Concurrent dealer/player engine for the card-matching game Set.
//!
//! A [`gameroom::Dealer`] deals cards onto a shared [`board::Board`] and
//! judges claims submitted by independently scheduled
//! [`gameroom::Player`] actors, each optionally driven by a
//! [`gameroom::Robot`].
pub mod board;
pub mod cards;
pub mod config;
pub mod gameroom;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Player index around the table (0-based, humans seated first).
pub type PlayerId = usize;
/// Board position, row-major over `rows × columns`.
pub type Slot = usize;
/// Number of sets a player has claimed.
pub type Score = usize;

// ============================================================================
// RUNTIME PARAMETERS
// ============================================================================
/// Display refresh period while the countdown is above the warning threshold.
pub const COUNTDOWN_TICK: std::time::Duration = std::time::Duration::from_millis(1000);
/// Display refresh period once the countdown is inside the warning threshold.
pub const WARNING_TICK: std::time::Duration = std::time::Duration::from_millis(10);
/// Period of freeze notifications sent to the render sink.
pub const FREEZE_TICK: std::time::Duration = std::time::Duration::from_millis(1000);
/// Upper bound on a single wait for the dealer's verdict before re-checking
/// the terminate signal.
pub const VERDICT_POLL: std::time::Duration = std::time::Duration::from_millis(100);
/// Maximum number of hints logged after a deal.
pub const HINT_LIMIT: usize = usize::MAX;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Terminal plus per-game file logging for the binary. The terminal shows
/// INFO, or DEBUG when `verbose`; `logs/setgame-<secs>.log` always gets DEBUG.
/// Records from other crates are filtered out.
#[cfg(feature = "cli")]
pub fn log(verbose: bool) -> anyhow::Result<()> {
    let started = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?;
    let dir = std::path::Path::new("logs");
    std::fs::create_dir_all(dir)?;
    let file = std::fs::File::create(dir.join(format!("setgame-{}.log", started.as_secs())))?;
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .set_location_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .build();
    let shown = match verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    simplelog::CombinedLogger::init(vec![
        simplelog::TermLogger::new(
            shown,
            config.clone(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        ),
        simplelog::WriteLogger::new(log::LevelFilter::Debug, config, file),
    ])?;
    Ok(())
}

/// Graceful interrupt: Ctrl+C asks the dealer to stop. A second Ctrl+C
/// exits immediately.
#[cfg(feature = "cli")]
pub fn kys(controls: gameroom::Controls) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, finishing the game...");
            controls.stop();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

/// Keyboard input on a dedicated thread. Each line is either
/// `<player> <slot>` to press a slot on behalf of a human, or `q` to stop.
#[cfg(feature = "cli")]
pub fn brb(controls: gameroom::Controls) {
    std::thread::spawn(move || {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) => match buffer.trim() {
                    q if q.eq_ignore_ascii_case("q") => {
                        log::warn!("stop requested from keyboard");
                        controls.stop();
                        break;
                    }
                    line => match parse_press(line) {
                        Some((player, slot)) => {
                            controls.press(player, slot);
                        }
                        None => log::warn!("expected `<player> <slot>` or `q`, got {:?}", line),
                    },
                },
            }
        }
    });
}

/// Parse a `<player> <slot>` keyboard line.
pub fn parse_press(line: &str) -> Option<(PlayerId, Slot)> {
    let mut words = line.split_whitespace();
    let player = words.next()?.parse().ok()?;
    let slot = words.next()?.parse().ok()?;
    match words.next() {
        Some(_) => None,
        None => Some((player, slot)),
    }
}
