//! Live game coordination.
//!
//! ## Architecture
//!
//! - [`Dealer`]: owns the deck and round timer, judges claims in FIFO order
//! - [`Player`]: actor task toggling tokens and submitting claims
//! - [`Robot`]: synthetic input generator for non-human players
//! - [`Controls`]: external input and stop handle
//!
//! ## Messages
//!
//! - [`Action`]: slot presses queued to a player
//! - [`Request`] / [`Verdict`]: claims from players, judgements back
//! - [`Event`] / [`Sink`]: one-way notifications to the renderer
mod action;
mod controls;
mod dealer;
mod event;
mod player;
mod request;
mod robot;
mod seat;
mod signal;
mod sink;
mod timer;

pub use action::*;
pub use controls::*;
pub use dealer::*;
pub use event::*;
pub use player::*;
pub use request::*;
pub use robot::*;
pub use seat::*;
pub use signal::*;
pub use sink::*;
pub use timer::*;
