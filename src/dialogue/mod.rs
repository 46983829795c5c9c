// ABOUTME: Dialogue module — the pure four-step conversation state machine.
// ABOUTME: Sessions are owned per chat by the dispatcher; this module has no I/O.

pub mod machine;

pub use machine::{Dialogue, Event, Step, begin, step};
