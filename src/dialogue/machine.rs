// ABOUTME: Pure dialogue state machine — four linear steps from /start to the exit time.
// ABOUTME: No I/O; each event produces the next state (or a terminal reply) plus the text to send.

use crate::workday;

/// Prompt sent when a session starts.
pub const PROMPT_ENTRY: &str =
    "Hi! I'm your workday assistant. Please enter the time you started work, in HH:MM format.";
/// Prompt sent after the entry time is received.
pub const PROMPT_BREAK_START: &str =
    "Thanks. Now enter the time your lunch break started (HH:MM).";
/// Prompt sent after the break-start time is received.
pub const PROMPT_BREAK_END: &str =
    "Got it. Now enter the time you came back from your break (HH:MM).";
/// Sent when any of the three times fails to parse. The session is over;
/// the user starts again from scratch.
pub const REPLY_INVALID: &str =
    "There was a problem with the times you entered. Please send /start and try again.";
/// Acknowledgement for an explicit cancel.
pub const REPLY_CANCELLED: &str = "Operation cancelled. See you next time!";

/// One open dialogue session. Each variant carries exactly the inputs
/// collected so far, stored as raw text: parsing only happens once all
/// three values are in, matching the single "invalid input" exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialogue {
    AwaitingEntry,
    AwaitingBreakStart {
        entry: String,
    },
    AwaitingBreakEnd {
        entry: String,
        break_start: String,
    },
}

/// An input the state machine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Text(String),
    Cancel,
}

/// Result of feeding one event to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The dialogue moves on; send the reply and keep the new state.
    Continue(Dialogue, String),
    /// The dialogue is over (computed, failed, or cancelled); send the
    /// reply and drop the session.
    Finished(String),
}

/// Begin a fresh session: the first prompt plus the initial state.
pub fn begin() -> (Dialogue, String) {
    (Dialogue::AwaitingEntry, PROMPT_ENTRY.to_string())
}

/// Advance a session by one event.
///
/// The machine is strictly linear: no state is ever re-entered. `Start`
/// restarts from the beginning regardless of progress, and `Cancel`
/// finishes from any state.
pub fn step(state: Dialogue, event: Event) -> Step {
    match (state, event) {
        (_, Event::Start) => {
            let (next, prompt) = begin();
            Step::Continue(next, prompt)
        }
        (_, Event::Cancel) => Step::Finished(REPLY_CANCELLED.to_string()),
        (Dialogue::AwaitingEntry, Event::Text(entry)) => Step::Continue(
            Dialogue::AwaitingBreakStart { entry },
            PROMPT_BREAK_START.to_string(),
        ),
        (Dialogue::AwaitingBreakStart { entry }, Event::Text(break_start)) => Step::Continue(
            Dialogue::AwaitingBreakEnd { entry, break_start },
            PROMPT_BREAK_END.to_string(),
        ),
        (Dialogue::AwaitingBreakEnd { entry, break_start }, Event::Text(break_end)) => {
            match workday::exit_time(&entry, &break_start, &break_end) {
                Ok(exit) => Step::Finished(format!("You should leave at: {exit}")),
                Err(_) => Step::Finished(REPLY_INVALID.to_string()),
            }
        }
    }
}
