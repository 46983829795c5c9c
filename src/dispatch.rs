// ABOUTME: Dispatcher — routes inbound chat events to per-chat dialogue sessions.
// ABOUTME: Replies go out through the Responder trait so tests run without a live transport.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dialogue::{self, Dialogue, Event, Step};

/// Reply for free text arriving outside any session.
pub const REPLY_NO_SESSION: &str = "Send /start to plan your workday.";
/// Reply for /cancel with no open session.
pub const REPLY_NOTHING_TO_CANCEL: &str = "Nothing to cancel. Send /start to begin.";

/// Telegram chat identifier.
pub type ChatId = i64;

/// Outbound side of the transport: delivers one plain-text reply.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()>;
}

/// The two commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
}

/// One inbound event from the transport, tagged with its chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command { chat_id: ChatId, command: Command },
    Text { chat_id: ChatId, text: String },
}

/// Classify one message's text as a command or free text.
///
/// Commands are a leading `/` token; Telegram group clients may append
/// `@botname`, which is stripped. Unknown commands yield `None` and are
/// dropped, matching a dispatcher with no handler registered for them.
pub fn parse_inbound(chat_id: ChatId, text: &str) -> Option<Inbound> {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        let token = rest.split_whitespace().next().unwrap_or("");
        let name = token.split('@').next().unwrap_or("");
        let command = match name {
            "start" => Command::Start,
            "cancel" => Command::Cancel,
            _ => {
                debug!(chat_id, command = name, "ignoring unknown command");
                return None;
            }
        };
        return Some(Inbound::Command { chat_id, command });
    }
    Some(Inbound::Text {
        chat_id,
        text: trimmed.to_string(),
    })
}

/// Routes events to the per-chat state machines and sends the replies.
///
/// Sessions live only in this map; a finished or cancelled dialogue is
/// removed and leaves nothing behind.
pub struct Dispatcher {
    sessions: HashMap<ChatId, Dialogue>,
    responder: Arc<dyn Responder>,
}

impl Dispatcher {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            sessions: HashMap::new(),
            responder,
        }
    }

    /// Number of currently open sessions.
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Handle one inbound event: advance (or create) the chat's session
    /// and deliver the resulting reply.
    pub async fn handle(&mut self, inbound: Inbound) -> anyhow::Result<()> {
        match inbound {
            Inbound::Command {
                chat_id,
                command: Command::Start,
            } => {
                // /start always begins fresh, discarding any open session.
                let (state, prompt) = dialogue::begin();
                self.sessions.insert(chat_id, state);
                self.responder.send_text(chat_id, &prompt).await
            }
            Inbound::Command {
                chat_id,
                command: Command::Cancel,
            } => match self.sessions.remove(&chat_id) {
                Some(state) => {
                    let Step::Finished(reply) = dialogue::step(state, Event::Cancel) else {
                        unreachable!("cancel always finishes the dialogue");
                    };
                    self.responder.send_text(chat_id, &reply).await
                }
                None => {
                    self.responder
                        .send_text(chat_id, REPLY_NOTHING_TO_CANCEL)
                        .await
                }
            },
            Inbound::Text { chat_id, text } => {
                let Some(state) = self.sessions.remove(&chat_id) else {
                    return self.responder.send_text(chat_id, REPLY_NO_SESSION).await;
                };
                match dialogue::step(state, Event::Text(text)) {
                    Step::Continue(next, reply) => {
                        self.sessions.insert(chat_id, next);
                        self.responder.send_text(chat_id, &reply).await
                    }
                    Step::Finished(reply) => self.responder.send_text(chat_id, &reply).await,
                }
            }
        }
    }
}

/// Consume inbound events until the channel closes.
///
/// Delivery failures are logged and do not stop the loop; the session
/// state has already advanced and the user can keep going.
pub async fn run_dispatch_loop(mut dispatcher: Dispatcher, mut rx: mpsc::Receiver<Inbound>) {
    while let Some(inbound) = rx.recv().await {
        if let Err(e) = dispatcher.handle(inbound).await {
            warn!("failed to deliver reply: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::machine::{
        PROMPT_BREAK_END, PROMPT_BREAK_START, PROMPT_ENTRY, REPLY_CANCELLED, REPLY_INVALID,
    };
    use tokio::sync::Mutex;

    /// Records every reply instead of talking to Telegram.
    #[derive(Default)]
    struct RecordingResponder {
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    #[async_trait]
    impl Responder for RecordingResponder {
        async fn send_text(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
            self.sent.lock().await.push((chat_id, text.to_string()));
            Ok(())
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<RecordingResponder>) {
        let responder = Arc::new(RecordingResponder::default());
        (Dispatcher::new(responder.clone()), responder)
    }

    fn command(chat_id: ChatId, command: Command) -> Inbound {
        Inbound::Command { chat_id, command }
    }

    fn text(chat_id: ChatId, text: &str) -> Inbound {
        Inbound::Text {
            chat_id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn full_dialogue_produces_exit_time() {
        let (mut dispatcher, responder) = dispatcher();

        dispatcher.handle(command(7, Command::Start)).await.unwrap();
        dispatcher.handle(text(7, "09:00")).await.unwrap();
        dispatcher.handle(text(7, "13:00")).await.unwrap();
        dispatcher.handle(text(7, "13:30")).await.unwrap();

        let sent = responder.sent.lock().await;
        let replies: Vec<&str> = sent.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            replies,
            vec![
                PROMPT_ENTRY,
                PROMPT_BREAK_START,
                PROMPT_BREAK_END,
                "You should leave at: 17:30",
            ]
        );
        assert_eq!(dispatcher.open_sessions(), 0, "session should be dropped");
    }

    #[tokio::test]
    async fn chats_have_independent_sessions() {
        let (mut dispatcher, responder) = dispatcher();

        dispatcher.handle(command(1, Command::Start)).await.unwrap();
        dispatcher.handle(command(2, Command::Start)).await.unwrap();
        dispatcher.handle(text(1, "08:00")).await.unwrap();
        dispatcher.handle(text(2, "10:00")).await.unwrap();
        dispatcher.handle(text(1, "12:00")).await.unwrap();
        dispatcher.handle(text(1, "12:00")).await.unwrap();

        let sent = responder.sent.lock().await;
        assert!(sent.contains(&(1, "You should leave at: 16:00".to_string())));
        // Chat 2 is still mid-dialogue.
        assert_eq!(dispatcher.open_sessions(), 1);
    }

    #[tokio::test]
    async fn cancel_mid_dialogue_acknowledges_and_drops_session() {
        let (mut dispatcher, responder) = dispatcher();

        dispatcher.handle(command(5, Command::Start)).await.unwrap();
        dispatcher.handle(text(5, "09:00")).await.unwrap();
        dispatcher.handle(command(5, Command::Cancel)).await.unwrap();

        let sent = responder.sent.lock().await;
        assert_eq!(sent.last().unwrap().1, REPLY_CANCELLED);
        assert_eq!(dispatcher.open_sessions(), 0);

        drop(sent);
        // No computation happened; new text gets the no-session hint.
        dispatcher.handle(text(5, "13:00")).await.unwrap();
        let sent = responder.sent.lock().await;
        assert_eq!(sent.last().unwrap().1, REPLY_NO_SESSION);
    }

    #[tokio::test]
    async fn invalid_input_ends_the_session() {
        let (mut dispatcher, responder) = dispatcher();

        dispatcher.handle(command(3, Command::Start)).await.unwrap();
        dispatcher.handle(text(3, "09:00")).await.unwrap();
        dispatcher.handle(text(3, "13:00")).await.unwrap();
        dispatcher.handle(text(3, "25:00")).await.unwrap();

        let sent = responder.sent.lock().await;
        assert_eq!(sent.last().unwrap().1, REPLY_INVALID);
        assert_eq!(dispatcher.open_sessions(), 0);
    }

    #[tokio::test]
    async fn cancel_without_session_is_acknowledged() {
        let (mut dispatcher, responder) = dispatcher();
        dispatcher.handle(command(9, Command::Cancel)).await.unwrap();
        let sent = responder.sent.lock().await;
        assert_eq!(sent.last().unwrap().1, REPLY_NOTHING_TO_CANCEL);
    }

    #[tokio::test]
    async fn start_mid_dialogue_begins_fresh() {
        let (mut dispatcher, responder) = dispatcher();

        dispatcher.handle(command(4, Command::Start)).await.unwrap();
        dispatcher.handle(text(4, "09:00")).await.unwrap();
        dispatcher.handle(command(4, Command::Start)).await.unwrap();

        let sent = responder.sent.lock().await;
        assert_eq!(sent.last().unwrap().1, PROMPT_ENTRY);
        assert_eq!(dispatcher.open_sessions(), 1);
    }

    #[test]
    fn parse_recognises_commands() {
        assert_eq!(
            parse_inbound(1, "/start"),
            Some(command(1, Command::Start))
        );
        assert_eq!(
            parse_inbound(1, "/cancel"),
            Some(command(1, Command::Cancel))
        );
        // Group-chat form with the bot's username appended.
        assert_eq!(
            parse_inbound(1, "/start@clockout_bot"),
            Some(command(1, Command::Start))
        );
    }

    #[test]
    fn parse_drops_unknown_commands() {
        assert_eq!(parse_inbound(1, "/help"), None);
    }

    #[test]
    fn parse_passes_free_text_through() {
        assert_eq!(parse_inbound(1, " 09:00 "), Some(text(1, "09:00")));
    }
}
