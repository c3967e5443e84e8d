//! Ordered conversation log.
//!
//! A `Transcript` keeps turns in submission order. Each turn starts
//! `Pending` and receives its reply exactly once, so replies that
//! complete out of order still land on the prompt that produced them.

mod format;


/// Outcome of one exchange, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The exchange has been dispatched but not answered yet.
    Pending,
    /// The reply text, verbatim.
    Text(String),
    /// The exchange failed; carries the message shown in place of a reply.
    Failed(String),
}

impl Reply {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// One prompt and its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    prompt: String,
    reply: Reply,
}

impl ConversationTurn {
    pub fn new(prompt: impl Into<String>, reply: Reply) -> Self {
        Self {
            prompt: prompt.into(),
            reply,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn reply(&self) -> &Reply {
        &self.reply
    }
}

/// Position of a turn within its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(usize);

impl TurnId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a prompt whose reply is still outstanding.
    pub fn begin(&mut self, prompt: impl Into<String>) -> TurnId {
        self.turns.push(ConversationTurn::new(prompt, Reply::Pending));
        TurnId(self.turns.len() - 1)
    }

    /// Record the reply for a pending turn.
    ///
    /// Returns `false` without changing anything if the turn does not exist,
    /// already has a reply, or `reply` is itself `Pending`.
    pub fn complete(&mut self, id: TurnId, reply: Reply) -> bool {
        if reply.is_pending() {
            return false;
        }
        match self.turns.get_mut(id.0) {
            Some(turn) if turn.reply.is_pending() => {
                turn.reply = reply;
                true
            }
            _ => false,
        }
    }

    /// Append a turn that already has its reply.
    pub fn record(&mut self, prompt: impl Into<String>, reply: Reply) -> TurnId {
        self.turns.push(ConversationTurn::new(prompt, reply));
        TurnId(self.turns.len() - 1)
    }

    pub fn get(&self, id: TurnId) -> Option<&ConversationTurn> {
        self.turns.get(id.0)
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.turns.iter().filter(|t| t.reply.is_pending()).count()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render the transcript as plain text for export.
    pub fn to_export_text(&self) -> String {
        format::render(&self.turns)
    }

    /// Rebuild a transcript from text produced by [`Transcript::to_export_text`].
    pub fn parse_export(text: &str) -> Self {
        Self {
            turns: format::parse(text),
        }
    }
}
