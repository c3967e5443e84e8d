//! Prompt composition: Enter submits, Shift+Enter inserts a newline.

/// Line-continuation marker used by the terminal surface in place of
/// Shift+Enter.
const CONTINUATION: char = '\\';

/// Text being composed before submission.
#[derive(Debug, Default)]
pub struct PromptInput {
    buffer: String,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn insert_newline(&mut self) {
        self.buffer.push('\n');
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Handle the Return key. With Shift held, a newline is inserted and
    /// composition continues; otherwise the prompt is taken for submission.
    pub fn handle_return(&mut self, shift: bool) -> Option<String> {
        if shift {
            self.insert_newline();
            None
        } else {
            Some(self.take_prompt())
        }
    }

    /// Feed one terminal line. A trailing backslash stands for Shift+Enter.
    pub fn feed_line(&mut self, line: &str) -> Option<String> {
        match line.strip_suffix(CONTINUATION) {
            Some(head) => {
                self.push_str(head);
                self.handle_return(true)
            }
            None => {
                self.push_str(line);
                self.handle_return(false)
            }
        }
    }

    /// Take the composed text, dropping exactly one trailing newline.
    pub fn take_prompt(&mut self) -> String {
        let mut prompt = std::mem::take(&mut self.buffer);
        if prompt.ends_with('\n') {
            prompt.pop();
        }
        prompt
    }
}
