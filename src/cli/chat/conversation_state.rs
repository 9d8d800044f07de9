#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One line item in the chat log. Immutable once appended.
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

/// The append-only conversation log. Entries are never mutated or
/// removed; `/clear` starts a fresh log.
#[derive(Debug, Default)]
pub struct ConversationState {
    entries: Vec<ConversationEntry>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(ConversationEntry {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(ConversationEntry {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_appended_in_order() {
        let mut state = ConversationState::new();
        state.push_user("make a deck");
        state.push_assistant("PowerPoint created successfully");

        assert_eq!(state.len(), 2);
        assert_eq!(state.entries()[0].role, Role::User);
        assert_eq!(state.entries()[1].role, Role::Assistant);
        assert_eq!(state.entries()[0].content, "make a deck");
    }

    #[test]
    fn clear_resets_the_log() {
        let mut state = ConversationState::new();
        state.push_user("hello");
        state.clear();
        assert!(state.is_empty());
    }
}
