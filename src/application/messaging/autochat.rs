//! Auto-chat channel designation

use std::sync::RwLock;

/// Holds the chat currently designated for auto-chat, if any.
///
/// The router only reads this; mutation happens in the admin-gated
/// command branch of the update loop. Process-lifetime only, nothing is
/// persisted across restarts.
#[derive(Default)]
pub struct AutoChatState {
    channel: RwLock<Option<String>>,
}

impl AutoChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, chat_id: impl Into<String>) {
        let mut channel = self
            .channel
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *channel = Some(chat_id.into());
    }

    pub fn clear(&self) {
        let mut channel = self
            .channel
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *channel = None;
    }

    pub fn get(&self) -> Option<String> {
        self.channel
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_designated(&self, chat_id: &str) -> bool {
        self.get().as_deref() == Some(chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_a_designation() {
        let state = AutoChatState::new();
        assert_eq!(state.get(), None);
        assert!(!state.is_designated("100"));
    }

    #[test]
    fn set_then_clear() {
        let state = AutoChatState::new();
        state.set("100");
        assert!(state.is_designated("100"));
        assert!(!state.is_designated("200"));

        state.clear();
        assert_eq!(state.get(), None);
        assert!(!state.is_designated("100"));
    }

    #[test]
    fn set_replaces_the_previous_designation() {
        let state = AutoChatState::new();
        state.set("100");
        state.set("200");
        assert!(!state.is_designated("100"));
        assert!(state.is_designated("200"));
    }
}
