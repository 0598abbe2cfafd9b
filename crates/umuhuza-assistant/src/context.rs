//! Conversation assembly: system prompt, trimmed history, retrieved
//! knowledge, and the current user turn, in that order.
//!
//! Assembly is a pure function: no I/O, and no message is mutated once the
//! sequence is built. Each request rebuilds the sequence from scratch.

use serde::{Deserialize, Serialize};
use umuhuza_llm::ChatMessage;

/// Persona and grounding instruction sent as the first message of every
/// conversation.
pub const SYSTEM_PROMPT: &str = "You are UMUHUZA - Assistant, a knowledgeable and friendly guide for the \
UMUHUZA agriculture platform. Help farmers, agro-dealers, processors, and \
policy makers understand how to use the system, interpret dashboards, and \
discover platform features such as market prices, irrigation technology, \
weather services, and account management. Use simple, encouraging language. \
If users ask for unavailable data, explain how they can obtain it instead \
of fabricating facts. Keep answers concise unless a step-by-step guide is \
requested explicitly. Always lean on the retrieved UMUHUZA knowledge \
snippets; if the answer is missing, clearly state that the information is \
not yet in the knowledge base.";

/// Label prefixed to the retrieved-knowledge system message.
pub const KNOWLEDGE_LABEL: &str = "UMUHUZA knowledge base excerpts:";

/// Default trailing window of history turns kept per request.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

// ─────────────────────────────────────────────────────────────────────────────
// Conversation Turns
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a prior conversation turn as supplied by the caller.
///
/// Callers hand history over the HTTP boundary as loose `{role, content}`
/// pairs; anything that is not a user or assistant turn deserializes to
/// [`TurnRole::Other`] and is dropped during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One prior turn of the conversation, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Build the ordered message sequence for one request.
///
/// Order: system persona, then the last `history_window` history turns
/// (user/assistant roles with non-empty trimmed content only, oldest first),
/// then one system message carrying the retrieved snippets when any exist,
/// then the trimmed user message.
pub fn build_messages(
    history: &[ConversationTurn],
    user_message: &str,
    snippets: &[String],
    history_window: usize,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];

    let start = history.len().saturating_sub(history_window);
    for turn in &history[start..] {
        let content = turn.content.trim();
        if content.is_empty() {
            continue;
        }
        match turn.role {
            TurnRole::User => messages.push(ChatMessage::user(content)),
            TurnRole::Assistant => messages.push(ChatMessage::assistant(content)),
            TurnRole::Other => {}
        }
    }

    if !snippets.is_empty() {
        messages.push(ChatMessage::system(format!(
            "{}\n{}",
            KNOWLEDGE_LABEL,
            snippets.join("\n\n")
        )));
    }

    messages.push(ChatMessage::user(user_message.trim()));
    messages
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use umuhuza_llm::Role;

    #[test]
    fn test_assembled_order() {
        let history = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ];
        let snippets = vec!["UMUHUZA connects farmers and dealers.".to_string()];

        let messages = build_messages(&history, "what is umuhuza", &snippets, 6);

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1], umuhuza_llm::ChatMessage::user("hi"));
        assert_eq!(messages[2], umuhuza_llm::ChatMessage::assistant("hello"));
        assert_eq!(messages[3].role, Role::System);
        assert!(messages[3].content.starts_with(KNOWLEDGE_LABEL));
        assert!(messages[3]
            .content
            .contains("UMUHUZA connects farmers and dealers."));
        assert_eq!(messages[4], umuhuza_llm::ChatMessage::user("what is umuhuza"));
    }

    #[test]
    fn test_history_truncated_to_window() {
        let history: Vec<_> = (0..10)
            .map(|i| ConversationTurn::user(format!("turn {i}")))
            .collect();

        let messages = build_messages(&history, "latest", &[], 6);

        // system + 6 history turns + user message
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[1].content, "turn 4");
        assert_eq!(messages[7].content, "latest");
    }

    #[test]
    fn test_no_knowledge_message_when_empty() {
        let messages = build_messages(&[], "question", &[], 6);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], umuhuza_llm::ChatMessage::user("question"));
    }

    #[test]
    fn test_blank_and_foreign_turns_are_dropped() {
        let history = vec![
            ConversationTurn::user("   "),
            ConversationTurn {
                role: TurnRole::Other,
                content: "tool output".to_string(),
            },
            ConversationTurn::assistant("kept"),
        ];

        let messages = build_messages(&history, "q", &[], 6);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], umuhuza_llm::ChatMessage::assistant("kept"));
    }

    #[test]
    fn test_window_applies_before_filtering() {
        // The reference slices the last N turns first and filters after, so
        // a blank turn inside the window shrinks the kept history.
        let mut history: Vec<_> = (0..5)
            .map(|i| ConversationTurn::user(format!("old {i}")))
            .collect();
        history.push(ConversationTurn::user(""));
        history.extend((0..5).map(|i| ConversationTurn::user(format!("new {i}"))));

        let messages = build_messages(&history, "q", &[], 6);

        // Window of 6 covers the blank turn plus "new 0".."new 4"; the blank
        // one is dropped, leaving five history messages.
        assert_eq!(messages.len(), 7);
        assert_eq!(messages[1].content, "new 0");
    }

    #[test]
    fn test_snippets_joined_with_blank_line() {
        let snippets = vec!["first".to_string(), "second".to_string()];
        let messages = build_messages(&[], "q", &snippets, 6);
        assert_eq!(
            messages[1].content,
            format!("{}\nfirst\n\nsecond", KNOWLEDGE_LABEL)
        );
    }

    #[test]
    fn test_user_message_is_trimmed() {
        let messages = build_messages(&[], "  spaced out  ", &[], 6);
        assert_eq!(messages.last().unwrap().content, "spaced out");
    }

    #[test]
    fn test_turn_role_deserializes_unknown_as_other() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"system","content":"x"}"#).unwrap();
        assert_eq!(turn.role, TurnRole::Other);

        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"user","content":"x"}"#).unwrap();
        assert_eq!(turn.role, TurnRole::User);
    }
}
