use serde::Serialize;
use uuid::Uuid;

use super::markdown::{escape_html, format_chat_message};

/// A formatted bot message, collapsed to a preview when it is long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandableMessage {
    /// Element id for toggling, present only when the message was truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub preview_html: String,
    pub full_html: String,
}

impl ExpandableMessage {
    /// Format `content`, adding a truncated preview past `max_chars` characters.
    pub fn new(content: &str, max_chars: usize) -> Self {
        let full_html = format_chat_message(content);

        if content.chars().count() <= max_chars {
            return Self {
                id: None,
                preview_html: full_html.clone(),
                full_html,
            };
        }

        let truncated: String = content.chars().take(max_chars).collect();
        let id = Uuid::new_v4().simple().to_string();

        Self {
            id: Some(format!("msg_{}", &id[..8])),
            preview_html: format!("{}...", format_chat_message(&truncated)),
            full_html,
        }
    }

    /// Escape `content` without markdown or truncation.
    pub fn plain(content: &str) -> Self {
        let html = escape_html(content);
        Self {
            id: None,
            preview_html: html.clone(),
            full_html: html,
        }
    }

    /// Whether the preview differs from the full message.
    pub fn is_truncated(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_not_truncated() {
        let msg = ExpandableMessage::new("**Hi** there", 300);
        assert!(!msg.is_truncated());
        assert_eq!(msg.preview_html, "<strong>Hi</strong> there");
        assert_eq!(msg.preview_html, msg.full_html);
    }

    #[test]
    fn test_long_message_truncated() {
        let content = "a".repeat(20);
        let msg = ExpandableMessage::new(&content, 10);
        assert!(msg.is_truncated());
        assert_eq!(msg.preview_html, format!("{}...", "a".repeat(10)));
        assert_eq!(msg.full_html, content);

        let id = msg.id.unwrap();
        assert!(id.starts_with("msg_"));
        assert_eq!(id.len(), 12);
    }

    #[test]
    fn test_plain_message_is_escaped_only() {
        let msg = ExpandableMessage::plain("**a** <b>");
        assert!(!msg.is_truncated());
        assert_eq!(msg.full_html, "**a** &lt;b&gt;");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let msg = ExpandableMessage::new("héllo wörld", 5);
        assert_eq!(msg.preview_html, "héllo...");
    }
}
