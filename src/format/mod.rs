//! Pure text formatting helpers.
//!
//! - [`format_detail_text`]: markdown-lite for the node detail panel
//! - [`format_chat_message`]: markdown-lite for chat messages, with lists and code
//! - [`display_name_from_url`]: labels for resource links
//! - [`ExpandableMessage`]: long bot messages with a collapsed preview

mod links;
mod markdown;
mod message;

pub use links::{display_name_from_url, is_url};
pub use markdown::{escape_html, format_chat_message, format_detail_text};
pub use message::ExpandableMessage;
