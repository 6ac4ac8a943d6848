use regex::{Captures, Regex};
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*(.*?)\*"));
static LINK: LazyLock<Regex> = LazyLock::new(|| compile(r"\[(.*?)\]\((.*?)\)"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| compile(r"`([^`]+)`"));
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)```(.+?)```"));
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d+\.\s+(.*)$"));
static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| compile(r"^-\s+(.*)$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn emphasis(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>${1}</strong>");
    ITALIC.replace_all(&text, "<em>${1}</em>").into_owned()
}

/// Format detail panel text: bold, italic, links and line breaks.
pub fn format_detail_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = emphasis(&escape_html(text));
    let text = LINK.replace_all(&text, |caps: &Captures<'_>| {
        let (label, target) = (&caps[1], &caps[2]);
        if is_safe_link_target(target) {
            format!(
                r#"<a href="{target}" target="_blank" style="color:#63b3ed;text-decoration:none;">{label}</a>"#
            )
        } else {
            caps[0].to_string()
        }
    });
    text.replace('\n', "<br>")
}

/// Only `http(s)` URLs and scheme-less relative targets become links.
fn is_safe_link_target(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || !target.contains(':')
}

enum Block {
    Text(Vec<String>),
    Ordered(Vec<String>),
    Bullet(Vec<String>),
}

/// Format a chat message: code, bold, italic, numbered and bulleted lists,
/// and line breaks.
///
/// Fenced code is emitted as `<pre><code>` with its newlines kept; list
/// items on consecutive lines share one `<ol>` or `<ul>`.
pub fn format_chat_message(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for fence in CODE_FENCE.captures_iter(text) {
        let (Some(whole), Some(code)) = (fence.get(0), fence.get(1)) else {
            continue;
        };
        out.push_str(&format_chat_lines(&text[last..whole.start()]));
        out.push_str("<pre><code>");
        out.push_str(&escape_html(code.as_str()));
        out.push_str("</code></pre>");
        last = whole.end();
    }
    out.push_str(&format_chat_lines(&text[last..]));
    out
}

fn format_chat_lines(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = emphasis(&escape_html(text));
    let text = INLINE_CODE.replace_all(&text, "<code>${1}</code>");

    let mut blocks: Vec<Block> = Vec::new();
    for line in text.split('\n') {
        if let Some(item) = ORDERED_ITEM.captures(line).and_then(|c| c.get(1)) {
            match blocks.last_mut() {
                Some(Block::Ordered(items)) => items.push(item.as_str().to_string()),
                _ => blocks.push(Block::Ordered(vec![item.as_str().to_string()])),
            }
        } else if let Some(item) = BULLET_ITEM.captures(line).and_then(|c| c.get(1)) {
            match blocks.last_mut() {
                Some(Block::Bullet(items)) => items.push(item.as_str().to_string()),
                _ => blocks.push(Block::Bullet(vec![item.as_str().to_string()])),
            }
        } else {
            match blocks.last_mut() {
                Some(Block::Text(lines)) => lines.push(line.to_string()),
                _ => blocks.push(Block::Text(vec![line.to_string()])),
            }
        }
    }

    blocks
        .into_iter()
        .map(|block| match block {
            Block::Text(lines) => lines.join("<br>"),
            Block::Ordered(items) => list("ol", &items),
            Block::Bullet(items) => list("ul", &items),
        })
        .collect()
}

fn list(tag: &str, items: &[String]) -> String {
    let body: String = items.iter().map(|i| format!("<li>{}</li>", i)).collect();
    format!("<{tag}>{body}</{tag}>")
}
