//! Fenced-code splitting for chat text.
//!
//! A fence is three backticks, an optional ASCII word tag, an optional newline,
//! then the body up to the next three backticks. Text between fences becomes
//! prose blocks with leading and trailing blank lines removed; prose that is
//! blank after that is dropped. Unterminated fences stay in the prose.

use std::sync::LazyLock;

use regex::Regex;

pub const FENCE_MARKER: &str = "```";

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_]*)\n?(.*?)```").expect("fence pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    Prose(String),
    Code { lang: Option<String>, body: String },
}

pub fn has_fence(text: &str) -> bool {
    text.contains(FENCE_MARKER)
}

/// Splits `text` into alternating prose and code blocks.
pub fn split(text: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for caps in FENCE.captures_iter(text) {
        let (Some(whole), Some(lang), Some(body)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        push_prose(&mut blocks, &text[cursor..whole.start()]);

        let lang = lang.as_str();
        blocks.push(TextBlock::Code {
            lang: (!lang.is_empty()).then(|| lang.to_string()),
            body: strip_edge_newlines(body.as_str()).to_string(),
        });
        cursor = whole.end();
    }

    push_prose(&mut blocks, &text[cursor..]);
    blocks
}

fn push_prose(blocks: &mut Vec<TextBlock>, raw: &str) {
    let trimmed = trim_blank_lines(raw);
    if !trimmed.trim().is_empty() {
        blocks.push(TextBlock::Prose(trimmed));
    }
}

/// Drops one leading and one trailing newline from a code body.
fn strip_edge_newlines(body: &str) -> &str {
    let body = body.strip_prefix('\n').unwrap_or(body);
    body.strip_suffix('\n').unwrap_or(body)
}

/// Removes whitespace-only lines from both ends, keeping interior breaks.
fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}
