//! Prose and code blocks → pre-wrapped ratatui lines.
//!
//! Everything is wrapped here rather than by `Paragraph`, so the number of
//! lines returned is exactly the number of rows drawn. Message heights are
//! computed from the same functions that produce the lines.
//!
//! Code blocks are framed and syntax-highlighted with syntect:
//!
//! ```text
//! ╭── python ──
//! │ print(1)
//! ╰──
//! ```
//!
//! Code lines are never wrapped; anything past the edge is clipped.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

use crate::core::fence::TextBlock;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";
const TAB: &str = "    ";

const fn frame_style() -> Style {
    Style::new().fg(Color::DarkGray)
}

pub fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Wraps `text` to `width` columns. Explicit newlines always break, and empty
/// input lines are kept as empty rows.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let options = wrap_options(width);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let line = line.replace('\t', TAB);
        if line.trim().is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(textwrap::wrap(&line, &options).into_iter().map(|c| c.into_owned()));
    }
    rows
}

pub fn prose_lines(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    wrap_text(text, width)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect()
}

/// A framed, highlighted code block. One output line per body line plus the
/// top and bottom frame.
pub fn code_lines(lang: Option<&str>, body: &str) -> Vec<Line<'static>> {
    let bs = frame_style();
    let mut lines = Vec::new();

    lines.push(match lang {
        Some(lang) => Line::from(vec![
            Span::styled("╭── ", bs),
            Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
            Span::styled(" ──", bs),
        ]),
        None => Line::from(Span::styled("╭──", bs)),
    });

    let mut highlighter = lang
        .and_then(|l| SYNTAX_SET.find_syntax_by_token(l))
        .zip(THEME_SET.themes.get(THEME))
        .map(|(syntax, theme)| HighlightLines::new(syntax, theme));

    for raw in body.split('\n') {
        let mut spans = vec![Span::styled("│ ", bs)];
        spans.extend(highlight_row(highlighter.as_mut(), raw));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled("╰──", bs)));
    lines
}

fn highlight_row(highlighter: Option<&mut HighlightLines<'static>>, raw: &str) -> Vec<Span<'static>> {
    let plain = || vec![Span::styled(raw.replace('\t', TAB), Style::default().fg(Color::White))];

    let Some(hl) = highlighter else {
        return plain();
    };
    let with_newline = format!("{raw}\n");
    match hl.highlight_line(&with_newline, &SYNTAX_SET) {
        Ok(ranges) => ranges
            .into_iter()
            .filter_map(|(style, frag)| {
                let content = frag.trim_end_matches('\n').replace('\t', TAB);
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                Some(Span::styled(content, Style::default().fg(fg)))
            })
            .collect(),
        Err(e) => {
            log::debug!("Highlighting failed, showing plain code: {}", e);
            plain()
        }
    }
}

/// All blocks of a text message, separated by one blank row.
pub fn block_lines(blocks: &[TextBlock], width: usize, prose_style: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        match block {
            TextBlock::Prose(text) => lines.extend(prose_lines(text, width, prose_style)),
            TextBlock::Code { lang, body } => lines.extend(code_lines(lang.as_deref(), body)),
        }
    }
    lines
}
