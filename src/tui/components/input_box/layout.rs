//! Visual rows of an input buffer.
//!
//! Input is wrapped per character, not per word, so every byte offset maps to
//! exactly one (row, column) and back. Columns are terminal cells as measured
//! by `textwrap::core::display_width`, so wide characters (CJK, emoji) take
//! two. A logical line that fills its last row exactly gets an extra empty row,
//! which is where the cursor goes when it sits at the end of that line.

use std::ops::Range;

use textwrap::core::display_width;

fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Byte ranges of each visual row. Never empty.
pub(super) fn rows(text: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut used = 0;
        for (i, c) in line.char_indices() {
            let w = char_width(c);
            // A glyph wider than the whole row still gets a row of its own
            if used > 0 && used + w > width {
                rows.push(row_start..line_start + i);
                row_start = line_start + i;
                used = 0;
            }
            used += w;
        }
        let line_end = line_start + line.len();
        rows.push(row_start..line_end);
        if used >= width {
            rows.push(line_end..line_end);
        }
        line_start = line_end + 1;
    }
    rows
}

/// Row and display column of the cursor.
pub(super) fn cursor_position(text: &str, rows: &[Range<usize>], cursor: usize) -> (usize, usize) {
    // Last row starting at or before the cursor; at a wrap point that is the
    // next row, not the end of the previous one.
    let row = rows
        .iter()
        .rposition(|r| r.start <= cursor)
        .unwrap_or(0);
    let start = rows.get(row).map_or(0, |r| r.start);
    let col = display_width(&text[start..cursor.max(start)]);
    (row, col)
}

/// Byte offset at display column `col` of `row`, clamped to the row's end.
/// A column inside a wide glyph resolves to the glyph's start.
pub(super) fn offset_at(text: &str, rows: &[Range<usize>], row: usize, col: usize) -> usize {
    let Some(range) = rows.get(row) else {
        return text.len();
    };
    let mut used = 0;
    for (i, c) in text[range.clone()].char_indices() {
        let w = char_width(c);
        if used + w > col {
            return range.start + i;
        }
        used += w;
    }
    range.end
}
