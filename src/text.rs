//! Plain text rendition and message-sized chunking.

use crate::grid::CharGrid;

/// Message limit of the chat platforms the bot talks to.
pub const DEFAULT_CHUNK_LEN: usize = 4096;

/// Characters [`fence`] adds around a chunk, at most.
pub const FENCE_OVERHEAD: usize = 8;

/// One line per grid row, each terminated by `\n`.
///
/// With `duplicate`, every character is emitted twice so the narrow glyphs of
/// a monospace font come out closer to square.
pub fn render(grid: &CharGrid, duplicate: bool) -> String {
    let per_char = if duplicate { 2 } else { 1 };
    let mut out = String::with_capacity((grid.width() * per_char + 1) * grid.height());
    for row in grid.rows() {
        for ch in row {
            out.push(ch);
            if duplicate {
                out.push(ch);
            }
        }
        out.push('\n');
    }
    out
}

/// Split `text` into pieces of at most `max_len` characters.
///
/// Purely length based: a split may land mid-line. Always yields at least one
/// chunk, even for empty input.
pub fn chunks(text: &str, max_len: usize) -> Chunks<'_> {
    Chunks { rest: Some(text), max_len: max_len.max(1) }
}

/// Lazy iterator returned by [`chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: Option<&'a str>,
    max_len: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let split = rest.char_indices().nth(self.max_len).map(|(i, _)| i);
        match split {
            Some(i) => {
                let (head, tail) = rest.split_at(i);
                self.rest = if tail.is_empty() { None } else { Some(tail) };
                Some(head)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Wrap a chunk in a Markdown code block so chat clients use a monospace font.
pub fn fence(chunk: &str) -> String {
    let newline = if chunk.ends_with('\n') { "" } else { "\n" };
    format!("```\n{chunk}{newline}```")
}
