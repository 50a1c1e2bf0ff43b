use console::measure_text_width;

use crate::cache::Reading;
use crate::sign::Sign;
use crate::theme::{Role, Theme};

/// Greedy word wrap. Words wider than `width` are split, explicit line
/// breaks start a new paragraph.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            for piece in split_long_word(word, width) {
                let piece_width = measure_text_width(&piece);
                if line_width > 0 && line_width + 1 + piece_width > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                if line_width > 0 {
                    line.push(' ');
                    line_width += 1;
                }
                line.push_str(&piece);
                line_width += piece_width;
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn split_long_word(word: &str, width: usize) -> Vec<String> {
    if measure_text_width(word) <= width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if measure_text_width(&piece) >= width {
            pieces.push(std::mem::take(&mut piece));
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Screen lines for one reading. Text is wrapped one column short of the
/// terminal so the cursor never auto-wraps.
pub fn horoscope_lines(sign: Sign, reading: &Reading, theme: &Theme, width: usize) -> Vec<String> {
    let title = sign.title();
    let mut lines = vec![
        String::new(),
        theme.paint(Role::Title, &title),
        theme.paint(Role::Border, &"-".repeat(title.chars().count())),
    ];

    let sections = reading.sections();
    let labelled = sections.len() > 1;
    for (label, text) in sections {
        if labelled {
            lines.push(String::new());
            lines.push(theme.paint(Role::Heading, label));
        }
        for line in wrap(text, width.saturating_sub(1)) {
            lines.push(theme.paint(Role::Text, &line));
        }
    }
    lines
}

pub fn prompt_line(theme: &Theme) -> String {
    [
        theme.paint(Role::Prompt, "Press "),
        theme.paint(Role::Key, "!"),
        theme.paint(Role::Prompt, " to change your sign or "),
        theme.paint(Role::Key, "any other key"),
        theme.paint(Role::Prompt, " to continue"),
    ]
    .concat()
}
