use std::collections::VecDeque;

use crate::model::FontWeight;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontState {
    pub size: f32,
    pub weight: FontWeight,
}

impl FontState {
    pub const fn new(size: f32, weight: FontWeight) -> Self {
        Self { size, weight }
    }

    /// Width of `text` in millimetres.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    fn char_width(&self, ch: char) -> f32 {
        char_width_1000(ch, self.weight) * self.size / 1000.0 / PT_PER_MM
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters with no WinAnsi code point are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

/// Approximate Helvetica advance at 1000 units/em.
fn char_width_1000(ch: char, weight: FontWeight) -> f32 {
    let b = char_to_winansi(ch);
    if b < 32 {
        return 0.0;
    }
    match weight {
        FontWeight::Normal => match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            0x95 => 350.0,                        // bullet
            _ => 556.0,
        },
        FontWeight::Bold => match b {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 => 278.0,
            74 => 556.0,
            77 => 833.0,
            65..=90 => 722.0,
            91..=96 => 333.0,
            105 | 106 | 108 => 278.0,
            102 | 116 => 333.0,
            109 => 889.0,
            119 => 778.0,
            97..=122 => 611.0,
            0x95 => 350.0,
            _ => 611.0,
        },
    }
}

/// Greedy word wrapper that hands out one line at a time, so the caller can
/// change the column width between lines.
pub(crate) struct LineBreaker {
    words: VecDeque<String>,
}

impl LineBreaker {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Next line that fits `max_width`. A word wider than the column is split
    /// between characters; every returned line holds at least one character.
    pub(crate) fn next_line(&mut self, max_width: f32, font: FontState) -> Option<String> {
        let space_w = font.text_width(" ");
        let mut line = String::new();
        let mut line_w = 0.0f32;

        while let Some(word) = self.words.front() {
            let word_w = font.text_width(word);
            if line.is_empty() {
                if word_w <= max_width {
                    line.push_str(word);
                    line_w = word_w;
                    self.words.pop_front();
                    continue;
                }
                let (head, tail) = split_word(word, max_width, font);
                self.words.pop_front();
                if !tail.is_empty() {
                    self.words.push_front(tail);
                }
                return Some(head);
            }
            if line_w + space_w + word_w > max_width {
                break;
            }
            line.push(' ');
            line.push_str(word);
            line_w += space_w + word_w;
            self.words.pop_front();
        }

        if line.is_empty() { None } else { Some(line) }
    }
}

fn split_word(word: &str, max_width: f32, font: FontState) -> (String, String) {
    let mut width = 0.0f32;
    let mut split_at = word.len();
    for (i, ch) in word.char_indices() {
        let w = font.text_width(ch.encode_utf8(&mut [0u8; 4]));
        if i > 0 && width + w > max_width {
            split_at = i;
            break;
        }
        width += w;
    }
    (word[..split_at].to_string(), word[split_at..].to_string())
}

/// Wrap `text` into lines no wider than `max_width`. Empty text yields one
/// empty line.
pub(crate) fn wrap(text: &str, max_width: f32, font: FontState) -> Vec<String> {
    let mut breaker = LineBreaker::new(text);
    let mut lines = Vec::new();
    while let Some(line) = breaker.next_line(max_width, font) {
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: FontState = FontState::new(11.0, FontWeight::Normal);

    #[test]
    fn width_scales_with_font_size() {
        let small = FontState::new(10.0, FontWeight::Normal).text_width("abc");
        let large = FontState::new(20.0, FontWeight::Normal).text_width("abc");
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn wrapped_lines_fit_the_column() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
        for line in wrap(&text, 60.0, BODY) {
            assert!(BODY.text_width(&line) <= 60.0, "{line:?} too wide");
        }
    }

    #[test]
    fn overlong_word_is_split_between_characters() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 20.0, BODY);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap("   ", 100.0, BODY), vec![String::new()]);
    }

    #[test]
    fn unmappable_characters_are_dropped_for_pdf() {
        assert_eq!(to_winansi_bytes("a\u{2022}\u{4e2d}"), vec![b'a', 0x95]);
    }
}
