//! Forward-only line number lookup within a block of text.

use regex::Regex;

/// Finds the line numbers of successive matches in a text.
///
/// Each query starts where the previous successful match ended, so asking
/// twice for the same text finds two different occurrences. The locator
/// never moves backwards.
#[derive(Debug, Clone)]
pub struct LineLocator<'a> {
    text: &'a str,
    /// Byte offsets of every `\n`, followed by `text.len()`.
    line_ends: Vec<usize>,
    position: usize,
}

impl<'a> LineLocator<'a> {
    /// Creates a locator positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut line_ends: Vec<usize> = text
            .char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i)
            .collect();
        line_ends.push(text.len());
        Self {
            text,
            line_ends,
            position: 0,
        }
    }

    /// Returns the line of the next literal occurrence of `needle`.
    ///
    /// Returns `None` if there is no further occurrence; the position is
    /// left unchanged in that case.
    pub fn find_next(&mut self, needle: &str) -> Option<usize> {
        let start = self.position + self.text[self.position..].find(needle)?;
        Some(self.advance(start, start + needle.len()))
    }

    /// Returns the line of the next match of `pattern`.
    pub fn find_next_match(&mut self, pattern: &Regex) -> Option<usize> {
        let m = pattern.find_at(self.text, self.position)?;
        Some(self.advance(m.start(), m.end()))
    }

    /// Byte offset the next query starts from.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn advance(&mut self, start: usize, end: usize) -> usize {
        self.position = if end > start {
            end
        } else {
            // Empty match: step past it so the next query cannot return it again.
            self.text[end..]
                .chars()
                .next()
                .map_or(self.text.len(), |c| end + c.len_utf8())
        };
        self.line_at(start)
    }

    /// A `\n` belongs to the line it terminates.
    fn line_at(&self, offset: usize) -> usize {
        self.line_ends.partition_point(|&end| end < offset) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "This is a test text\n\
        which contains SOMETHING good\n\
        and has various kinds of SOMETHING line breaks \r\n\
        but even so this works (?)\n\
        potater\n\
        Q";

    #[test]
    fn finds_first_instance() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("SOMETHING"), Some(2));
    }

    #[test]
    fn finds_entry_on_last_line() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("Q"), Some(6));
    }

    #[test]
    fn finds_entry_on_first_line() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("xt"), Some(1));
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("T"), Some(1));
    }

    #[test]
    fn multi_line_entry_reports_starting_line() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next(")\npotater"), Some(4));
    }

    #[test]
    fn finds_regex() {
        let mut locator = LineLocator::new(TEXT);
        let pattern = Regex::new(r"\(.*\)").unwrap();
        assert_eq!(locator.find_next_match(&pattern), Some(4));
    }

    #[test]
    fn not_found_returns_none() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("PATATA"), None);
    }

    #[test]
    fn line_break_is_on_the_line_it_ends() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("\n"), Some(1));
    }

    #[test]
    fn skips_matches_already_passed() {
        let mut locator = LineLocator::new(TEXT);
        locator.find_next("good");
        assert_eq!(locator.find_next("SOMETHING"), Some(3));
    }

    #[test]
    fn successive_queries_move_forward() {
        let mut locator = LineLocator::new(TEXT);
        assert_eq!(locator.find_next("\n"), Some(1));
        assert_eq!(locator.find_next("\n"), Some(2));
        assert_eq!(locator.find_next("but"), Some(4));
        assert_eq!(locator.find_next("\n"), Some(4));
        assert_eq!(locator.find_next("p"), Some(5));
        assert_eq!(locator.find_next("Q"), Some(6));
        assert_eq!(locator.find_next("\n"), None);
    }

    #[test]
    fn never_rewinds() {
        let mut locator = LineLocator::new("a\nb\nc");
        assert_eq!(locator.find_next("a"), Some(1));
        assert_eq!(locator.find_next("b"), Some(2));
        assert_eq!(locator.find_next("a"), None);
        assert_eq!(locator.find_next("c"), Some(3));
    }

    #[test]
    fn empty_pattern_advances() {
        let mut locator = LineLocator::new("ab");
        let empty = Regex::new("").unwrap();
        assert_eq!(locator.find_next_match(&empty), Some(1));
        assert_eq!(locator.position(), 1);
        assert_eq!(locator.find_next_match(&empty), Some(1));
        assert_eq!(locator.position(), 2);
    }
}
