//! Straight quote detection and rewriting
//!
//! Each straight quote found in a text is classified from its immediate
//! neighbours as an opening quote, a closing quote or an apostrophe, and
//! replaced with the matching typographic character. Quotes whose context is
//! ambiguous alternate between opening and closing based on how many quotes
//! are currently open.

use crate::ranges::{is_ignored, IgnoredRange};
use log::trace;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// Straight quote character family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteFamily {
    /// `'`
    Single,
    /// `"`
    Double,
}

impl QuoteFamily {
    pub const ALL: [QuoteFamily; 2] = [QuoteFamily::Single, QuoteFamily::Double];

    /// The straight character of this family
    pub fn straight(self) -> char {
        match self {
            QuoteFamily::Single => '\'',
            QuoteFamily::Double => '"',
        }
    }
}

/// Opening and closing replacement for one quote family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePair {
    pub opening: String,
    pub closing: String,
}

impl QuotePair {
    pub fn new(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            closing: closing.into(),
        }
    }
}

/// Replacement characters for both quote families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteStyle {
    pub single: QuotePair,
    pub double: QuotePair,
}

impl Default for QuoteStyle {
    fn default() -> Self {
        Self {
            single: QuotePair::new("\u{2018}", "\u{2019}"),
            double: QuotePair::new("\u{201C}", "\u{201D}"),
        }
    }
}

impl QuoteStyle {
    pub fn pair(&self, family: QuoteFamily) -> &QuotePair {
        match family {
            QuoteFamily::Single => &self.single,
            QuoteFamily::Double => &self.double,
        }
    }
}

/// How a single straight quote is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteRole {
    /// Preceded by whitespace and followed by text
    Opening,
    /// Preceded by text and followed by whitespace
    Closing,
    /// Inside or at the end of a word; rendered as a closing mark but not
    /// counted as a quote
    Apostrophe,
    /// No usable context; decided by the open quote count
    Fallback,
}

/// Position facts about a quote that its neighbours alone do not tell
#[derive(Debug, Clone, Copy)]
pub struct QuoteContext {
    pub family: QuoteFamily,
    /// The quote is the first character after the trimmed delimiters
    pub at_scan_start: bool,
    /// The scanned text is exactly one character long
    pub single_character: bool,
}

// Neighbours are strings rather than chars: an already rewritten quote may
// have been replaced by an arbitrary configured string.
fn is_opening_boundary(neighbour: Option<&str>) -> bool {
    matches!(neighbour, None | Some(" ") | Some("\n"))
}

fn is_closing_boundary(neighbour: Option<&str>) -> bool {
    matches!(neighbour, None | Some("") | Some(" ") | Some("\n") | Some("\r"))
}

/// Classify a quote from its neighbours. The order of the checks matters.
pub fn classify(previous: Option<&str>, next: Option<&str>, context: QuoteContext) -> QuoteRole {
    if is_opening_boundary(previous) && !is_opening_boundary(next) {
        QuoteRole::Opening
    } else if !is_closing_boundary(previous) && is_closing_boundary(next) {
        QuoteRole::Closing
    } else if context.family == QuoteFamily::Single
        && ((!is_closing_boundary(previous) && !context.at_scan_start)
            || context.single_character)
    {
        QuoteRole::Apostrophe
    } else {
        QuoteRole::Fallback
    }
}

/// Byte range of `text` left after dropping `trim` characters from both ends
fn scan_region(text: &str, trim: usize) -> Range<usize> {
    let start = text.char_indices().nth(trim).map_or(text.len(), |(i, _)| i);
    let end = if trim == 0 {
        text.len()
    } else {
        text.char_indices().rev().nth(trim - 1).map_or(0, |(i, _)| i)
    };

    if start <= end {
        start..end
    } else {
        start..start
    }
}

/// Byte offsets of every `family` quote in the scanned part of `text` that
/// is not inside one of `ignored`, in ascending order
pub fn quote_indices(
    text: &str,
    trim: usize,
    family: QuoteFamily,
    ignored: &[IgnoredRange],
) -> Vec<usize> {
    let region = scan_region(text, trim);
    text[region.clone()]
        .match_indices(family.straight())
        .map(|(i, _)| i + region.start)
        .filter(|&i| !is_ignored(i, ignored))
        .collect()
}

/// Whether the scanned part of `text` contains a straight quote of either
/// family outside of `ignored`
pub fn contains_unignored_quote(text: &str, trim: usize, ignored: &[IgnoredRange]) -> bool {
    QuoteFamily::ALL
        .iter()
        .any(|&family| !quote_indices(text, trim, family, ignored).is_empty())
}

/// In-progress rewrite of one text.
///
/// Every pass addresses the original text, so ignore ranges stay valid after
/// earlier passes have swapped one-byte quotes for multi-byte replacements or
/// dropped backslashes.
struct Rewrite<'a> {
    text: &'a str,
    trim: usize,
    ignored: &'a [IgnoredRange],
    replacements: BTreeMap<usize, &'a str>,
    removed: BTreeSet<usize>,
}

impl<'a> Rewrite<'a> {
    fn new(text: &'a str, trim: usize, ignored: &'a [IgnoredRange]) -> Self {
        Self {
            text,
            trim,
            ignored,
            replacements: BTreeMap::new(),
            removed: BTreeSet::new(),
        }
    }

    /// Current content of the character starting at `start`
    fn resolve(&self, start: usize, end: usize) -> &'a str {
        let text = self.text;
        self.replacements
            .get(&start)
            .copied()
            .unwrap_or(&text[start..end])
    }

    fn previous(&self, index: usize) -> Option<&'a str> {
        let text = self.text;
        text[..index]
            .char_indices()
            .rev()
            .find(|(i, _)| !self.removed.contains(i))
            .map(|(i, c)| self.resolve(i, i + c.len_utf8()))
    }

    fn next(&self, index: usize) -> Option<&'a str> {
        let text = self.text;
        let from = index + 1;
        text[from..]
            .char_indices()
            .map(|(i, c)| (i + from, c))
            .find(|(i, _)| !self.removed.contains(i))
            .map(|(i, c)| self.resolve(i, i + c.len_utf8()))
    }

    fn apply(&mut self, family: QuoteFamily, opening: &'a str, closing: &'a str) -> &mut Self {
        let indices = quote_indices(self.text, self.trim, family, self.ignored);
        if indices.is_empty() {
            return self;
        }

        let region = scan_region(self.text, self.trim);
        let single_character = self.text.chars().count().saturating_sub(2 * self.trim) == 1;
        let mut opened_quotes: isize = 0;

        for &index in &indices {
            let previous = self.previous(index);
            let next = self.next(index);
            let context = QuoteContext {
                family,
                at_scan_start: index == region.start,
                single_character,
            };

            let role = classify(previous, next, context);
            let replacement = match role {
                QuoteRole::Opening => {
                    opened_quotes += 1;
                    opening
                }
                QuoteRole::Closing => {
                    opened_quotes -= 1;
                    closing
                }
                QuoteRole::Apostrophe => closing,
                QuoteRole::Fallback if opened_quotes == 0 => {
                    opened_quotes += 1;
                    opening
                }
                QuoteRole::Fallback => {
                    opened_quotes -= 1;
                    closing
                }
            };
            trace!(
                "quote at {index}: {role:?} ({previous:?}, {next:?}) -> {replacement:?}, open = {opened_quotes}"
            );
            self.replacements.insert(index, replacement);
        }

        // An odd run of backslashes right before a quote ends with one that
        // only escaped the quote, and curly quotes need no escaping.
        let mut segment_start = 0;
        for &index in &indices {
            let run = self.text.as_bytes()[segment_start..index]
                .iter()
                .rev()
                .take_while(|&&b| b == b'\\')
                .count();
            if run % 2 == 1 {
                self.removed.insert(index - 1);
            }
            segment_start = index + 1;
        }

        self
    }

    fn finish(&self) -> String {
        let mut output = String::with_capacity(self.text.len() + 2 * self.replacements.len());
        for (i, c) in self.text.char_indices() {
            if self.removed.contains(&i) {
                continue;
            }
            match self.replacements.get(&i) {
                Some(replacement) => output.push_str(replacement),
                None => output.push(c),
            }
        }
        output
    }
}

/// Replace every `family` straight quote in `text` with `opening` or
/// `closing`, dropping backslashes that only escaped a replaced quote.
///
/// `trim` characters at each end (string delimiters) are left alone, as is
/// everything inside `ignored`.
pub fn replace_quotes(
    text: &str,
    trim: usize,
    family: QuoteFamily,
    opening: &str,
    closing: &str,
    ignored: &[IgnoredRange],
) -> String {
    Rewrite::new(text, trim, ignored)
        .apply(family, opening, closing)
        .finish()
}

/// Replace single quotes, then double quotes, as two chained passes over the
/// same text
pub fn replace_all_quotes(
    text: &str,
    trim: usize,
    style: &QuoteStyle,
    ignored: &[IgnoredRange],
) -> String {
    let mut rewrite = Rewrite::new(text, trim, ignored);
    for family in QuoteFamily::ALL {
        let pair = style.pair(family);
        rewrite.apply(family, &pair.opening, &pair.closing);
    }
    rewrite.finish()
}
