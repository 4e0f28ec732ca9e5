//! Rule-block scanning and re-serialization.
//!
//! A rule block is a `head { declarations }` unit of block-structured text.
//! The scanner tolerates one level of nested braces inside a body, which
//! keeps a simple at-rule (a media query wrapping inner rules) together as a
//! single opaque block keyed by the at-rule head.

use itertools::Itertools;
use regex::Regex;

/// One scanned block: the trimmed head is the identity key, the trimmed
/// body is kept verbatim. An empty body is a valid block; merging one in is
/// how a caller empties a key without deleting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    pub key: String,
    pub body: String,
}

impl RuleBlock {
    pub fn new(key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
        }
    }

    /// Render as `key {\n  decl;\n  ...\n}`.
    ///
    /// Declarations are split on `;`, trimmed, and dropped when empty, so
    /// stray whitespace and doubled semicolons do not survive a round trip.
    pub fn render(&self) -> String {
        let declarations = self
            .body
            .split(';')
            .map(str::trim)
            .filter(|declaration| !declaration.is_empty())
            .map(|declaration| format!("  {declaration};"))
            .join("\n");
        format!("{} {{\n{}\n}}", self.key, declarations)
    }
}

/// Scanner for `head { body }` blocks.
pub struct RuleBlockParser {
    block_regex: Regex,
}

impl RuleBlockParser {
    pub fn new() -> Self {
        Self {
            // Head is any brace-free run; body is brace-free text with
            // optional single-depth `{...}` groups in between.
            block_regex: Regex::new(r"([^{}]+)\{([^{}]*(?:\{[^{}]*\}[^{}]*)*)\}").unwrap(),
        }
    }

    /// Scan `text` into its ordered block list.
    ///
    /// Keys are not deduplicated here; the same key may appear many times
    /// and callers decide which occurrence wins. Text that never closes its
    /// brace does not match and is silently dropped, so a truncated snippet
    /// degrades to the blocks that were complete instead of failing.
    pub fn parse(&self, text: &str) -> Vec<RuleBlock> {
        self.block_regex
            .captures_iter(text)
            .map(|caps| RuleBlock::new(caps[1].trim(), caps[2].trim()))
            .collect()
    }
}

impl Default for RuleBlockParser {
    fn default() -> Self {
        Self::new()
    }
}
