//! Regex-driven tokenizer
//!
//! The whole lexical grammar is a single alternation compiled once per
//! engine. Alternatives are tried leftmost-first, so their order decides
//! overlapping matches at the same position:
//!
//! 1. two-character comparison operators (`<=`, `>=`, `==`, `!=`)
//! 2. single structural/operator characters `-+*/():,<>!=%^[]{}`
//! 3. unsigned decimal numbers (`12`, `3.5`)
//! 4. double- or single-quoted strings, taken verbatim (no escapes)
//! 5. identifiers with dotted/indexed paths (`a.b[0]`) or a spread (`...a`)
//! 6. an optional caller-supplied pattern
//!
//! Word characters and word boundaries are ASCII-only. Characters matched by
//! none of the alternatives (whitespace and non-ASCII letters included) are
//! skipped. Tokens are untyped slices of the input; the grammar classifies
//! them.

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;

const COMPARISON_OPERATORS: &str = r"[<>]=|==|!=";
const SPECIAL_CHARACTERS: &str = r"[-+*/():,<>!=%^\[\]{}]";
const NUMBER: &str = r"(?-u:\b)[0-9]+(?:\.[0-9]+)?";
const STRING: &str = r#""[^"]*"|'[^']*'"#;
const IDENTIFIER: &str = r"(?-u:\w)+(?:\.(?-u:\w)+)*(?:\[[0-9]+\])*|\.\.\.(?-u:\w)+";

fn base_pattern() -> String {
    [COMPARISON_OPERATORS, SPECIAL_CHARACTERS, NUMBER, STRING, IDENTIFIER].join("|")
}

static DEFAULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&base_pattern()).expect("base token pattern is valid"));

/// Tokenizer built from the base alternatives plus an optional extension
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

impl Tokenizer {
    /// Create a tokenizer, appending `extra` as the lowest-priority alternative
    pub fn new(extra: Option<&str>) -> Result<Self> {
        match extra {
            None => Ok(Self::default()),
            Some(extra) => {
                let pattern = Regex::new(&format!("{}|{extra}", base_pattern()))?;
                log::debug!("compiled tokenizer with extra pattern {extra:?}");
                Ok(Self { pattern })
            }
        }
    }

    /// Split `text` into tokens. Empty matches are dropped.
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Source of the composed pattern
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
