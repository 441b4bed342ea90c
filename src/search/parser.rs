//! Query Parser
//!
//! Splits a raw query into terms, quoted phrases, boolean operators and
//! `field:value` searches. Parsing is tolerant: every input produces a
//! result, and malformed syntax degrades to the closest sensible reading.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean operator tokens, recognised case-insensitively as whole tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("AND") {
            Some(Operator::And)
        } else if token.eq_ignore_ascii_case("OR") {
            Some(Operator::Or)
        } else if token.eq_ignore_ascii_case("NOT") {
            Some(Operator::Not)
        } else {
            None
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
            Operator::Not => write!(f, "NOT"),
        }
    }
}

/// A `field:value` restriction. Field names are kept as written; deciding
/// which fields mean something is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSearch {
    pub field: String,
    pub value: String,
}

/// Parsed search query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Plain words in query order, duplicates kept
    pub terms: Vec<String>,
    /// Quoted spans with the quotes removed
    pub phrases: Vec<String>,
    pub operators: Vec<Operator>,
    pub field_searches: Vec<FieldSearch>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
            && self.phrases.is_empty()
            && self.operators.is_empty()
            && self.field_searches.is_empty()
    }

    /// Strings to match against note text: terms first, then phrases
    pub fn search_terms(&self) -> Vec<String> {
        self.terms
            .iter()
            .chain(self.phrases.iter())
            .cloned()
            .collect()
    }

    /// Values of field searches whose field is one of `fields` (ASCII case-insensitive)
    pub fn field_values(&self, fields: &[&str]) -> Vec<String> {
        self.field_searches
            .iter()
            .filter(|fs| fields.iter().any(|f| fs.field.eq_ignore_ascii_case(f)))
            .map(|fs| fs.value.clone())
            .collect()
    }
}

/// One whitespace-delimited token, with quote characters already removed
#[derive(Debug)]
struct Token {
    text: String,
    /// Token opened with a quote, so the whole token is a phrase
    phrase: bool,
    /// Token contained a quote anywhere
    quoted: bool,
}

/// Query parser
pub struct QueryParser;

impl QueryParser {
    /// Parse a search query into its components
    pub fn parse(query: &str) -> ParsedQuery {
        let mut parsed = ParsedQuery::default();

        for token in Self::tokenize(query) {
            if token.phrase {
                parsed.phrases.push(token.text);
                continue;
            }

            if !token.quoted {
                if let Some(op) = Operator::from_token(&token.text) {
                    parsed.operators.push(op);
                    continue;
                }
            }

            match Self::split_field(&token) {
                Some(field_search) => parsed.field_searches.push(field_search),
                None => parsed.terms.push(token.text),
            }
        }

        parsed
    }

    /// Split on whitespace except between double quotes. An unterminated
    /// quote swallows the rest of the query.
    fn tokenize(query: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_quote = false;
        let mut phrase = false;
        let mut quoted = false;

        for ch in query.chars() {
            if ch == '"' {
                if !in_quote && current.is_empty() && !quoted {
                    phrase = true;
                }
                in_quote = !in_quote;
                quoted = true;
            } else if ch.is_whitespace() && !in_quote {
                Self::flush(&mut tokens, &mut current, phrase, quoted);
                phrase = false;
                quoted = false;
            } else {
                current.push(ch);
            }
        }
        Self::flush(&mut tokens, &mut current, phrase, quoted);

        tokens
    }

    fn flush(tokens: &mut Vec<Token>, current: &mut String, phrase: bool, quoted: bool) {
        let text = std::mem::take(current);
        let text = if phrase { text.trim().to_string() } else { text };
        // Empty tokens come from `""` or runs of whitespace
        if !text.is_empty() {
            tokens.push(Token {
                text,
                phrase,
                quoted,
            });
        }
    }

    /// `field:value` with a non-empty `[A-Za-z0-9_-]` field and non-empty value.
    /// Unquoted values may not contain another colon.
    fn split_field(token: &Token) -> Option<FieldSearch> {
        let (field, value) = token.text.split_once(':')?;

        if field.is_empty()
            || !field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return None;
        }
        if value.is_empty() || (!token.quoted && value.contains(':')) {
            return None;
        }

        Some(FieldSearch {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
