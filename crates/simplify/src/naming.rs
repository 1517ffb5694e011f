//! Identifier naming conventions.
//!
//! Converts property names into column names (`UserId`, `userId`, `user_id`).
//! Input is split into words on spaces, underscores and hyphens; inside each
//! chunk an upper-case letter that follows a lower-case letter starts a new
//! word. A chunk without any lower-case letters stays one word, so `URL` never
//! becomes `u_r_l`.

use serde::Deserialize;
use std::str::FromStr;

use crate::error::OrmError;

/// Column naming convention applied to property names at registration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    /// Use the property name verbatim.
    #[default]
    None,
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `snake_case`
    Snake,
}

impl NamingConvention {
    /// Apply this convention to an identifier.
    pub fn apply(self, ident: &str) -> String {
        match self {
            NamingConvention::None => ident.to_string(),
            NamingConvention::Camel => to_camel(ident),
            NamingConvention::Pascal => to_pascal(ident),
            NamingConvention::Snake => to_snake(ident),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "camel" | "camelcase" => Ok(Self::Camel),
            "pascal" | "pascalcase" => Ok(Self::Pascal),
            "snake" | "snake_case" | "snakecase" => Ok(Self::Snake),
            other => Err(OrmError::Config(format!(
                "unknown naming convention '{other}'"
            ))),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '_' || c == '-'
}

fn is_all_upper(word: &str) -> bool {
    word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

fn split_words(input: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for chunk in input.split(is_separator).filter(|s| !s.is_empty()) {
        let mut start = 0;
        let mut prev_lower = false;
        for (idx, c) in chunk.char_indices() {
            if c.is_uppercase() && prev_lower {
                words.push(&chunk[start..idx]);
                start = idx;
            }
            prev_lower = c.is_lowercase();
        }
        words.push(&chunk[start..]);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Convert to `camelCase`.
///
/// `"Hello_World_Test"` becomes `"helloWorldTest"`.
pub fn to_camel(input: &str) -> String {
    let words = split_words(input);
    if words.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Convert to `PascalCase`.
///
/// Words written entirely in upper case are kept verbatim
/// (`"SINGLEWORD"` stays `"SINGLEWORD"`, `"ABC_DEF"` becomes `"ABCDEF"`).
pub fn to_pascal(input: &str) -> String {
    let words = split_words(input);
    if words.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    for word in words {
        if is_all_upper(word) {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Convert to `snake_case`. Idempotent.
pub fn to_snake(input: &str) -> String {
    let words = split_words(input);
    if words.is_empty() {
        return input.to_string();
    }
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
