// src/probe/template.rs
// =============================================================================
// URL template expansion.
//
// Catalog entries look like "https://github.com/{account}". The username
// replaces the single `{account}` field. `{{` and `}}` stand for literal
// braces. Anything else in braces, a stray brace, a missing or repeated
// placeholder, or a result that is not an absolute URL makes the template
// malformed, and the site is skipped for this run.
// =============================================================================

use std::fmt;
use url::Url;

/// The placeholder token used by the WhatsMyName catalog.
pub const PLACEHOLDER: &str = "{account}";

const FIELD_NAME: &str = "account";

/// Why a site's URL template could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    MissingPlaceholder,
    DuplicatePlaceholder,
    /// A `{name}` field other than `{account}`
    UnknownField(String),
    UnbalancedBrace,
    /// The expanded string is not a valid absolute URL
    InvalidUrl(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingPlaceholder => write!(f, "no {} placeholder", PLACEHOLDER),
            MalformedReason::DuplicatePlaceholder => {
                write!(f, "more than one {} placeholder", PLACEHOLDER)
            }
            MalformedReason::UnknownField(name) => write!(f, "unknown field '{{{}}}'", name),
            MalformedReason::UnbalancedBrace => write!(f, "unbalanced brace"),
            MalformedReason::InvalidUrl(e) => write!(f, "invalid URL: {}", e),
        }
    }
}

// Expands `template` for `username`
//
// Example:
//   expand_template("https://alpha.test/{account}", "neo")
//   -> Ok(https://alpha.test/neo)
pub fn expand_template(template: &str, username: &str) -> Result<Url, MalformedReason> {
    let mut expanded = String::with_capacity(template.len() + username.len());
    let mut placeholders = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                expanded.push('{');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(MalformedReason::UnbalancedBrace),
                        Some(ch) => field.push(ch),
                    }
                }
                if field != FIELD_NAME {
                    return Err(MalformedReason::UnknownField(field));
                }
                placeholders += 1;
                expanded.push_str(username);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                expanded.push('}');
            }
            '}' => return Err(MalformedReason::UnbalancedBrace),
            _ => expanded.push(c),
        }
    }

    match placeholders {
        0 => return Err(MalformedReason::MissingPlaceholder),
        1 => {}
        _ => return Err(MalformedReason::DuplicatePlaceholder),
    }

    Url::parse(&expanded).map_err(|e| MalformedReason::InvalidUrl(e.to_string()))
}
