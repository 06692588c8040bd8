//! Value templates used by activation actions.
//!
//! Action values may reference the package install root and variables set
//! earlier in the same activation:
//!
//! - `{root}` - the package's install root
//! - `{env.NAME}` - the current value of `NAME` in the environment being built
//!
//! `{{` and `}}` produce literal braces. A lone `}` passes through unchanged.
//!
//! # Example
//!
//! ```
//! use pkgdef_core::template::{parse, Placeholder, Segment};
//!
//! let segments = parse("{env.HDCYCLES_PLUGIN_ROOT}/usd").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Env("HDCYCLES_PLUGIN_ROOT".to_string())),
//!     Segment::Literal("/usd".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{root}`
    Root,

    /// `{env.NAME}`
    Env(String),
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Errors that can occur during template parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed placeholder at position {0}")]
    Unclosed(usize),

    #[error("unknown placeholder: {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("variable {0} is referenced before it is set")]
    UnsetVariable(String),
}

/// Supplies values for placeholders during substitution.
pub trait Resolver {
    fn resolve_root(&self) -> Result<&str, TemplateError>;

    fn resolve_env(&self, name: &str) -> Result<&str, TemplateError>;
}

/// Parse a template into segments.
pub fn parse(input: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut content = String::new();
                let mut found_close = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        found_close = true;
                        break;
                    }
                    content.push(c);
                }
                if !found_close {
                    return Err(TemplateError::Unclosed(pos));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(parse_placeholder(&content)?));
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                literal.push('}');
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn parse_placeholder(content: &str) -> Result<Placeholder, TemplateError> {
    let content = content.trim();
    if content == "root" {
        return Ok(Placeholder::Root);
    }
    match content.strip_prefix("env.") {
        Some(name) if !name.is_empty() => Ok(Placeholder::Env(name.to_string())),
        _ => Err(TemplateError::UnknownPlaceholder(content.to_string())),
    }
}

/// Parse a template and substitute every placeholder.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(input.len());
    for segment in parse(input)? {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Placeholder(Placeholder::Root) => out.push_str(resolver.resolve_root()?),
            Segment::Placeholder(Placeholder::Env(name)) => {
                out.push_str(resolver.resolve_env(&name)?)
            }
        }
    }
    Ok(out)
}
