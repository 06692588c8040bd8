//! Dependency-spec tokens such as `cycles-1.13` or `platform-windows`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while parsing a requirement token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    #[error("empty requirement")]
    Empty,

    #[error("invalid package name in requirement '{0}'")]
    InvalidName(String),

    #[error("requirement '{0}' has a trailing '-' but no version range")]
    EmptyRange(String),
}

/// A single requirement: a package name with an optional version range
///
/// The name is everything before the first `-`; the remainder is the range
/// and may contain further dashes (`usd-20.05-ta.1.2` is `usd` at
/// `20.05-ta.1.2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement {
    name: String,
    range: Option<String>,
}

impl Requirement {
    /// Build a requirement from already-split parts
    ///
    /// Use [`Requirement::parse`] for untrusted input; this constructor is
    /// checked later by [`Requirement::validate`].
    pub fn new(name: impl Into<String>, range: Option<&str>) -> Self {
        Self {
            name: name.into(),
            range: range.map(str::to_string),
        }
    }

    /// Parse a requirement token
    pub fn parse(token: &str) -> Result<Self, RequirementError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RequirementError::Empty);
        }

        let requirement = match token.split_once('-') {
            Some((_, "")) => return Err(RequirementError::EmptyRange(token.to_string())),
            Some((name, range)) => Self::new(name, Some(range)),
            None => Self::new(token, None),
        };
        requirement.validate()?;
        Ok(requirement)
    }

    /// Check the package name is non-empty and made of `[A-Za-z0-9_]`
    pub fn validate(&self) -> Result<(), RequirementError> {
        if !is_valid_name(&self.name) {
            return Err(RequirementError::InvalidName(self.to_string()));
        }
        if self.range.as_deref() == Some("") {
            return Err(RequirementError::EmptyRange(self.to_string()));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }
}

/// Package names are non-empty and limited to ASCII alphanumerics and `_`
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}-{}", self.name, range),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Requirement {
    type Error = RequirementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Requirement> for String {
    fn from(value: Requirement) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_only() {
        let req = Requirement::parse("usdcycles").unwrap();
        assert_eq!(req.name(), "usdcycles");
        assert_eq!(req.range(), None);
        assert_eq!(req.to_string(), "usdcycles");
    }

    #[test]
    fn test_parse_splits_at_first_dash() {
        let req = Requirement::parse("usd-20.05-ta.1.2").unwrap();
        assert_eq!(req.name(), "usd");
        assert_eq!(req.range(), Some("20.05-ta.1.2"));
        assert_eq!(req.to_string(), "usd-20.05-ta.1.2");

        let req = Requirement::parse("os-windows-10").unwrap();
        assert_eq!(req.name(), "os");
        assert_eq!(req.range(), Some("windows-10"));
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert_eq!(Requirement::parse("  "), Err(RequirementError::Empty));
        assert_eq!(
            Requirement::parse("-1.0"),
            Err(RequirementError::InvalidName("-1.0".to_string()))
        );
        assert_eq!(
            Requirement::parse("gcc-"),
            Err(RequirementError::EmptyRange("gcc-".to_string()))
        );
        assert!(matches!(
            Requirement::parse("visual studio"),
            Err(RequirementError::InvalidName(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let req: Requirement = serde_json::from_str(r#""gcc-7""#).unwrap();
        assert_eq!(req, Requirement::new("gcc", Some("7")));
        assert_eq!(serde_json::to_string(&req).unwrap(), r#""gcc-7""#);

        let err = serde_json::from_str::<Requirement>(r#""bad name""#);
        assert!(err.is_err());
    }
}
