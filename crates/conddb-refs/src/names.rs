//! Ref name validation following git-style conventions.
//!
//! A valid branch or tag name is non-empty, contains no whitespace or any of
//! `~ ^ : ? * [ \`, contains neither `..` nor `@{`, does not end in `.lock`,
//! and splits on `/` into non-empty components that do not start or end
//! with `.`.

use crate::error::{RefError, Result};

const FORBIDDEN_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];
const FORBIDDEN_SEQUENCES: &[&str] = &["..", "@{"];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a branch name, returning `Ok(())` if valid.
///
/// ```
/// use conddb_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("calib/2024").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(c))
    {
        return Err(invalid(name, format!("contains forbidden character {ch:?}")));
    }
    if let Some(seq) = FORBIDDEN_SEQUENCES.iter().find(|s| name.contains(*s)) {
        return Err(invalid(name, format!("must not contain {seq:?}")));
    }
    if name.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.lock'"));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "path components must not be empty"));
        }
        if component.starts_with('.') || component.ends_with('.') {
            return Err(invalid(
                name,
                format!("component must not start or end with '.': {component:?}"),
            ));
        }
    }
    Ok(())
}

/// Validate a tag name. Same rules as branch names, reported as a tag.
pub fn validate_tag_name(name: &str) -> Result<()> {
    validate_branch_name(name).map_err(|e| match e {
        RefError::InvalidName { reason, .. } => invalid(name, format!("invalid tag name: {reason}")),
        other => other,
    })
}
