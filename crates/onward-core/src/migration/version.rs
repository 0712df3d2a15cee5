use super::Version;
use crate::error::{OnwardError, Result};

/// Last path segment of a migration identifier.
///
/// Both separators are accepted so identifiers produced on Windows hosts
/// parse the same way.
pub fn basename(identifier: &str) -> &str {
    identifier
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(identifier)
}

/// Parse the leading run of decimal digits of an identifier's basename.
///
/// Returns `Ok(None)` when the basename does not start with a digit; such
/// entries are not migrations and are skipped by the caller.
pub fn parse_version(identifier: &str) -> Result<Option<Version>> {
    let name = basename(identifier);
    let digits_end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());

    if digits_end == 0 {
        return Ok(None);
    }

    name[..digits_end]
        .parse::<Version>()
        .map(Some)
        .map_err(|_| {
            OnwardError::Validation(format!(
                "migration version in '{}' does not fit in a 64-bit integer",
                identifier
            ))
        })
}
