use std::collections::HashMap;

use super::version::parse_version;
use super::Migration;
use crate::error::{OnwardError, Result};

/// Turn raw identifiers into migrations sorted ascending by version.
///
/// Identifiers without a leading digit run are dropped. Two identifiers that
/// parse to the same version fail the whole list.
pub fn normalize_local(identifiers: Vec<String>) -> Result<Vec<Migration>> {
    let mut seen: HashMap<i64, String> = HashMap::with_capacity(identifiers.len());
    let mut migrations = Vec::with_capacity(identifiers.len());

    for identifier in identifiers {
        let Some(version) = parse_version(&identifier)? else {
            tracing::trace!("Skipping non-migration entry {}", identifier);
            continue;
        };

        if let Some(existing) = seen.get(&version) {
            return Err(OnwardError::Validation(format!(
                "duplicate local migration version {}: '{}' and '{}'",
                version, existing, identifier
            )));
        }

        seen.insert(version, identifier.clone());
        migrations.push(Migration::new(version, identifier));
    }

    migrations.sort_by_key(|m| m.version);
    Ok(migrations)
}
