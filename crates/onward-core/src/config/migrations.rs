use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where migration files live and how remote-only versions are treated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Working directory holding the migration files.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File extension of migration scripts, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// What to do when the database knows a version with no local file.
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            extension: default_extension(),
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "sql".to_string()
}

/// Handling of remote versions that have no local migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Log a warning and keep going.
    #[default]
    Warn,
    /// Refuse to run anything.
    Fail,
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warn" => Ok(OrphanPolicy::Warn),
            "fail" => Ok(OrphanPolicy::Fail),
            other => Err(format!("unknown orphan policy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_policy_from_str() {
        assert_eq!("warn".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Warn));
        assert_eq!("FAIL".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Fail));
        assert!("ignore".parse::<OrphanPolicy>().is_err());
    }
}
