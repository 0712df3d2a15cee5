use serde::Serialize;

use super::{Migration, Version};

/// Result of reconciling local migrations against applied versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingSet {
    /// Local migrations not yet applied, ascending by version.
    pub migrations: Vec<Migration>,
    /// Applied versions with no local migration, ascending.
    pub orphaned: Vec<Version>,
}

impl PendingSet {
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

/// Merge two ascending version lists and collect the local entries that the
/// remote list lacks.
///
/// Both inputs must be sorted ascending with no repeats. Remote entries below
/// the current local version are orphans; they are reported and skipped
/// without disturbing the local cursor. Remote entries past the last local
/// migration are not examined.
pub fn compute_pending(local: &[Migration], remote: &[Version]) -> PendingSet {
    let mut result = PendingSet::default();
    let (mut i, mut j) = (0, 0);

    while i < local.len() {
        let current = &local[i];
        match remote.get(j) {
            Some(&applied) if applied == current.version => {
                i += 1;
                j += 1;
            }
            Some(&applied) if applied < current.version => {
                result.orphaned.push(applied);
                j += 1;
            }
            _ => {
                result.migrations.push(current.clone());
                i += 1;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(versions: &[Version]) -> Vec<Migration> {
        versions
            .iter()
            .map(|v| Migration::new(*v, format!("{}-m.sql", v)))
            .collect()
    }

    fn pending_versions(set: &PendingSet) -> Vec<Version> {
        set.migrations.iter().map(|m| m.version).collect()
    }

    #[test]
    fn test_nothing_applied() {
        let set = compute_pending(&local(&[1, 2, 3]), &[]);
        assert_eq!(pending_versions(&set), vec![1, 2, 3]);
        assert!(set.orphaned.is_empty());
    }

    #[test]
    fn test_everything_applied() {
        let set = compute_pending(&local(&[1, 2, 3]), &[1, 2, 3]);
        assert!(set.is_empty());
        assert!(set.orphaned.is_empty());
    }

    #[test]
    fn test_gap_in_remote() {
        let set = compute_pending(&local(&[2, 3, 10]), &[2]);
        assert_eq!(pending_versions(&set), vec![3, 10]);
    }

    #[test]
    fn test_orphan_between_matches() {
        let set = compute_pending(&local(&[1, 5]), &[1, 3, 5]);
        assert!(set.is_empty());
        assert_eq!(set.orphaned, vec![3]);
    }

    #[test]
    fn test_orphans_before_pending_entry() {
        // Several orphans in front of one pending migration must not emit it twice.
        let set = compute_pending(&local(&[10]), &[1, 2, 3]);
        assert_eq!(pending_versions(&set), vec![10]);
        assert_eq!(set.orphaned, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_order_authoring() {
        // A local file numbered below an applied version is still pending.
        let set = compute_pending(&local(&[1, 4, 6]), &[1, 6]);
        assert_eq!(pending_versions(&set), vec![4]);
        assert!(set.orphaned.is_empty());
    }

    #[test]
    fn test_trailing_remote_entries_ignored() {
        let set = compute_pending(&local(&[1]), &[1, 7, 8]);
        assert!(set.is_empty());
        assert!(set.orphaned.is_empty());
    }

    #[test]
    fn test_empty_local() {
        let set = compute_pending(&[], &[7]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_orphans_never_hide_later_locals() {
        let locals = local(&[2, 4, 6, 8]);
        let base = compute_pending(&locals, &[4]);
        let noisy = compute_pending(&locals, &[1, 3, 4, 5, 7]);
        assert_eq!(pending_versions(&base), vec![2, 6, 8]);
        assert_eq!(pending_versions(&noisy), pending_versions(&base));
        assert_eq!(noisy.orphaned, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_pending_matches_set_difference() {
        // Every subset of 1..=6 as local against a fixed remote with orphans.
        let remote: Vec<Version> = vec![0, 2, 3, 5, 9];
        for mask in 0u32..64 {
            let versions: Vec<Version> = (1..=6).filter(|v| mask & (1 << (v - 1)) != 0).collect();
            let set = compute_pending(&local(&versions), &remote);
            let expected: Vec<Version> = versions
                .iter()
                .copied()
                .filter(|v| !remote.contains(v))
                .collect();
            assert_eq!(pending_versions(&set), expected, "local {:?}", versions);
        }
    }
}
