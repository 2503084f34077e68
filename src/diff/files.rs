use std::collections::HashSet;

use crate::domain::FileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Removed,
    Added,
    Kept,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Removed => "Removed",
            Self::Added => "Added",
            Self::Kept => "Kept",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Self::Removed => "Removed files",
            Self::Added => "Added files",
            Self::Kept => "Kept files",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Removed => "-",
            Self::Added => "+",
            Self::Kept => "=",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiffEntry {
    pub file_id: FileId,
    pub status: FileStatus,
}

/// Classifies file ids by set membership: removed first, then added, then
/// kept. Each group keeps encounter order; repeated ids count once.
pub fn render_files(current: &[FileId], prior: &[FileId]) -> Vec<FileDiffEntry> {
    let current_set: HashSet<&FileId> = current.iter().collect();
    let prior_set: HashSet<&FileId> = prior.iter().collect();

    let removed = unique(prior)
        .filter(|id| !current_set.contains(id))
        .map(|id| entry(id, FileStatus::Removed));
    let added = unique(current)
        .filter(|id| !prior_set.contains(id))
        .map(|id| entry(id, FileStatus::Added));
    let kept = unique(current)
        .filter(|id| prior_set.contains(id))
        .map(|id| entry(id, FileStatus::Kept));

    removed.chain(added).chain(kept).collect()
}

fn unique(ids: &[FileId]) -> impl Iterator<Item = &FileId> {
    let mut seen = HashSet::new();
    ids.iter().filter(move |id| seen.insert(*id))
}

fn entry(id: &FileId, status: FileStatus) -> FileDiffEntry {
    FileDiffEntry {
        file_id: id.clone(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> Vec<FileId> {
        values.iter().map(|v| FileId::from(*v)).collect()
    }

    fn with_status(entries: &[FileDiffEntry], status: FileStatus) -> Vec<FileId> {
        entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.file_id.clone())
            .collect()
    }

    #[test]
    fn classifies_overlapping_sets() {
        let entries = render_files(&ids(&[1, 2, 3]), &ids(&[2, 3, 4]));

        assert_eq!(
            entries,
            vec![
                FileDiffEntry {
                    file_id: FileId::from(4),
                    status: FileStatus::Removed
                },
                FileDiffEntry {
                    file_id: FileId::from(1),
                    status: FileStatus::Added
                },
                FileDiffEntry {
                    file_id: FileId::from(2),
                    status: FileStatus::Kept
                },
                FileDiffEntry {
                    file_id: FileId::from(3),
                    status: FileStatus::Kept
                },
            ]
        );
    }

    #[test]
    fn groups_partition_both_sets() {
        let cases: [(Vec<i64>, Vec<i64>); 5] = [
            (vec![], vec![]),
            (vec![1, 2], vec![]),
            (vec![], vec![5, 6]),
            (vec![3, 1, 2], vec![2, 3, 1]),
            (vec![9, 8, 7, 9], vec![7, 10, 10]),
        ];

        for (current, prior) in cases {
            let current = ids(&current);
            let prior = ids(&prior);
            let entries = render_files(&current, &prior);

            let added = with_status(&entries, FileStatus::Added);
            let removed = with_status(&entries, FileStatus::Removed);
            let kept = with_status(&entries, FileStatus::Kept);

            assert!(added.iter().all(|id| !removed.contains(id)));

            let mut added_or_kept: Vec<_> = added.iter().chain(&kept).cloned().collect();
            let mut current_set = current.clone();
            added_or_kept.sort();
            current_set.sort();
            current_set.dedup();
            assert_eq!(added_or_kept, current_set);

            let mut removed_or_kept: Vec<_> = removed.iter().chain(&kept).cloned().collect();
            let mut prior_set = prior.clone();
            removed_or_kept.sort();
            prior_set.sort();
            prior_set.dedup();
            assert_eq!(removed_or_kept, prior_set);
        }
    }

    #[test]
    fn duplicate_ids_are_reported_once() {
        let entries = render_files(&ids(&[1, 1, 2]), &ids(&[2, 2]));
        assert_eq!(with_status(&entries, FileStatus::Added), ids(&[1]));
        assert_eq!(with_status(&entries, FileStatus::Kept), ids(&[2]));
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        assert!(render_files(&[], &[]).is_empty());
    }
}
