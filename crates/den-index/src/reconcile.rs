//! Stored-vs-walked diff for one tracked root.
//!
//! A stored path missing from the walk is deleted. A stored path whose size
//! or modification time differs is deleted and reindexed. A walked path
//! with no stored entry is indexed. Identical paths are left alone.

use den_core::types::collections::FxHashMap;
use den_core::types::StoredFileState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Stored paths to remove (gone or changed), sorted.
    pub delete: Vec<String>,
    /// Walked paths to (re)index (new or changed), sorted.
    pub reindex: Vec<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.reindex.is_empty()
    }
}

pub fn reconcile(
    stored: &FxHashMap<String, StoredFileState>,
    walked: &FxHashMap<String, StoredFileState>,
) -> Reconciliation {
    let mut delete = Vec::new();
    let mut reindex = Vec::new();

    for (path, state) in stored {
        match walked.get(path) {
            None => delete.push(path.clone()),
            Some(current) if current != state => {
                delete.push(path.clone());
                reindex.push(path.clone());
            }
            Some(_) => {}
        }
    }
    for path in walked.keys() {
        if !stored.contains_key(path) {
            reindex.push(path.clone());
        }
    }

    delete.sort_unstable();
    reindex.sort_unstable();
    Reconciliation { delete, reindex }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(size: i64, modified: i64) -> StoredFileState {
        StoredFileState { size, modified }
    }

    fn map(entries: &[(&str, StoredFileState)]) -> FxHashMap<String, StoredFileState> {
        entries.iter().map(|(p, s)| (p.to_string(), *s)).collect()
    }

    #[test]
    fn classifies_each_kind_of_change() {
        let stored = map(&[
            ("/r/same", state(1, 10)),
            ("/r/gone", state(2, 10)),
            ("/r/resized", state(3, 10)),
            ("/r/touched", state(4, 10)),
        ]);
        let walked = map(&[
            ("/r/same", state(1, 10)),
            ("/r/resized", state(30, 10)),
            ("/r/touched", state(4, 11)),
            ("/r/new", state(5, 10)),
        ]);

        let diff = reconcile(&stored, &walked);
        assert_eq!(diff.delete, vec!["/r/gone", "/r/resized", "/r/touched"]);
        assert_eq!(diff.reindex, vec!["/r/new", "/r/resized", "/r/touched"]);
    }

    #[test]
    fn unchanged_tree_is_a_no_op() {
        let both = map(&[("/r/a", state(1, 1)), ("/r/b", state(2, 2))]);
        assert!(reconcile(&both, &both).is_empty());
    }

    #[test]
    fn empty_sides() {
        let some = map(&[("/r/a", state(1, 1))]);
        let none = FxHashMap::default();
        assert_eq!(reconcile(&some, &none).delete, vec!["/r/a"]);
        assert_eq!(reconcile(&none, &some).reindex, vec!["/r/a"]);
    }

    fn states() -> impl Strategy<Value = FxHashMap<String, StoredFileState>> {
        prop::collection::vec(("[a-e]{1,2}", 0i64..3, 0i64..3), 0..12).prop_map(|v| {
            v.into_iter()
                .map(|(p, size, modified)| (format!("/r/{p}"), state(size, modified)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn applying_the_diff_yields_the_walked_set(stored in states(), walked in states()) {
            let diff = reconcile(&stored, &walked);

            let mut result = stored.clone();
            for path in &diff.delete {
                prop_assert!(result.remove(path).is_some());
            }
            for path in &diff.reindex {
                prop_assert!(!result.contains_key(path));
                result.insert(path.clone(), walked[path]);
            }
            prop_assert_eq!(result, walked.clone());

            // Only entries that changed are touched.
            for path in &diff.delete {
                prop_assert!(walked.get(path) != stored.get(path));
            }
        }
    }
}
