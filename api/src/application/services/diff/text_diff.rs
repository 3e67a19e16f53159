use crate::application::dto::diff::{ChangeEntry, ChangeKind, DiffStats, TextDiffResult};

/// How far each cursor scans ahead when two lines disagree.
pub const LOOKAHEAD_WINDOW: usize = 5;

/// Greedy line-walk diff between an older and a newer text.
///
/// This is not a minimal edit script: at a point of divergence only the
/// next [`LOOKAHEAD_WINDOW`] lines of each side are searched, and when both
/// sides find each other at the same distance the change is read as an
/// insertion. Lines further apart than the window degrade into paired
/// remove/add entries.
pub fn compute_text_diff(old: &str, new: &str) -> TextDiffResult {
    let a: Vec<&str> = old.split('\n').collect();
    let b: Vec<&str> = new.split('\n').collect();
    let (m, n) = (a.len(), b.len());

    let mut changes = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (0usize, 0usize);

    while i < m || j < n {
        if i >= m {
            changes.push(ChangeEntry::added(j + 1, b[j]));
            j += 1;
        } else if j >= n {
            changes.push(ChangeEntry::removed(i + 1, a[i]));
            i += 1;
        } else if a[i] == b[j] {
            changes.push(ChangeEntry::unchanged(i + 1, a[i]));
            i += 1;
            j += 1;
        } else {
            let found_in_b = position_within_window(&b[j..], a[i]);
            let found_in_a = position_within_window(&a[i..], b[j]);

            match (found_in_b, found_in_a) {
                (Some(fb), fa) if fb > 0 && fa.is_none_or(|fa| fb <= fa) => {
                    changes.push(ChangeEntry::added(j + 1, b[j]));
                    j += 1;
                }
                (_, Some(fa)) if fa > 0 => {
                    changes.push(ChangeEntry::removed(i + 1, a[i]));
                    i += 1;
                }
                _ => {
                    changes.push(ChangeEntry::removed(i + 1, a[i]));
                    changes.push(ChangeEntry::added(j + 1, b[j]));
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    let stats = summarize(&changes);
    TextDiffResult { changes, stats }
}

fn position_within_window(lines: &[&str], needle: &str) -> Option<usize> {
    lines
        .iter()
        .take(LOOKAHEAD_WINDOW)
        .position(|line| *line == needle)
}

fn summarize(changes: &[ChangeEntry]) -> DiffStats {
    changes
        .iter()
        .fold(DiffStats::default(), |mut stats, change| {
            match change.kind {
                ChangeKind::Added => stats.additions += 1,
                ChangeKind::Removed => stats.deletions += 1,
                ChangeKind::Unchanged => stats.unchanged += 1,
            }
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stats(additions: usize, deletions: usize, unchanged: usize) -> DiffStats {
        DiffStats {
            additions,
            deletions,
            unchanged,
        }
    }

    #[test]
    fn identical_texts_are_all_unchanged() {
        let text = "alpha\nbeta\n\ngamma";
        let diff = compute_text_diff(text, text);
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::unchanged(1, "alpha"),
                ChangeEntry::unchanged(2, "beta"),
                ChangeEntry::unchanged(3, ""),
                ChangeEntry::unchanged(4, "gamma"),
            ]
        );
        assert_eq!(diff.stats, stats(0, 0, 4));
    }

    #[test]
    fn trailing_line_added() {
        let diff = compute_text_diff("a\nb", "a\nb\nc");
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::unchanged(1, "a"),
                ChangeEntry::unchanged(2, "b"),
                ChangeEntry::added(3, "c"),
            ]
        );
        assert_eq!(diff.stats, stats(1, 0, 2));
    }

    #[test]
    fn trailing_line_removed() {
        let diff = compute_text_diff("a\nb\nc", "a\nb");
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::unchanged(1, "a"),
                ChangeEntry::unchanged(2, "b"),
                ChangeEntry::removed(3, "c"),
            ]
        );
        assert_eq!(diff.stats, stats(0, 1, 2));
    }

    #[test]
    fn empty_against_text_is_a_modification() {
        let diff = compute_text_diff("", "x");
        assert_eq!(
            diff.changes,
            vec![ChangeEntry::removed(1, ""), ChangeEntry::added(1, "x")]
        );
        assert_eq!(diff.stats, stats(1, 1, 0));
    }

    #[test]
    fn both_empty_is_one_unchanged_blank_line() {
        let diff = compute_text_diff("", "");
        assert_eq!(diff.changes, vec![ChangeEntry::unchanged(1, "")]);
        assert_eq!(diff.stats, stats(0, 0, 1));
    }

    #[test]
    fn match_beyond_window_cascades_into_removals() {
        let old = ["x", "1", "2", "3", "4", "5", "match"].join("\n");
        let diff = compute_text_diff(&old, "match");
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::removed(1, "x"),
                ChangeEntry::added(1, "match"),
                ChangeEntry::removed(2, "1"),
                ChangeEntry::removed(3, "2"),
                ChangeEntry::removed(4, "3"),
                ChangeEntry::removed(5, "4"),
                ChangeEntry::removed(6, "5"),
                ChangeEntry::removed(7, "match"),
            ]
        );
        assert_eq!(diff.stats, stats(1, 7, 0));
    }

    #[test]
    fn match_inside_window_is_a_deletion() {
        let diff = compute_text_diff("x\nmatch", "match");
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::removed(1, "x"),
                ChangeEntry::unchanged(2, "match"),
            ]
        );
    }

    #[test]
    fn last_slot_of_window_is_still_searched() {
        let diff = compute_text_diff("a\nb\nc\nd\nmatch", "match");
        assert_eq!(diff.stats, stats(0, 4, 1));
        assert_eq!(diff.changes[4], ChangeEntry::unchanged(5, "match"));
    }

    #[test]
    fn inserted_line_inside_window() {
        let diff = compute_text_diff("a\nc", "a\nb\nc");
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::unchanged(1, "a"),
                ChangeEntry::added(2, "b"),
                ChangeEntry::unchanged(2, "c"),
            ]
        );
    }

    #[test]
    fn equal_distance_prefers_insertion() {
        let diff = compute_text_diff("p\nq", "q\np");
        assert_eq!(
            diff.changes,
            vec![
                ChangeEntry::added(1, "q"),
                ChangeEntry::unchanged(1, "p"),
                ChangeEntry::removed(2, "q"),
            ]
        );
    }

    #[test]
    fn closer_deletion_wins_over_farther_insertion() {
        // "a" reappears two lines ahead in the new text, "b" one line ahead in the old.
        let diff = compute_text_diff("a\nb", "b\nx\na");
        assert_eq!(diff.changes[0], ChangeEntry::removed(1, "a"));
        assert_eq!(diff.changes[1], ChangeEntry::unchanged(2, "b"));
    }

    #[test]
    fn serializes_with_camel_case_and_type_tag() {
        let diff = compute_text_diff("a", "b");
        let value = serde_json::to_value(&diff).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "changes": [
                    {"type": "removed", "lineNumber": 1, "content": "a"},
                    {"type": "added", "lineNumber": 1, "content": "b"}
                ],
                "stats": {"additions": 1, "deletions": 1, "unchanged": 0}
            })
        );
    }

    fn small_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "", "d"]), 0..24)
            .prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn every_line_is_accounted_for_once(old in small_text(), new in small_text()) {
            let diff = compute_text_diff(&old, &new);
            let old_lines = old.split('\n').count();
            let new_lines = new.split('\n').count();

            prop_assert_eq!(diff.stats.unchanged + diff.stats.deletions, old_lines);
            prop_assert_eq!(diff.stats.unchanged + diff.stats.additions, new_lines);
            prop_assert_eq!(
                diff.changes.len(),
                diff.stats.additions + diff.stats.deletions + diff.stats.unchanged
            );

            let numbers_of = |kind: ChangeKind| -> Vec<usize> {
                diff.changes
                    .iter()
                    .filter(|c| c.kind == kind)
                    .map(|c| c.line_number)
                    .collect()
            };
            let mut old_side = numbers_of(ChangeKind::Removed);
            old_side.extend(numbers_of(ChangeKind::Unchanged));
            old_side.sort_unstable();
            prop_assert_eq!(old_side, (1..=old_lines).collect::<Vec<_>>());
            prop_assert!(numbers_of(ChangeKind::Added).windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn identity_never_reports_edits(text in small_text()) {
            let diff = compute_text_diff(&text, &text);
            prop_assert_eq!(diff.stats.additions, 0);
            prop_assert_eq!(diff.stats.deletions, 0);
            prop_assert_eq!(diff.stats.unchanged, text.split('\n').count());
        }
    }
}
