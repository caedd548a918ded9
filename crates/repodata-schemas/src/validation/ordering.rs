//! Sorted-order check for top-level document keys
//!
//! A document is in order when its keys equal their sorted sequence. When it
//! is not, the report names the keys a minimal insert/delete alignment with
//! the sorted sequence has to move. Two keys that swap places admit two
//! equally short alignments, one moving each key, so the report is the union
//! over every minimal alignment: every key that is missing from at least one
//! longest in-order run. A single key moved far away is reported alone,
//! without the keys it shifted.
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::ValidationContext;
use crate::validation::error::{ValidationError, ValidationResult};
use similar::{capture_diff_slices, Algorithm, ChangeTag};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Fail unless `keys` is in ascending order
///
/// `what` names the checked sequence in the message, e.g. `Keys in people.yaml`.
pub fn check_sorted<S: AsRef<str>>(
    keys: &[S],
    what: &str,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let keys: Vec<&str> = keys.iter().map(|key| key.as_ref()).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();

    if keys == sorted {
        return Ok(());
    }

    let out_of_place = out_of_place_keys(&keys);
    debug!(what, count = out_of_place.len(), "keys out of order");

    let listed: Vec<&str> = out_of_place.iter().copied().collect();
    Err(ValidationError::ordering(
        context,
        format!("{} must be sorted. These are out of place: {}", what, listed.join(", ")),
    )
    .violation(ValidationError::create_violation(
        "sorted_keys",
        "keys in ascending order",
        format!("\n{}", render_key_diff(&keys, &sorted, &out_of_place)),
    )))
}

/// Keys that some minimal alignment with the sorted sequence moves
pub fn out_of_place_keys<'k>(keys: &[&'k str]) -> BTreeSet<&'k str> {
    let n = keys.len();
    if n == 0 {
        return BTreeSet::new();
    }

    // Longest non-decreasing run ending at / starting from each position.
    let mut ending = vec![1usize; n];
    for i in 0..n {
        for j in 0..i {
            if keys[j] <= keys[i] {
                ending[i] = ending[i].max(ending[j] + 1);
            }
        }
    }
    let mut starting = vec![1usize; n];
    for i in (0..n).rev() {
        for j in i + 1..n {
            if keys[i] <= keys[j] {
                starting[i] = starting[i].max(starting[j] + 1);
            }
        }
    }

    let longest = ending.iter().copied().max().unwrap_or(0);
    let on_some_run: Vec<bool> = (0..n)
        .map(|i| ending[i] + starting[i] - 1 == longest)
        .collect();

    // A key lies on every longest run iff no other candidate shares its rank.
    let mut per_rank: HashMap<usize, usize> = HashMap::new();
    for i in (0..n).filter(|&i| on_some_run[i]) {
        *per_rank.entry(ending[i]).or_default() += 1;
    }

    (0..n)
        .filter(|&i| !on_some_run[i] || per_rank.get(&ending[i]).copied().unwrap_or(0) > 1)
        .map(|i| keys[i])
        .collect()
}

/// One line of the key diff; moved keys never match across sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum KeyLine<'k> {
    Kept(&'k str),
    Removed(&'k str),
    Added(&'k str),
}

impl<'k> KeyLine<'k> {
    fn key(self) -> &'k str {
        match self {
            KeyLine::Kept(key) | KeyLine::Removed(key) | KeyLine::Added(key) => key,
        }
    }
}

/// Changed lines between the original and sorted key sequences
///
/// Exactly the `moved` keys are removed from their original place and added
/// at their sorted place, so the diff agrees with the reported keys.
fn render_key_diff(keys: &[&str], sorted: &[&str], moved: &BTreeSet<&str>) -> String {
    let old: Vec<KeyLine> = keys
        .iter()
        .map(|&key| if moved.contains(key) { KeyLine::Removed(key) } else { KeyLine::Kept(key) })
        .collect();
    let new: Vec<KeyLine> = sorted
        .iter()
        .map(|&key| if moved.contains(key) { KeyLine::Added(key) } else { KeyLine::Kept(key) })
        .collect();

    let mut output = String::new();
    for op in capture_diff_slices(Algorithm::Myers, &old, &new) {
        for change in op.iter_changes(&old, &new) {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => continue,
            };
            output.push_str(&format!("{}{}\n", sign, change.value().key()));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::ErrorKind;

    fn set<'a>(keys: &[&'a str]) -> BTreeSet<&'a str> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_sorted_keys_pass() {
        let ctx = ValidationContext::new();
        assert!(check_sorted(&["a", "b", "c"], "Keys in x", &ctx).is_ok());
        assert!(check_sorted::<&str>(&[], "Keys in x", &ctx).is_ok());
    }

    #[test]
    fn test_adjacent_swap_reports_both() {
        assert_eq!(out_of_place_keys(&["b", "a", "c"]), set(&["a", "b"]));
    }

    #[test]
    fn test_single_moved_key_reported_alone() {
        assert_eq!(out_of_place_keys(&["b", "c", "d", "a"]), set(&["a"]));
        assert_eq!(out_of_place_keys(&["a", "b", "z", "c", "d", "e"]), set(&["z"]));
    }

    #[test]
    fn test_middle_swap_reports_pair() {
        assert_eq!(out_of_place_keys(&["a", "c", "b", "d"]), set(&["b", "c"]));
    }

    #[test]
    fn test_reversed_reports_everything() {
        assert_eq!(out_of_place_keys(&["c", "b", "a"]), set(&["a", "b", "c"]));
    }

    #[test]
    fn test_uppercase_sorts_before_lowercase() {
        assert_eq!(out_of_place_keys(&["Zed", "abe", "Bob"]), set(&["Bob"]));
    }

    #[test]
    fn test_error_message_and_diff() {
        let ctx = ValidationContext::for_document("people.yaml");
        let err = check_sorted(&["b", "a", "c"], "Keys in people.yaml", &ctx).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Ordering);
        assert_eq!(
            err.message,
            "Keys in people.yaml must be sorted. These are out of place: a, b"
        );
        let diff = &err.schema_violations[0].actual;
        assert_eq!(diff, "\n-b\n-a\n+a\n+b\n");
    }

    #[test]
    fn test_diff_moves_exactly_the_reported_keys() {
        let ctx = ValidationContext::new();
        let keys = ["a", "b", "z", "c", "d", "e"];
        let err = check_sorted(&keys, "Keys", &ctx).unwrap_err();
        assert_eq!(err.schema_violations[0].actual, "\n-z\n+z\n");

        let keys = ["a", "c", "b", "e", "d"];
        let err = check_sorted(&keys, "Keys", &ctx).unwrap_err();
        assert_eq!(err.message, "Keys must be sorted. These are out of place: b, c, d, e");
        let diff = &err.schema_violations[0].actual;
        for key in ["b", "c", "d", "e"] {
            assert!(diff.contains(&format!("-{}\n", key)) && diff.contains(&format!("+{}\n", key)));
        }
        assert!(!diff.contains("a\n"));
    }
}
