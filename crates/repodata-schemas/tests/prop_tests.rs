//! Property-based tests for predicates and the ordering check
//!
//! These tests verify that the validators behave correctly across a wide
//! range of inputs.

use proptest::prelude::*;
use repodata_schemas::validation::predicates::{valid_email, valid_github_username};
use repodata_schemas::{check_sorted, decode_yaml, out_of_place_keys, ValidationContext};
use std::collections::BTreeSet;

/// Strategy for distinct lowercase keys in random order
fn distinct_keys_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z]{1,6}", 0..12)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn prop_email_forbidden_characters_always_rejected(
        local in "[a-z]{1,8}",
        domain in "[a-z]{1,8}",
        bad in prop::sample::select(vec![',', ';', '?', '\\', '%']),
        at_end in any::<bool>(),
    ) {
        let email = if at_end {
            format!("{}@{}.com{}", local, domain, bad)
        } else {
            format!("{}{}@{}.com", local, bad, domain)
        };
        prop_assert!(!valid_email(&email));
        let clean = format!("{}@{}.com", local, domain);
        prop_assert!(valid_email(&clean));
    }

    #[test]
    fn prop_bot_suffix_does_not_change_validity(name in "[a-zA-Z0-9 _!-]{1,12}") {
        let plain = valid_github_username(&name);
        prop_assert_eq!(valid_github_username(&format!("{}[bot]", name)), plain);
        prop_assert_eq!(valid_github_username(&format!("{}%5Bbot%5D", name)), plain);
    }

    #[test]
    fn prop_sorted_keys_always_pass(keys in distinct_keys_strategy()) {
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert!(check_sorted(&sorted, "Keys in x", &ValidationContext::new()).is_ok());
    }

    #[test]
    fn prop_out_of_place_keys_exactly_when_unsorted(keys in distinct_keys_strategy()) {
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut sorted = refs.clone();
        sorted.sort();

        let reported = out_of_place_keys(&refs);
        prop_assert_eq!(reported.is_empty(), refs == sorted);

        // The unreported keys are already in relative order.
        let kept: Vec<&str> = refs.iter().copied().filter(|k| !reported.contains(k)).collect();
        let mut kept_sorted = kept.clone();
        kept_sorted.sort();
        prop_assert_eq!(kept, kept_sorted);
    }

    #[test]
    fn prop_single_moved_key_is_reported_alone(
        keys in proptest::collection::btree_set("[a-z]{1,6}", 3..12),
        from in any::<prop::sample::Index>(),
        to in any::<prop::sample::Index>(),
    ) {
        let mut order: Vec<&str> = keys.iter().map(String::as_str).collect();
        let moved = order.remove(from.index(order.len()));
        order.insert(to.index(order.len() + 1), moved);

        let reported = out_of_place_keys(&order);
        let sorted: Vec<&str> = keys.iter().map(String::as_str).collect();
        if order == sorted {
            prop_assert!(reported.is_empty());
        } else if reported.len() == 1 {
            prop_assert_eq!(reported.into_iter().collect::<BTreeSet<_>>(), BTreeSet::from([moved]));
        } else {
            // A move by one place is a swap: both keys are ambiguous.
            prop_assert_eq!(reported.len(), 2);
            prop_assert!(reported.contains(moved));
        }
    }

    #[test]
    fn prop_decoding_never_panics(text in "[a-z:\\- \\n\\[\\]{},]{0,64}") {
        let _ = decode_yaml(&text, &ValidationContext::new());
    }
}
