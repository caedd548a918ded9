//! Scalar predicates shared by the document schemas
//!
//! Every predicate is a plain `fn(&str) -> bool` so it can be handed to the
//! shape combinators in [`crate::validation::shape`].
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Agreement literals allowed on a person
pub const PERSON_AGREEMENTS: &[&str] = &["institution", "individual", "none"];

/// Agreement literals allowed on an organization
pub const ORG_AGREEMENTS: &[&str] = &["institution", "none"];

/// Field names of a person record, never valid as a username key
pub const PERSON_FIELDS: &[&str] = &[
    "name",
    "email",
    "agreement",
    "institution",
    "is_robot",
    "jira",
    "comments",
    "other_emails",
    "before",
    "beta",
    "contractor",
    "committer",
    "email_ok",
];

const EMAIL_FORBIDDEN: &[char] = &[',', ';', '?', '\\', '%'];
const BOT_SUFFIXES: &[&str] = &["[bot]", "%5Bbot%5D"];

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static REPO_REGEX: OnceLock<Regex> = OnceLock::new();
static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^@ ]+@[^@ ]+\.[^@ ]+$").expect("email pattern is valid"))
}

fn repo_regex() -> &'static Regex {
    REPO_REGEX.get_or_init(|| Regex::new(r"^[^/]+/[^/]+$").expect("repo pattern is valid"))
}

fn username_regex() -> &'static Regex {
    USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+\*?$").expect("username pattern is valid"))
}

fn color_regex() -> &'static Regex {
    COLOR_REGEX.get_or_init(|| Regex::new(r"^[a-fA-F0-9]{6}$").expect("color pattern is valid"))
}

/// `local@domain.tld` with none of `, ; ? \ %` anywhere
pub fn valid_email(s: &str) -> bool {
    email_regex().is_match(s) && !s.contains(EMAIL_FORBIDDEN)
}

pub fn valid_agreement(s: &str) -> bool {
    PERSON_AGREEMENTS.contains(&s)
}

/// Organization nickname: non-empty, no slash
pub fn valid_org_nickname(s: &str) -> bool {
    !s.is_empty() && !s.contains('/')
}

/// `owner/name` shape only; existence is checked through a `RepoLookup`
pub fn valid_repo_name(s: &str) -> bool {
    repo_regex().is_match(s)
}

/// GitHub login, optionally with a bot suffix or a trailing `*`
pub fn valid_github_username(s: &str) -> bool {
    let base = BOT_SUFFIXES
        .iter()
        .find_map(|suffix| s.strip_suffix(*suffix))
        .unwrap_or(s);
    username_regex().is_match(base)
}

/// Rejects person field names, which show up as keys when a record is mis-indented
pub fn not_data_key(s: &str) -> bool {
    !PERSON_FIELDS.contains(&s)
}

pub fn not_empty_string(s: &str) -> bool {
    !s.is_empty()
}

/// Six hex digits, no leading `#`
pub fn valid_color(s: &str) -> bool {
    color_regex().is_match(s)
}

/// `YYYY-MM-DD` naming a real calendar date
pub fn valid_date_key(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("nedbat@gmail.com"));
        assert!(valid_email("first.last+tag@sub.example.org"));
        assert!(!valid_email("nedbat@gmail.com@bad"));
        assert!(!valid_email("nedbat"));
        assert!(!valid_email("nedbat@gmail.com,"));
        assert!(!valid_email("ned bat@gmail.com"));
        assert!(!valid_email("ned%bat@gmail.com"));
        assert!(!valid_email("ned;bat@gmail.com"));
        assert!(!valid_email("nedbat@gmail"));
    }

    #[test]
    fn test_valid_github_username() {
        assert!(valid_github_username("octocat"));
        assert!(valid_github_username("dependabot[bot]"));
        assert!(valid_github_username("renovate%5Bbot%5D"));
        assert!(valid_github_username("jdoe*"));
        assert!(valid_github_username("under_score-dash"));
        assert!(!valid_github_username("bad name[bot]"));
        assert!(!valid_github_username("[bot]"));
        assert!(!valid_github_username(""));
        assert!(!valid_github_username("a**"));
        assert!(!valid_github_username("name@example.com"));
    }

    #[test]
    fn test_repo_and_org_names() {
        assert!(valid_repo_name("openedx/edx-platform"));
        assert!(!valid_repo_name("edx-platform"));
        assert!(!valid_repo_name("a/b/c"));
        assert!(!valid_repo_name("/b"));
        assert!(!valid_repo_name("a/"));

        assert!(valid_org_nickname("openedx"));
        assert!(!valid_org_nickname("openedx/edx-platform"));
        assert!(!valid_org_nickname(""));
    }

    #[test]
    fn test_agreement_and_keys() {
        assert!(valid_agreement("individual"));
        assert!(!valid_agreement("Individual"));
        assert!(not_data_key("octocat"));
        assert!(!not_data_key("email"));
        assert!(!not_data_key("committer"));
    }

    #[test]
    fn test_color_and_dates() {
        assert!(valid_color("ff00AA"));
        assert!(!valid_color("#ff00aa"));
        assert!(!valid_color("ff00a"));
        assert!(!valid_color("gg0000"));

        assert!(valid_date_key("2020-02-29"));
        assert!(!valid_date_key("2021-02-29"));
        assert!(!valid_date_key("2020-2-9"));
        assert!(!valid_date_key("yesterday"));
        assert!(not_empty_string("x"));
        assert!(!not_empty_string(""));
    }
}
