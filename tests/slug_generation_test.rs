// Slug generation and uniqueness probing

use regex::Regex;
use std::collections::HashSet;

use shutterlist_backend::services::{generate_slug, uniquify};

#[test]
fn test_known_addresses() {
    assert_eq!(
        generate_slug("123 Main Street, Austin TX").as_deref(),
        Some("123-main-street-austin-tx")
    );
    assert_eq!(
        generate_slug("456 Oak Ave. #2B, Dallas TX").as_deref(),
        Some("456-oak-ave-2b-dallas-tx")
    );
}

#[test]
fn test_output_grammar() {
    // Every non-empty slug matches ^[a-z0-9]+(-[a-z0-9]+)*$
    let grammar = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();

    let inputs = [
        "123 Main Street, Austin TX",
        "456 Oak Ave. #2B, Dallas TX",
        "  leading and trailing   ",
        "UNIT 4/7 — 9 Harbour Blvd.",
        "çédille & ümlaut strasse",
        "1",
        "- - - a - - -",
    ];

    for input in inputs {
        match generate_slug(input) {
            Some(slug) => assert!(
                grammar.is_match(&slug),
                "slug {:?} from {:?} breaks grammar",
                slug,
                input
            ),
            None => {},
        }
    }
}

#[test]
fn test_unusable_addresses_yield_none() {
    assert_eq!(generate_slug(""), None);
    assert_eq!(generate_slug("   "), None);
    assert_eq!(generate_slug("#!?"), None);
    assert_eq!(generate_slug("----"), None);
}

#[test]
fn test_case_and_whitespace_normalization() {
    assert_eq!(
        generate_slug("99  ELM    STREET").as_deref(),
        Some("99-elm-street")
    );
    assert_eq!(
        generate_slug("7-9 Birch--Lane").as_deref(),
        Some("7-9-birch-lane")
    );
}

#[test]
fn test_uniquify_progression() {
    let mut taken: HashSet<String> = HashSet::new();
    assert_eq!(uniquify("x", &taken), "x");

    taken.insert("x".to_string());
    assert_eq!(uniquify("x", &taken), "x-2");

    taken.insert("x-2".to_string());
    assert_eq!(uniquify("x", &taken), "x-3");
}

#[test]
fn test_uniquify_unrelated_slugs_do_not_collide() {
    let taken: HashSet<String> = ["x-files".to_string(), "xx".to_string()]
        .into_iter()
        .collect();
    assert_eq!(uniquify("x", &taken), "x");
}

#[test]
fn test_uniquify_simulates_address_reuse() {
    // Three photographers listing the same address each get a distinct slug
    let mut taken: HashSet<String> = HashSet::new();
    let base = generate_slug("88 Lakeshore Dr, Chicago IL").unwrap();

    let first = uniquify(&base, &taken);
    taken.insert(first.clone());
    let second = uniquify(&base, &taken);
    taken.insert(second.clone());
    let third = uniquify(&base, &taken);

    assert_eq!(first, "88-lakeshore-dr-chicago-il");
    assert_eq!(second, "88-lakeshore-dr-chicago-il-2");
    assert_eq!(third, "88-lakeshore-dr-chicago-il-3");
}
