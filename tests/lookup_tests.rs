//! Integration tests for public suffix lookups
#![cfg(feature = "builder")]

use psl_trie_r::{build, parse_rules, Artifacts, InputErrorKind, PslError, Rule};

fn build_from(texts: &[&str]) -> Artifacts {
    let rules: Vec<Rule> = texts.iter().map(|t| Rule::from_text(t)).collect();
    build(&rules).unwrap()
}

#[test]
fn test_tld_only_rule() {
    let artifacts = build_from(&["com"]);
    let m = artifacts
        .table()
        .longest_match(&["www", "example", "com"])
        .unwrap();
    assert_eq!(m.matched_labels, 1);
    assert!(!m.is_exception);
    assert!(m.known);
}

#[test]
fn test_exception_rule() {
    let artifacts = build_from(&["jp", "kawasaki.jp", "!city.kawasaki.jp"]);
    let table = artifacts.table();

    let m = table
        .longest_match(&["foo", "city", "kawasaki", "jp"])
        .unwrap();
    assert_eq!(m.matched_labels, 2, "suffix is kawasaki.jp");
    assert!(m.is_exception);

    assert_eq!(table.public_suffix("foo.city.kawasaki.jp").unwrap(), "kawasaki.jp");
    assert_eq!(
        table.registry_controlled_domain("foo.city.kawasaki.jp").unwrap(),
        "city.kawasaki.jp"
    );

    // Siblings of the exception are ordinary names under kawasaki.jp
    assert_eq!(table.public_suffix("www.town.kawasaki.jp").unwrap(), "kawasaki.jp");
}

#[test]
fn test_wildcard_rule() {
    let artifacts = build_from(&["*.ye"]);
    let table = artifacts.table();

    let m = table.longest_match(&["w3", "wildcard", "ye"]).unwrap();
    assert_eq!(m.matched_labels, 2);
    assert!(m.known);

    assert_eq!(
        table.registry_controlled_domain("w3.wildcard.ye").unwrap(),
        "w3.wildcard.ye"
    );
    assert_eq!(
        table.registry_controlled_domain("a.w3.wildcard.ye").unwrap(),
        "w3.wildcard.ye"
    );
}

#[test]
fn test_wildcard_with_exception() {
    let artifacts = build_from(&["*.ck", "!www.ck"]);
    let table = artifacts.table();

    assert_eq!(table.public_suffix("www.ck").unwrap(), "ck");
    assert_eq!(table.registry_controlled_domain("www.ck").unwrap(), "www.ck");
    assert_eq!(table.public_suffix("a.b.ck").unwrap(), "b.ck");
    assert_eq!(table.registry_controlled_domain("a.b.ck").unwrap(), "a.b.ck");
}

#[test]
fn test_exact_match_takes_precedence_over_wildcard() {
    let artifacts = build_from(&["*.foo", "x.bar.foo"]);
    let table = artifacts.table();

    // Exact "bar" is followed, so its subtree is reachable
    let m = table.longest_match(&["x", "bar", "foo"]).unwrap();
    assert_eq!(m.matched_labels, 3);

    // The wildcard still makes bar.foo itself a public suffix
    let m = table.longest_match(&["y", "bar", "foo"]).unwrap();
    assert_eq!(m.matched_labels, 2);

    // No exact child: wildcard matches unconditionally
    let m = table.longest_match(&["y", "baz", "foo"]).unwrap();
    assert_eq!(m.matched_labels, 2);
}

#[test]
fn test_exact_terminal_beside_wildcard() {
    let artifacts = build_from(&["foo", "*.foo", "bar.foo", "deep.bar.foo"]);
    let table = artifacts.table();
    assert_eq!(table.public_suffix("a.deep.bar.foo").unwrap(), "deep.bar.foo");
    assert_eq!(table.public_suffix("a.bar.foo").unwrap(), "bar.foo");
    assert_eq!(table.public_suffix("a.other.foo").unwrap(), "other.foo");
}

#[test]
fn test_default_rule_fallback() {
    let artifacts = build_from(&["com", "co.uk"]);
    let table = artifacts.table();

    // Unknown TLD
    let m = table.longest_match(&["example", "zz"]).unwrap();
    assert_eq!(m.matched_labels, 1);
    assert!(!m.known);

    // Known path whose top node is not itself a rule
    let len = table.public_suffix_length("example.uk").unwrap();
    assert_eq!(len.len, 2);
    assert!(!len.known);
    assert_eq!(table.public_suffix("example.co.uk").unwrap(), "co.uk");
}

#[test]
fn test_non_terminal_intermediate() {
    let artifacts = build_from(&["a.b.c"]);
    let table = artifacts.table();
    assert_eq!(table.public_suffix("x.b.c").unwrap(), "c");
    assert_eq!(table.public_suffix("x.a.b.c").unwrap(), "a.b.c");
}

#[test]
fn test_hostname_is_the_suffix() {
    let artifacts = build_from(&["uk", "co.uk"]);
    let table = artifacts.table();
    assert_eq!(table.public_suffix("co.uk").unwrap(), "co.uk");
    assert_eq!(table.registry_controlled_domain("co.uk").unwrap(), "co.uk");
    assert_eq!(table.registry_controlled_domain("uk").unwrap(), "uk");
}

#[test]
fn test_suffix_length_in_bytes() {
    let artifacts = build_from(&["com", "uk", "co.uk"]);
    let table = artifacts.table();
    for (host, expected) in [
        ("example.com", 3),
        ("www.example.co.uk", 5),
        ("co.uk", 5),
        ("example.unknown", 7),
    ] {
        assert_eq!(table.public_suffix_length(host).unwrap().len, expected, "{host}");
    }
}

#[test]
fn test_lookups_are_case_sensitive() {
    // Case folding belongs to the caller
    let artifacts = build_from(&["com"]);
    let m = artifacts.table().longest_match(&["example", "COM"]).unwrap();
    assert!(!m.known);
}

#[test]
fn test_invalid_input() {
    let artifacts = build_from(&["com"]);
    let table = artifacts.table();

    let empty: [&str; 0] = [];
    assert!(matches!(
        table.longest_match(&empty),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::Empty,
            ..
        })
    ));
    assert!(matches!(
        table.public_suffix_length(""),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::Empty,
            ..
        })
    ));
    assert!(matches!(
        table.public_suffix("bücher.com"),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::NonAscii,
            ..
        })
    ));
    assert!(matches!(
        table.registry_controlled_domain("example.com."),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::EmptyLabel,
            ..
        })
    ));
    assert!(matches!(
        table.longest_match(&["example", ""]),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::EmptyLabel,
            ..
        })
    ));
    // Labels are single hostname parts
    assert!(matches!(
        table.longest_match(&["example.com"]),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::ReservedByte,
            ..
        })
    ));
    assert!(matches!(
        table.longest_match(&["www", "example.com"]),
        Err(PslError::InvalidInput {
            kind: InputErrorKind::ReservedByte,
            ..
        })
    ));
}

#[test]
fn test_every_rule_matches_its_own_path() {
    let rules = parse_rules(psl_trie_r::list::DEFAULT_LIST).unwrap();
    let artifacts = build(&rules).unwrap();
    let table = artifacts.table();

    for rule in &rules {
        // Written order, with the wildcard replaced by a concrete label
        let labels: Vec<&str> = rule
            .labels
            .iter()
            .rev()
            .map(|l| if l == "*" { "anything" } else { l.as_str() })
            .collect();
        let m = table.longest_match(&labels).unwrap();
        if rule.exception {
            assert_eq!(m.matched_labels, rule.len() - 1, "rule {}", rule);
            assert!(m.is_exception, "rule {}", rule);
        } else {
            assert_eq!(m.matched_labels, rule.len(), "rule {}", rule);
            assert!(!m.is_exception, "rule {}", rule);
            assert!(m.known, "rule {}", rule);
        }
    }
}

#[test]
fn test_default_list_lookups() {
    use psl_trie_r::{public_suffix, registry_controlled_domain};

    let cases = [
        ("www.google.com", "com", "google.com"),
        ("www.example.co.uk", "co.uk", "example.co.uk"),
        ("foo.city.kawasaki.jp", "kawasaki.jp", "city.kawasaki.jp"),
        ("www.kobe.jp", "www.kobe.jp", "www.kobe.jp"),
        ("a.b.school.sch.uk", "school.sch.uk", "b.school.sch.uk"),
        ("user.github.io", "github.io", "user.github.io"),
        ("x.k12.ca.us", "k12.ca.us", "x.k12.ca.us"),
        ("example.xn--p1ai", "xn--p1ai", "example.xn--p1ai"),
    ];
    for (host, suffix, domain) in cases {
        assert_eq!(public_suffix(host).unwrap(), suffix, "suffix of {host}");
        assert_eq!(registry_controlled_domain(host).unwrap(), domain, "domain of {host}");
    }
}

#[test]
fn test_concurrent_lookups() {
    let table = psl_trie_r::default_table();
    let hosts = ["www.example.co.uk", "foo.city.kawasaki.jp", "a.b.ck", "x.github.io"];
    let expected: Vec<&str> = hosts
        .iter()
        .map(|h| table.public_suffix(*h).unwrap())
        .collect();

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..1000 {
                    for (host, suffix) in hosts.iter().zip(&expected) {
                        assert_eq!(table.public_suffix(host).unwrap(), *suffix);
                    }
                }
            });
        }
    });
}
