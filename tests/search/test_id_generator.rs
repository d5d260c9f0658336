// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Id uniqueness and alphabet coverage

use google_search_provider::search::id_generator::IdGenerator;
use std::collections::{HashMap, HashSet};

#[test]
fn test_million_ids_are_unique() {
    // 62^32 possible ids: the birthday bound for 10^6 draws is ~10^-45
    let generator = IdGenerator::default();
    let count = 1_000_000;
    let mut seen = HashSet::with_capacity(count);
    for _ in 0..count {
        assert!(seen.insert(generator.next_id()));
    }
    assert_eq!(seen.len(), count);
}

#[test]
fn test_alphabet_is_roughly_uniform() {
    let generator = IdGenerator::default();
    let mut counts: HashMap<char, usize> = HashMap::new();
    for _ in 0..10_000 {
        for c in generator.next_id().chars() {
            *counts.entry(c).or_default() += 1;
        }
    }

    // All 62 symbols show up, each near 320_000 / 62 ≈ 5161
    assert_eq!(counts.len(), 62);
    for (symbol, count) in counts {
        assert!(symbol.is_ascii_alphanumeric());
        assert!((4_000..6_400).contains(&count), "{} seen {} times", symbol, count);
    }
}

#[test]
fn test_independent_generators_do_not_collide() {
    let a = IdGenerator::default();
    let b = IdGenerator::default();
    let ids: HashSet<String> = (0..5_000).flat_map(|_| [a.next_id(), b.next_id()]).collect();
    assert_eq!(ids.len(), 10_000);
}
