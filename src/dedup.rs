// src/dedup.rs
use std::collections::HashSet;

use crate::listing::{DedupKey, RawListing};

/// Drop listings whose (title, company, location) was already seen.
/// First occurrence wins and input order is preserved.
pub fn dedupe(listings: Vec<RawListing>) -> Vec<RawListing> {
    dedupe_counted(listings).0
}

/// Same as [`dedupe`], also returning how many listings were removed.
pub fn dedupe_counted(listings: Vec<RawListing>) -> (Vec<RawListing>, usize) {
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(listings.len());
    let mut keep = Vec::with_capacity(listings.len());
    let mut dropped = 0usize;

    for l in listings {
        if !seen.insert(l.dedup_key()) {
            dropped += 1;
            continue;
        }
        keep.push(l);
    }

    (keep, dropped)
}
