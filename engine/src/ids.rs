// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::collections::HashSet;

use crate::constants::ID_SUFFIX_LENGTH;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Produces unique, prefixed resource identifiers such as `vpc-0a1b2c3d4e5f60718`.
///
/// Every id handed out is remembered, so a collision in the random suffix is
/// retried rather than returned twice.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: fastrand::Rng,
    issued: HashSet<String>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
            issued: HashSet::new(),
        }
    }

    /// A generator producing the same sequence of ids for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            issued: HashSet::new(),
        }
    }

    pub fn next(&mut self, prefix: &str) -> String {
        loop {
            let suffix: String = (0..ID_SUFFIX_LENGTH)
                .map(|_| HEX_DIGITS[self.rng.usize(..HEX_DIGITS.len())] as char)
                .collect();
            let id = format!("{prefix}-{suffix}");
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
