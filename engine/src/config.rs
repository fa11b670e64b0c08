// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::constants::{DEFAULT_ACCOUNT_ID, DEFAULT_REGION};

/// Settings the engine reads when it builds resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub region: String,
    pub account_id: String,
    /// Fixes the id sequence, for reproducible runs.
    pub id_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            id_seed: None,
        }
    }
}

impl Config {
    pub fn default_availability_zone(&self) -> String {
        format!("{}a", self.region)
    }
}
