// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Query API parameter extraction.
//!
//! Requests arrive as a flat multimap of wire names. Repeated values are
//! numbered from 1 (`VpcId.1`, `VpcId.2`) and structured values nest with
//! dots (`Filter.1.Name`, `Filter.1.Value.2`,
//! `TagSpecification.1.Tag.3.Key`). Every list reader stops at the first
//! missing index.

use std::collections::HashMap;

use crate::errors::Ec2Error;
use crate::models::{Filter, Tag, TagSpecification};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, Vec<String>>,
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::default();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Binds another value to `key`; earlier values keep priority.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn action(&self) -> Result<&str, Ec2Error> {
        self.scalar("Action").ok_or(Ec2Error::MissingAction)
    }

    /// First value bound to `name`.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str, Ec2Error> {
        self.scalar(name)
            .ok_or_else(|| Ec2Error::MissingParameter(name.to_string()))
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>, Ec2Error> {
        match self.scalar(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| Ec2Error::invalid_value(name, raw)),
        }
    }

    /// `true` only for a case-insensitive "true"; absent reads as `false`.
    pub fn bool(&self, name: &str) -> bool {
        self.scalar(name)
            .is_some_and(|raw| raw.trim().eq_ignore_ascii_case("true"))
    }

    /// Fails with `DryRunOperation` when the caller asked for a dry run.
    pub fn dry_run(&self) -> Result<(), Ec2Error> {
        if self.bool("DryRun") {
            tracing::debug!("dry run requested");
            return Err(Ec2Error::DryRunOperation);
        }
        Ok(())
    }

    pub fn indexed_list(&self, name: &str) -> Vec<String> {
        (1..)
            .map_while(|i| self.scalar(&format!("{name}.{i}")))
            .map(str::to_string)
            .collect()
    }

    pub fn filter_list(&self, name: &str) -> Vec<Filter> {
        (1..)
            .map_while(|i| {
                let field = self.scalar(&format!("{name}.{i}.Name"))?;
                Some(Filter::new(
                    field,
                    self.indexed_list(&format!("{name}.{i}.Value")),
                ))
            })
            .collect()
    }

    /// Reads `{name}.N.Key` / `{name}.N.Value` pairs; a missing value is empty.
    pub fn tag_list(&self, name: &str) -> Vec<Tag> {
        (1..)
            .map_while(|i| {
                let key = self.scalar(&format!("{name}.{i}.Key"))?;
                let value = self.scalar(&format!("{name}.{i}.Value")).unwrap_or_default();
                Some(Tag::new(key, value))
            })
            .collect()
    }

    pub fn tag_specification_list(&self, name: &str) -> Vec<TagSpecification> {
        (1..)
            .map_while(|i| {
                let prefix = format!("{name}.{i}");
                let resource_type = self.scalar(&format!("{prefix}.ResourceType"));
                let tags = self.tag_list(&format!("{prefix}.Tag"));
                if resource_type.is_none() && tags.is_empty() {
                    return None;
                }
                Some(TagSpecification {
                    resource_type: resource_type.map(str::to_string),
                    tags,
                })
            })
            .collect()
    }
}
