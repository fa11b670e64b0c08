// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Filter evaluation for `Describe*` listings.
//!
//! A resource is kept when it passes every filter (AND), and it passes a
//! filter when one of its resolved field values equals one of the filter's
//! values (OR). Matching is exact string equality.
//!
//! # Field names
//!
//! Filter names are normalized once, the same way for every resource kind:
//! lowercased, `_` turned into `-`, and camel-case boundaries split with `-`,
//! so `vpcId`, `VpcId`, `vpc_id` and `vpc-id` all resolve to `vpc-id`.
//! The tag filters `tag:<Key>`, `tag-key` and `tag-value` are answered from
//! [`Filterable::tags`] for every kind; the key after `tag:` is used verbatim.
//!
//! A field a resource kind does not know never matches, so an unknown filter
//! name yields an empty listing rather than an error.

use crate::models::{Filter, Tag};

pub trait Filterable {
    /// Values of a normalized filter field, or `None` if the field is unknown.
    fn filter_values(&self, field: &str) -> Option<Vec<String>>;

    fn tags(&self) -> &[Tag] {
        &[]
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        (**self).filter_values(field)
    }

    fn tags(&self) -> &[Tag] {
        (**self).tags()
    }
}

pub fn normalize_field(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        match c {
            '_' => normalized.push('-'),
            c if c.is_ascii_uppercase() => {
                if previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                    normalized.push('-');
                }
                normalized.push(c.to_ascii_lowercase());
            }
            c => normalized.push(c),
        }
        previous = Some(c);
    }
    normalized
}

/// Resolves the values of `field` on `item`, tag filters included.
pub fn resolve<T: Filterable + ?Sized>(item: &T, field: &str) -> Option<Vec<String>> {
    if let Some(key) = field.strip_prefix("tag:") {
        return Some(
            item.tags()
                .iter()
                .filter(|tag| tag.key == key)
                .map(|tag| tag.value.clone())
                .collect(),
        );
    }

    match normalize_field(field).as_str() {
        "tag-key" => Some(item.tags().iter().map(|tag| tag.key.clone()).collect()),
        "tag-value" => Some(item.tags().iter().map(|tag| tag.value.clone()).collect()),
        normalized => item.filter_values(normalized),
    }
}

pub fn matches<T: Filterable + ?Sized>(item: &T, filter: &Filter) -> bool {
    match resolve(item, &filter.name) {
        Some(values) => values.iter().any(|value| filter.values.contains(value)),
        None => {
            tracing::debug!(
                "unknown filter '{}' for {}",
                filter.name,
                std::any::type_name::<T>()
            );
            false
        }
    }
}

/// Keeps the items passing every filter, in their original order.
pub fn apply<T: Filterable>(items: Vec<T>, filters: &[Filter]) -> Vec<T> {
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| filters.iter().all(|filter| matches(item, filter)))
        .collect()
}

/// Single-valued field helper for [`Filterable`] implementations.
pub fn one(value: impl Into<String>) -> Option<Vec<String>> {
    Some(vec![value.into()])
}
