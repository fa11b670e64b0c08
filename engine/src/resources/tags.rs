// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! `CreateTags`, `DeleteTags` and `DescribeTags`.
//!
//! Tags are stored on the owning resource, so these actions work across every
//! collection at once. Both mutating actions check every `ResourceId.N`
//! before touching any of them.

use crate::engine::Engine;
use crate::errors::Ec2Error;
use crate::filters::{self, one, Filterable};
use crate::models::{DescribeRequest, Tag};
use crate::paging;
use crate::params::Params;
use crate::registry::Registry;
use crate::resources::{upsert_tag, Kind};
use crate::value::Value;

const TAGGABLE: [Kind; 5] = [
    Kind::Vpc,
    Kind::Subnet,
    Kind::RouteTable,
    Kind::InternetGateway,
    Kind::CapacityReservation,
];

/// One row of a `DescribeTags` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescription {
    pub resource_id: String,
    pub resource_type: &'static str,
    pub key: String,
    pub value: String,
}

impl TagDescription {
    fn to_value(&self) -> Value {
        Value::object([
            ("resourceId", Value::from(&self.resource_id)),
            ("resourceType", Value::from(self.resource_type)),
            ("key", Value::from(&self.key)),
            ("value", Value::from(&self.value)),
        ])
    }
}

impl Filterable for TagDescription {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "resource-id" => one(&self.resource_id),
            "resource-type" => one(self.resource_type),
            "key" => one(&self.key),
            "value" => one(&self.value),
            _ => None,
        }
    }
}

/// The error for an id no collection knows, using the kind its prefix names.
fn unknown_resource(id: &str) -> Ec2Error {
    TAGGABLE
        .iter()
        .find(|kind| {
            id.strip_prefix(kind.id_prefix())
                .is_some_and(|rest| rest.starts_with('-'))
        })
        .map(|kind| kind.not_found(id))
        .unwrap_or_else(|| Ec2Error::other("InvalidID", format!("The ID '{id}' is not valid")))
}

fn resource_ids(registry: &Registry, params: &Params) -> Result<Vec<String>, Ec2Error> {
    let ids = params.indexed_list("ResourceId");
    if ids.is_empty() {
        return Err(Ec2Error::MissingParameter("ResourceId".to_string()));
    }
    match ids.iter().find(|id| registry.kind_of(id).is_none()) {
        Some(unknown) => Err(unknown_resource(unknown)),
        None => Ok(ids),
    }
}

pub fn create_tags(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let ids = resource_ids(&engine.registry, params)?;
    let tags = params.tag_list("Tag");
    if tags.is_empty() {
        return Err(Ec2Error::MissingParameter("Tag".to_string()));
    }
    params.dry_run()?;

    for id in &ids {
        let existing = engine.registry.tags_mut(id)?;
        for tag in &tags {
            upsert_tag(existing, tag.clone());
        }
    }
    tracing::debug!("tagged {} resources with {} tags", ids.len(), tags.len());
    Ok(Value::ok())
}

pub fn delete_tags(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let ids = resource_ids(&engine.registry, params)?;
    // A key without a value removes the tag whatever its value is.
    let targets: Vec<(String, Option<String>)> = (1..)
        .map_while(|i| {
            let key = params.scalar(&format!("Tag.{i}.Key"))?;
            let value = params.scalar(&format!("Tag.{i}.Value"));
            Some((key.to_string(), value.map(str::to_string)))
        })
        .collect();
    params.dry_run()?;

    for id in &ids {
        let existing = engine.registry.tags_mut(id)?;
        if targets.is_empty() {
            existing.clear();
            continue;
        }
        existing.retain(|tag: &Tag| {
            !targets.iter().any(|(key, value)| {
                *key == tag.key && value.as_ref().is_none_or(|value| *value == tag.value)
            })
        });
    }
    Ok(Value::ok())
}

pub fn describe_tags(engine: &Engine, params: &Params) -> Result<Value, Ec2Error> {
    let request = DescribeRequest::from_params(params, "ResourceId")?;
    let descriptions: Vec<TagDescription> = engine
        .registry
        .tagged()
        .into_iter()
        .filter(|tagged| request.ids.is_empty() || request.ids.iter().any(|id| id == tagged.resource_id))
        .map(|tagged| TagDescription {
            resource_id: tagged.resource_id.to_string(),
            resource_type: tagged.kind.resource_type(),
            key: tagged.tag.key.clone(),
            value: tagged.tag.value.clone(),
        })
        .collect();

    let matching = filters::apply(descriptions, &request.filters);
    let page = paging::page(matching, request.max_results, request.next_token.as_deref())?;
    Ok(Value::object([
        (
            "tagSet",
            Value::List(page.items.iter().map(TagDescription::to_value).collect()),
        ),
        ("nextToken", Value::from(page.next_token)),
    ]))
}
