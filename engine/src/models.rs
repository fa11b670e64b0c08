// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::constants::DEFAULT_MAX_RESULTS;
use crate::errors::Ec2Error;
use crate::params::Params;
use crate::value::Value;

/// A `Filter.N` predicate: matches when the field equals any of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::object([
            ("key", Value::from(&self.key)),
            ("value", Value::from(&self.value)),
        ])
    }
}

/// Tags requested for a resource type at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpecification {
    pub resource_type: Option<String>,
    pub tags: Vec<Tag>,
}

/// The parameters shared by every `Describe*` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeRequest {
    /// Explicit ids, e.g. `VpcId.N`. Empty means "all".
    pub ids: Vec<String>,
    pub filters: Vec<Filter>,
    pub max_results: usize,
    pub next_token: Option<String>,
}

impl DescribeRequest {
    pub fn from_params(params: &Params, id_param: &str) -> Result<Self, Ec2Error> {
        let max_results = match params.int("MaxResults")? {
            None => DEFAULT_MAX_RESULTS,
            Some(n) if n >= 1 => usize::try_from(n)
                .map_err(|_| Ec2Error::invalid_value("MaxResults", &n.to_string()))?,
            Some(n) => return Err(Ec2Error::invalid_value("MaxResults", &n.to_string())),
        };

        Ok(Self {
            ids: params.indexed_list(id_param),
            filters: params.filter_list("Filter"),
            max_results,
            next_token: params.scalar("NextToken").map(str::to_string),
        })
    }
}
