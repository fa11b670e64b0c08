// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Resource kinds and their action handlers.
//!
//! Every kind implements [`Resource`], which gives the registry typed access
//! to its collection and to the resource's [`Dependents`], the internal
//! child-id lists that block deletion while non-empty.
//!
//! # Bookkeeping
//!
//! The handlers keep the dependents lists in step with the public
//! attributes: creating a subnet links its id into the parent VPC, deleting
//! it unlinks it again. The registry refuses to remove a resource whose lists
//! are not all empty.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::Ec2Error;
use crate::filters::{self, Filterable};
use crate::models::{DescribeRequest, Tag, TagSpecification};
use crate::paging;
use crate::registry::{Collection, Registry};
use crate::value::Value;

pub mod capacity_reservation;
pub mod cidr;
pub mod internet_gateway;
pub mod route_table;
pub mod subnet;
pub mod tags;
pub mod vpc;

pub use capacity_reservation::{CapacityReservation, CapacityReservationState};
pub use cidr::Ipv4Cidr;
pub use internet_gateway::{InternetGateway, InternetGatewayAttachment};
pub use route_table::{Route, RouteTable, RouteTableAssociation};
pub use subnet::Subnet;
pub use vpc::Vpc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Vpc,
    Subnet,
    RouteTable,
    RouteTableAssociation,
    InternetGateway,
    CapacityReservation,
}

impl Kind {
    /// Prefix of generated ids, e.g. `vpc` for `vpc-0a1b...`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Kind::Vpc => "vpc",
            Kind::Subnet => "subnet",
            Kind::RouteTable => "rtb",
            Kind::RouteTableAssociation => "rtbassoc",
            Kind::InternetGateway => "igw",
            Kind::CapacityReservation => "cr",
        }
    }

    /// The `resource-type` used by tag specifications and `DescribeTags`.
    pub fn resource_type(self) -> &'static str {
        match self {
            Kind::Vpc => "vpc",
            Kind::Subnet => "subnet",
            Kind::RouteTable => "route-table",
            Kind::RouteTableAssociation => "route-table-association",
            Kind::InternetGateway => "internet-gateway",
            Kind::CapacityReservation => "capacity-reservation",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Kind::Vpc => "vpc",
            Kind::Subnet => "subnet",
            Kind::RouteTable => "routeTable",
            Kind::RouteTableAssociation => "association",
            Kind::InternetGateway => "internetGateway",
            Kind::CapacityReservation => "capacityReservation",
        }
    }

    pub fn not_found_code(self) -> &'static str {
        match self {
            Kind::Vpc => "InvalidVpcID.NotFound",
            Kind::Subnet => "InvalidSubnetID.NotFound",
            Kind::RouteTable => "InvalidRouteTableID.NotFound",
            Kind::RouteTableAssociation => "InvalidAssociationID.NotFound",
            Kind::InternetGateway => "InvalidInternetGatewayID.NotFound",
            Kind::CapacityReservation => "InvalidCapacityReservationId.NotFound",
        }
    }

    pub fn not_found(self, id: &str) -> Ec2Error {
        Ec2Error::not_found(self.not_found_code(), self.noun(), id)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Ids of the resources that depend on one resource, grouped by their kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependents {
    edges: BTreeMap<Kind, Vec<String>>,
}

impl Dependents {
    pub fn add(&mut self, kind: Kind, id: &str) {
        let ids = self.edges.entry(kind).or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }

    /// Returns whether `id` was present.
    pub fn remove(&mut self, kind: Kind, id: &str) -> bool {
        let Some(ids) = self.edges.get_mut(&kind) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|existing| existing != id);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.edges.remove(&kind);
        }
        removed
    }

    pub fn ids(&self, kind: Kind) -> &[String] {
        self.edges.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.values().all(Vec::is_empty)
    }

    /// The first dependent still holding on, if any.
    pub fn first(&self) -> Option<(Kind, &str)> {
        self.edges
            .iter()
            .find_map(|(kind, ids)| ids.first().map(|id| (*kind, id.as_str())))
    }
}

pub trait Resource: Filterable + Clone + fmt::Debug {
    const KIND: Kind;

    fn id(&self) -> &str;

    fn dependents(&self) -> &Dependents;

    fn dependents_mut(&mut self) -> &mut Dependents;

    fn tags_mut(&mut self) -> &mut Vec<Tag>;

    /// The public attributes, as rendered inside a `Describe*` item.
    fn to_value(&self) -> Value;

    fn collection(registry: &Registry) -> &Collection<Self>;

    fn collection_mut(registry: &mut Registry) -> &mut Collection<Self>;
}

/// Tags requested for `kind` by the `TagSpecification.N` parameters.
pub fn tags_for(kind: Kind, specs: &[TagSpecification]) -> Result<Vec<Tag>, Ec2Error> {
    let mut tags: Vec<Tag> = Vec::new();
    for spec in specs {
        match spec.resource_type.as_deref() {
            Some(resource_type) if resource_type == kind.resource_type() => {
                for tag in &spec.tags {
                    upsert_tag(&mut tags, tag.clone());
                }
            }
            Some(other) => {
                return Err(Ec2Error::InvalidParameterValue(format!(
                    "'{other}' is not a valid taggable resource type for this operation."
                )));
            }
            None => return Err(Ec2Error::MissingParameter("TagSpecification.N.ResourceType".into())),
        }
    }
    Ok(tags)
}

/// Sets `tag`, replacing the value of an existing tag with the same key.
pub fn upsert_tag(tags: &mut Vec<Tag>, tag: Tag) {
    match tags.iter_mut().find(|existing| existing.key == tag.key) {
        Some(existing) => existing.value = tag.value,
        None => tags.push(tag),
    }
}

pub fn tag_set(tags: &[Tag]) -> Value {
    Value::List(tags.iter().map(Tag::to_value).collect())
}

/// Filters and pages `resources`, rendering the page under `set_key`.
pub fn describe<T: Resource>(
    resources: Vec<&T>,
    request: &DescribeRequest,
    set_key: &str,
) -> Result<Value, Ec2Error> {
    let matching = filters::apply(resources, &request.filters);
    let page = paging::page(matching, request.max_results, request.next_token.as_deref())?;
    Ok(Value::object([
        (
            set_key,
            Value::List(page.items.iter().map(|resource| resource.to_value()).collect()),
        ),
        ("nextToken", Value::from(page.next_token)),
    ]))
}
