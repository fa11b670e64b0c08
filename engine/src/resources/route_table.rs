// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Route tables and their subnet associations.
//!
//! An association is not a collection of its own: it lives inside the route
//! table and is linked, by its `rtbassoc-` id, into the dependents of both
//! the route table and the subnet. Either side therefore refuses deletion
//! until the association is removed with `DisassociateRouteTable`.

use crate::engine::Engine;
use crate::errors::Ec2Error;
use crate::filters::{one, Filterable};
use crate::models::{DescribeRequest, Tag};
use crate::params::Params;
use crate::registry::{Collection, Registry};
use crate::resources::{describe, tag_set, tags_for, Dependents, Kind, Resource, Subnet, Vpc};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub destination_cidr_block: String,
    pub gateway_id: String,
    pub state: String,
    pub origin: String,
}

impl Route {
    fn local(destination_cidr_block: String) -> Self {
        Self {
            destination_cidr_block,
            gateway_id: "local".to_string(),
            state: "active".to_string(),
            origin: "CreateRouteTable".to_string(),
        }
    }

    fn to_value(&self) -> Value {
        Value::object([
            ("destinationCidrBlock", Value::from(&self.destination_cidr_block)),
            ("gatewayId", Value::from(&self.gateway_id)),
            ("state", Value::from(&self.state)),
            ("origin", Value::from(&self.origin)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTableAssociation {
    pub id: String,
    pub subnet_id: String,
    pub main: bool,
    pub state: String,
}

impl RouteTableAssociation {
    fn to_value(&self, route_table_id: &str) -> Value {
        Value::object([
            ("routeTableAssociationId", Value::from(&self.id)),
            ("routeTableId", Value::from(route_table_id)),
            ("subnetId", Value::from(&self.subnet_id)),
            ("main", Value::from(self.main)),
            ("associationState", state_value(&self.state)),
        ])
    }
}

fn state_value(state: &str) -> Value {
    Value::object([("state", Value::from(state))])
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    pub id: String,
    pub vpc_id: String,
    pub owner_id: String,
    pub routes: Vec<Route>,
    pub associations: Vec<RouteTableAssociation>,
    pub tags: Vec<Tag>,
    dependents: Dependents,
}

impl RouteTable {
    pub fn new(id: &str, vpc: &Vpc, owner_id: &str) -> Self {
        Self {
            id: id.to_string(),
            vpc_id: vpc.id.clone(),
            owner_id: owner_id.to_string(),
            routes: vec![Route::local(vpc.cidr_block.to_string())],
            associations: Vec::new(),
            tags: Vec::new(),
            dependents: Dependents::default(),
        }
    }

    fn association_values(&self, pick: impl Fn(&RouteTableAssociation) -> String) -> Option<Vec<String>> {
        Some(self.associations.iter().map(pick).collect())
    }
}

impl Filterable for RouteTable {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "route-table-id" => one(&self.id),
            "vpc-id" => one(&self.vpc_id),
            "owner-id" => one(&self.owner_id),
            "association.subnet-id" => self.association_values(|a| a.subnet_id.clone()),
            "association.route-table-association-id" => self.association_values(|a| a.id.clone()),
            "association.route-table-id" => self.association_values(|_| self.id.clone()),
            "association.main" => self.association_values(|a| a.main.to_string()),
            "route.destination-cidr-block" => Some(
                self.routes
                    .iter()
                    .map(|route| route.destination_cidr_block.clone())
                    .collect(),
            ),
            "route.gateway-id" => Some(self.routes.iter().map(|route| route.gateway_id.clone()).collect()),
            _ => None,
        }
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Resource for RouteTable {
    const KIND: Kind = Kind::RouteTable;

    fn id(&self) -> &str {
        &self.id
    }

    fn dependents(&self) -> &Dependents {
        &self.dependents
    }

    fn dependents_mut(&mut self) -> &mut Dependents {
        &mut self.dependents
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tags
    }

    fn to_value(&self) -> Value {
        Value::object([
            ("routeTableId", Value::from(&self.id)),
            ("vpcId", Value::from(&self.vpc_id)),
            ("ownerId", Value::from(&self.owner_id)),
            (
                "routeSet",
                Value::List(self.routes.iter().map(Route::to_value).collect()),
            ),
            (
                "associationSet",
                Value::List(
                    self.associations
                        .iter()
                        .map(|association| association.to_value(&self.id))
                        .collect(),
                ),
            ),
            ("propagatingVgwSet", Value::List(Vec::new())),
            ("tagSet", tag_set(&self.tags)),
        ])
    }

    fn collection(registry: &Registry) -> &Collection<Self> {
        &registry.route_tables
    }

    fn collection_mut(registry: &mut Registry) -> &mut Collection<Self> {
        &mut registry.route_tables
    }
}

pub fn create_route_table(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let vpc_id = params.required("VpcId")?;
    let vpc = engine.registry.get::<Vpc>(vpc_id)?.clone();
    let tags = tags_for(Kind::RouteTable, &params.tag_specification_list("TagSpecification"))?;
    params.dry_run()?;

    let id = engine.next_id(Kind::RouteTable);
    let mut route_table = RouteTable::new(&id, &vpc, &engine.config.account_id);
    route_table.tags = tags;

    let payload = Value::object([("routeTable", route_table.to_value())]);
    engine.registry.link::<Vpc>(vpc_id, Kind::RouteTable, &id)?;
    engine.registry.insert(route_table);
    Ok(payload)
}

pub fn describe_route_tables(engine: &Engine, params: &Params) -> Result<Value, Ec2Error> {
    let request = DescribeRequest::from_params(params, "RouteTableId")?;
    let route_tables = engine.registry.select::<RouteTable>(&request.ids)?;
    describe(route_tables, &request, "routeTableSet")
}

pub fn associate_route_table(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let route_table_id = params.required("RouteTableId")?;
    let subnet_id = params.required("SubnetId")?;

    let route_table = engine.registry.get::<RouteTable>(route_table_id)?;
    let subnet = engine.registry.get::<Subnet>(subnet_id)?;
    if route_table.vpc_id != subnet.vpc_id {
        return Err(Ec2Error::InvalidParameterValue(format!(
            "Route table {route_table_id} and subnet {subnet_id} belong to different networks"
        )));
    }
    if let Some(existing) = subnet.association_id() {
        return Err(Ec2Error::other(
            "Resource.AlreadyAssociated",
            format!("The subnet '{subnet_id}' is already associated with {existing}"),
        ));
    }
    params.dry_run()?;

    let association_id = engine.next_id(Kind::RouteTableAssociation);
    let association = RouteTableAssociation {
        id: association_id.clone(),
        subnet_id: subnet_id.to_string(),
        main: false,
        state: "associated".to_string(),
    };
    let state = state_value(&association.state);

    engine
        .registry
        .get_mut::<RouteTable>(route_table_id)?
        .associations
        .push(association);
    engine
        .registry
        .link::<RouteTable>(route_table_id, Kind::RouteTableAssociation, &association_id)?;
    engine
        .registry
        .link::<Subnet>(subnet_id, Kind::RouteTableAssociation, &association_id)?;

    Ok(Value::object([
        ("associationId", Value::from(association_id)),
        ("associationState", state),
    ]))
}

pub fn disassociate_route_table(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let association_id = params.required("AssociationId")?;
    let route_table_id = engine
        .registry
        .collection::<RouteTable>()
        .iter()
        .find(|table| table.associations.iter().any(|a| a.id == association_id))
        .map(|table| table.id.clone())
        .ok_or_else(|| Kind::RouteTableAssociation.not_found(association_id))?;
    params.dry_run()?;

    let route_table = engine.registry.get_mut::<RouteTable>(&route_table_id)?;
    let position = route_table
        .associations
        .iter()
        .position(|a| a.id == association_id)
        .ok_or_else(|| Kind::RouteTableAssociation.not_found(association_id))?;
    let association = route_table.associations.remove(position);

    engine
        .registry
        .unlink::<RouteTable>(&route_table_id, Kind::RouteTableAssociation, association_id);
    engine
        .registry
        .unlink::<Subnet>(&association.subnet_id, Kind::RouteTableAssociation, association_id);
    Ok(Value::ok())
}

pub fn delete_route_table(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let id = params.required("RouteTableId")?;
    engine.registry.get::<RouteTable>(id)?;
    params.dry_run()?;

    let route_table = engine.registry.remove::<RouteTable>(id)?;
    engine.registry.unlink::<Vpc>(&route_table.vpc_id, Kind::RouteTable, id);
    Ok(Value::ok())
}
