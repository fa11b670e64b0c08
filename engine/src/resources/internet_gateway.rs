// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::engine::Engine;
use crate::errors::Ec2Error;
use crate::filters::{one, Filterable};
use crate::models::{DescribeRequest, Tag};
use crate::params::Params;
use crate::registry::{Collection, Registry};
use crate::resources::{describe, tag_set, tags_for, Dependents, Kind, Resource, Vpc};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetGatewayAttachment {
    pub vpc_id: String,
    pub state: String,
}

impl InternetGatewayAttachment {
    fn to_value(&self) -> Value {
        Value::object([
            ("vpcId", Value::from(&self.vpc_id)),
            ("state", Value::from(&self.state)),
        ])
    }
}

/// An internet gateway. While attached, the gateway and its VPC list each
/// other as dependents, so neither can be deleted before the detach.
#[derive(Debug, Clone, PartialEq)]
pub struct InternetGateway {
    pub id: String,
    pub owner_id: String,
    pub attachments: Vec<InternetGatewayAttachment>,
    pub tags: Vec<Tag>,
    dependents: Dependents,
}

impl InternetGateway {
    pub fn new(id: &str, owner_id: &str) -> Self {
        Self {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            attachments: Vec::new(),
            tags: Vec::new(),
            dependents: Dependents::default(),
        }
    }
}

impl Filterable for InternetGateway {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "internet-gateway-id" => one(&self.id),
            "owner-id" => one(&self.owner_id),
            "attachment.vpc-id" => Some(self.attachments.iter().map(|a| a.vpc_id.clone()).collect()),
            "attachment.state" => Some(self.attachments.iter().map(|a| a.state.clone()).collect()),
            _ => None,
        }
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Resource for InternetGateway {
    const KIND: Kind = Kind::InternetGateway;

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
            ("internetGatewayId", Value::from(&self.id)),
            ("ownerId", Value::from(&self.owner_id)),
            (
                "attachmentSet",
                Value::List(
                    self.attachments
                        .iter()
                        .map(InternetGatewayAttachment::to_value)
                        .collect(),
                ),
            ),
            ("tagSet", tag_set(&self.tags)),
        ])
    }

    fn collection(registry: &Registry) -> &Collection<Self> {
        &registry.internet_gateways
    }

    fn collection_mut(registry: &mut Registry) -> &mut Collection<Self> {
        &mut registry.internet_gateways
    }
}

pub fn create_internet_gateway(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let tags = tags_for(
        Kind::InternetGateway,
        &params.tag_specification_list("TagSpecification"),
    )?;
    params.dry_run()?;

    let id = engine.next_id(Kind::InternetGateway);
    let mut gateway = InternetGateway::new(&id, &engine.config.account_id);
    gateway.tags = tags;

    let payload = Value::object([("internetGateway", gateway.to_value())]);
    engine.registry.insert(gateway);
    Ok(payload)
}

pub fn describe_internet_gateways(engine: &Engine, params: &Params) -> Result<Value, Ec2Error> {
    let request = DescribeRequest::from_params(params, "InternetGatewayId")?;
    let gateways = engine.registry.select::<InternetGateway>(&request.ids)?;
    describe(gateways, &request, "internetGatewaySet")
}

pub fn attach_internet_gateway(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let gateway_id = params.required("InternetGatewayId")?;
    let vpc_id = params.required("VpcId")?;

    let gateway = engine.registry.get::<InternetGateway>(gateway_id)?;
    let vpc = engine.registry.get::<Vpc>(vpc_id)?;
    if let Some(attachment) = gateway.attachments.first() {
        return Err(Ec2Error::other(
            "Resource.AlreadyAssociated",
            format!(
                "resource {gateway_id} is already attached to network {}",
                attachment.vpc_id
            ),
        ));
    }
    if let Some(other) = vpc.dependents().ids(Kind::InternetGateway).first() {
        return Err(Ec2Error::other(
            "Resource.AlreadyAssociated",
            format!("network {vpc_id} already has an internet gateway attached ({other})"),
        ));
    }
    params.dry_run()?;

    engine
        .registry
        .get_mut::<InternetGateway>(gateway_id)?
        .attachments
        .push(InternetGatewayAttachment {
            vpc_id: vpc_id.to_string(),
            state: "available".to_string(),
        });
    engine
        .registry
        .link::<InternetGateway>(gateway_id, Kind::Vpc, vpc_id)?;
    engine
        .registry
        .link::<Vpc>(vpc_id, Kind::InternetGateway, gateway_id)?;
    Ok(Value::ok())
}

pub fn detach_internet_gateway(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let gateway_id = params.required("InternetGatewayId")?;
    let vpc_id = params.required("VpcId")?;

    let gateway = engine.registry.get::<InternetGateway>(gateway_id)?;
    engine.registry.get::<Vpc>(vpc_id)?;
    let position = gateway
        .attachments
        .iter()
        .position(|attachment| attachment.vpc_id == vpc_id)
        .ok_or_else(|| {
            Ec2Error::other(
                "Gateway.NotAttached",
                format!("resource {gateway_id} is not attached to network {vpc_id}"),
            )
        })?;
    params.dry_run()?;

    engine
        .registry
        .get_mut::<InternetGateway>(gateway_id)?
        .attachments
        .remove(position);
    engine
        .registry
        .unlink::<InternetGateway>(gateway_id, Kind::Vpc, vpc_id);
    engine
        .registry
        .unlink::<Vpc>(vpc_id, Kind::InternetGateway, gateway_id);
    Ok(Value::ok())
}

pub fn delete_internet_gateway(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let id = params.required("InternetGatewayId")?;
    engine.registry.get::<InternetGateway>(id)?;
    params.dry_run()?;

    engine.registry.remove::<InternetGateway>(id)?;
    Ok(Value::ok())
}
