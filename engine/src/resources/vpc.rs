// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::engine::Engine;
use crate::errors::Ec2Error;
use crate::filters::{one, Filterable};
use crate::models::{DescribeRequest, Tag};
use crate::params::Params;
use crate::registry::{Collection, Registry};
use crate::resources::{describe, tag_set, tags_for, Dependents, Ipv4Cidr, Kind, Resource};
use crate::value::Value;

const DEFAULT_DHCP_OPTIONS_ID: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct Vpc {
    pub id: String,
    pub cidr_block: Ipv4Cidr,
    pub state: String,
    pub owner_id: String,
    pub instance_tenancy: String,
    pub dhcp_options_id: String,
    pub is_default: bool,
    pub tags: Vec<Tag>,
    dependents: Dependents,
}

impl Vpc {
    pub fn new(id: &str, cidr_block: Ipv4Cidr, owner_id: &str) -> Self {
        Self {
            id: id.to_string(),
            cidr_block,
            state: "available".to_string(),
            owner_id: owner_id.to_string(),
            instance_tenancy: "default".to_string(),
            dhcp_options_id: DEFAULT_DHCP_OPTIONS_ID.to_string(),
            is_default: false,
            tags: Vec::new(),
            dependents: Dependents::default(),
        }
    }
}

impl Filterable for Vpc {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "vpc-id" => one(&self.id),
            "cidr" | "cidr-block" | "cidr-block-association.cidr-block" => {
                one(self.cidr_block.to_string())
            }
            "state" => one(&self.state),
            "is-default" => one(self.is_default.to_string()),
            "owner-id" => one(&self.owner_id),
            "instance-tenancy" => one(&self.instance_tenancy),
            "dhcp-options-id" => one(&self.dhcp_options_id),
            _ => None,
        }
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Resource for Vpc {
    const KIND: Kind = Kind::Vpc;

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
            ("vpcId", Value::from(&self.id)),
            ("state", Value::from(&self.state)),
            ("cidrBlock", Value::from(self.cidr_block.to_string())),
            ("dhcpOptionsId", Value::from(&self.dhcp_options_id)),
            ("instanceTenancy", Value::from(&self.instance_tenancy)),
            ("isDefault", Value::from(self.is_default)),
            ("ownerId", Value::from(&self.owner_id)),
            ("tagSet", tag_set(&self.tags)),
        ])
    }

    fn collection(registry: &Registry) -> &Collection<Self> {
        &registry.vpcs
    }

    fn collection_mut(registry: &mut Registry) -> &mut Collection<Self> {
        &mut registry.vpcs
    }
}

fn tenancy(params: &Params) -> Result<String, Ec2Error> {
    match params.scalar("InstanceTenancy") {
        None => Ok("default".to_string()),
        Some(value @ ("default" | "dedicated")) => Ok(value.to_string()),
        Some(other) => Err(Ec2Error::invalid_value("InstanceTenancy", other)),
    }
}

pub fn create_vpc(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let cidr_block = Ipv4Cidr::parse_block(params.required("CidrBlock")?)?;
    let instance_tenancy = tenancy(params)?;
    let tags = tags_for(Kind::Vpc, &params.tag_specification_list("TagSpecification"))?;
    params.dry_run()?;

    let id = engine.next_id(Kind::Vpc);
    let mut vpc = Vpc::new(&id, cidr_block, &engine.config.account_id);
    vpc.instance_tenancy = instance_tenancy;
    vpc.tags = tags;

    let payload = Value::object([("vpc", vpc.to_value())]);
    engine.registry.insert(vpc);
    Ok(payload)
}

pub fn describe_vpcs(engine: &Engine, params: &Params) -> Result<Value, Ec2Error> {
    let request = DescribeRequest::from_params(params, "VpcId")?;
    let vpcs = engine.registry.select::<Vpc>(&request.ids)?;
    describe(vpcs, &request, "vpcSet")
}

pub fn delete_vpc(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let id = params.required("VpcId")?;
    engine.registry.get::<Vpc>(id)?;
    params.dry_run()?;

    engine.registry.remove::<Vpc>(id)?;
    Ok(Value::ok())
}
