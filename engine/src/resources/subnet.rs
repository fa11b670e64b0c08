// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::engine::Engine;
use crate::errors::Ec2Error;
use crate::filters::{one, Filterable};
use crate::models::{DescribeRequest, Tag};
use crate::params::Params;
use crate::registry::{Collection, Registry};
use crate::resources::{describe, tag_set, tags_for, Dependents, Ipv4Cidr, Kind, Resource, Vpc};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Subnet {
    pub id: String,
    pub vpc_id: String,
    pub cidr_block: Ipv4Cidr,
    pub availability_zone: String,
    pub available_ip_address_count: u64,
    pub default_for_az: bool,
    pub map_public_ip_on_launch: bool,
    pub state: String,
    pub owner_id: String,
    pub tags: Vec<Tag>,
    dependents: Dependents,
}

impl Subnet {
    pub fn new(
        id: &str,
        vpc_id: &str,
        cidr_block: Ipv4Cidr,
        availability_zone: &str,
        owner_id: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            vpc_id: vpc_id.to_string(),
            cidr_block,
            availability_zone: availability_zone.to_string(),
            available_ip_address_count: cidr_block.available_addresses(),
            default_for_az: false,
            map_public_ip_on_launch: false,
            state: "available".to_string(),
            owner_id: owner_id.to_string(),
            tags: Vec::new(),
            dependents: Dependents::default(),
        }
    }

    /// Id of the route-table association holding this subnet, if any.
    pub fn association_id(&self) -> Option<&str> {
        self.dependents
            .ids(Kind::RouteTableAssociation)
            .first()
            .map(String::as_str)
    }
}

impl Filterable for Subnet {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "subnet-id" => one(&self.id),
            "vpc-id" => one(&self.vpc_id),
            "cidr" | "cidr-block" | "cidr-block-association.cidr-block" => {
                one(self.cidr_block.to_string())
            }
            "availability-zone" => one(&self.availability_zone),
            "available-ip-address-count" => one(self.available_ip_address_count.to_string()),
            "state" => one(&self.state),
            "default-for-az" => one(self.default_for_az.to_string()),
            "map-public-ip-on-launch" => one(self.map_public_ip_on_launch.to_string()),
            "owner-id" => one(&self.owner_id),
            _ => None,
        }
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Resource for Subnet {
    const KIND: Kind = Kind::Subnet;

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
        let available = i64::try_from(self.available_ip_address_count).unwrap_or(i64::MAX);
        Value::object([
            ("subnetId", Value::from(&self.id)),
            ("state", Value::from(&self.state)),
            ("vpcId", Value::from(&self.vpc_id)),
            ("cidrBlock", Value::from(self.cidr_block.to_string())),
            ("availableIpAddressCount", Value::from(available)),
            ("availabilityZone", Value::from(&self.availability_zone)),
            ("defaultForAz", Value::from(self.default_for_az)),
            ("mapPublicIpOnLaunch", Value::from(self.map_public_ip_on_launch)),
            ("ownerId", Value::from(&self.owner_id)),
            ("tagSet", tag_set(&self.tags)),
        ])
    }

    fn collection(registry: &Registry) -> &Collection<Self> {
        &registry.subnets
    }

    fn collection_mut(registry: &mut Registry) -> &mut Collection<Self> {
        &mut registry.subnets
    }
}

fn check_range(registry: &Registry, vpc: &Vpc, cidr: &Ipv4Cidr) -> Result<(), Ec2Error> {
    if !vpc.cidr_block.contains(cidr) {
        return Err(Ec2Error::other(
            "InvalidSubnet.Range",
            format!("The CIDR '{cidr}' is invalid."),
        ));
    }
    let conflict = registry
        .collection::<Subnet>()
        .iter()
        .any(|subnet| subnet.vpc_id == vpc.id && subnet.cidr_block.overlaps(cidr));
    if conflict {
        return Err(Ec2Error::other(
            "InvalidSubnet.Conflict",
            format!("The CIDR '{cidr}' conflicts with another subnet"),
        ));
    }
    Ok(())
}

pub fn create_subnet(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let vpc_id = params.required("VpcId")?;
    let cidr_block = Ipv4Cidr::parse_block(params.required("CidrBlock")?)?;
    let vpc = engine.registry.get::<Vpc>(vpc_id)?;
    check_range(&engine.registry, vpc, &cidr_block)?;
    let tags = tags_for(Kind::Subnet, &params.tag_specification_list("TagSpecification"))?;
    params.dry_run()?;

    let availability_zone = match params.scalar("AvailabilityZone") {
        Some(zone) => zone.to_string(),
        None => engine.config.default_availability_zone(),
    };
    let id = engine.next_id(Kind::Subnet);
    let mut subnet = Subnet::new(
        &id,
        vpc_id,
        cidr_block,
        &availability_zone,
        &engine.config.account_id,
    );
    subnet.tags = tags;

    let payload = Value::object([("subnet", subnet.to_value())]);
    engine.registry.link::<Vpc>(vpc_id, Kind::Subnet, &id)?;
    engine.registry.insert(subnet);
    Ok(payload)
}

pub fn describe_subnets(engine: &Engine, params: &Params) -> Result<Value, Ec2Error> {
    let request = DescribeRequest::from_params(params, "SubnetId")?;
    let subnets = engine.registry.select::<Subnet>(&request.ids)?;
    describe(subnets, &request, "subnetSet")
}

pub fn delete_subnet(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let id = params.required("SubnetId")?;
    engine.registry.get::<Subnet>(id)?;
    params.dry_run()?;

    let subnet = engine.registry.remove::<Subnet>(id)?;
    engine.registry.unlink::<Vpc>(&subnet.vpc_id, Kind::Subnet, id);
    Ok(Value::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resources::vpc::{create_vpc, delete_vpc};

    fn id_of(payload: &Value, wrapper: &str, field: &str) -> String {
        payload
            .get(wrapper)
            .and_then(|inner| inner.get(field))
            .and_then(Value::as_str)
            .unwrap()
            .to_string()
    }

    fn engine_with_vpc() -> (Engine, String) {
        let mut engine = Engine::new(Config::default());
        let payload = create_vpc(&mut engine, &Params::from_pairs([("CidrBlock", "10.0.0.0/16")]))
            .unwrap();
        let vpc_id = id_of(&payload, "vpc", "vpcId");
        (engine, vpc_id)
    }

    #[test]
    fn test_create_subnet() {
        let (mut engine, vpc_id) = engine_with_vpc();
        let params = Params::from_pairs([("VpcId", vpc_id.as_str()), ("CidrBlock", "10.0.1.0/24")]);
        let payload = create_subnet(&mut engine, &params).unwrap();
        let subnet = payload.get("subnet").unwrap();

        assert_eq!(subnet.get("vpcId").and_then(Value::as_str), Some(vpc_id.as_str()));
        assert_eq!(subnet.get("availabilityZone").and_then(Value::as_str), Some("us-east-1a"));
        assert_eq!(subnet.get("availableIpAddressCount"), Some(&Value::Int(251)));

        let subnet_id = id_of(&payload, "subnet", "subnetId");
        let vpc = engine.registry().get::<Vpc>(&vpc_id).unwrap();
        assert_eq!(vpc.dependents().ids(Kind::Subnet), [subnet_id]);
    }

    #[test]
    fn test_create_subnet_in_missing_vpc() {
        let mut engine = Engine::new(Config::default());
        let params = Params::from_pairs([("VpcId", "vpc-missing"), ("CidrBlock", "10.0.1.0/24")]);
        let err = create_subnet(&mut engine, &params).unwrap_err();
        assert_eq!(err.code(), "InvalidVpcID.NotFound");
        assert!(engine.registry().collection::<Subnet>().is_empty());
    }

    #[test]
    fn test_create_subnet_range_checks() {
        let (mut engine, vpc_id) = engine_with_vpc();

        let outside = Params::from_pairs([("VpcId", vpc_id.as_str()), ("CidrBlock", "10.1.0.0/24")]);
        let err = create_subnet(&mut engine, &outside).unwrap_err();
        assert_eq!(err.code(), "InvalidSubnet.Range");

        let first = Params::from_pairs([("VpcId", vpc_id.as_str()), ("CidrBlock", "10.0.0.0/24")]);
        create_subnet(&mut engine, &first).unwrap();
        let overlapping =
            Params::from_pairs([("VpcId", vpc_id.as_str()), ("CidrBlock", "10.0.0.0/25")]);
        let err = create_subnet(&mut engine, &overlapping).unwrap_err();
        assert_eq!(err.code(), "InvalidSubnet.Conflict");
    }

    #[test]
    fn test_vpc_with_subnet_cannot_be_deleted() {
        let (mut engine, vpc_id) = engine_with_vpc();
        let params = Params::from_pairs([("VpcId", vpc_id.as_str()), ("CidrBlock", "10.0.1.0/24")]);
        let subnet_id = id_of(&create_subnet(&mut engine, &params).unwrap(), "subnet", "subnetId");

        let snapshot = engine.registry().clone();
        let err = delete_vpc(&mut engine, &Params::from_pairs([("VpcId", vpc_id.as_str())]))
            .unwrap_err();
        assert_eq!(err.code(), "DependencyViolation");
        assert_eq!(engine.registry(), &snapshot);

        delete_subnet(&mut engine, &Params::from_pairs([("SubnetId", subnet_id.as_str())]))
            .unwrap();
        delete_vpc(&mut engine, &Params::from_pairs([("VpcId", vpc_id.as_str())])).unwrap();
        assert!(engine.registry().collection::<Vpc>().is_empty());
        assert!(engine.registry().collection::<Subnet>().is_empty());
    }

    #[test]
    fn test_describe_subnets_by_vpc() {
        let (mut engine, vpc_id) = engine_with_vpc();
        for cidr in ["10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"] {
            let params = Params::from_pairs([("VpcId", vpc_id.as_str()), ("CidrBlock", cidr)]);
            create_subnet(&mut engine, &params).unwrap();
        }

        let params = Params::from_pairs([
            ("Filter.1.Name", "vpcId"),
            ("Filter.1.Value.1", vpc_id.as_str()),
            ("MaxResults", "2"),
        ]);
        let payload = describe_subnets(&engine, &params).unwrap();
        assert_eq!(payload.get("subnetSet").and_then(Value::as_list).map(<[Value]>::len), Some(2));
        assert_eq!(payload.get("nextToken").and_then(Value::as_str), Some("2"));
    }
}
