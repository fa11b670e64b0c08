// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::engine::Engine;
use crate::errors::Ec2Error;
use crate::filters::{one, Filterable};
use crate::models::{DescribeRequest, Tag};
use crate::params::Params;
use crate::registry::{Collection, Registry};
use crate::resources::{describe, tag_set, tags_for, Dependents, Kind, Resource};
use crate::value::Value;

const PLATFORMS: &[&str] = &[
    "Linux/UNIX",
    "Red Hat Enterprise Linux",
    "SUSE Linux",
    "Windows",
    "Windows with SQL Server",
    "Windows with SQL Server Enterprise",
    "Windows with SQL Server Standard",
    "Windows with SQL Server Web",
    "Linux with SQL Server Standard",
    "Linux with SQL Server Web",
    "Linux with SQL Server Enterprise",
    "RHEL with HA",
    "Ubuntu Pro",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityReservationState {
    Active,
    Cancelled,
}

impl CapacityReservationState {
    pub fn as_str(self) -> &'static str {
        match self {
            CapacityReservationState::Active => "active",
            CapacityReservationState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CapacityReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityReservation {
    pub id: String,
    pub arn: String,
    pub owner_id: String,
    pub instance_type: String,
    pub instance_platform: String,
    pub availability_zone: String,
    pub tenancy: String,
    pub total_instance_count: i64,
    pub available_instance_count: i64,
    pub ebs_optimized: bool,
    pub state: CapacityReservationState,
    pub create_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub end_date_type: String,
    pub instance_match_criteria: String,
    pub tags: Vec<Tag>,
    dependents: Dependents,
}

impl CapacityReservation {
    fn end_date_text(&self) -> Option<String> {
        self.end_date.map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Filterable for CapacityReservation {
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "capacity-reservation-id" => one(&self.id),
            "instance-type" => one(&self.instance_type),
            "instance-platform" => one(&self.instance_platform),
            "availability-zone" => one(&self.availability_zone),
            "state" => one(self.state.as_str()),
            "tenancy" => one(&self.tenancy),
            "owner-id" => one(&self.owner_id),
            "end-date-type" => one(&self.end_date_type),
            "instance-match-criteria" => one(&self.instance_match_criteria),
            _ => None,
        }
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Resource for CapacityReservation {
    const KIND: Kind = Kind::CapacityReservation;

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
            ("capacityReservationId", Value::from(&self.id)),
            ("capacityReservationArn", Value::from(&self.arn)),
            ("ownerId", Value::from(&self.owner_id)),
            ("instanceType", Value::from(&self.instance_type)),
            ("instancePlatform", Value::from(&self.instance_platform)),
            ("availabilityZone", Value::from(&self.availability_zone)),
            ("tenancy", Value::from(&self.tenancy)),
            ("totalInstanceCount", Value::from(self.total_instance_count)),
            ("availableInstanceCount", Value::from(self.available_instance_count)),
            ("ebsOptimized", Value::from(self.ebs_optimized)),
            ("ephemeralStorage", Value::from(false)),
            ("state", Value::from(self.state.as_str())),
            (
                "createDate",
                Value::from(self.create_date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            ("endDate", Value::from(self.end_date_text())),
            ("endDateType", Value::from(&self.end_date_type)),
            ("instanceMatchCriteria", Value::from(&self.instance_match_criteria)),
            ("tagSet", tag_set(&self.tags)),
        ])
    }

    fn collection(registry: &Registry) -> &Collection<Self> {
        &registry.capacity_reservations
    }

    fn collection_mut(registry: &mut Registry) -> &mut Collection<Self> {
        &mut registry.capacity_reservations
    }
}

fn instance_count(params: &Params, required: bool) -> Result<Option<i64>, Ec2Error> {
    match params.int("InstanceCount")? {
        None if required => Err(Ec2Error::MissingParameter("InstanceCount".to_string())),
        None => Ok(None),
        Some(count) if count <= 0 => Err(Ec2Error::invalid_value("InstanceCount", &count.to_string())),
        Some(count) => Ok(Some(count)),
    }
}

fn one_of(params: &Params, name: &str, allowed: &[&str], default: &str) -> Result<String, Ec2Error> {
    match params.scalar(name) {
        None => Ok(default.to_string()),
        Some(value) if allowed.contains(&value) => Ok(value.to_string()),
        Some(other) => Err(Ec2Error::invalid_value(name, other)),
    }
}

/// Reads `EndDateType` and `EndDate`; a `limited` reservation needs a date.
fn end_date(params: &Params, default_type: &str) -> Result<(String, Option<DateTime<Utc>>), Ec2Error> {
    let end_date_type = one_of(params, "EndDateType", &["unlimited", "limited"], default_type)?;
    let end_date = params
        .scalar("EndDate")
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|date| date.with_timezone(&Utc))
                .map_err(|_| Ec2Error::invalid_value("EndDate", raw))
        })
        .transpose()?;

    match (end_date_type.as_str(), end_date) {
        ("limited", None) => Err(Ec2Error::other(
            "InvalidParameterCombination",
            "EndDate is required when EndDateType is limited",
        )),
        ("unlimited", Some(_)) => Err(Ec2Error::other(
            "InvalidParameterCombination",
            "EndDate cannot be specified when EndDateType is unlimited",
        )),
        _ => Ok((end_date_type, end_date)),
    }
}

fn require_active(reservation: &CapacityReservation) -> Result<(), Ec2Error> {
    if reservation.state != CapacityReservationState::Active {
        return Err(Ec2Error::InvalidStateTransition(format!(
            "The capacity reservation '{}' is in the '{}' state and cannot be modified.",
            reservation.id, reservation.state
        )));
    }
    Ok(())
}

pub fn create_capacity_reservation(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let instance_type = params.required("InstanceType")?.to_string();
    let instance_platform = params.required("InstancePlatform")?;
    if !PLATFORMS.contains(&instance_platform) {
        return Err(Ec2Error::invalid_value("InstancePlatform", instance_platform));
    }
    let availability_zone = params.required("AvailabilityZone")?.to_string();
    let count = instance_count(params, true)?.unwrap_or_default();
    let tenancy = one_of(params, "Tenancy", &["default", "dedicated"], "default")?;
    let instance_match_criteria =
        one_of(params, "InstanceMatchCriteria", &["open", "targeted"], "open")?;
    let (end_date_type, end_date) = end_date(params, "unlimited")?;
    let tags = tags_for(
        Kind::CapacityReservation,
        &params.tag_specification_list("TagSpecification"),
    )?;
    params.dry_run()?;

    let id = engine.next_id(Kind::CapacityReservation);
    let reservation = CapacityReservation {
        arn: format!(
            "arn:aws:ec2:{}:{}:capacity-reservation/{id}",
            engine.config.region, engine.config.account_id
        ),
        id,
        owner_id: engine.config.account_id.clone(),
        instance_type,
        instance_platform: instance_platform.to_string(),
        availability_zone,
        tenancy,
        total_instance_count: count,
        available_instance_count: count,
        ebs_optimized: params.bool("EbsOptimized"),
        state: CapacityReservationState::Active,
        create_date: Utc::now(),
        end_date,
        end_date_type,
        instance_match_criteria,
        tags,
        dependents: Dependents::default(),
    };

    let payload = Value::object([("capacityReservation", reservation.to_value())]);
    engine.registry.insert(reservation);
    Ok(payload)
}

pub fn describe_capacity_reservations(engine: &Engine, params: &Params) -> Result<Value, Ec2Error> {
    let request = DescribeRequest::from_params(params, "CapacityReservationId")?;
    let reservations = engine.registry.select::<CapacityReservation>(&request.ids)?;
    describe(reservations, &request, "capacityReservationSet")
}

pub fn modify_capacity_reservation(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let id = params.required("CapacityReservationId")?;
    let count = instance_count(params, false)?;
    let reservation = engine.registry.get::<CapacityReservation>(id)?;
    require_active(reservation)?;
    let end = match (params.scalar("EndDateType"), params.scalar("EndDate")) {
        (None, None) => None,
        _ => Some(end_date(params, &reservation.end_date_type)?),
    };
    params.dry_run()?;

    let reservation = engine.registry.get_mut::<CapacityReservation>(id)?;
    if let Some(count) = count {
        let in_use = reservation.total_instance_count - reservation.available_instance_count;
        reservation.total_instance_count = count;
        reservation.available_instance_count = (count - in_use).max(0);
    }
    if let Some((end_date_type, end_date)) = end {
        reservation.end_date_type = end_date_type;
        reservation.end_date = end_date;
    }
    Ok(Value::ok())
}

pub fn cancel_capacity_reservation(engine: &mut Engine, params: &Params) -> Result<Value, Ec2Error> {
    let id = params.required("CapacityReservationId")?;
    require_active(engine.registry.get::<CapacityReservation>(id)?)?;
    params.dry_run()?;

    let reservation = engine.registry.get_mut::<CapacityReservation>(id)?;
    reservation.state = CapacityReservationState::Cancelled;
    reservation.available_instance_count = 0;
    Ok(Value::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn create_params(count: &str) -> Params {
        Params::from_pairs([
            ("InstanceType", "m5.large"),
            ("InstancePlatform", "Linux/UNIX"),
            ("AvailabilityZone", "us-east-1a"),
            ("InstanceCount", count),
        ])
    }

    fn create(engine: &mut Engine) -> String {
        let payload = create_capacity_reservation(engine, &create_params("2")).unwrap();
        payload
            .get("capacityReservation")
            .and_then(|r| r.get("capacityReservationId"))
            .and_then(Value::as_str)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_create_capacity_reservation() {
        let mut engine = Engine::new(Config::default());
        let payload = create_capacity_reservation(&mut engine, &create_params("3")).unwrap();
        let reservation = payload.get("capacityReservation").unwrap();

        let id = reservation.get("capacityReservationId").and_then(Value::as_str).unwrap();
        assert!(id.starts_with("cr-"));
        assert_eq!(
            reservation.get("capacityReservationArn").and_then(Value::as_str),
            Some(format!("arn:aws:ec2:us-east-1:123456789012:capacity-reservation/{id}").as_str())
        );
        assert_eq!(reservation.get("totalInstanceCount"), Some(&Value::Int(3)));
        assert_eq!(reservation.get("state").and_then(Value::as_str), Some("active"));
        assert_eq!(reservation.get("endDateType").and_then(Value::as_str), Some("unlimited"));
        assert!(reservation.get("endDate").unwrap().is_null());
    }

    #[test]
    fn test_create_rejects_bad_counts() {
        let mut engine = Engine::new(Config::default());
        for count in ["0", "-1"] {
            let err = create_capacity_reservation(&mut engine, &create_params(count)).unwrap_err();
            assert_eq!(err.code(), "InvalidParameterValue");
        }
        let err = create_capacity_reservation(&mut engine, &create_params("many")).unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue");
        assert!(engine.registry().collection::<CapacityReservation>().is_empty());
    }

    #[test]
    fn test_create_requires_fields() {
        let mut engine = Engine::new(Config::default());
        let params = Params::from_pairs([("InstanceType", "m5.large")]);
        let err = create_capacity_reservation(&mut engine, &params).unwrap_err();
        assert_eq!(err, Ec2Error::MissingParameter("InstancePlatform".to_string()));
    }

    #[test]
    fn test_limited_end_date() {
        let mut engine = Engine::new(Config::default());
        let mut params = create_params("1");
        params.insert("EndDateType", "limited");
        let err = create_capacity_reservation(&mut engine, &params).unwrap_err();
        assert_eq!(err.code(), "InvalidParameterCombination");

        params.insert("EndDate", "2030-01-01T00:00:00Z");
        let payload = create_capacity_reservation(&mut engine, &params).unwrap();
        let reservation = payload.get("capacityReservation").unwrap();
        assert_eq!(
            reservation.get("endDate").and_then(Value::as_str),
            Some("2030-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_modify_then_cancel() {
        let mut engine = Engine::new(Config::default());
        let id = create(&mut engine);

        let params = Params::from_pairs([("CapacityReservationId", id.as_str()), ("InstanceCount", "5")]);
        assert_eq!(modify_capacity_reservation(&mut engine, &params).unwrap(), Value::ok());
        let reservation = engine.registry().get::<CapacityReservation>(&id).unwrap();
        assert_eq!(reservation.total_instance_count, 5);
        assert_eq!(reservation.available_instance_count, 5);

        let cancel = Params::from_pairs([("CapacityReservationId", id.as_str())]);
        cancel_capacity_reservation(&mut engine, &cancel).unwrap();

        let err = modify_capacity_reservation(&mut engine, &params).unwrap_err();
        assert_eq!(err.code(), "InvalidStateTransition");
        let err = cancel_capacity_reservation(&mut engine, &cancel).unwrap_err();
        assert_eq!(err.code(), "InvalidStateTransition");
    }

    #[test]
    fn test_modify_rejects_zero_count() {
        let mut engine = Engine::new(Config::default());
        let id = create(&mut engine);
        let params = Params::from_pairs([("CapacityReservationId", id.as_str()), ("InstanceCount", "0")]);
        let err = modify_capacity_reservation(&mut engine, &params).unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue");
    }

    #[test]
    fn test_describe_by_state() {
        let mut engine = Engine::new(Config::default());
        let first = create(&mut engine);
        create(&mut engine);
        let cancel = Params::from_pairs([("CapacityReservationId", first.as_str())]);
        cancel_capacity_reservation(&mut engine, &cancel).unwrap();

        let params = Params::from_pairs([("Filter.1.Name", "state"), ("Filter.1.Value.1", "cancelled")]);
        let payload = describe_capacity_reservations(&engine, &params).unwrap();
        let items = payload.get("capacityReservationSet").and_then(Value::as_list).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].get("capacityReservationId").and_then(Value::as_str),
            Some(first.as_str())
        );
    }

    #[test]
    fn test_unknown_reservation() {
        let mut engine = Engine::new(Config::default());
        let cancel = Params::from_pairs([("CapacityReservationId", "cr-missing")]);
        let err = cancel_capacity_reservation(&mut engine, &cancel).unwrap_err();
        assert_eq!(err.code(), "InvalidCapacityReservationId.NotFound");
    }
}
