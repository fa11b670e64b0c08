// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Action dispatch.
//!
//! [`Engine`] owns the registry and the id generator and routes each Query
//! API action to its handler. Handlers return `Result<Value, Ec2Error>`;
//! [`Engine::handle`] turns an error into the sentinel payload so the encoder
//! renders the error envelope with the request's own `requestId`.

use crate::config::Config;
use crate::errors::Ec2Error;
use crate::ids::IdGenerator;
use crate::params::Params;
use crate::registry::Registry;
use crate::resources::{
    capacity_reservation, internet_gateway, route_table, subnet, tags, vpc, Kind,
};
use crate::value::Value;
use crate::xml;

/// Status code and XML document for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug)]
pub struct Engine {
    pub(crate) registry: Registry,
    pub(crate) ids: IdGenerator,
    pub(crate) config: Config,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    pub fn new(config: Config) -> Self {
        let ids = match config.id_seed {
            Some(seed) => IdGenerator::with_seed(seed),
            None => IdGenerator::new(),
        };
        Self {
            registry: Registry::new(),
            ids,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn next_id(&mut self, kind: Kind) -> String {
        self.ids.next(kind.id_prefix())
    }

    #[tracing::instrument(skip(self, params))]
    pub fn dispatch(&mut self, action: &str, params: &Params) -> Result<Value, Ec2Error> {
        match action {
            "CreateVpc" => vpc::create_vpc(self, params),
            "DescribeVpcs" => vpc::describe_vpcs(self, params),
            "DeleteVpc" => vpc::delete_vpc(self, params),

            "CreateSubnet" => subnet::create_subnet(self, params),
            "DescribeSubnets" => subnet::describe_subnets(self, params),
            "DeleteSubnet" => subnet::delete_subnet(self, params),

            "CreateRouteTable" => route_table::create_route_table(self, params),
            "DescribeRouteTables" => route_table::describe_route_tables(self, params),
            "AssociateRouteTable" => route_table::associate_route_table(self, params),
            "DisassociateRouteTable" => route_table::disassociate_route_table(self, params),
            "DeleteRouteTable" => route_table::delete_route_table(self, params),

            "CreateInternetGateway" => internet_gateway::create_internet_gateway(self, params),
            "DescribeInternetGateways" => internet_gateway::describe_internet_gateways(self, params),
            "AttachInternetGateway" => internet_gateway::attach_internet_gateway(self, params),
            "DetachInternetGateway" => internet_gateway::detach_internet_gateway(self, params),
            "DeleteInternetGateway" => internet_gateway::delete_internet_gateway(self, params),

            "CreateCapacityReservation" => {
                capacity_reservation::create_capacity_reservation(self, params)
            }
            "DescribeCapacityReservations" => {
                capacity_reservation::describe_capacity_reservations(self, params)
            }
            "ModifyCapacityReservation" => {
                capacity_reservation::modify_capacity_reservation(self, params)
            }
            "CancelCapacityReservation" => {
                capacity_reservation::cancel_capacity_reservation(self, params)
            }

            "CreateTags" => tags::create_tags(self, params),
            "DeleteTags" => tags::delete_tags(self, params),
            "DescribeTags" => tags::describe_tags(self, params),

            other => Err(Ec2Error::InvalidAction(other.to_string())),
        }
    }

    /// Runs the action named by the `Action` parameter and renders the reply.
    pub fn handle(&mut self, params: &Params, request_id: &str) -> Reply {
        let (action, payload) = match params.action() {
            Ok(action) => (action, self.dispatch(action, params).unwrap_or_else(Value::from)),
            Err(err) => ("", Value::from(err)),
        };

        let status = match payload.as_error() {
            Some(error) => {
                tracing::warn!(
                    "{} failed with {}: {}",
                    action,
                    error.code,
                    error.message
                );
                error.status_code()
            }
            None => {
                tracing::info!("{} succeeded", action);
                200
            }
        };

        Reply {
            status,
            body: xml::encode(action, &payload, request_id),
        }
    }
}
