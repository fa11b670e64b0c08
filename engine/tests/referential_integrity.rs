// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use ec2_engine::resources::{InternetGateway, RouteTable, Subnet, Vpc};
use ec2_engine::value::Value;
use ec2_engine::{Config, Engine, Params};

fn engine() -> Engine {
    Engine::new(Config {
        id_seed: Some(1),
        ..Config::default()
    })
}

fn call(engine: &mut Engine, action: &str, pairs: &[(&str, &str)]) -> Value {
    let params = Params::from_pairs(pairs.iter().copied());
    engine
        .dispatch(action, &params)
        .unwrap_or_else(|err| panic!("{action} failed: {err}"))
}

fn text(value: &Value, path: &[&str]) -> String {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing {path:?}"))
        .to_string()
}

#[test]
fn test_network_teardown_order() {
    let mut engine = engine();

    let vpc = call(&mut engine, "CreateVpc", &[("CidrBlock", "10.0.0.0/16")]);
    let vpc_id = text(&vpc, &["vpc", "vpcId"]);
    let subnet = call(
        &mut engine,
        "CreateSubnet",
        &[("VpcId", vpc_id.as_str()), ("CidrBlock", "10.0.1.0/24")],
    );
    let subnet_id = text(&subnet, &["subnet", "subnetId"]);
    let table = call(&mut engine, "CreateRouteTable", &[("VpcId", vpc_id.as_str())]);
    let table_id = text(&table, &["routeTable", "routeTableId"]);
    let association = call(
        &mut engine,
        "AssociateRouteTable",
        &[("RouteTableId", table_id.as_str()), ("SubnetId", subnet_id.as_str())],
    );
    let association_id = text(&association, &["associationId"]);
    let gateway = call(&mut engine, "CreateInternetGateway", &[]);
    let gateway_id = text(&gateway, &["internetGateway", "internetGatewayId"]);
    call(
        &mut engine,
        "AttachInternetGateway",
        &[("InternetGatewayId", gateway_id.as_str()), ("VpcId", vpc_id.as_str())],
    );

    // every delete is blocked and leaves the registry untouched
    let snapshot = engine.registry().clone();
    let blocked = [
        ("DeleteVpc", "VpcId", vpc_id.as_str()),
        ("DeleteSubnet", "SubnetId", subnet_id.as_str()),
        ("DeleteRouteTable", "RouteTableId", table_id.as_str()),
        ("DeleteInternetGateway", "InternetGatewayId", gateway_id.as_str()),
    ];
    for (action, name, id) in blocked {
        let err = engine
            .dispatch(action, &Params::from_pairs([(name, id)]))
            .unwrap_err();
        assert_eq!(err.code(), "DependencyViolation", "{action}");
        assert_eq!(engine.registry(), &snapshot, "{action}");
    }

    call(
        &mut engine,
        "DetachInternetGateway",
        &[("InternetGatewayId", gateway_id.as_str()), ("VpcId", vpc_id.as_str())],
    );
    call(&mut engine, "DeleteInternetGateway", &[("InternetGatewayId", gateway_id.as_str())]);
    call(&mut engine, "DisassociateRouteTable", &[("AssociationId", association_id.as_str())]);
    call(&mut engine, "DeleteRouteTable", &[("RouteTableId", table_id.as_str())]);
    call(&mut engine, "DeleteSubnet", &[("SubnetId", subnet_id.as_str())]);
    call(&mut engine, "DeleteVpc", &[("VpcId", vpc_id.as_str())]);

    let registry = engine.registry();
    assert!(registry.collection::<Vpc>().is_empty());
    assert!(registry.collection::<Subnet>().is_empty());
    assert!(registry.collection::<RouteTable>().is_empty());
    assert!(registry.collection::<InternetGateway>().is_empty());
}

#[test]
fn test_create_with_missing_parent_allocates_nothing() {
    let mut engine = engine();
    let params = Params::from_pairs([("VpcId", "vpc-00000000000000000"), ("CidrBlock", "10.0.0.0/24")]);
    let err = engine.dispatch("CreateSubnet", &params).unwrap_err();
    assert_eq!(err.code(), "InvalidVpcID.NotFound");
    assert!(engine.registry().collection::<Subnet>().is_empty());
}

#[test]
fn test_describe_pages_through_dispatch() {
    let mut engine = engine();
    let mut created = Vec::new();
    for i in 0..5 {
        let cidr = format!("10.{i}.0.0/16");
        let vpc = call(&mut engine, "CreateVpc", &[("CidrBlock", cidr.as_str())]);
        created.push(text(&vpc, &["vpc", "vpcId"]));
    }

    let mut listed = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let mut pairs = vec![("MaxResults", "2")];
        if let Some(token) = token.as_deref() {
            pairs.push(("NextToken", token));
        }
        let page = call(&mut engine, "DescribeVpcs", &pairs);
        for vpc in page.get("vpcSet").and_then(Value::as_list).unwrap() {
            listed.push(text(vpc, &["vpcId"]));
        }
        match page.get("nextToken").and_then(Value::as_str) {
            Some(next) => token = Some(next.to_string()),
            None => break,
        }
    }
    assert_eq!(listed, created);
}
