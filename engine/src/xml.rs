// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! EC2 Query API XML rendering.
//!
//! [`encode`] turns a [`Value`] payload into the response document:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <DescribeVpcsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
//!   <requestId>...</requestId>
//!   <vpcSet><item>...</item></vpcSet>
//! </DescribeVpcsResponse>
//! ```
//!
//! (shown indented; the output has no whitespace between elements).
//!
//! # Tag rules
//!
//! - Map keys become lowerCamel tags (`VpcId` renders as `<vpcId>`).
//! - A list key becomes a `Set` wrapper named after the singular noun
//!   (`vpcs`, `Vpcs`, `vpcSet` all render as `<vpcSet>`) holding one `<item>`
//!   per element. An empty list renders as `<vpcSet/>`.
//! - Null fields are left out.
//! - When several spellings of one tag are present, the lowerCamel key wins,
//!   then the PascalCase key, then any other alias.
//!
//! A payload carrying the error sentinel renders as the EC2 error envelope
//! instead, whatever the action.

use std::fmt::Write as _;

use indexmap::IndexMap;
use quick_xml::escape::escape;

use crate::constants::{XML_DECLARATION, XML_NAMESPACE};
use crate::value::{Map, Value};

pub fn encode(action: &str, payload: &Value, request_id: &str) -> String {
    if let Some(error) = payload.as_error() {
        return encode_error(error.code, error.message, request_id);
    }

    let mut out = String::with_capacity(256);
    out.push_str(XML_DECLARATION);
    let _ = write!(
        out,
        r#"<{action}Response xmlns="{XML_NAMESPACE}"><requestId>{}</requestId>"#,
        escape(request_id)
    );
    match payload {
        Value::Map(map) => write_fields(&mut out, map),
        Value::Null => {}
        other => write_field(&mut out, "return", other),
    }
    let _ = write!(out, "</{action}Response>");
    out
}

pub fn encode_error(code: &str, message: &str, request_id: &str) -> String {
    format!(
        "{XML_DECLARATION}<Response><Errors><Error><Code>{}</Code><Message>{}</Message></Error></Errors><RequestID>{}</RequestID></Response>",
        escape(code),
        escape(message),
        escape(request_id)
    )
}

/// `VpcId` -> `vpcId`.
pub fn tag_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `Vpcs` -> `vpcSet`, `addresses` -> `addressSet`, `tagSet` -> `tagSet`.
pub fn set_tag_name(key: &str) -> String {
    let name = tag_name(key);
    if name.ends_with("Set") {
        return name;
    }
    format!("{}Set", singular(&name))
}

fn singular(noun: &str) -> String {
    if let Some(stem) = noun.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if noun.ends_with(suffix) {
            return noun[..noun.len() - 2].to_string();
        }
    }
    match noun.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') => stem.to_string(),
        _ => noun.to_string(),
    }
}

fn canonical_tag(key: &str, value: &Value) -> String {
    match value {
        Value::List(_) => set_tag_name(key),
        _ => tag_name(key),
    }
}

fn variant_rank(key: &str, canonical: &str) -> u8 {
    if key == canonical {
        0
    } else if key.len() == canonical.len()
        && key.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && key.get(1..) == canonical.get(1..)
    {
        1
    } else {
        2
    }
}

/// Picks one key per rendered tag, skipping nulls, in first-seen order.
fn select_fields(map: &Map) -> IndexMap<String, &Value> {
    let mut chosen: IndexMap<String, (u8, &Value)> = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        let canonical = canonical_tag(key, value);
        let rank = variant_rank(key, &canonical);
        match chosen.get_mut(&canonical) {
            Some(slot) if slot.0 <= rank => {}
            Some(slot) => *slot = (rank, value),
            None => {
                chosen.insert(canonical, (rank, value));
            }
        }
    }
    chosen.into_iter().map(|(tag, (_, value))| (tag, value)).collect()
}

fn write_fields(out: &mut String, map: &Map) {
    for (tag, value) in select_fields(map) {
        write_element(out, &tag, value);
    }
}

fn write_field(out: &mut String, key: &str, value: &Value) {
    if value.is_null() {
        return;
    }
    write_element(out, &canonical_tag(key, value), value);
}

fn write_element(out: &mut String, tag: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Str(text) => {
            let _ = write!(out, "<{tag}>{}</{tag}>", escape(text.as_str()));
        }
        Value::Int(n) => {
            let _ = write!(out, "<{tag}>{n}</{tag}>");
        }
        Value::Bool(b) => {
            let _ = write!(out, "<{tag}>{b}</{tag}>");
        }
        Value::Map(map) => {
            let _ = write!(out, "<{tag}>");
            write_fields(out, map);
            let _ = write!(out, "</{tag}>");
        }
        Value::List(items) if items.is_empty() => {
            let _ = write!(out, "<{tag}/>");
        }
        Value::List(items) => {
            let _ = write!(out, "<{tag}>");
            for item in items {
                write_item(out, item);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn write_item(out: &mut String, item: &Value) {
    match item {
        Value::Null => out.push_str("<item/>"),
        Value::List(nested) => {
            out.push_str("<item>");
            for inner in nested {
                write_item(out, inner);
            }
            out.push_str("</item>");
        }
        other => write_element(out, "item", other),
    }
}
