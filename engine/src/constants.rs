// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// XML namespace carried by every successful response root element.
pub const XML_NAMESPACE: &str = "http://ec2.amazonaws.com/doc/2016-11-15/";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Page size used by listing actions when `MaxResults` is absent.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Reserved key marking a payload as an error sentinel.
pub const ERROR_MARKER: &str = "__ec2_error__";

/// Number of hex characters after the prefix of a generated resource id.
pub const ID_SUFFIX_LENGTH: usize = 17;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

// Allowed IPv4 prefix lengths for VPC and subnet CIDR blocks
pub const MIN_CIDR_PREFIX: u8 = 16;
pub const MAX_CIDR_PREFIX: u8 = 28;
/// Addresses AWS reserves in every subnet (network, router, DNS, future, broadcast).
pub const RESERVED_SUBNET_ADDRESSES: u64 = 5;
