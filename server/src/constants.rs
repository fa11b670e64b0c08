// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4566;
pub const MAX_BODY_SIZE: usize = 1024 * 1024; // 1 MiB
pub const XML_CONTENT_TYPE: &str = "text/xml";
