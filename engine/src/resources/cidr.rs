// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::constants::{MAX_CIDR_PREFIX, MIN_CIDR_PREFIX, RESERVED_SUBNET_ADDRESSES};
use crate::errors::Ec2Error;

/// An IPv4 block such as `10.0.0.0/16`, stored with its host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Cidr {
    network: u32,
    prefix: u8,
}

impl Ipv4Cidr {
    /// Parses a block AWS accepts for a VPC or subnet (`/16` to `/28`).
    pub fn parse_block(raw: &str) -> Result<Self, Ec2Error> {
        let cidr: Ipv4Cidr = raw.parse().map_err(|_| invalid_block(raw))?;
        if !(MIN_CIDR_PREFIX..=MAX_CIDR_PREFIX).contains(&cidr.prefix) {
            return Err(invalid_block(raw));
        }
        Ok(cidr)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - u32::from(p)),
        }
    }

    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix >= self.prefix && other.network & self.mask() == self.network
    }

    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Usable addresses once the five AWS-reserved ones are taken out.
    pub fn available_addresses(&self) -> u64 {
        (1u64 << (32 - u32::from(self.prefix))).saturating_sub(RESERVED_SUBNET_ADDRESSES)
    }
}

fn invalid_block(raw: &str) -> Ec2Error {
    Ec2Error::InvalidParameterValue(format!(
        "Value ({raw}) for parameter cidrBlock is invalid. This is not a valid CIDR block."
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCidrError;

impl FromStr for Ipv4Cidr {
    type Err = ParseCidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, prefix) = s.trim().split_once('/').ok_or(ParseCidrError)?;
        let address: Ipv4Addr = address.parse().map_err(|_| ParseCidrError)?;
        let prefix: u8 = prefix.parse().map_err(|_| ParseCidrError)?;
        if prefix > 32 {
            return Err(ParseCidrError);
        }
        let mut cidr = Ipv4Cidr {
            network: u32::from(address),
            prefix,
        };
        cidr.network &= cidr.mask();
        Ok(cidr)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.network), self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let cidr: Ipv4Cidr = "10.0.1.7/24".parse().unwrap();
        assert_eq!(cidr.to_string(), "10.0.1.0/24");
        assert_eq!(cidr.prefix(), 24);
    }

    #[test]
    fn test_parse_block_limits() {
        assert!(Ipv4Cidr::parse_block("10.0.0.0/16").is_ok());
        assert!(Ipv4Cidr::parse_block("10.0.0.0/28").is_ok());
        assert!(Ipv4Cidr::parse_block("10.0.0.0/8").is_err());
        assert!(Ipv4Cidr::parse_block("10.0.0.0/29").is_err());
        assert!(Ipv4Cidr::parse_block("10.0.0.300/16").is_err());
        assert!(Ipv4Cidr::parse_block("not-a-cidr").is_err());
    }

    #[test]
    fn test_contains_and_overlaps() {
        let vpc: Ipv4Cidr = "10.0.0.0/16".parse().unwrap();
        let inside: Ipv4Cidr = "10.0.3.0/24".parse().unwrap();
        let outside: Ipv4Cidr = "10.1.0.0/24".parse().unwrap();
        assert!(vpc.contains(&inside));
        assert!(!vpc.contains(&outside));
        assert!(!inside.contains(&vpc));
        assert!(inside.overlaps(&vpc));
        assert!(!inside.overlaps(&outside));
    }

    #[test]
    fn test_available_addresses() {
        let cidr: Ipv4Cidr = "10.0.0.0/24".parse().unwrap();
        assert_eq!(cidr.available_addresses(), 251);
    }
}
