// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Offset pagination for `Describe*` listings.
//!
//! A `NextToken` is the decimal start offset of the next page. It is only
//! meaningful against the same filtered, insertion-ordered sequence that
//! produced it; nothing binds it to the filters of the earlier call.

use crate::errors::Ec2Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

pub fn parse_token(token: &str) -> Result<usize, Ec2Error> {
    token
        .parse::<usize>()
        .map_err(|_| Ec2Error::invalid_value("NextToken", token))
}

pub fn page<T>(items: Vec<T>, max_results: usize, token: Option<&str>) -> Result<Page<T>, Ec2Error> {
    if max_results == 0 {
        return Err(Ec2Error::invalid_value("MaxResults", "0"));
    }
    let start = token.map(parse_token).transpose()?.unwrap_or(0);
    let end = start.saturating_add(max_results);
    let total = items.len();

    let next_token = (end < total).then(|| end.to_string());
    let items = items.into_iter().skip(start).take(max_results).collect();

    Ok(Page { items, next_token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_pages() {
        let items = vec![1, 2, 3, 4, 5];

        let first = page(items.clone(), 2, None).unwrap();
        assert_eq!(first.items, vec![1, 2]);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = page(items.clone(), 2, Some("2")).unwrap();
        assert_eq!(second.items, vec![3, 4]);
        assert_eq!(second.next_token.as_deref(), Some("4"));

        let last = page(items, 2, Some("4")).unwrap();
        assert_eq!(last.items, vec![5]);
        assert_eq!(last.next_token, None);
    }

    #[test]
    fn test_exact_fit_has_no_token() {
        let result = page(vec![1, 2, 3, 4], 2, Some("2")).unwrap();
        assert_eq!(result.items, vec![3, 4]);
        assert_eq!(result.next_token, None);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let result = page(vec![1, 2], 10, Some("50")).unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.next_token, None);
    }

    #[test]
    fn test_bad_token() {
        let err = page(vec![1], 1, Some("abc")).unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue");
        assert!(page(vec![1], 1, Some("-1")).is_err());
    }

    #[test]
    fn test_zero_page_size() {
        assert!(page(vec![1], 0, None).is_err());
    }
}
