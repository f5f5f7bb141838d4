//! Property-based tests for the status taxonomy and header registry
//!
//! Uses proptest to verify invariants across many random inputs.

use courier_core::{classify, Header, Headers, MimeType, ResponseType, Status};
use proptest::prelude::*;

fn expected_bucket(code: u16) -> ResponseType {
    match code {
        100..=199 => ResponseType::Informational,
        200..=299 => ResponseType::Success,
        300..=399 => ResponseType::Redirection,
        400..=499 => ResponseType::ClientError,
        500..=599 => ResponseType::ServerError,
        _ => ResponseType::Unknown,
    }
}

proptest! {
    /// Property: every code in 100..=599 buckets by its hundreds digit
    #[test]
    fn registered_range_buckets_by_hundreds(code in 100u16..=599) {
        prop_assert_eq!(classify(code), expected_bucket(code));
        prop_assert_eq!(Status::new(code).is_success(), code / 100 == 2);
    }

    /// Property: codes outside 100..=599 are always Unknown
    #[test]
    fn out_of_range_is_unknown(code in prop_oneof![0u16..100, 600u16..=u16::MAX]) {
        prop_assert_eq!(classify(code), ResponseType::Unknown);
        prop_assert!(!Status::new(code).is_success());
    }

    /// Property: unrecognized MIME strings never fail, they map to Unknown
    #[test]
    fn vendor_mime_types_map_to_unknown(subtype in "vnd\\.[a-z]{1,12}\\+json") {
        let wire = format!("application/{}", subtype);
        prop_assert_eq!(MimeType::from_content_type(&wire), MimeType::Unknown);
    }

    /// Property: header keys stay unique regardless of spelling, last write wins
    #[test]
    fn header_names_are_unique_ignoring_case(
        writes in prop::collection::vec((prop::bool::ANY, "[a-z]{1,8}"), 1..20)
    ) {
        let mut headers = Headers::new();
        for (upper, value) in &writes {
            let name = if *upper { "X-TRACE-ID" } else { "x-trace-id" };
            headers.insert(name, value.clone());
        }
        prop_assert_eq!(headers.len(), 1);
        prop_assert_eq!(headers.get("X-Trace-Id"), writes.last().map(|(_, v)| v.as_str()));
    }

    /// Property: closed ranges render as bytes=lo-hi
    #[test]
    fn closed_range_rendering(lo in 0u64..1_000_000, len in 0u64..1_000_000) {
        let hi = lo + len;
        prop_assert_eq!(Header::RangeClosed(lo..=hi).value(), format!("bytes={}-{}", lo, hi));
    }
}
