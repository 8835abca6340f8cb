/*
 * header_proptest.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Intestazioni, an HTTP client library.
 *
 * Intestazioni is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Intestazioni is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Intestazioni.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use intestazioni_core::headers::GeneralHeaders;
use intestazioni_core::headers::date::{format_http_date, parse_http_date};
use intestazioni_core::headers::rules::{is_token, token_length};
use intestazioni_core::headers::values::{
    Authentication, CacheControl, ContentDisposition, ContentRange, EntityTag, MediaType, MediaTypeWithQuality,
    NameValue, NameValueWithParameters, Product, ProductInfo, Range, RangeCondition, RangeItem, RetryCondition,
    StringWithQuality, TransferCoding, TransferCodingWithQuality, Via, Warning,
};
use intestazioni_core::RequestHeaders;

fn token_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9!#$%&'*+.^_`|~-]{1,16}").expect("token regex")
}

/// Qualities in thousandths, plus negative zero.
fn quality_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(-0.0), (0u32..=1000).prop_map(|t| f64::from(t) / 1000.0)]
}

/// Any instant up to 2100, with sub-second noise.
fn date_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000).prop_map(|(s, n)| Utc.timestamp_opt(s, n).unwrap())
}

fn host_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,8}(\\.[a-z]{1,8}){0,2}(:[0-9]{1,4})?").expect("host regex")
}

fn comment_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("\\([a-z]{1,6}( [a-z]{1,6}){0,2}\\)").expect("comment regex")
}

fn quoted_text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("\"[a-z ]{0,10}\"").expect("quoted regex")
}

/// Token or quoted-string parameter values.
fn parameter_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![token_strategy(), quoted_text_strategy()]
}

fn parameters_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-pr-z]{1,6}", parameter_value_strategy()), 0..3)
}

fn with_parameters(target: &mut Vec<NameValue>, parameters: &[(String, String)]) {
    for (name, value) in parameters {
        if !target.iter().any(|p| p.name().eq_ignore_ascii_case(name)) {
            target.push(NameValue::with_value(name.as_str(), value.as_str()).unwrap());
        }
    }
}

fn range_item_strategy() -> impl Strategy<Value = RangeItem> {
    prop_oneof![
        (0i64..1_000_000, 0i64..1_000_000).prop_map(|(from, span)| RangeItem::new(Some(from), Some(from + span)).unwrap()),
        (0i64..1_000_000).prop_map(|from| RangeItem::new(Some(from), None).unwrap()),
        (1i64..1_000_000).prop_map(|suffix| RangeItem::new(None, Some(suffix)).unwrap()),
    ]
}

fn file_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[A-Za-z0-9][A-Za-z0-9 ._-]{0,10}").expect("ascii name regex"),
        proptest::string::string_regex("[a-zà-ÿ][a-zà-ÿ ]{0,8}").expect("latin name regex"),
        proptest::string::string_regex("[a-z]{1,4}[日本語]{1,3}").expect("cjk name regex"),
    ]
}

fn wire_text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~]{0,40}").expect("text regex")
}

proptest! {
    #[test]
    fn tokens_are_scanned_whole(token in token_strategy()) {
        prop_assert!(is_token(&token));
        prop_assert_eq!(token_length(&token, 0), token.len());
        let padded = format!("{token} rest");
        prop_assert_eq!(token_length(&padded, 0), token.len());
    }

    #[test]
    fn token_lists_ignore_empty_elements(
        tokens in prop::collection::vec(token_strategy(), 1..6),
        separator in prop::sample::select(vec![",", ", ", " ,", ",,", ", , ", " , ,"]),
    ) {
        let mut headers = RequestHeaders::new();
        headers.add("Trailer", &tokens.join(separator)).unwrap();
        prop_assert_eq!(headers.trailer().values(), tokens);
    }

    #[test]
    fn quality_values_round_trip(value in token_strategy(), quality in quality_strategy()) {
        let original = StringWithQuality::with_quality(value, quality).unwrap();
        let reparsed = StringWithQuality::parse(&original.to_string()).unwrap();
        prop_assert_eq!(reparsed, original);
    }

    #[test]
    fn entity_tags_round_trip(tag in "[A-Za-z0-9]{0,12}", weak in any::<bool>()) {
        let original = EntityTag::with_weakness(format!("\"{tag}\""), weak).unwrap();
        prop_assert_eq!(EntityTag::parse(&original.to_string()).unwrap(), original);
    }

    #[test]
    fn content_ranges_round_trip(from in 0i64..100_000, span in 0i64..100_000, extra in 1i64..100_000) {
        let to = from + span;
        let full = ContentRange::new(from, to, to + extra).unwrap();
        prop_assert_eq!(ContentRange::parse(&full.to_string()).unwrap(), full);
        let open = ContentRange::with_range(from, to).unwrap();
        prop_assert_eq!(ContentRange::parse(&open.to_string()).unwrap(), open);
    }

    #[test]
    fn http_dates_round_trip(seconds in 0i64..4_102_444_800) {
        let date = Utc.timestamp_opt(seconds, 0).unwrap();
        prop_assert_eq!(parse_http_date(&format_http_date(&date)), Some(date));
    }

    #[test]
    fn lazy_parsing_is_stable(
        name in prop::sample::select(vec!["Accept", "Date", "Host", "Range", "Cache-Control", "X-Custom"]),
        text in wire_text_strategy(),
    ) {
        let mut headers = RequestHeaders::new();
        prop_assert!(headers.try_add_without_validation(name, &text));
        let first = headers.try_get_values(name);
        let second = headers.try_get_values(name);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn media_types_round_trip(
        kind in "[a-z]{1,8}/[a-z0-9.+-]{1,12}",
        charset in prop::option::of("[a-z0-9-]{1,10}"),
        parameters in parameters_strategy(),
        quality in prop::option::of(quality_strategy()),
    ) {
        let mut media = MediaType::new(kind).unwrap();
        media.set_charset(charset.as_deref()).unwrap();
        with_parameters(media.parameters_mut(), &parameters);
        prop_assert_eq!(MediaType::parse(&media.to_string()).unwrap(), media.clone());

        let mut weighted = MediaTypeWithQuality::from(media);
        weighted.set_quality(quality).unwrap();
        let reparsed = MediaTypeWithQuality::parse(&weighted.to_string()).unwrap();
        prop_assert_eq!(reparsed.quality(), quality.map(|q| q + 0.0));
        prop_assert_eq!(reparsed, weighted);
    }

    #[test]
    fn name_values_round_trip(
        name in token_strategy(),
        value in prop::option::of(parameter_value_strategy()),
        parameters in parameters_strategy(),
    ) {
        let single = match &value {
            Some(v) => NameValue::with_value(name.as_str(), v.as_str()).unwrap(),
            None => NameValue::new(name.as_str()).unwrap(),
        };
        prop_assert_eq!(NameValue::parse(&single.to_string()).unwrap(), single);

        let mut full = match &value {
            Some(v) => NameValueWithParameters::with_value(name.as_str(), v.as_str()).unwrap(),
            None => NameValueWithParameters::new(name.as_str()).unwrap(),
        };
        with_parameters(full.parameters_mut(), &parameters);
        prop_assert_eq!(NameValueWithParameters::parse(&full.to_string()).unwrap(), full);
    }

    #[test]
    fn transfer_codings_round_trip(
        value in token_strategy(),
        parameters in parameters_strategy(),
        quality in quality_strategy(),
    ) {
        let mut coding = TransferCoding::new(value.as_str()).unwrap();
        with_parameters(coding.parameters_mut(), &parameters);
        prop_assert_eq!(TransferCoding::parse(&coding.to_string()).unwrap(), coding);

        let weighted = TransferCodingWithQuality::with_quality(value, quality).unwrap();
        let reparsed = TransferCodingWithQuality::parse(&weighted.to_string()).unwrap();
        prop_assert_eq!(reparsed.quality(), Some(quality + 0.0));
        prop_assert_eq!(reparsed, weighted);
    }

    #[test]
    fn products_round_trip(
        name in token_strategy(),
        version in prop::option::of(token_strategy()),
        comment in comment_strategy(),
    ) {
        let product = Product::with_version(name.as_str(), version.clone().unwrap_or_default()).unwrap();
        prop_assert_eq!(Product::parse(&product.to_string()).unwrap(), product.clone());

        let info = ProductInfo::from(product);
        prop_assert_eq!(ProductInfo::parse(&info.to_string()).unwrap(), info);
        let remark = ProductInfo::comment(comment).unwrap();
        prop_assert_eq!(ProductInfo::parse(&remark.to_string()).unwrap(), remark);
    }

    #[test]
    fn vias_round_trip(
        protocol_name in prop::option::of("[A-Z]{1,6}"),
        protocol_version in "[0-9]\\.[0-9]",
        received_by in host_strategy(),
        comment in prop::option::of(comment_strategy()),
    ) {
        let via = Via::with_details(protocol_version, received_by, protocol_name.as_deref(), comment.as_deref()).unwrap();
        prop_assert_eq!(Via::parse(&via.to_string()).unwrap(), via);
    }

    #[test]
    fn warnings_round_trip(
        code in 0i32..=999,
        agent in host_strategy(),
        text in quoted_text_strategy(),
        date in prop::option::of(date_strategy()),
    ) {
        let warning = match date {
            Some(d) => Warning::with_date(code, agent, text, d).unwrap(),
            None => Warning::new(code, agent, text).unwrap(),
        };
        prop_assert_eq!(Warning::parse(&warning.to_string()).unwrap(), warning);
    }

    #[test]
    fn ranges_round_trip(
        unit in "[a-z]{1,8}",
        items in prop::collection::vec(range_item_strategy(), 1..5),
    ) {
        let mut range = Range::default();
        range.set_unit(unit).unwrap();
        range.ranges_mut().extend(items);
        prop_assert_eq!(Range::parse(&range.to_string()).unwrap(), range);
    }

    #[test]
    fn conditions_round_trip(
        tag in "[A-Za-z0-9]{0,12}",
        weak in any::<bool>(),
        date in date_strategy(),
        delta in 0u64..=i32::MAX as u64,
    ) {
        let by_tag = RangeCondition::from(EntityTag::with_weakness(format!("\"{tag}\""), weak).unwrap());
        prop_assert_eq!(RangeCondition::parse(&by_tag.to_string()).unwrap(), by_tag);
        let by_date = RangeCondition::from(date);
        prop_assert_eq!(RangeCondition::parse(&by_date.to_string()).unwrap(), by_date);

        let after = RetryCondition::from_delta(Duration::from_secs(delta)).unwrap();
        prop_assert_eq!(RetryCondition::parse(&after.to_string()).unwrap(), after);
        let at = RetryCondition::from_date(date);
        prop_assert_eq!(RetryCondition::parse(&at.to_string()).unwrap(), at);
    }

    #[test]
    fn authentications_round_trip(
        scheme in token_strategy(),
        parameter in prop::option::of("[A-Za-z0-9._~+/-]{1,24}={0,2}"),
    ) {
        let auth = match parameter {
            Some(p) => Authentication::with_parameter(scheme, p).unwrap(),
            None => Authentication::new(scheme).unwrap(),
        };
        prop_assert_eq!(Authentication::parse(&auth.to_string()).unwrap(), auth);
    }

    #[test]
    fn cache_controls_round_trip(
        flags in prop::array::uniform6(any::<bool>()),
        no_cache in any::<bool>(),
        no_cache_headers in prop::collection::vec(token_strategy(), 0..3),
        private_headers in prop::collection::vec(token_strategy(), 0..3),
        max_stale in any::<bool>(),
        seconds in prop::array::uniform4(prop::option::of(0u64..=i32::MAX as u64)),
    ) {
        let mut cc = CacheControl::new();
        cc.set_no_store(flags[0]);
        cc.set_no_transform(flags[1]);
        cc.set_only_if_cached(flags[2]);
        cc.set_public(flags[3]);
        cc.set_must_revalidate(flags[4]);
        cc.set_proxy_revalidate(flags[5]);
        cc.set_no_cache(no_cache);
        for header in no_cache_headers {
            cc.add_no_cache_header(header).unwrap();
        }
        for header in private_headers {
            cc.add_private_header(header).unwrap();
        }
        let [max_age, shared_max_age, stale_limit, min_fresh] = seconds.map(|s| s.map(Duration::from_secs));
        cc.set_max_age(max_age);
        cc.set_shared_max_age(shared_max_age);
        cc.set_max_stale(max_stale);
        cc.set_max_stale_limit(stale_limit);
        cc.set_min_fresh(min_fresh);

        let rendered = cc.to_string();
        prop_assume!(!rendered.is_empty());
        prop_assert_eq!(CacheControl::parse(&rendered).unwrap(), cc);
    }

    #[test]
    fn content_dispositions_round_trip(
        kind in prop::sample::select(vec!["attachment", "inline", "form-data"]),
        name in prop::option::of("[a-z]{1,8}"),
        file_name in prop::option::of(file_name_strategy()),
        size in prop::option::of(0i64..1_000_000_000_000),
        created in prop::option::of(date_strategy()),
    ) {
        let mut cd = ContentDisposition::new(kind).unwrap();
        cd.set_name(name.as_deref()).unwrap();
        cd.set_file_name(file_name.as_deref()).unwrap();
        cd.set_file_name_star(file_name.as_deref()).unwrap();
        cd.set_size(size).unwrap();
        cd.set_creation_date(created);

        let reparsed = ContentDisposition::parse(&cd.to_string()).unwrap();
        prop_assert_eq!(reparsed.file_name_star(), file_name.clone());
        if let Some(f) = file_name.filter(|f| !f.is_ascii()) {
            prop_assert_eq!(reparsed.file_name(), Some(f));
        }
        prop_assert_eq!(reparsed.creation_date(), created.map(|d| Utc.timestamp_opt(d.timestamp(), 0).unwrap()));
        prop_assert_eq!(reparsed, cd);
    }
}
