use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use objadmin_log::{to_json_value, ApiEvent, AuditEvent, CallInfo, Canonical, ErrorEvent, Trace};
use objadmin_types::{ApiType, LogValue, Origin};
use proptest::prelude::*;

/// Splits a canonical string into top-level fragments.
fn fragments(encoded: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, b) in encoded.bytes().enumerate() {
        match b {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth -= 1,
            b',' if depth == 0 => {
                out.push(&encoded[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !encoded.is_empty() {
        out.push(&encoded[start..]);
    }
    out
}

fn keys(encoded: &str) -> Vec<String> {
    let mut keys: Vec<String> = fragments(encoded)
        .into_iter()
        .map(|f| f.split('=').next().unwrap_or_default().to_string())
        .collect();
    keys.sort();
    keys
}

fn json_keys<T: serde::Serialize>(value: &T) -> Vec<String> {
    match to_json_value(value).expect("should serialize") {
        serde_json::Value::Object(map) => map.keys().cloned().collect(),
        other => panic!("expected object, got {other}"),
    }
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z0-9/._-]{1,8}"]
}

fn string_map() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,4}", "[a-z0-9]{0,4}"), 0..5)
}

fn log_value() -> impl Strategy<Value = LogValue> {
    let leaf = prop_oneof![
        Just(LogValue::Null),
        any::<bool>().prop_map(LogValue::Bool),
        any::<i64>().prop_map(LogValue::Int),
        "[a-z]{0,6}".prop_map(LogValue::String),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(LogValue::List),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..3).prop_map(LogValue::Map),
        ]
    })
}

fn timestamp() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop::option::of((0i64..4_000_000_000, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        Utc.timestamp_opt(secs, nanos).single().expect("in range")
    }))
}

fn call_info() -> impl Strategy<Value = CallInfo> {
    (
        prop_oneof![Just(0i32), 100i32..600],
        prop_oneof![Just(0i64), any::<i64>()],
        text(),
        text(),
        string_map(),
        prop::collection::btree_map("[a-z]{1,4}", log_value(), 0..3),
    )
        .prop_map(|(status, rx, request_id, access_key, headers, claims)| CallInfo {
            http_status_code: status,
            input_bytes: rx,
            request_id,
            access_key,
            request_header: headers.into_iter().collect(),
            request_claims: claims,
            ..Default::default()
        })
}

fn api_event() -> impl Strategy<Value = ApiEvent> {
    (
        text(),
        timestamp(),
        text(),
        prop::option::of(prop::sample::select(Origin::ALL.to_vec())),
        prop::option::of(prop::sample::select(vec![
            ApiType::Object,
            ApiType::Bucket,
            ApiType::Admin,
            ApiType::Auth,
        ])),
        text(),
        text(),
        string_map(),
        prop::option::of(call_info()),
    )
        .prop_map(
            |(version, time, node, origin, api_type, name, bucket, tags, call_info)| ApiEvent {
                version,
                time,
                node,
                origin,
                api_type,
                name,
                bucket,
                tags: tags.into_iter().collect(),
                call_info,
                ..Default::default()
            },
        )
}

fn audit_event() -> impl Strategy<Value = AuditEvent> {
    (
        text(),
        timestamp(),
        text(),
        string_map(),
        prop::collection::btree_map("[a-z]{1,4}", log_value(), 0..3),
        text(),
    )
        .prop_map(|(version, time, api_name, tags, claims, parent_user)| AuditEvent {
            version,
            time,
            api_name,
            tags: tags.into_iter().collect(),
            request_claims: claims,
            parent_user,
            ..Default::default()
        })
}

fn error_event() -> impl Strategy<Value = ErrorEvent> {
    (
        text(),
        timestamp(),
        prop::option::of((
            prop::collection::vec("[a-z]{1,6}\\.go:[0-9]{1,3}", 0..4),
            prop::collection::btree_map("[a-z]{1,4}", log_value(), 0..3),
        )),
    )
        .prop_map(|(message, time, trace)| ErrorEvent {
            message,
            time,
            trace: trace.map(|(source, variables)| Trace { source, variables }),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn encoding_is_deterministic(event in api_event()) {
        prop_assert_eq!(event.canonical(), event.clone().canonical());
    }

    #[test]
    fn fragments_are_sorted(event in api_event()) {
        let encoded = event.canonical();
        let parts = fragments(&encoded);
        let mut sorted = parts.clone();
        sorted.sort_unstable();
        prop_assert_eq!(parts, sorted);
    }

    #[test]
    fn map_insertion_order_is_irrelevant(pairs in string_map()) {
        // Dedupe keys so both insertion orders describe the same map.
        let entries: Vec<(String, String)> =
            pairs.into_iter().collect::<BTreeMap<_, _>>().into_iter().collect();
        let forward: BTreeMap<String, String> = entries.iter().cloned().collect();
        let reversed: BTreeMap<String, String> = entries.iter().rev().cloned().collect();
        let a = AuditEvent { tags: forward, ..Default::default() };
        let b = AuditEvent { tags: reversed, ..Default::default() };
        prop_assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn empty_call_info_matches_absent(event in api_event()) {
        let absent = ApiEvent { call_info: None, ..event.clone() };
        let empty = ApiEvent { call_info: Some(CallInfo::default()), ..event };
        prop_assert_eq!(absent.canonical(), empty.canonical());
        prop_assert_eq!(json_keys(&absent), json_keys(&empty));
    }

    #[test]
    fn api_json_and_canonical_agree(event in api_event()) {
        prop_assert_eq!(keys(&event.canonical()), json_keys(&event));
    }

    #[test]
    fn audit_json_and_canonical_agree(event in audit_event()) {
        prop_assert_eq!(keys(&event.canonical()), json_keys(&event));
    }

    #[test]
    fn error_json_and_canonical_agree(event in error_event()) {
        prop_assert_eq!(keys(&event.canonical()), json_keys(&event));
    }

    #[test]
    fn non_empty_string_field_appears(name in "[a-z]{1,8}") {
        let event = ApiEvent { name: name.clone(), ..Default::default() };
        prop_assert_eq!(event.canonical(), format!("name={name}"));
    }

    #[test]
    fn json_round_trip_keeps_canonical(event in error_event()) {
        let json = objadmin_log::to_json(&event).expect("should serialize");
        let decoded: ErrorEvent = objadmin_log::from_json(&json).expect("should deserialize");
        prop_assert_eq!(decoded.canonical(), event.canonical());
    }
}
