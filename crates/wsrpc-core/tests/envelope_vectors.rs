//! Request envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Deserialize;

use wsrpc_core::protocol::Envelope;

use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "envelope_sum.json",
        "envelope_no_request.json",
        "envelope_missing_command.json",
        "envelope_extra_fields.json",
        "envelope_not_object.json",
        "envelope_truncated.json",
        "envelope_id_not_string.json",
    ];

    for f in files {
        let v = load(f);
        let res = Envelope::parse(v.frame.as_bytes());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.id, ex["id"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(env.command, ex["command"].as_str().unwrap(), "vector={}", v.description);

        let payload: serde_json::Value = serde_json::from_str(env.payload()).unwrap();
        assert_eq!(payload, ex["payload"], "vector={}", v.description);
    }
}

#[derive(Debug, PartialEq, Deserialize)]
struct SumRequest {
    a: i64,
    b: i64,
}

#[test]
fn decode_request_leaves_raw_payload_untouched() {
    let env = Envelope::parse(br#"{"id":"1","command":"sum","request":{"a":2, "b":3}}"#).unwrap();

    let req: SumRequest = env.decode_request().unwrap();
    assert_eq!(req, SumRequest { a: 2, b: 3 });

    // decoding again yields the same value; whitespace in the raw text survives
    assert_eq!(env.payload(), r#"{"a":2, "b":3}"#);
    let again: SumRequest = env.decode_request().unwrap();
    assert_eq!(again, req);
}

#[test]
fn decode_request_schema_mismatch() {
    let env = Envelope::parse(br#"{"id":"1","command":"sum","request":{"a":"two"}}"#).unwrap();

    let err = env.decode_request::<SumRequest>().expect_err("must fail");
    assert_eq!(err.code().as_str(), "DECODE");
    assert!(!err.is_terminal());
}

#[test]
fn absent_payload_decodes_as_null() {
    let env = Envelope::parse(br#"{"id":"1","command":"ping"}"#).unwrap();

    env.decode_request::<()>().unwrap();
    assert_eq!(env.decode_request::<Option<i64>>().unwrap(), None);
    assert!(env.decode_request::<SumRequest>().is_err());
}
