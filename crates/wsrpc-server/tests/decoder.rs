//! Decoder resolution tests over the in-memory transport.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use bytes::Bytes;

use wsrpc_core::error::WsRpcError;
use wsrpc_core::protocol::Frame;
use wsrpc_server::dispatch::{Command, Decoder, Handler, Palette};
use wsrpc_server::services::arith::{self, ArithCommand, ArithService, SumRequest, SumResponse};
use wsrpc_server::transport::FrameSink;
use wsrpc_server::ConnLimits;

use harness::{assert_silent, connect, connect_with, recv_json, recv_text, send};

fn arith_decoder(conn: Arc<wsrpc_server::Connection>) -> Decoder<ArithCommand> {
    Decoder::new(conn, Arc::new(arith::palette().unwrap()))
}

#[tokio::test]
async fn sum_scenario() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    send(&mut client, r#"{"id":"1","command":"sum","request":{"a":2,"b":3}}"#).await;

    let ArithCommand::Sum(cmd) = decoder.decode_one().await.unwrap() else {
        panic!("expected sum");
    };
    assert_eq!(cmd.id(), "1");
    assert_eq!(cmd.name(), "sum");
    assert_eq!(cmd.request, SumRequest { a: 2, b: 3 });

    let sum = cmd.request.a + cmd.request.b;
    cmd.ok(SumResponse { sum }).await.unwrap();

    assert_eq!(
        recv_text(&mut client).await,
        r#"{"id":"1","command":"sum","ok":true,"response":{"sum":5}}"#
    );
}

#[tokio::test]
async fn unknown_command_replies_once_and_keeps_connection() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    send(&mut client, r#"{"id":"2","command":"mul","request":{}}"#).await;

    let err = decoder.decode_one().await.expect_err("must fail");
    assert_eq!(err, WsRpcError::UnknownCommand("mul".into()));
    assert!(!err.is_terminal());
    assert_eq!(
        recv_text(&mut client).await,
        r#"{"id":"2","command":"mul","ok":false,"error":"unknown command"}"#
    );
    // exactly one reply
    assert_silent(&mut client, 100).await;

    // the next frame decodes normally and the next reply is its own
    send(&mut client, r#"{"id":"3","command":"negate","request":7}"#).await;
    let ArithCommand::Negate(cmd) = decoder.decode_one().await.unwrap() else {
        panic!("expected negate");
    };
    cmd.ok(-cmd.request).await.unwrap();

    let v = recv_json(&mut client).await;
    assert_eq!(v["id"], "3");
    assert_eq!(v["response"], -7);
}

#[tokio::test]
async fn payload_decode_error_sends_no_reply() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    send(&mut client, r#"{"id":"3","command":"sum","request":{"a":"two","b":3}}"#).await;

    let err = decoder.decode_one().await.expect_err("must fail");
    assert!(matches!(err, WsRpcError::Decode { ref command, .. } if command == "sum"));
    assert!(!err.is_terminal());

    send(&mut client, r#"{"id":"4","command":"negate","request":1}"#).await;
    let cmd = decoder.decode_one().await.unwrap();
    ArithService::new().handle(cmd).await.unwrap();

    // first frame the client sees answers id 4: nothing was sent for id 3
    let v = recv_json(&mut client).await;
    assert_eq!(v["id"], "4");
    assert_eq!(v["ok"], true);
}

#[tokio::test]
async fn malformed_envelope_is_not_terminal() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    send(&mut client, "not json at all").await;
    let err = decoder.decode_one().await.expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_ENVELOPE");
    assert!(!err.is_terminal());

    send(&mut client, r#"{"id":"5","command":"negate","request":5}"#).await;
    assert!(matches!(decoder.decode_one().await.unwrap(), ArithCommand::Negate(_)));
}

#[tokio::test]
async fn missing_command_gets_unknown_reply() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    send(&mut client, r#"{"id":"6"}"#).await;
    let err = decoder.decode_one().await.expect_err("must fail");
    assert_eq!(err, WsRpcError::UnknownCommand(String::new()));

    let v = recv_json(&mut client).await;
    assert_eq!(v["id"], "6");
    assert_eq!(v["command"], "");
    assert_eq!(v["error"], "unknown command");
}

#[tokio::test]
async fn oversized_frame_is_rejected() {
    let (conn, mut client) = connect_with(ConnLimits { max_frame_bytes: 64 });
    let decoder = arith_decoder(conn);

    let big = format!(r#"{{"id":"7","command":"negate","request":1,"pad":"{}"}}"#, "x".repeat(100));
    send(&mut client, &big).await;

    let err = decoder.decode_one().await.expect_err("must fail");
    assert!(matches!(err, WsRpcError::FrameTooLarge { max: 64, .. }));
    assert!(!err.is_terminal());
}

#[tokio::test]
async fn control_frames_are_skipped_and_binary_is_accepted() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    client.sink.send_frame(Frame::Ping(Bytes::from_static(b"hi"))).await.unwrap();
    client.sink.send_frame(Frame::Pong(Bytes::new())).await.unwrap();
    client
        .sink
        .send_frame(Frame::Binary(Bytes::from_static(br#"{"id":"8","command":"negate","request":2}"#)))
        .await
        .unwrap();

    let ArithCommand::Negate(cmd) = decoder.decode_one().await.unwrap() else {
        panic!("expected negate");
    };
    assert_eq!(cmd.id(), "8");
    assert_eq!(cmd.request, 2);
}

#[tokio::test]
async fn close_frame_is_end_of_stream() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    client.sink.close().await.unwrap();

    let err = decoder.decode_one().await.expect_err("must fail");
    assert_eq!(err, WsRpcError::EndOfStream);
    assert!(err.is_terminal());
}

#[tokio::test]
async fn dropped_peer_is_end_of_stream() {
    let (conn, client) = connect();
    let decoder = arith_decoder(conn);

    drop(client);

    assert_eq!(decoder.decode_one().await.expect_err("must fail"), WsRpcError::EndOfStream);
}

#[derive(Debug)]
enum Misc {
    Ping(Command<(), String>),
    Maybe(Command<Option<u8>, bool>),
}

#[tokio::test]
async fn absent_payload_fits_unit_and_option_requests() {
    let (conn, mut client) = connect();
    let palette = Palette::new()
        .register("ping", Misc::Ping)
        .unwrap()
        .register("maybe", Misc::Maybe)
        .unwrap();
    let decoder = Decoder::new(conn, Arc::new(palette));

    send(&mut client, r#"{"id":"a","command":"ping"}"#).await;
    let Misc::Ping(cmd) = decoder.decode_one().await.unwrap() else {
        panic!("expected ping");
    };
    cmd.ok("pong".to_string()).await.unwrap();
    assert_eq!(
        recv_text(&mut client).await,
        r#"{"id":"a","command":"ping","ok":true,"response":"pong"}"#
    );

    send(&mut client, r#"{"id":"b","command":"maybe","request":null}"#).await;
    let Misc::Maybe(cmd) = decoder.decode_one().await.unwrap() else {
        panic!("expected maybe");
    };
    assert_eq!(cmd.request, None);
    cmd.err(format!("nothing in {}", cmd.id())).await.unwrap();
    assert_eq!(
        recv_text(&mut client).await,
        r#"{"id":"b","command":"maybe","ok":false,"error":"nothing in b"}"#
    );
}

#[tokio::test]
async fn concurrent_decode_calls_split_at_frame_boundaries() {
    let (conn, mut client) = connect();
    let decoder = arith_decoder(conn);

    for i in 0..8 {
        send(&mut client, &format!(r#"{{"id":"{i}","command":"negate","request":{i}}}"#)).await;
    }

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let decoder = decoder.clone();
        tasks.push(tokio::spawn(async move { decoder.decode_one().await.unwrap() }));
    }

    let mut ids = Vec::new();
    for t in tasks {
        let ArithCommand::Negate(cmd) = t.await.unwrap() else {
            panic!("expected negate");
        };
        assert_eq!(cmd.id(), cmd.request.to_string());
        ids.push(cmd.request);
    }
    ids.sort_unstable();
    assert_eq!(ids, (0..8).collect::<Vec<i64>>());
}
