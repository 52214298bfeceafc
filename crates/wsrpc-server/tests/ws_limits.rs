//! Frame limit enforced by the websocket layer of a running server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use wsrpc_server::{app_state::AppState, config, router};

const LIMIT: usize = 128;

async fn start_server() -> SocketAddr {
    let cfg = config::load_from_str(&format!(
        "version: 1\nserver:\n  listen: \"127.0.0.1:0\"\n  max_frame_bytes: {LIMIT}\n"
    ))
    .unwrap();
    let state = AppState::new(cfg, CancellationToken::new()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router::build_router(state)).await.unwrap();
    });
    addr
}

async fn handshake(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"GET /ws HTTP/1.1\r\n\
              Host: localhost\r\n\
              Connection: Upgrade\r\n\
              Upgrade: websocket\r\n\
              Sec-WebSocket-Version: 13\r\n\
              Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n",
        )
        .await
        .unwrap();

    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        stream.read_exact(&mut byte).await.unwrap();
        head.push(byte[0]);
    }
    let head = String::from_utf8(head).unwrap();
    assert!(head.starts_with("HTTP/1.1 101"), "{head}");
    stream
}

/// Masked client text frame (zero mask key).
fn text_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0x81];
    if payload.len() < 126 {
        out.push(0x80 | payload.len() as u8);
    } else {
        out.push(0x80 | 126);
        out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    }
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(payload);
    out
}

#[tokio::test]
async fn oversized_message_ends_the_session() {
    let addr = start_server().await;
    let mut stream = handshake(addr).await;

    // within the limit: answered normally
    let sum = br#"{"id":"1","command":"sum","request":{"a":2,"b":3}}"#;
    stream.write_all(&text_frame(sum)).await.unwrap();

    let mut header = [0u8; 2];
    stream.read_exact(&mut header).await.unwrap();
    assert_eq!(header[0], 0x81);
    let mut body = vec![0u8; usize::from(header[1] & 0x7f)];
    stream.read_exact(&mut body).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["response"]["sum"], 5);

    // over the limit: the websocket layer refuses it and the server hangs up
    let pad = "x".repeat(LIMIT * 4);
    let big = format!(r#"{{"id":"2","command":"negate","request":1,"pad":"{pad}"}}"#);
    stream.write_all(&text_frame(big.as_bytes())).await.unwrap();

    let mut rest = Vec::new();
    let read = tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut rest))
        .await
        .expect("server kept the connection open");
    // a reset is as good as an orderly close here
    if let Ok(n) = read {
        assert!(!String::from_utf8_lossy(&rest[..n]).contains(r#""id":"2""#));
    }
}
