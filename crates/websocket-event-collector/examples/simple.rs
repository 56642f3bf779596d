//! Simple example demonstrating basic usage of websocket-event-collector
//!
//! This example shows how to:
//! - Stand up a small in-process websocket event server
//! - Build a batch with the Builder pattern and per-item parameters
//! - Run it in tolerant mode so a dead endpoint becomes an error record
//!
//! Each item gets one connect/listen/collect/disconnect cycle; the output is
//! one record per collected event plus one error record per failed item.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use websocket_event_collector::prelude::*;

#[tokio::main]
async fn main() -> Result<(), BatchFailure> {
    // A toy event server: after the subscribe frame, emit a few ticks.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                let _ = ws.next().await;
                for n in 1..=3 {
                    let frame = json!({"event": "tick", "data": {"n": n}}).to_string();
                    if ws.send(Message::Text(frame)).await.is_err() {
                        return;
                    }
                }
                while let Some(Ok(_)) = ws.next().await {}
            });
        }
    });

    println!("Event server listening on ws://{addr}\n");

    // Two items: one live endpoint, one that refuses connections.
    let records = BatchBuilder::new()
        .transport(Tungstenite::new().with_observation_window(Duration::from_millis(500)))
        .resolver(vec![
            ConnectionParams::new(format!("ws://{addr}"), "tick"),
            ConnectionParams::new("ws://127.0.0.1:1", "tick"),
        ])
        .items(vec![json!({"id": 0}), json!({"id": 1})])
        .tolerant()
        .build()
        .execute()
        .await?;

    println!("=== Output records ===");
    for record in &records {
        println!("{}", serde_json::to_string(record).unwrap());
    }

    Ok(())
}
