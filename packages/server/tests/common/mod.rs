//! In-process test server and WebSocket test client.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use sanmoku_server::{config::ServerConfig, ui::Server};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Server bound to an ephemeral port, stopped when dropped
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let router = Server::new(config.build_state()).router();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });
        TestServer { addr, handle }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Poll the HTTP API until the number of live rooms matches
    pub async fn wait_for_room_count(&self, expected: usize) {
        for _ in 0..100 {
            let rooms: Vec<Value> = reqwest::get(self.http_url("/api/rooms"))
                .await
                .expect("Failed to list rooms")
                .json()
                .await
                .expect("Invalid rooms response");
            if rooms.len() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("room count never reached {expected}");
    }

    pub async fn connect(&self) -> TestClient {
        TestClient::connect(&self.ws_url()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// WebSocket client speaking the `{"event", "data"}` framing
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Session issued on connect
    pub session_id: String,
    pub connection_id: String,
}

impl TestClient {
    /// Connect and wait for the `session` event
    pub async fn connect(url: &str) -> Self {
        let (ws, _) = connect_async(url)
            .await
            .expect("Failed to connect to test server");
        let mut client = TestClient {
            ws,
            session_id: String::new(),
            connection_id: String::new(),
        };
        let session = client.next_event("session").await;
        client.session_id = session["sessionId"]
            .as_str()
            .expect("sessionId missing")
            .to_string();
        client.connection_id = session["connectionId"]
            .as_str()
            .expect("connectionId missing")
            .to_string();
        client
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        self.send_raw(&json!({ "event": event, "data": data }).to_string())
            .await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next frame from the server, as `(event, data)`
    pub async fn recv(&mut self) -> (String, Value) {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                let value: Value = serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
                let event = value["event"].as_str().expect("event missing").to_string();
                return (event, value["data"].clone());
            }
        }
    }

    /// Skip frames until the named event arrives and return its data
    pub async fn next_event(&mut self, event: &str) -> Value {
        loop {
            let (name, data) = self.recv().await;
            if name == event {
                return data;
            }
        }
    }

    /// Skip frames until a `game-status-update` with the given status arrives
    pub async fn next_status(&mut self, status: &str) -> Value {
        loop {
            let data = self.next_event("game-status-update").await;
            if data["status"] == status {
                return data;
            }
        }
    }

    pub async fn create_room(&mut self, name: &str) -> String {
        self.send("create-room", json!({ "name": name })).await;
        let ack = self.next_event("created-room").await;
        ack["roomId"].as_str().expect("roomId missing").to_string()
    }

    pub async fn play(&mut self, room_id: &str, cell: &str) {
        self.send(
            "on-user-selection",
            json!({ "roomId": room_id, "cellId": cell, "playedBy": self.connection_id }),
        )
        .await;
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
