//! Shared fixtures: a canned HTTP responder and in-memory store/sink.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use coinpoll::error::{AppError, Result};
use coinpoll::models::{ApiConfig, StoreRecord};
use coinpoll::pipeline::Pipeline;
use coinpoll::services::{ListingsFetcher, LogSink, SinkLevel};
use coinpoll::storage::{RecordStore, SnapshotStore};

/// One canned HTTP reply.
#[derive(Clone)]
pub enum Reply {
    Json(u16, String),
    Hang,
}

/// Minimal HTTP/1.1 responder standing in for the listings API.
///
/// Replies are served in order; the last one repeats once the queue is
/// drained.
pub struct MockApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::new(Mutex::new(VecDeque::from(replies)));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            let mut last: Option<Reply> = None;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };

                let head = read_head(&mut socket).await;
                seen.lock().unwrap().push(head);

                let reply = {
                    let mut queue = queue.lock().unwrap();
                    queue.pop_front().or_else(|| last.clone())
                };
                last = reply.clone();

                match reply {
                    Some(Reply::Json(status, body)) => {
                        let response = format!(
                            "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                            reason(status),
                            body.len()
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    Some(Reply::Hang) => {
                        tokio::spawn(async move {
                            tokio::time::sleep(Duration::from_secs(30)).await;
                            drop(socket);
                        });
                    }
                    None => {
                        let _ = socket.shutdown().await;
                    }
                }
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/v1/cryptocurrency/listings/latest", self.addr)
    }

    /// Request heads received so far, lowercased.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&buf).to_lowercase(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    // Drain any request body so closing the socket does not reset the reply.
    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + body_len {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    head
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// Build a listings body in the API's wire shape.
pub fn listings_body(entries: &[(u32, &str, &str, f64)]) -> String {
    let data: Vec<serde_json::Value> = entries
        .iter()
        .map(|(rank, name, symbol, price)| {
            serde_json::json!({
                "id": rank,
                "name": name,
                "symbol": symbol,
                "cmc_rank": rank,
                "quote": {
                    "USD": {
                        "price": price,
                        "market_cap": price * 1000.0,
                        "market_cap_dominance": 1.5
                    }
                }
            })
        })
        .collect();
    serde_json::json!({
        "status": { "error_code": 0, "error_message": null },
        "data": data
    })
    .to_string()
}

/// `count` synthetic listings ranked 1..=count.
pub fn many_listings(count: u32) -> String {
    let names: Vec<(u32, String, String, f64)> = (1..=count)
        .map(|i| (i, format!("Coin {i}"), format!("C{i}"), i as f64 * 1.25))
        .collect();
    let borrowed: Vec<(u32, &str, &str, f64)> = names
        .iter()
        .map(|(r, n, s, p)| (*r, n.as_str(), s.as_str(), *p))
        .collect();
    listings_body(&borrowed)
}

/// Sink that records every message.
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<(SinkLevel, String)>>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(SinkLevel, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count(&self, level: SinkLevel) -> usize {
        self.messages().iter().filter(|(l, _)| *l == level).count()
    }
}

#[async_trait]
impl LogSink for RecordingSink {
    async fn send(&self, level: SinkLevel, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push((level, message.to_string()));
        Ok(())
    }
}

/// In-memory table keyed by symbol. Puts are unconditional overwrites.
#[derive(Clone, Default)]
pub struct MemoryStore {
    attempts: Arc<Mutex<Vec<u32>>>,
    items: Arc<Mutex<HashMap<String, StoreRecord>>>,
    fail_ranks: Arc<HashSet<u32>>,
}

impl MemoryStore {
    pub fn failing_on(ranks: &[u32]) -> Self {
        Self {
            fail_ranks: Arc::new(ranks.iter().copied().collect()),
            ..Self::default()
        }
    }

    /// Ranks attempted, in call order.
    pub fn attempts(&self) -> Vec<u32> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn item(&self, symbol: &str) -> Option<StoreRecord> {
        self.items.lock().unwrap().get(symbol).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert(&self, record: &StoreRecord) -> Result<()> {
        self.attempts.lock().unwrap().push(record.coin_rank);
        if self.fail_ranks.contains(&record.coin_rank) {
            return Err(AppError::store(record.label(), "ProvisionedThroughputExceeded"));
        }
        self.items
            .lock()
            .unwrap()
            .insert(record.coin_symbol.clone(), record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://coins".to_string()
    }
}

pub fn api_config(endpoint: String, timeout_secs: u64) -> ApiConfig {
    ApiConfig {
        endpoint,
        timeout_secs,
        ..ApiConfig::default()
    }
}

pub fn fetcher(config: &ApiConfig, api_key: Option<&str>) -> ListingsFetcher {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .unwrap();
    ListingsFetcher::new(client, config, api_key.map(str::to_string))
}

/// Pipeline against the mock API with in-memory store and sink.
pub fn pipeline(
    api: &MockApi,
    snapshot: &Path,
    store: Option<&MemoryStore>,
    sink: &RecordingSink,
) -> Pipeline {
    let config = api_config(api.endpoint(), 2);
    let pipeline = Pipeline::new(
        fetcher(&config, Some("test-key")),
        SnapshotStore::new(snapshot),
        Box::new(sink.clone()),
    );
    match store {
        Some(store) => pipeline.with_store(Box::new(store.clone())),
        None => pipeline,
    }
}
