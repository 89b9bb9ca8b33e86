//! In-memory stand-in for the remote media resource.
//!
//! Implements [`HttpClient`] with json-server semantics (auto-assigned ids,
//! shallow PATCH merges, 404 for unknown ids) so gateway and service flows
//! can be exercised end to end without a network.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// How the fake assigns ids to created records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// 1, 2, 3, ...
    Sequential,
    /// Short random strings
    Random,
}

/// A failure to inject into the next request.
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedFailure {
    /// No response at all
    Transport,
    /// Respond with this status and body
    Status(u16, String),
    /// Respond 200 with this raw body
    Body(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct ServerState {
    items: Vec<Map<String, Value>>,
    next_id: u64,
    failures: Vec<InjectedFailure>,
    requests: Vec<RecordedRequest>,
}

pub struct InMemoryMediaServer {
    collection_url: String,
    id_strategy: IdStrategy,
    state: Mutex<ServerState>,
}

impl InMemoryMediaServer {
    /// Serve `{base_url}/{collection}`.
    pub fn new(base_url: &str, collection: &str) -> Self {
        Self {
            collection_url: format!("{}/{}", base_url.trim_end_matches('/'), collection),
            id_strategy: IdStrategy::Sequential,
            state: Mutex::new(ServerState {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Seed the collection. Non-object entries are ignored.
    pub fn with_records(self, records: Vec<Value>) -> Self {
        {
            let mut state = self.lock();
            for record in records {
                if let Value::Object(map) = record {
                    if let Some(n) = map.get("id").and_then(Value::as_u64) {
                        state.next_id = state.next_id.max(n + 1);
                    }
                    state.items.push(map);
                }
            }
        }
        self
    }

    /// Queue a failure for the next request; queued failures apply in order.
    pub fn fail_next(&self, failure: InjectedFailure) {
        self.lock().failures.push(failure);
    }

    pub fn items(&self) -> Vec<Value> {
        self.lock().items.iter().cloned().map(Value::Object).collect()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        // A panicking test thread must not hide the state from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn new_id(&self, state: &mut ServerState) -> Value {
        match self.id_strategy {
            IdStrategy::Sequential => {
                let id = state.next_id;
                state.next_id += 1;
                Value::from(id)
            }
            IdStrategy::Random => {
                let simple = uuid::Uuid::new_v4().simple().to_string();
                Value::from(&simple[..4])
            }
        }
    }

    fn route(&self, request: &HttpRequest, body: Option<Value>) -> HttpResponse {
        let Some(rest) = request.url.strip_prefix(&self.collection_url) else {
            return not_found();
        };
        let item_id = match rest {
            "" => None,
            path => match path.strip_prefix('/') {
                Some(id) if !id.is_empty() => Some(decode_segment(id)),
                _ => return not_found(),
            },
        };

        let mut state = self.lock();
        match (request.method, item_id) {
            (HttpMethod::Get, None) => {
                let items: Vec<Value> = state.items.iter().cloned().map(Value::Object).collect();
                json_response(200, &Value::Array(items))
            }
            (HttpMethod::Get, Some(id)) => match find(&state.items, &id) {
                Some(index) => json_response(200, &Value::Object(state.items[index].clone())),
                None => not_found(),
            },
            (HttpMethod::Post, None) => {
                let Some(Value::Object(mut item)) = body else {
                    return HttpResponse::new(400, "Expected a JSON object");
                };
                if !item.contains_key("id") {
                    let id = self.new_id(&mut state);
                    item.insert("id".to_string(), id);
                }
                state.items.push(item.clone());
                json_response(201, &Value::Object(item))
            }
            (HttpMethod::Patch, Some(id)) => {
                let Some(Value::Object(fields)) = body else {
                    return HttpResponse::new(400, "Expected a JSON object");
                };
                match find(&state.items, &id) {
                    Some(index) => {
                        let item = &mut state.items[index];
                        for (key, value) in fields {
                            if key != "id" {
                                item.insert(key, value);
                            }
                        }
                        json_response(200, &Value::Object(item.clone()))
                    }
                    None => not_found(),
                }
            }
            (HttpMethod::Delete, Some(id)) => match find(&state.items, &id) {
                Some(index) => {
                    state.items.remove(index);
                    json_response(200, &Value::Object(Map::new()))
                }
                None => not_found(),
            },
            _ => HttpResponse::new(405, "Method Not Allowed"),
        }
    }
}

#[async_trait]
impl HttpClient for InMemoryMediaServer {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let body = request
            .body
            .as_ref()
            .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok());

        let failure = {
            let mut state = self.lock();
            state.requests.push(RecordedRequest {
                method: request.method,
                url: request.url.clone(),
                body: body.clone(),
            });
            if state.failures.is_empty() {
                None
            } else {
                Some(state.failures.remove(0))
            }
        };

        match failure {
            Some(InjectedFailure::Transport) => Err(BridgeError::Network(
                "Connection failed: connection refused".to_string(),
            )),
            Some(InjectedFailure::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(InjectedFailure::Body(body)) => Ok(HttpResponse::new(200, body)),
            None => Ok(self.route(&request, body)),
        }
    }
}

fn find(items: &[Map<String, Value>], id: &str) -> Option<usize> {
    items.iter().position(|item| match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(other) => other.to_string() == id,
        None => false,
    })
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn json_response(status: u16, value: &Value) -> HttpResponse {
    HttpResponse::new(status, serde_json::to_vec(value).unwrap_or_default())
}

fn not_found() -> HttpResponse {
    HttpResponse::new(404, "Not Found")
}
