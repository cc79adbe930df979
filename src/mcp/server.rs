//! MCP server over stdio.
//!
//! Reads one JSON-RPC request per line from stdin and writes one
//! response per line to stdout. All logging goes to stderr so it never
//! corrupts the protocol stream.

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::protocol::{self, Request, Response};
use super::tools;
use crate::config;
use crate::db::Database;

/// Server name advertised to clients during `initialize`.
pub const SERVER_NAME: &str = "dental-clinic-postgres";

pub struct McpServer {
    db: Database,
}

impl McpServer {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Serves until stdin closes.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        tracing::info!("MCP server running on stdio");
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut encoded =
                    serde_json::to_string(&response).map_err(std::io::Error::other)?;
                encoded.push('\n');
                stdout.write_all(encoded.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        tracing::info!("stdin closed, MCP server exiting");
        Ok(())
    }

    /// Handles one frame. Returns `None` for notifications.
    async fn handle_line(&self, line: &str) -> Option<Response> {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::failure(
                    Value::Null,
                    protocol::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        };

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification ignored");
            return None;
        };

        Some(self.handle_request(id, &request.method, request.params).await)
    }

    async fn handle_request(&self, id: Value, method: &str, params: Value) -> Response {
        match method {
            "initialize" => Response::success(id, initialize_result()),
            "ping" => Response::success(id, json!({})),
            "tools/list" => Response::success(id, json!({ "tools": tools::tool_catalog() })),
            "tools/call" => {
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let args = params.get("arguments").cloned().unwrap_or(Value::Null);
                tracing::debug!(tool = %name, "tool call");
                let result = tools::call_tool(&self.db, &name, args).await;
                match serde_json::to_value(&result) {
                    Ok(value) => Response::success(id, value),
                    Err(e) => Response::failure(
                        id,
                        protocol::INTERNAL_ERROR,
                        format!("Result serialization failed: {e}"),
                    ),
                }
            }
            other => Response::failure(
                id,
                protocol::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": protocol::PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": config::APP_VERSION,
        }
    })
}
