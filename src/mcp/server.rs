/// MCP server that handles JSON-RPC communication
///
/// Requests arrive one per line; each response is written as a single line.
/// Logging goes to stderr through `tracing`, never to the output stream.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitFlowServer, ServerError};

/// MCP server that dispatches tool calls to the habit service
pub struct McpServer {
    habit_flow: HabitFlowServer,
}

impl McpServer {
    pub fn new(habit_flow: HabitFlowServer) -> Self {
        Self { habit_flow }
    }

    /// Run the MCP server over stdin/stdout
    pub async fn run(&self) -> Result<(), ServerError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve line-delimited JSON-RPC until the reader is exhausted
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut line = String::new();
        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request)
    }

    fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, Value::Null),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", other),
                None,
            ),
        };

        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => info!("MCP client initialized"),
            other => debug!("Ignoring notification: {}", other),
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "HabitFlow".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool {}", tool_params.name);

        let result = match self.call_tool(&tool_params.name, tool_params.arguments) {
            Ok(text) => ToolCallResult::success(text),
            Err(e) if e.is_recoverable() => ToolCallResult::error(e.to_string()),
            Err(e) => {
                error!("Tool {} failed: {}", tool_params.name, e);
                return JsonRpcResponse::error(
                    id,
                    tool_error_to_json_rpc_code(&e),
                    e.to_string(),
                    None,
                );
            }
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String, ToolError> {
        let service = self.habit_flow.service();

        match name {
            "habit_create" => {
                let response = tools::create_habit(service, parse_args(args)?)?;
                render(&response.message, &response)
            }
            "habit_get" => {
                let response = tools::get_habit(service, parse_args(args)?)?;
                render(&response.message, &response)
            }
            "habit_list" => {
                let response = tools::list_habits(service)?;
                render(&response.message, &response)
            }
            "habit_delete" => {
                let response = tools::delete_habit(service, parse_args(args)?)?;
                render(&response.message, &response)
            }
            "habit_toggle" => {
                let response = tools::toggle_habit(service, parse_args(args)?)?;
                render(&response.message, &response)
            }
            "habit_activity" => {
                let response = tools::get_activity(service)?;
                render(&response.message, &response)
            }
            "habit_progress" => {
                let response = tools::get_progress(service, parse_args(args)?)?;
                render(&response.message, &response)
            }
            other => Err(ToolError::InvalidArgument(format!("Unknown tool: {}", other))),
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::InvalidArgument(e.to_string()))
}

/// Human-readable summary line followed by the JSON payload
fn render<T: Serialize>(message: &str, payload: &T) -> Result<String, ToolError> {
    let body = serde_json::to_string_pretty(payload)?;
    Ok(format!("{}\n\n{}", message, body))
}

fn tool_definitions() -> Vec<ToolDefinition> {
    let habit_id_only = json!({
        "type": "object",
        "properties": {
            "habit_id": {"type": "string", "description": "ID of the habit"}
        },
        "required": ["habit_id"]
    });

    vec![
        ToolDefinition {
            name: "habit_create".to_string(),
            description: "Create a new habit to track".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Name of the habit"},
                    "description": {"type": "string", "description": "Optional description"},
                    "goal_days": {"type": "integer", "minimum": 1, "description": "Optional target number of days"}
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "habit_get".to_string(),
            description: "Get a single habit with its completed dates".to_string(),
            input_schema: habit_id_only.clone(),
        },
        ToolDefinition {
            name: "habit_list".to_string(),
            description: "List all habits in creation order".to_string(),
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        },
        ToolDefinition {
            name: "habit_delete".to_string(),
            description: "Permanently delete a habit and its history".to_string(),
            input_schema: habit_id_only,
        },
        ToolDefinition {
            name: "habit_toggle".to_string(),
            description: "Mark a habit done on a date, or unmark it if it was already done".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string", "description": "ID of the habit"},
                    "date": {"type": "string", "description": "Date (YYYY-MM-DD, optional - defaults to today)"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_activity".to_string(),
            description: "Number of habits completed on each date, across all habits".to_string(),
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        },
        ToolDefinition {
            name: "habit_progress".to_string(),
            description: "How many habits were completed on a given day out of all habits".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "date": {"type": "string", "description": "Date (YYYY-MM-DD, optional - defaults to today)"}
                },
                "required": []
            }),
        },
    ]
}
