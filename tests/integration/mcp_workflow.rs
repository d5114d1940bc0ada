/// Drives the MCP server through a full session over in-memory byte streams
use habitflow::mcp::protocol::error_codes;
use habitflow::*;
use serde_json::{json, Value};

fn request(id: u64, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({"name": name, "arguments": arguments}))
}

/// Feed `lines` to a fresh in-memory server and collect the responses
async fn run_session(server: &McpServer, lines: &[String]) -> Vec<Value> {
    let input = lines.join("\n") + "\n";
    let mut output: Vec<u8> = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// The JSON payload that follows the summary line of a tool result
fn payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let (_, body) = text.split_once("\n\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_handshake() {
    let server = McpServer::new(HabitFlowServer::in_memory());
    let responses = run_session(
        &server,
        &[
            request(1, "initialize", json!({"protocolVersion": "2024-11-05", "capabilities": {}})),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            request(2, "tools/list", json!({})),
        ],
    )
    .await;

    // The notification gets no response
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "HabitFlow");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_create_toggle_delete_session() {
    let server = McpServer::new(HabitFlowServer::in_memory());

    let created = run_session(
        &server,
        &[tool_call(1, "habit_create", json!({"name": "Meditation", "goalDays": 30}))],
    )
    .await;
    let habit = payload(&created[0])["habit"].clone();
    let habit_id = habit["id"].as_str().unwrap().to_string();

    assert_eq!(created[0]["result"]["isError"], false);
    assert_eq!(habit["goalDays"], 30);
    assert_eq!(habit["completedDates"], json!([]));
    assert!(habit["createdAt"].is_string());

    let responses = run_session(
        &server,
        &[
            tool_call(2, "habit_toggle", json!({"habit_id": habit_id, "date": "2024-01-01"})),
            tool_call(3, "habit_activity", json!({})),
            tool_call(4, "habit_toggle", json!({"habit_id": habit_id, "date": "2024-01-01"})),
            tool_call(5, "habit_delete", json!({"habit_id": habit_id})),
            tool_call(6, "habit_get", json!({"habit_id": habit_id})),
        ],
    )
    .await;

    let toggled_on = payload(&responses[0]);
    assert_eq!(toggled_on["completed"], true);
    assert_eq!(toggled_on["habit"]["completedDates"], json!(["2024-01-01"]));

    assert_eq!(payload(&responses[1]), json!({"activity": {"2024-01-01": 1}}));

    let toggled_off = payload(&responses[2]);
    assert_eq!(toggled_off["completed"], false);
    assert_eq!(toggled_off["habit"]["completedDates"], json!([]));

    assert_eq!(responses[3]["result"]["isError"], false);

    assert_eq!(responses[4]["result"]["isError"], true);
    let text = responses[4]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("not found"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let server = McpServer::new(HabitFlowServer::in_memory());
    let responses = run_session(
        &server,
        &[
            "this is not json".to_string(),
            request(2, "tools/call", Value::Null),
            request(3, "prompts/list", json!({})),
        ],
    )
    .await;

    assert_eq!(responses[0]["error"]["code"], error_codes::PARSE_ERROR);
    assert_eq!(responses[1]["error"]["code"], error_codes::INVALID_PARAMS);
    assert_eq!(responses[2]["error"]["code"], error_codes::METHOD_NOT_FOUND);
    assert_eq!(responses[2]["id"], 3);
}

#[tokio::test]
async fn test_bad_toggle_date() {
    let server = McpServer::new(HabitFlowServer::in_memory());
    let habit = server
        .process_line(&tool_call(1, "habit_create", json!({"name": "Read"})))
        .unwrap();
    let habit = payload(&serde_json::to_value(habit).unwrap())["habit"].clone();

    let responses = run_session(
        &server,
        &[tool_call(2, "habit_toggle", json!({"habit_id": habit["id"], "date": "2024/01/01"}))],
    )
    .await;

    assert_eq!(responses[0]["result"]["isError"], true);
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("YYYY-MM-DD"));
}
