/// End-to-end tests: persistence, MCP stdio workflow, concurrency, store failures
mod basic_integration;
mod mcp_workflow;
mod concurrency;
mod store_failures;
