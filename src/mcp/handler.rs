//! MCP method dispatcher
//!
//! Maps JSON-RPC requests onto the surface registry. Shared by the stdio and
//! HTTP transports; session handling stays in the transport.

use serde_json::{json, Value};
use std::sync::Arc;

use super::registry::SurfaceRegistry;
use crate::error::ProviderError;
use crate::transport::jsonrpc::{
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, PromptsCapability,
    ResourcesCapability, ServerCapabilities, ServerInfo, ToolsCapability,
};

/// MCP protocol revision spoken by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported during initialization
pub const SERVER_NAME: &str = "binance-mcp";

const INSTRUCTIONS: &str = "Read-only Binance market data. Use get_price, \
get_price_24hr_change and get_rolling_windows_price with a crypto name (btc, \
ethereum) or a trading pair (BTCUSDT). Read memory://symbol_map for known names.";

type DispatchResult = std::result::Result<Value, JsonRpcError>;

#[derive(Clone)]
pub struct McpHandler {
    registry: Arc<SurfaceRegistry>,
}

impl McpHandler {
    pub fn new(registry: Arc<SurfaceRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one request
    ///
    /// Returns `None` for notifications, which never get a response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);

        if !request.is_valid_version() {
            return Some(JsonRpcResponse::error(JsonRpcError::invalid_request(), id));
        }

        let outcome = self.dispatch(&request.method, request.params).await;
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(result, id),
            Err(error) => {
                tracing::debug!(
                    method = %request.method,
                    code = error.code,
                    message = %error.message,
                    "Request failed"
                );
                JsonRpcResponse::error(error, id)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> DispatchResult {
        let params = params.unwrap_or(Value::Null);

        match method {
            "initialize" => self.initialize(),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => self.tools_call(params).await,
            "resources/list" => Ok(self.resources_list()),
            "resources/templates/list" => Ok(self.resource_templates_list()),
            "resources/read" => self.resources_read(params).await,
            "prompts/list" => Ok(self.prompts_list()),
            "prompts/get" => self.prompts_get(params),
            other => Err(JsonRpcError::new(
                JsonRpcError::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn initialize(&self) -> DispatchResult {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                prompts: Some(PromptsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        };

        serde_json::to_value(result)
            .map_err(|e| JsonRpcError::from(ProviderError::Internal(e.to_string())))
    }

    fn tools_list(&self) -> Value {
        let tools: Vec<Value> = self.registry.list_tools().iter().map(|t| t.to_json()).collect();
        json!({ "tools": tools })
    }

    async fn tools_call(&self, params: Value) -> DispatchResult {
        let name = required_str(&params, "name")?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let text = self.registry.invoke(name, arguments).await?;

        Ok(json!({
            "content": [{
                "type": "text",
                "text": text,
            }],
            "isError": false,
        }))
    }

    fn resources_list(&self) -> Value {
        let resources: Vec<Value> = self
            .registry
            .list_resources()
            .iter()
            .map(|r| r.to_json())
            .collect();
        json!({ "resources": resources })
    }

    fn resource_templates_list(&self) -> Value {
        let templates: Vec<Value> = self
            .registry
            .list_resource_templates()
            .iter()
            .map(|r| r.to_json())
            .collect();
        json!({ "resourceTemplates": templates })
    }

    async fn resources_read(&self, params: Value) -> DispatchResult {
        let uri = required_str(&params, "uri")?;
        let (resource, text) = self.registry.read_resource(uri).await?;

        Ok(json!({
            "contents": [{
                "uri": uri,
                "mimeType": resource.mime_type,
                "text": text,
            }]
        }))
    }

    fn prompts_list(&self) -> Value {
        let prompts: Vec<Value> = self
            .registry
            .list_prompts()
            .iter()
            .map(|p| p.to_json())
            .collect();
        json!({ "prompts": prompts })
    }

    fn prompts_get(&self, params: Value) -> DispatchResult {
        let name = required_str(&params, "name")?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let (prompt, text) = self.registry.render_prompt(name, arguments)?;

        Ok(json!({
            "description": prompt.description,
            "messages": [{
                "role": "user",
                "content": {
                    "type": "text",
                    "text": text,
                }
            }]
        }))
    }
}

fn required_str<'a>(params: &'a Value, field: &str) -> Result<&'a str, JsonRpcError> {
    params
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::InvalidArgument(format!("Missing '{}'", field)).into())
}
