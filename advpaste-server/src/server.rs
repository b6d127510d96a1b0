//! Request dispatch and the stdio loop

use crate::host::{BufferEditor, CollectingNotifier};
use crate::rpc::{RpcError, RpcRequest, RpcResponse, PARSE_ERROR};
use advpaste::{layout_ready, AdvancedPaste, LayoutReadyTrigger, PasteError, PluginHost};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "advpaste";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
struct ExecuteParams {
    id: String,
    #[serde(default)]
    selection: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SettingsSetParams {
    #[serde(rename = "scriptDir")]
    script_dir: String,
}

pub struct Server {
    plugin: AdvancedPaste,
    notices: Arc<CollectingNotifier>,
    /// Fired by the client's `initialized` notification
    layout: Option<LayoutReadyTrigger>,
}

impl Server {
    /// Activate the plugin against `host`. Script loading starts once the
    /// client sends `initialized`.
    pub async fn start(host: PluginHost, notices: Arc<CollectingNotifier>) -> Result<Self, PasteError> {
        let (trigger, layout) = layout_ready();
        let plugin = AdvancedPaste::on_load(host, layout).await?;
        Ok(Self {
            plugin,
            notices,
            layout: Some(trigger),
        })
    }

    pub fn shutdown(&self) {
        self.plugin.on_unload();
    }

    /// Serve line-delimited requests until EOF
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!(bytes = line.len(), "received");

            let response = match serde_json::from_str::<RpcRequest>(line) {
                Ok(request) => self.handle(request).await,
                Err(e) => {
                    warn!(error = %e, "unparseable request");
                    Some(RpcResponse::failure(
                        None,
                        RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                    ))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response).map_err(io::Error::other)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }
        info!("client disconnected (EOF)");
        Ok(())
    }

    /// Dispatch one request. Notifications produce no response.
    pub async fn handle(&mut self, request: RpcRequest) -> Option<RpcResponse> {
        debug!(method = %request.method, "processing");
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => Ok(self.initialize()),
            "initialized" => Ok(self.initialized().await),
            "ping" => Ok(json!({})),

            // Commands
            "commands/list" => Ok(self.list_commands().await),
            "commands/execute" => self.execute(&request).await,

            // Settings
            "settings/get" => Ok(json!(self.plugin.settings().await)),
            "settings/set" => self.set_settings(&request).await,
            "settings/describe" => Ok(json!(self.plugin.settings_tab().display().await)),

            _ => Err(RpcError::method_not_found(&request.method)),
        };

        if request.is_notification() {
            if let Err(e) = result {
                warn!(method = %request.method, error = %e.message, "notification failed");
            }
            return None;
        }

        Some(match result {
            Ok(value) => RpcResponse::success(request.id, value),
            Err(e) => RpcResponse::failure(request.id, e),
        })
    }

    fn initialize(&self) -> JsonValue {
        json!({
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
            "capabilities": { "commands": {}, "settings": {} }
        })
    }

    /// Signal layout readiness and wait for the script load it releases
    async fn initialized(&mut self) -> JsonValue {
        match self.layout.take() {
            Some(trigger) => {
                trigger.signal();
                let count = self.plugin.scripts_loaded().await;
                info!(count, "scripts loaded");
            }
            None => debug!("initialized received twice, ignoring"),
        }
        json!({})
    }

    async fn list_commands(&self) -> JsonValue {
        json!({
            "commands": self.plugin.list_commands().await,
            "notices": self.notices.drain(),
        })
    }

    async fn execute(&self, request: &RpcRequest) -> Result<JsonValue, RpcError> {
        let params: ExecuteParams = request.params()?;
        let mut editor = BufferEditor::new(params.selection.unwrap_or_default());

        let outcome = match self.plugin.execute(&params.id, &mut editor).await {
            Ok(outcome) => outcome,
            Err(PasteError::UnknownCommand(id)) => {
                let suggestions = self.plugin.commands().suggest(&id).await;
                return Err(RpcError::from(PasteError::UnknownCommand(id))
                    .with_data(json!({ "code": "UNKNOWN_COMMAND", "suggestions": suggestions })));
            }
            Err(e) => {
                error!(command = %params.id, error = %e, "command failed");
                return Err(e.into());
            }
        };

        Ok(json!({
            "outcome": outcome,
            "text": editor.replaced,
            "notices": self.notices.drain(),
        }))
    }

    async fn set_settings(&self, request: &RpcRequest) -> Result<JsonValue, RpcError> {
        let params: SettingsSetParams = request.params()?;
        let settings = self.plugin.settings_tab().set_script_dir(&params.script_dir).await?;
        Ok(json!({ "settings": settings, "reloadRequired": true }))
    }
}
