//! Prefix command execution
//!
//! Inbound messages that parse as commands are executed here. Every command,
//! known or unknown, produces a reply to the sender and a `command_executed`
//! broadcast. A failed reply is logged and does not abort the dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use chatdeck_core::{
    parse_command, ChatdeckConfig, Command, NormalizedEvent, RelayResult, SessionTransport,
    Timestamp,
};

use crate::gateway::SendGateway;
use crate::hub::BroadcastHub;

// ----------------------------------------------------------------------------
// Command Dispatcher
// ----------------------------------------------------------------------------

pub struct CommandDispatcher {
    config: Arc<ChatdeckConfig>,
    transport: Arc<dyn SessionTransport>,
    gateway: Arc<SendGateway>,
    hub: Arc<BroadcastHub>,
}

impl CommandDispatcher {
    pub fn new(
        config: Arc<ChatdeckConfig>,
        transport: Arc<dyn SessionTransport>,
        gateway: Arc<SendGateway>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            config,
            transport,
            gateway,
            hub,
        }
    }

    /// Inspect one normalized event and execute it if it is an inbound
    /// command. Plain chat and non-message events are ignored.
    pub async fn dispatch(&self, event: &NormalizedEvent) -> RelayResult<()> {
        let NormalizedEvent::MessageReceived { from, body, .. } = event else {
            return Ok(());
        };
        let Some(command) = parse_command(&self.config.commands.prefix, body, from) else {
            return Ok(());
        };

        debug!(name = %command.name, from = %command.sender_id, "executing command");
        self.execute(&command).await;
        Ok(())
    }

    async fn execute(&self, command: &Command) {
        let reply = match command.name.as_str() {
            "help" => self.render_help(),
            "ping" => self.config.commands.pong_reply.clone(),
            "info" => self.render_info(&command.sender_id).await,
            "echo" => {
                if command.args.is_empty() {
                    self.config.commands.echo_prompt.clone()
                } else {
                    command.args.join(" ")
                }
            }
            name => format!(
                "Unknown command: {name}\nType {}help for available commands",
                self.config.commands.prefix
            ),
        };

        // The reply and the execution record are independent: a dead send
        // path must not suppress the command_executed broadcast.
        if let Err(err) = self.gateway.send_message(&command.sender_id, &reply).await {
            warn!(name = %command.name, %err, "command reply failed");
        }

        self.hub
            .broadcast(&NormalizedEvent::CommandExecuted {
                command: command.name.clone(),
                from: command.sender_id.clone(),
                timestamp: Timestamp::now(),
            })
            .await;
    }

    fn render_help(&self) -> String {
        let p = &self.config.commands.prefix;
        format!(
            "Available commands:\n\
             {p}help - Show this help\n\
             {p}ping - Check relay status\n\
             {p}info - Get contact info\n\
             {p}echo [text] - Echo back your message"
        )
    }

    async fn render_info(&self, sender_id: &str) -> String {
        match self.transport.fetch_contact_info(sender_id).await {
            Ok(info) => {
                let name = info.display_name.unwrap_or_else(|| "N/A".to_string());
                let kind = if info.is_business {
                    "Business"
                } else {
                    "Personal"
                };
                format!("Name: {name}\nNumber: {sender_id}\nType: {kind}")
            }
            Err(err) => {
                warn!(sender_id, %err, "contact lookup failed");
                format!("Name: N/A\nNumber: {sender_id}\nType: Personal")
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
