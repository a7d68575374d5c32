//! Relay configuration
//!
//! Per-concern config structs with sensible defaults, aggregated into
//! [`ChatdeckConfig`]. `testing()` constructors produce small, fast values
//! for tests.

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Command Configuration
// ----------------------------------------------------------------------------

/// Configuration for the prefix command language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Prefix that marks a message body as a command
    pub prefix: String,
    /// Reply body for the ping command
    pub pong_reply: String,
    /// Reply when echo is invoked with no arguments
    pub echo_prompt: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            pong_reply: "Pong! Bot is alive".to_string(),
            echo_prompt: "Please provide text to echo!".to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes for the runtime's internal channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Buffer size for the raw session event channel
    pub event_buffer_size: usize,
}

impl ChannelConfig {
    /// Small buffers for tests
    pub fn testing() -> Self {
        Self {
            event_buffer_size: 16,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 128,
        }
    }
}

// ----------------------------------------------------------------------------
// Aggregate Configuration
// ----------------------------------------------------------------------------

/// Complete relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatdeckConfig {
    pub commands: CommandConfig,
    pub channels: ChannelConfig,
    /// Default number of chats returned by a contacts listing
    pub contacts_limit: usize,
}

impl ChatdeckConfig {
    /// Configuration tuned for tests
    pub fn testing() -> Self {
        Self {
            commands: CommandConfig::default(),
            channels: ChannelConfig::testing(),
            contacts_limit: 50,
        }
    }

    /// Validate invariants a running relay depends on
    pub fn validate(&self) -> Result<(), String> {
        if self.commands.prefix.is_empty() {
            return Err("command prefix must not be empty".to_string());
        }
        if self.channels.event_buffer_size == 0 {
            return Err("event buffer size must be nonzero".to_string());
        }
        if self.contacts_limit == 0 {
            return Err("contacts limit must be nonzero".to_string());
        }
        Ok(())
    }
}

impl Default for ChatdeckConfig {
    fn default() -> Self {
        Self {
            commands: CommandConfig::default(),
            channels: ChannelConfig::default(),
            contacts_limit: 50,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
