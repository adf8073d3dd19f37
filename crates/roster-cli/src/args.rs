use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::CliConfig;

/// Recipient and device directory
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Inspect and edit the recipient directory, or render service requests")]
#[command(version)]
pub struct Args {
    /// CBOR store file (in-memory store if omitted)
    #[arg(long, env = "ROSTER_STORE")]
    pub store: Option<PathBuf>,

    /// Recipient id of the local account
    #[arg(long, env = "ROSTER_LOCAL_NUMBER", default_value = "+15550000000")]
    pub local_number: String,

    /// Device id of this client
    #[arg(long, env = "ROSTER_LOCAL_DEVICE", default_value_t = roster_proto::PRIMARY_DEVICE_ID)]
    pub local_device: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROSTER_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Resolved configuration.
    pub fn config(&self) -> CliConfig {
        CliConfig {
            store_path: self.store.clone(),
            local_number: self.local_number.clone(),
            local_device: self.local_device,
            log_level: self.log_level.clone(),
        }
    }
}

/// Directory commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the local account
    Whoami,

    /// Mark a recipient registered
    Register {
        /// Recipient id
        id: String,
        /// Device to add
        #[arg(long)]
        device: Option<u32>,
    },

    /// Mark a recipient not registered
    Unregister {
        /// Recipient id
        id: String,
    },

    /// Add devices to a registered recipient
    AddDevices {
        /// Recipient id
        id: String,
        /// Device ids
        #[arg(required = true)]
        devices: Vec<u32>,
    },

    /// Remove devices from a registered recipient
    RemoveDevices {
        /// Recipient id
        id: String,
        /// Device ids
        #[arg(required = true)]
        devices: Vec<u32>,
    },

    /// Show one recipient
    Show {
        /// Recipient id
        id: String,
    },

    /// List registered recipients
    List,

    /// Render a service request as JSON
    Request {
        /// Request to render
        #[command(subcommand)]
        kind: RequestKind,
    },
}

/// Requests `roster request` can render.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Fetch a profile
    Profile {
        /// Recipient id
        id: String,
    },

    /// Fetch prekeys for one device, or all devices
    Prekey {
        /// Recipient id
        id: String,
        /// Device id (all devices if omitted)
        device: Option<u32>,
    },

    /// List the local account's devices
    Devices,

    /// Unlink a device
    DeleteDevice {
        /// Device id
        device: u32,
    },

    /// Fetch queued messages
    Messages,

    /// Request a verification code
    Verify {
        /// Phone number
        phone: String,
        /// Deliver by voice call instead of SMS
        #[arg(long)]
        voice: bool,
    },
}
