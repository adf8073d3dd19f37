use std::path::PathBuf;

/// Runtime configuration for one `roster` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// CBOR snapshot file. `None` runs against an empty in-memory store.
    pub store_path: Option<PathBuf>,
    /// Recipient id of the local account.
    pub local_number: String,
    /// Device id of this client.
    pub local_device: u32,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            local_number: "+15550000000".to_string(),
            local_device: roster_proto::PRIMARY_DEVICE_ID,
            log_level: "warn".to_string(),
        }
    }
}
