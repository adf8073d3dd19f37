//! Identity of the local account.

use std::{fmt, sync::OnceLock};

use crate::{DeviceId, RecipientId};

/// Who this client is: the local recipient id and the device it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    /// The local user's recipient id.
    pub recipient_id: RecipientId,
    /// This client's device.
    pub device_id: DeviceId,
}

type Resolver = Box<dyn Fn() -> LocalIdentity + Send + Sync>;

/// Read-only, lazily resolved local identity.
///
/// A lazy account runs its resolver at most once, on first access. Every
/// later call returns the same identity, so the self recipient is stable for
/// the lifetime of the account value.
pub struct LocalAccount {
    source: Source,
}

enum Source {
    Fixed(LocalIdentity),
    Lazy { identity: OnceLock<LocalIdentity>, resolver: Resolver },
}

impl LocalAccount {
    /// Account on the primary device.
    pub fn new(recipient_id: RecipientId) -> Self {
        Self::with_device(recipient_id, DeviceId::PRIMARY)
    }

    /// Account on a linked device.
    pub fn with_device(recipient_id: RecipientId, device_id: DeviceId) -> Self {
        Self { source: Source::Fixed(LocalIdentity { recipient_id, device_id }) }
    }

    /// Account whose identity is produced by `resolver` on first use.
    pub fn lazy(resolver: impl Fn() -> LocalIdentity + Send + Sync + 'static) -> Self {
        Self { source: Source::Lazy { identity: OnceLock::new(), resolver: Box::new(resolver) } }
    }

    /// The resolved identity.
    pub fn identity(&self) -> &LocalIdentity {
        match &self.source {
            Source::Fixed(identity) => identity,
            Source::Lazy { identity, resolver } => identity.get_or_init(|| resolver()),
        }
    }

    /// The local recipient id.
    pub fn recipient_id(&self) -> &RecipientId {
        &self.identity().recipient_id
    }

    /// The local device id.
    pub fn device_id(&self) -> DeviceId {
        self.identity().device_id
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identity = match &self.source {
            Source::Fixed(identity) => Some(identity),
            Source::Lazy { identity, .. } => identity.get(),
        };
        f.debug_struct("LocalAccount").field("identity", &identity).finish()
    }
}
