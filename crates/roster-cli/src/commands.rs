//! Command execution.

use std::io::Write;

use roster_core::{
    DeviceId, DirectoryError, LocalAccount, RecipientDirectory, RecipientId, RecipientRecord,
    TransactionalStore,
};
use roster_proto::{Request, VerificationTransport, factory};
use roster_store::MemoryStore;

use crate::{CliConfig, CliError, Command, RequestKind};

/// Run one command, writing its output to `out`.
///
/// Only commands that read or change recipients open the store named by
/// `config`, each in a single transaction. Arguments are validated before the
/// store is opened.
///
/// # Errors
///
/// Invalid arguments, store and directory failures (including mutating an
/// unregistered recipient), and output failures.
pub fn run(config: &CliConfig, command: &Command, out: &mut impl Write) -> Result<(), CliError> {
    tracing::debug!(?command, store = ?config.store_path, "running command");

    match command {
        Command::Whoami => {
            let dir = directory(config)?;
            let me = dir.self_recipient();
            writeln!(out, "{} (device {})", me.recipient_id(), dir.account().device_id())?;
        },
        Command::Register { id, device } => {
            let id = recipient_id(id)?;
            let device = device.map(device_id).transpose()?;
            let dir = directory(config)?;
            let store = open_store(config)?;
            let record = match device {
                Some(device) => {
                    store.write(|txn| dir.mark_account_as_registered_with_device(&id, device, txn))?
                },
                None => store.write(|txn| dir.mark_account_as_registered(&id, txn))?,
            };
            writeln!(out, "registered {}", describe(&record))?;
        },
        Command::Unregister { id } => {
            let id = recipient_id(id)?;
            let dir = directory(config)?;
            open_store(config)?.write(|txn| dir.mark_account_as_not_registered(&id, txn))?;
            writeln!(out, "unregistered {id}")?;
        },
        Command::AddDevices { id, devices } => {
            let id = recipient_id(id)?;
            let devices = device_ids(devices)?;
            let dir = directory(config)?;
            let record = open_store(config)?.write(|txn| {
                let mut record = dir.get_or_create_unsaved_recipient(&id, txn)?;
                record.add_devices(devices, txn)?;
                Ok::<_, DirectoryError>(record)
            })?;
            writeln!(out, "{}", describe(&record))?;
        },
        Command::RemoveDevices { id, devices } => {
            let id = recipient_id(id)?;
            let devices = device_ids(devices)?;
            let dir = directory(config)?;
            let record = open_store(config)?.write(|txn| {
                let mut record = dir.get_or_create_unsaved_recipient(&id, txn)?;
                record.remove_devices(devices, txn)?;
                Ok::<_, DirectoryError>(record)
            })?;
            writeln!(out, "{}", describe(&record))?;
        },
        Command::Show { id } => {
            let id = recipient_id(id)?;
            let dir = directory(config)?;
            match open_store(config)?.read(|txn| dir.registered_recipient(&id, txn))? {
                Some(record) => writeln!(out, "{}", describe(&record))?,
                None => writeln!(out, "{id}: not registered")?,
            }
        },
        Command::List => {
            let dir = directory(config)?;
            for record in open_store(config)?.read(|txn| dir.registered_recipients(txn))? {
                writeln!(out, "{}", describe(&record))?;
            }
        },
        Command::Request { kind } => render_request(kind, out)?,
    }

    Ok(())
}

fn directory(config: &CliConfig) -> Result<RecipientDirectory, CliError> {
    let account = LocalAccount::with_device(
        recipient_id(&config.local_number)?,
        device_id(config.local_device)?,
    );
    Ok(RecipientDirectory::new(account))
}

fn open_store(config: &CliConfig) -> Result<MemoryStore, CliError> {
    match &config.store_path {
        Some(path) => Ok(MemoryStore::open(path)?),
        None => Ok(MemoryStore::new()),
    }
}

fn render_request(kind: &RequestKind, out: &mut impl Write) -> Result<(), CliError> {
    let request: Request = match kind {
        RequestKind::Profile { id } => factory::get_profile(id)?,
        RequestKind::Prekey { id, device } => factory::recipient_prekey(id, *device)?,
        RequestKind::Devices => factory::get_devices(),
        RequestKind::DeleteDevice { device } => factory::delete_device(*device)?,
        RequestKind::Messages => factory::get_messages(),
        RequestKind::Verify { phone, voice } => {
            let transport =
                if *voice { VerificationTransport::Voice } else { VerificationTransport::Sms };
            factory::request_verification_code(phone, transport)?
        },
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?;
    Ok(())
}

fn describe(record: &RecipientRecord) -> String {
    format!("{}: {}", record.recipient_id(), record.devices())
}

fn recipient_id(value: &str) -> Result<RecipientId, CliError> {
    RecipientId::new(value).map_err(|_| CliError::InvalidRecipient { value: value.to_string() })
}

fn device_id(value: u32) -> Result<DeviceId, CliError> {
    DeviceId::new(value).map_err(|_| CliError::InvalidDevice { value })
}

fn device_ids(values: &[u32]) -> Result<Vec<DeviceId>, CliError> {
    values.iter().map(|v| device_id(*v)).collect()
}
