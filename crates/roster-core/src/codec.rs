//! CBOR encoding of recipient records.
//!
//! Records live in the [`RECIPIENT_COLLECTION`] collection, keyed by
//! recipient id. The id is also embedded in the value; a value whose
//! embedded id disagrees with its key is reported as corrupt.

use crate::{DirectoryError, ReadTransaction, RecipientId, RecipientRecord, WriteTransaction};

/// Store collection holding recipient records.
pub const RECIPIENT_COLLECTION: &str = "recipients";

/// Encode a record for storage.
pub fn encode_record(record: &RecipientRecord) -> Result<Vec<u8>, DirectoryError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(record, &mut bytes).map_err(|e| DirectoryError::Codec {
        key: record.recipient_id().to_string(),
        reason: e.to_string(),
    })?;
    Ok(bytes)
}

/// Decode a record read from `key`.
pub fn decode_record(key: &str, bytes: &[u8]) -> Result<RecipientRecord, DirectoryError> {
    let record: RecipientRecord = ciborium::from_reader(bytes)
        .map_err(|e| DirectoryError::Codec { key: key.to_string(), reason: e.to_string() })?;

    if record.recipient_id().as_str() != key {
        return Err(DirectoryError::KeyMismatch {
            key: key.to_string(),
            embedded: record.recipient_id().to_string(),
        });
    }

    Ok(record)
}

pub(crate) fn load(
    txn: &impl ReadTransaction,
    id: &RecipientId,
) -> Result<Option<RecipientRecord>, DirectoryError> {
    match txn.get(RECIPIENT_COLLECTION, id.as_str())? {
        Some(bytes) => decode_record(id.as_str(), &bytes).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn store(
    txn: &mut impl WriteTransaction,
    record: &RecipientRecord,
) -> Result<(), DirectoryError> {
    let bytes = encode_record(record)?;
    txn.put(RECIPIENT_COLLECTION, record.recipient_id().as_str(), bytes)?;
    Ok(())
}

pub(crate) fn remove(txn: &mut impl WriteTransaction, id: &RecipientId) -> Result<(), DirectoryError> {
    txn.delete(RECIPIENT_COLLECTION, id.as_str())?;
    Ok(())
}
