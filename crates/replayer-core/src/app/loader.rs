//! Recording loader: outer document -> `Batch`.
//!
//! The recording is double-encoded:
//! - outer: a JSON array of strings
//! - each string: `{"envelope": { ...Envelope fields... }}`
//!
//! Policy: skip-and-log. A malformed record is reported as a
//! `RecordParseError` and dropped; the remaining records keep their order.
//! Only an unreadable or empty outer document aborts the load.

use serde::Deserialize;

use crate::domain::{Batch, Envelope, RecordParseError, ReplayError};
use crate::ports::RecordingSource;

#[derive(Debug, Deserialize)]
struct EnvelopeRecord {
    envelope: Envelope,
}

/// Result of decoding a recording.
#[derive(Debug)]
pub struct LoadedRecording {
    pub batch: Batch,
    pub skipped: Vec<RecordParseError>,
}

/// Read and decode a recording from `source`.
pub async fn load(source: &dyn RecordingSource) -> Result<LoadedRecording, ReplayError> {
    let origin = source.describe();
    let document = source.read().await?;
    let loaded = decode_recording(&document)?;
    tracing::info!(
        origin = %origin,
        envelopes = loaded.batch.len(),
        skipped = loaded.skipped.len(),
        "recording loaded"
    );
    Ok(loaded)
}

/// Decode the outer document, then each record.
pub fn decode_recording(document: &str) -> Result<LoadedRecording, ReplayError> {
    let records: Vec<String> = serde_json::from_str(document)?;
    if records.is_empty() {
        return Err(ReplayError::EmptyRecording);
    }

    let total = records.len();
    let mut envelopes = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match decode_record(index, record) {
            Ok(envelope) => envelopes.push(envelope),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed record");
                skipped.push(err);
            }
        }
    }

    if envelopes.is_empty() {
        return Err(ReplayError::NoUsableRecords(total));
    }

    Ok(LoadedRecording {
        batch: Batch::new(envelopes),
        skipped,
    })
}

fn decode_record(index: usize, record: &str) -> Result<Envelope, RecordParseError> {
    let EnvelopeRecord { envelope } =
        serde_json::from_str(record).map_err(|e| RecordParseError::new(index, e.to_string()))?;
    if envelope.target().trim().is_empty() {
        return Err(RecordParseError::new(index, "target is empty"));
    }
    Ok(envelope)
}
