//! Pull loop from a data source into a projector.

use crate::datasource::DataSource;
use crate::error::{OpenXcError, Result};
use crate::state::{Projection, Projector};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What to do with a message whose value has the wrong kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Stop and return the `TypeMismatch` error.
    #[default]
    Abort,
    /// Log it, count it and continue with the next message.
    Skip,
}

/// Counts for one [`ingest`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Messages read from the source.
    pub read: u64,
    /// Messages that updated the state.
    pub applied: u64,
    /// Messages with an unrecognized signal.
    pub ignored: u64,
    /// Messages skipped because of a type mismatch.
    pub rejected: u64,
}

/// Read `source` to end-of-stream, projecting every message.
///
/// Decode and driver errors always stop the loop and are returned. Type
/// mismatches stop it under [`MismatchPolicy::Abort`] and are skipped under
/// [`MismatchPolicy::Skip`].
pub fn ingest(
    source: &mut DataSource,
    projector: &mut Projector,
    policy: MismatchPolicy,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    loop {
        let msg = match source.read() {
            Ok(msg) => msg,
            Err(OpenXcError::EndOfStream) => break,
            Err(err) => return Err(err),
        };
        summary.read += 1;

        match projector.project(&msg) {
            Ok(Projection::Applied(_)) => summary.applied += 1,
            Ok(Projection::Ignored) => summary.ignored += 1,
            Err(err @ OpenXcError::TypeMismatch { .. }) if policy == MismatchPolicy::Skip => {
                warn!(error = %err, "Skipping message");
                summary.rejected += 1;
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        driver = source.driver_type(),
        resource = source.resource(),
        read = summary.read,
        applied = summary.applied,
        ignored = summary.ignored,
        rejected = summary.rejected,
        "Ingest complete"
    );
    Ok(summary)
}
