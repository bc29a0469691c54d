//! Streaming trace file driver.
//!
//! Reads a file of OpenXC JSON records written back to back, decoding one
//! record per [`read`](DataSourceDriver::read). There is no framing beyond the
//! JSON syntax itself, so newlines between records are optional:
//!
//! ```text
//! {"name": "headlamp_status", "value": true}
//! {"name": "vehicle_speed", "value": 42.0}{"name": "door_status", "value": "driver", "event": true}
//! ```
//!
//! Because records are not framed, a malformed record leaves the decoder with
//! no way to find the start of the next one. After a decode failure every
//! further `read` fails until the driver is reset or closed.

use crate::driver::{DataSourceDriver, DriverFactory, Rewindable};
use crate::error::{OpenXcError, Result};
use crate::message::VehicleMessage;
use serde::de::Error as _;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use tracing::{debug, info, warn};

/// Registry key of the trace driver.
pub const TRACE_DRIVER: &str = "trace";

type RecordStream = StreamDeserializer<'static, IoRead<BufReader<File>>, VehicleMessage>;

/// Where the decoder stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Streaming,
    Exhausted,
    /// A record failed to decode at this line/column.
    Failed { line: usize, column: usize },
}

struct OpenTrace {
    path: String,
    /// Seek handle; shares its cursor with the decoder's clone.
    file: File,
    records: RecordStream,
    position: Position,
    decoded: u64,
}

impl OpenTrace {
    fn decoder(file: &File) -> std::io::Result<RecordStream> {
        let reader = BufReader::new(file.try_clone()?);
        Ok(serde_json::Deserializer::from_reader(reader).into_iter())
    }
}

/// Data source driver over a trace file.
#[derive(Default)]
pub struct TraceDriver {
    trace: Option<OpenTrace>,
}

impl TraceDriver {
    /// Unopened driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the open trace, if any.
    pub fn path(&self) -> Option<&str> {
        self.trace.as_ref().map(|t| t.path.as_str())
    }
}

impl DataSourceDriver for TraceDriver {
    fn driver_type(&self) -> &'static str {
        TRACE_DRIVER
    }

    fn open(&mut self, resource: &str) -> Result<()> {
        if let Some(trace) = &self.trace {
            return Err(OpenXcError::AlreadyOpen(trace.path.clone()));
        }

        let open_error = |source| OpenXcError::DriverOpen {
            driver: TRACE_DRIVER.to_string(),
            resource: resource.to_string(),
            source,
        };
        let file = File::open(resource).map_err(open_error)?;
        let records = OpenTrace::decoder(&file).map_err(open_error)?;

        info!(path = resource, "Opened trace file");
        self.trace = Some(OpenTrace {
            path: resource.to_string(),
            file,
            records,
            position: Position::Streaming,
            decoded: 0,
        });
        Ok(())
    }

    fn read(&mut self) -> Result<VehicleMessage> {
        let trace = self.trace.as_mut().ok_or(OpenXcError::NotOpen)?;

        match trace.position {
            Position::Streaming => {}
            Position::Exhausted => return Err(OpenXcError::EndOfStream),
            Position::Failed { line, column } => {
                return Err(OpenXcError::Decode(serde_json::Error::custom(format!(
                    "trace stream unusable after malformed record at line {} column {}",
                    line, column
                ))));
            }
        }

        match trace.records.next() {
            Some(Ok(msg)) => {
                trace.decoded += 1;
                Ok(msg)
            }
            None => {
                debug!(path = %trace.path, records = trace.decoded, "Trace exhausted");
                trace.position = Position::Exhausted;
                Err(OpenXcError::EndOfStream)
            }
            Some(Err(err)) => {
                warn!(path = %trace.path, error = %err, "Malformed trace record");
                trace.position = Position::Failed {
                    line: err.line(),
                    column: err.column(),
                };
                Err(OpenXcError::Decode(err))
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        let trace = self.trace.take().ok_or(OpenXcError::NotOpen)?;
        debug!(path = %trace.path, records = trace.decoded, "Closed trace file");
        Ok(())
    }

    fn as_rewindable(&mut self) -> Option<&mut dyn Rewindable> {
        Some(self)
    }
}

impl Rewindable for TraceDriver {
    fn reset(&mut self) -> Result<()> {
        let trace = self.trace.as_mut().ok_or(OpenXcError::NotOpen)?;
        trace.file.seek(SeekFrom::Start(0))?;
        trace.records = OpenTrace::decoder(&trace.file)?;
        trace.position = Position::Streaming;
        trace.decoded = 0;
        debug!(path = %trace.path, "Rewound trace file");
        Ok(())
    }
}

/// Factory registered as `"trace"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceDriverFactory;

impl DriverFactory for TraceDriverFactory {
    fn driver_type(&self) -> &'static str {
        TRACE_DRIVER
    }

    fn name(&self) -> &'static str {
        "OpenXC JSON trace file"
    }

    fn create(&self) -> Box<dyn DataSourceDriver> {
        Box::new(TraceDriver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::VehicleValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn trace_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn open(file: &NamedTempFile) -> TraceDriver {
        let mut driver = TraceDriver::new();
        driver.open(file.path().to_str().unwrap()).unwrap();
        driver
    }

    fn drain(driver: &mut TraceDriver) -> Vec<VehicleMessage> {
        let mut out = Vec::new();
        loop {
            match driver.read() {
                Ok(msg) => out.push(msg),
                Err(OpenXcError::EndOfStream) => return out,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    const TRACE: &str = r#"{"name": "headlamp_status", "value": true}
{"name": "vehicle_speed", "value": 42.5}
{"name": "door_status", "value": "driver", "event": true}
"#;

    #[test]
    fn test_reads_records_in_order() {
        let file = trace_file(TRACE);
        let mut driver = open(&file);

        let messages = drain(&mut driver);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], VehicleMessage::new("headlamp_status", true));
        assert_eq!(messages[1].value, VehicleValue::Number(42.5));
        assert!(messages[2].event);
    }

    #[test]
    fn test_records_without_separators() {
        let file = trace_file(
            r#"{"name":"odometer","value":10}{"name":"odometer","value":11}"#,
        );
        let mut driver = open(&file);
        assert_eq!(drain(&mut driver).len(), 2);
    }

    #[test]
    fn test_end_of_stream_is_sticky() {
        let file = trace_file(TRACE);
        let mut driver = open(&file);
        drain(&mut driver);

        for _ in 0..3 {
            assert!(matches!(driver.read(), Err(OpenXcError::EndOfStream)));
        }
    }

    #[test]
    fn test_empty_trace_is_end_of_stream() {
        let file = trace_file("  \n");
        let mut driver = open(&file);
        assert!(matches!(driver.read(), Err(OpenXcError::EndOfStream)));
    }

    #[test]
    fn test_reset_replays_identically() {
        let file = trace_file(TRACE);
        let mut driver = open(&file);

        let first = drain(&mut driver);
        driver.reset().unwrap();
        let second = drain(&mut driver);
        driver.reset().unwrap();
        let third = drain(&mut driver);

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_reset_mid_stream() {
        let file = trace_file(TRACE);
        let mut driver = open(&file);
        let first = driver.read().unwrap();
        driver.reset().unwrap();
        assert_eq!(driver.read().unwrap(), first);
    }

    #[test]
    fn test_truncated_record_is_decode_error() {
        let file = trace_file(r#"{"name": "odometer", "value": 1} {"name": "odo"#);
        let mut driver = open(&file);

        assert!(driver.read().is_ok());
        assert!(matches!(driver.read(), Err(OpenXcError::Decode(_))));
        // No resynchronisation without framing
        assert!(matches!(driver.read(), Err(OpenXcError::Decode(_))));

        driver.reset().unwrap();
        assert!(driver.read().is_ok());
    }

    #[test]
    fn test_wrong_field_type_is_decode_error() {
        let file = trace_file(r#"{"name": 7, "value": 1}"#);
        let mut driver = open(&file);
        assert!(matches!(driver.read(), Err(OpenXcError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let mut driver = TraceDriver::new();
        let err = driver.open(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, OpenXcError::DriverOpen { ref driver, .. } if driver == "trace"));
        assert!(driver.path().is_none());
    }

    #[test]
    fn test_lifecycle_errors() {
        let file = trace_file(TRACE);
        let mut driver = TraceDriver::new();
        assert!(matches!(driver.read(), Err(OpenXcError::NotOpen)));
        assert!(matches!(driver.reset(), Err(OpenXcError::NotOpen)));

        let path = file.path().to_str().unwrap();
        driver.open(path).unwrap();
        assert!(matches!(driver.open(path), Err(OpenXcError::AlreadyOpen(_))));

        driver.close().unwrap();
        assert!(matches!(driver.read(), Err(OpenXcError::NotOpen)));
        assert!(matches!(driver.close(), Err(OpenXcError::NotOpen)));
    }
}
