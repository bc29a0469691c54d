//! Data source handles.
//!
//! A [`DataSource`] is one open connection to one driver instance. It is
//! created already open, so a handle that exists is always readable until it
//! is closed:
//!
//! ```rust,no_run
//! use openxc::{DataSource, OpenXcError, VehicleState};
//!
//! # fn main() -> openxc::Result<()> {
//! let mut source = DataSource::open("trace", "trace-simple.json")?;
//! let mut state = VehicleState::new();
//!
//! loop {
//!     match source.read() {
//!         Ok(msg) => openxc::project(&mut state, &msg)?,
//!         Err(OpenXcError::EndOfStream) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! source.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! `close` consumes the handle, so it cannot be closed twice or read after
//! closing. A handle dropped without `close` (early return, `?`, panic) is
//! closed on drop and any close error is logged.

use crate::driver::DataSourceDriver;
use crate::error::{OpenXcError, Result};
use crate::message::VehicleMessage;
use crate::registry::DriverRegistry;
use tracing::{debug, warn};

/// Open connection to a data source driver.
///
/// Not internally synchronized; share across threads only behind a lock.
pub struct DataSource {
    driver_type: &'static str,
    resource: String,
    driver: Box<dyn DataSourceDriver>,
    open: bool,
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("driver_type", &self.driver_type)
            .field("resource", &self.resource)
            .field("open", &self.open)
            .finish()
    }
}

impl DataSource {
    /// Open `resource` with a driver from the process-wide registry.
    pub fn open(driver_type: &str, resource: &str) -> Result<Self> {
        Self::open_with(DriverRegistry::global(), driver_type, resource)
    }

    /// Open `resource` with a driver from `registry`.
    ///
    /// Fails with [`OpenXcError::UnknownDriver`] if the name is not
    /// registered, or with the driver's own error if it cannot open the
    /// resource. No handle exists in either case.
    pub fn open_with(registry: &DriverRegistry, driver_type: &str, resource: &str) -> Result<Self> {
        let factory = registry
            .lookup(driver_type)
            .ok_or_else(|| OpenXcError::UnknownDriver(driver_type.to_string()))?;

        let mut driver = factory.create();
        driver.open(resource)?;
        debug!(driver = driver_type, resource, "Opened data source");

        Ok(Self {
            driver_type: factory.driver_type(),
            resource: resource.to_string(),
            driver,
            open: true,
        })
    }

    /// Driver type this handle was opened with.
    pub fn driver_type(&self) -> &'static str {
        self.driver_type
    }

    /// Resource identifier this handle was opened on.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Next message from the driver.
    ///
    /// [`OpenXcError::EndOfStream`] marks the end of the resource.
    pub fn read(&mut self) -> Result<VehicleMessage> {
        self.driver.read()
    }

    /// Rewind to the first message, if the driver supports it.
    pub fn reset(&mut self) -> Result<()> {
        match self.driver.as_rewindable() {
            Some(rewindable) => rewindable.reset(),
            None => Err(OpenXcError::Unsupported {
                driver: self.driver_type.to_string(),
                operation: "reset",
            }),
        }
    }

    /// Iterate over the remaining messages.
    ///
    /// Ends at end-of-stream, or right after yielding the first error.
    pub fn messages(&mut self) -> Messages<'_> {
        Messages {
            source: self,
            done: false,
        }
    }

    /// Close the driver.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        debug!(driver = self.driver_type, resource = %self.resource, "Closing data source");
        self.driver.close()
    }
}

impl Drop for DataSource {
    fn drop(&mut self) {
        if self.open {
            if let Err(err) = self.driver.close() {
                warn!(
                    driver = self.driver_type,
                    resource = %self.resource,
                    error = %err,
                    "Failed to close data source on drop"
                );
            }
        }
    }
}

/// Iterator returned by [`DataSource::messages`].
#[derive(Debug)]
pub struct Messages<'a> {
    source: &'a mut DataSource,
    done: bool,
}

impl Iterator for Messages<'_> {
    type Item = Result<VehicleMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.read() {
            Ok(msg) => Some(Ok(msg)),
            Err(OpenXcError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverFactory;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Replays a fixed list of messages; counts closes.
    struct ScriptedDriver {
        messages: Vec<VehicleMessage>,
        cursor: usize,
        open: bool,
        closes: Arc<AtomicUsize>,
    }

    impl DataSourceDriver for ScriptedDriver {
        fn driver_type(&self) -> &'static str {
            "scripted"
        }

        fn open(&mut self, resource: &str) -> Result<()> {
            if resource == "missing" {
                return Err(OpenXcError::DriverOpen {
                    driver: "scripted".into(),
                    resource: resource.into(),
                    source: std::io::ErrorKind::NotFound.into(),
                });
            }
            self.open = true;
            Ok(())
        }

        fn read(&mut self) -> Result<VehicleMessage> {
            if !self.open {
                return Err(OpenXcError::NotOpen);
            }
            let msg = self
                .messages
                .get(self.cursor)
                .cloned()
                .ok_or(OpenXcError::EndOfStream)?;
            self.cursor += 1;
            Ok(msg)
        }

        fn close(&mut self) -> Result<()> {
            self.open = false;
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ScriptedFactory {
        closes: Arc<AtomicUsize>,
    }

    impl DriverFactory for ScriptedFactory {
        fn driver_type(&self) -> &'static str {
            "scripted"
        }

        fn name(&self) -> &'static str {
            "Scripted test driver"
        }

        fn create(&self) -> Box<dyn DataSourceDriver> {
            Box::new(ScriptedDriver {
                messages: vec![
                    VehicleMessage::new("engine_speed", 800.0),
                    VehicleMessage::new("ignition_status", "run"),
                ],
                cursor: 0,
                open: false,
                closes: Arc::clone(&self.closes),
            })
        }
    }

    fn registry() -> (DriverRegistry, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let registry = DriverRegistry::new();
        registry.register(ScriptedFactory {
            closes: Arc::clone(&closes),
        });
        (registry, closes)
    }

    #[test]
    fn test_unknown_driver() {
        let (registry, _) = registry();
        let err = DataSource::open_with(&registry, "can-bus", "vcan0").unwrap_err();
        assert!(matches!(err, OpenXcError::UnknownDriver(name) if name == "can-bus"));
    }

    #[test]
    fn test_open_failure_returns_no_handle() {
        let (registry, closes) = registry();
        let err = DataSource::open_with(&registry, "scripted", "missing").unwrap_err();
        assert!(matches!(err, OpenXcError::DriverOpen { .. }));
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_read_until_end_then_close() {
        let (registry, closes) = registry();
        let mut source = DataSource::open_with(&registry, "scripted", "bench").unwrap();
        assert_eq!(source.driver_type(), "scripted");
        assert_eq!(source.resource(), "bench");

        assert_eq!(source.read().unwrap().name, "engine_speed");
        assert_eq!(source.read().unwrap().name, "ignition_status");
        assert!(source.read().unwrap_err().is_end_of_stream());

        source.close().unwrap();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_closes_exactly_once() {
        let (registry, closes) = registry();
        {
            let _source = DataSource::open_with(&registry, "scripted", "bench").unwrap();
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);

        let source = DataSource::open_with(&registry, "scripted", "bench").unwrap();
        source.close().unwrap();
        assert_eq!(closes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset_unsupported() {
        let (registry, _) = registry();
        let mut source = DataSource::open_with(&registry, "scripted", "bench").unwrap();
        assert!(matches!(
            source.reset(),
            Err(OpenXcError::Unsupported { operation: "reset", .. })
        ));
    }

    #[test]
    fn test_messages_iterator() {
        let (registry, _) = registry();
        let mut source = DataSource::open_with(&registry, "scripted", "bench").unwrap();

        let names: Vec<String> = source
            .messages()
            .map(|m| m.map(|m| m.name))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names, vec!["engine_speed", "ignition_status"]);
        assert_eq!(source.messages().count(), 0);
    }

    #[test]
    fn test_each_handle_gets_its_own_driver() {
        let (registry, _) = registry();
        let mut a = DataSource::open_with(&registry, "scripted", "bench").unwrap();
        let mut b = DataSource::open_with(&registry, "scripted", "bench").unwrap();

        a.read().unwrap();
        assert_eq!(b.read().unwrap().name, "engine_speed");
    }
}
