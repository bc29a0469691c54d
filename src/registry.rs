//! Driver registry.
//!
//! Maps driver type names to [`DriverFactory`] instances. Lookups take a shared
//! read lock and may run concurrently; registration takes the write lock and
//! is expected only while the process is being wired up.
//!
//! There is one process-wide registry, created on first use with the built-in
//! drivers, and any number of standalone registries for tests or embedders:
//!
//! ```rust
//! use openxc::DriverRegistry;
//!
//! let registry = DriverRegistry::with_builtin_drivers();
//! assert!(registry.contains("trace"));
//!
//! // Same lookup through the process-wide instance
//! assert!(DriverRegistry::global().contains("trace"));
//! ```

use crate::driver::DriverFactory;
use crate::drivers::trace::TraceDriverFactory;
use crate::error::RegistrationError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Process-wide registry, seeded with the built-in drivers on first access.
static GLOBAL_REGISTRY: OnceLock<DriverRegistry> = OnceLock::new();

/// Name → factory map guarded by a reader-writer lock.
#[derive(Default)]
pub struct DriverRegistry {
    factories: RwLock<HashMap<String, Arc<dyn DriverFactory>>>,
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.driver_types())
            .finish()
    }
}

impl DriverRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the drivers shipped with this crate.
    pub fn with_builtin_drivers() -> Self {
        let registry = Self::new();
        registry.register(TraceDriverFactory);
        registry
    }

    /// The process-wide registry.
    pub fn global() -> &'static DriverRegistry {
        GLOBAL_REGISTRY.get_or_init(Self::with_builtin_drivers)
    }

    /// Register a driver factory under its `driver_type()`.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty or already registered. Both mean the binary
    /// is wired incorrectly; use [`try_register`](Self::try_register) to get
    /// the error back instead.
    #[allow(clippy::panic)]
    pub fn register<F: DriverFactory>(&self, factory: F) {
        if let Err(err) = self.try_register(factory) {
            panic!("driver registration failed: {}", err);
        }
    }

    /// Register a driver factory, returning wiring errors.
    pub fn try_register<F: DriverFactory>(&self, factory: F) -> Result<(), RegistrationError> {
        self.try_register_arc(Arc::new(factory))
    }

    /// Register an already shared factory.
    pub fn try_register_arc(
        &self,
        factory: Arc<dyn DriverFactory>,
    ) -> Result<(), RegistrationError> {
        let driver_type = factory.driver_type();
        if driver_type.is_empty() {
            return Err(RegistrationError::NilDriver);
        }

        let mut factories = self.factories.write();
        if factories.contains_key(driver_type) {
            return Err(RegistrationError::DuplicateRegistration(
                driver_type.to_string(),
            ));
        }
        factories.insert(driver_type.to_string(), Arc::clone(&factory));
        info!(driver = driver_type, name = factory.name(), "Registered data source driver");
        Ok(())
    }

    /// Factory registered under `driver_type`, if any.
    pub fn lookup(&self, driver_type: &str) -> Option<Arc<dyn DriverFactory>> {
        self.factories.read().get(driver_type).cloned()
    }

    /// True if a driver is registered under `driver_type`.
    pub fn contains(&self, driver_type: &str) -> bool {
        self.factories.read().contains_key(driver_type)
    }

    /// Registered driver names, sorted.
    pub fn driver_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Register a driver with the process-wide registry.
///
/// # Panics
///
/// Panics on duplicate or empty names, see [`DriverRegistry::register`].
pub fn register_driver<F: DriverFactory>(factory: F) {
    DriverRegistry::global().register(factory);
}
