//! Optional vendor service probing.
//!
//! The services reached here (advertising identifier, app-set identifier,
//! availability check) ship with a vendor runtime the host app may or may
//! not bundle, so they cannot be a static dependency. The bridge registers
//! whatever is actually present under a well-known name; resolvers probe at
//! call time and classify the outcome:
//! - `Success(value)`: module present, call answered
//! - `NotFound`: module cannot be located; a normal outcome, logged at warn
//! - `Failed(reason)`: module present but the call errored, logged at error
//!
//! Payloads cross the registry boundary as JSON values so the registry stays
//! agnostic of individual service shapes.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

use dc_common::Result;

/// Well-known service names.
pub mod service_names {
    /// Advertising identifier lookup.
    pub const ADVERTISING_ID: &str = "advertising_id";
    /// App-set identifier lookup.
    pub const APP_SET_ID: &str = "app_set_id";
    /// Vendor services availability check.
    pub const AVAILABILITY: &str = "availability_check";
}

/// Status code the availability check reports when the runtime is usable.
pub const AVAILABILITY_SUCCESS: i64 = 0;

/// A single optional service the bridge registered.
pub trait Capability: Send + Sync {
    /// Invoke the service. Blocking; the underlying service bounds latency.
    fn invoke(&self, args: &Value) -> Result<Value>;
}

impl<F> Capability for F
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    fn invoke(&self, args: &Value) -> Result<Value> {
        self(args)
    }
}

/// Outcome of probing and invoking an optional service.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    /// Service present and the call answered.
    Success(T),
    /// Service cannot be located at runtime.
    NotFound,
    /// Service present but the call raised an error.
    Failed(String),
}

impl<T> Probe<T> {
    /// Extract the success value, discarding the failure classification.
    pub fn success(self) -> Option<T> {
        match self {
            Probe::Success(value) => Some(value),
            Probe::NotFound | Probe::Failed(_) => None,
        }
    }

    /// Whether the service was absent (as opposed to failing).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Probe::NotFound)
    }
}

/// Runtime registry of optional vendor services, keyed by name.
#[derive(Default)]
pub struct CapabilityRegistry {
    services: HashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under a well-known name, replacing any previous
    /// registration.
    pub fn register(&mut self, name: impl Into<String>, service: Arc<dyn Capability>) {
        self.services.insert(name.into(), service);
    }

    /// Register a closure-backed service.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, service: F)
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.services.insert(name.into(), Arc::new(service));
    }

    /// Whether a service is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Probe for a service and invoke it.
    ///
    /// Absence and invocation failure are both terminal here: they are
    /// logged and classified, never raised to the caller.
    pub fn invoke_optional(&self, name: &str, args: &Value) -> Probe<Value> {
        let Some(service) = self.services.get(name) else {
            warn!(service = name, "optional service not found");
            return Probe::NotFound;
        };
        match service.invoke(args) {
            Ok(value) => Probe::Success(value),
            Err(err) => {
                error!(service = name, error = %err, "optional service invocation failed");
                Probe::Failed(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CapabilityRegistry")
            .field("services", &names)
            .finish()
    }
}

/// Resolve the app-set identifier through the optional service.
///
/// The service answers with a JSON string; anything else is treated as a
/// failed invocation.
pub fn resolve_app_set_id(registry: &CapabilityRegistry) -> Option<String> {
    match registry.invoke_optional(service_names::APP_SET_ID, &Value::Null) {
        Probe::Success(Value::String(id)) if !id.is_empty() => Some(id),
        Probe::Success(other) => {
            warn!(payload = %other, "unexpected app set id payload");
            None
        }
        Probe::NotFound | Probe::Failed(_) => None,
    }
}

/// Ask the availability check whether the vendor services runtime is usable.
///
/// Only the exact success status counts; any other code, a malformed
/// payload, absence, or a failed call all mean "unavailable".
pub fn services_available(registry: &CapabilityRegistry) -> bool {
    match registry.invoke_optional(service_names::AVAILABILITY, &Value::Null) {
        Probe::Success(value) => value.as_i64() == Some(AVAILABILITY_SUCCESS),
        Probe::NotFound | Probe::Failed(_) => false,
    }
}
