//! Name → transport table and candidate resolution

use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use tracing::{debug, warn};

use super::{Adapter, AdapterSpec, HttpTransport};
use crate::error::{self, Error, Kind, Result};

/// How a known adapter name resolves in this build.
#[derive(Clone)]
pub enum Registration {
    Available(Adapter),
    /// Known, but the environment cannot provide it.
    Unsupported,
    /// Known, but not compiled into this build.
    Unbuilt,
}

/// Static table of named transports.
///
/// The process-wide instance is set once with [`init`] (or lazily with
/// [`AdapterRegistry::with_defaults`]) and is read-only afterwards.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    known: HashMap<String, Registration>,
}

/// Why a candidate was skipped during resolution.
enum Skipped {
    NotSupported,
    Unavailable,
}

impl AdapterRegistry {
    /// An empty table. Every name is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `http` is the socket transport, `xhr` is not supported outside a
    /// browser and `fetch` is not built.
    #[must_use]
    pub fn with_defaults() -> Self {
        AdapterRegistry::new()
            .register("http", Registration::Available(HttpTransport::shared()))
            .register("xhr", Registration::Unsupported)
            .register("fetch", Registration::Unbuilt)
    }

    #[must_use]
    pub fn register(mut self, name: &str, registration: Registration) -> Self {
        self.known.insert(name.to_ascii_lowercase(), registration);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.known.contains_key(&name.to_ascii_lowercase())
    }

    /// Return the first usable candidate of `spec`.
    ///
    /// Unknown names and values that are not transports fail immediately.
    /// Candidates that are disabled, unsupported or unbuilt are skipped; if
    /// every candidate is skipped, the last one decides the error kind.
    pub fn resolve(&self, spec: &AdapterSpec) -> Result<Adapter> {
        let candidates = spec.candidates();
        let mut skipped: Vec<(String, Skipped)> = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let (id, reason) = match candidate {
                AdapterSpec::Transport(adapter) => {
                    debug!(adapter = adapter.name(), "adapter selected");
                    return Ok(adapter.clone());
                }
                AdapterSpec::Name(name) => match self.known.get(&name.to_ascii_lowercase()) {
                    Some(Registration::Available(adapter)) => {
                        debug!(adapter = %name, "adapter selected");
                        return Ok(adapter.clone());
                    }
                    Some(Registration::Unsupported) => (name.clone(), Skipped::NotSupported),
                    Some(Registration::Unbuilt) => (name.clone(), Skipped::Unavailable),
                    None => {
                        warn!(adapter = %name, "unknown adapter");
                        return Err(error::unknown_adapter(name));
                    }
                },
                AdapterSpec::Disabled => (format!("#{index}"), Skipped::NotSupported),
                AdapterSpec::Value(serde_json::Value::Null) => (format!("#{index}"), Skipped::Unavailable),
                AdapterSpec::Value(_) | AdapterSpec::List(_) => {
                    warn!(candidate = index, "adapter candidate is not a transport");
                    return Err(error::invalid_adapter());
                }
            };
            debug!(adapter = %id, "adapter candidate skipped");
            skipped.push((id, reason));
        }

        let err = no_suitable_adapter(&skipped);
        warn!(error = %err, "adapter resolution failed");
        Err(err)
    }
}

fn no_suitable_adapter(skipped: &[(String, Skipped)]) -> Error {
    match skipped {
        [] => Error::new(Kind::NotSupported)
            .with_message("There is no suitable adapter to dispatch the request as no adapter specified"),
        [(id, Skipped::NotSupported)] => error::not_supported(id),
        [(id, Skipped::Unavailable)] => error::adapter_unavailable(id),
        [.., (_, last)] => {
            let reasons: Vec<String> = skipped
                .iter()
                .map(|(id, reason)| match reason {
                    Skipped::NotSupported => format!("- adapter {id} is not supported by the environment"),
                    Skipped::Unavailable => format!("- adapter {id} is not available in the build"),
                })
                .collect();
            let kind = match last {
                Skipped::NotSupported => Kind::NotSupported,
                Skipped::Unavailable => Kind::AdapterUnavailable,
            };
            Error::new(kind).with_message(format!(
                "There is no suitable adapter to dispatch the request since:\n{}",
                reasons.join("\n")
            ))
        }
    }
}

static GLOBAL_REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();

/// Install the process-wide registry. Only the first call has an effect;
/// later calls, and calls after the registry was first used, return false.
pub fn init(registry: AdapterRegistry) -> bool {
    let installed = GLOBAL_REGISTRY.set(registry).is_ok();
    if !installed {
        warn!("adapter registry already initialized; ignoring re-initialization");
    }
    installed
}

/// The process-wide registry, defaulting to [`AdapterRegistry::with_defaults`].
pub fn global() -> &'static AdapterRegistry {
    GLOBAL_REGISTRY.get_or_init(AdapterRegistry::with_defaults)
}

/// Resolve `spec` against the process-wide registry.
pub fn get_adapter(spec: &AdapterSpec) -> Result<Adapter> {
    global().resolve(spec)
}

impl From<HttpTransport> for Registration {
    fn from(transport: HttpTransport) -> Self {
        Registration::Available(Arc::new(transport))
    }
}
