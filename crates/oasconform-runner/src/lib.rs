//! Runner: document loading, HTTP transport and the conformance driver.
//!
//! The core crate models schemas and draws values; this crate connects that
//! engine to the outside world. [`run_conformance_test`] is the one-call
//! entry point the CLI uses: load a definition, build the catalog, point a
//! client at the server and let the [`driver::Driver`] do the rest.

pub mod checks;
pub mod client;
pub mod config;
pub mod driver;
pub mod loader;

pub use checks::{Failure, FailureKind};
pub use client::{ApiRequest, ApiResponse, HttpClient, RequestBody, Transport, TransportError};
pub use config::{Config, ConfigError};
pub use driver::{Driver, DriverError, OperationReport, RunReport};
pub use loader::{DocumentResolver, LoaderError, load_document};

use oasconform_core::{ApiCatalog, GeneratorFactory};

/// Load the definition at `location` (file path or URL) and test every
/// operation it declares against the live server.
///
/// The server root comes from the config's `base_url` when set, otherwise
/// from the definition's `schemes`/`host`/`basePath`.
pub fn run_conformance_test(
    location: &str,
    driver: &Driver,
    config: &Config,
    factory: &GeneratorFactory,
) -> Result<RunReport, DriverError> {
    let document = loader::load_document(location)?;
    let resolver = DocumentResolver::new(document);
    let catalog = ApiCatalog::from_document(resolver.document(), &resolver)?;

    let base_url = config
        .base_url
        .clone()
        .or_else(|| catalog.base_url())
        .ok_or(DriverError::NoBaseUrl)?;
    let headers: Vec<(String, String)> = config
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let client = HttpClient::new(&base_url, headers, config.timeout())?;

    driver.run(&client, &catalog, factory)
}
