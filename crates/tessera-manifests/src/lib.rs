//! # tessera-manifests
//!
//! The cluster configuration asset catalog - THE CATALOG.
//!
//! Every asset here is a concrete type implementing [`tessera_core::Asset`]:
//!
//! ```text
//!                      ┌──────────────────┐
//!                      │ Common Manifests │  (group target)
//!                      └────────┬─────────┘
//!        ┌──────────────┬───────┴──────┬────────────────┐
//!        ▼              ▼              ▼                ▼
//!   Ingress Config  DNS Config  Infrastructure   Network Config
//!        │              │          Config               │
//!        └──────────────┴──────┬───────┴────────────────┘
//!                              ▼
//!                      ┌────────────────┐
//!                      │ Install Config │  (input: install-config.yaml)
//!                      └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use tessera_core::{MemoryFetcher, Pass};
//! use tessera_manifests::{Ingress, INSTALL_CONFIG_FILENAME};
//!
//! let fetcher = MemoryFetcher::new().with_file(
//!     INSTALL_CONFIG_FILENAME,
//!     "baseDomain: example.com\nmetadata:\n  name: foo\n",
//! );
//! let output = Pass::new(&fetcher).target(Ingress::default()).run().expect("pass");
//! assert_eq!(output.files.len(), 1);
//! ```

pub mod dns;
pub mod error;
pub mod infrastructure;
pub mod ingress;
pub mod install_config;
pub mod manifests;
pub mod network;
pub mod object;

pub use dns::{DNS_CONFIG_FILENAME, Dns};
pub use error::ManifestError;
pub use infrastructure::{INFRASTRUCTURE_CONFIG_FILENAME, Infrastructure};
pub use ingress::{INGRESS_CONFIG_FILENAME, Ingress};
pub use install_config::{INSTALL_CONFIG_FILENAME, InstallConfig, InstallConfigDocument};
pub use manifests::Manifests;
pub use network::{NETWORK_CONFIG_FILENAME, Network};
pub use object::MANIFEST_DIR;
