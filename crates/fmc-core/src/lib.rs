//! Declarative state reconciliation for Cisco FMC configuration objects.
//!
//! Sits between `fmc-api` and the `fmc` CLI:
//!
//! - **[`Attr`]**: tri-state attribute (null / unknown / known) used for
//!   every field of a resource state.
//! - **[`Resource`]**: the explicit per-resource mapping between state and a
//!   typed wire DTO (encode, decode, partial refresh, unknown resolution).
//! - **[`reconcile`]**: key-tuple, positional and name-keyed collection
//!   reconciliation.
//! - **[`resolve_id_by_name`]**: paginated name-to-id scan.
//! - **[`Capabilities`]**: per-session feature gates derived from the
//!   server version.
//! - **[`Provider`]** + **[`Lifecycle`]**: Create / Read / Update / Delete.

pub mod capability;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod path;
pub mod provider;
pub mod reconcile;
pub mod resolver;
pub mod resource;
pub mod resources;
pub mod value;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capability::{Capabilities, Feature, FmcVersion};
pub use config::{ConnectionConfig, TlsVerification};
pub use error::CoreError;
pub use lifecycle::{Lifecycle, ReadMode};
pub use path::ResourcePath;
pub use provider::Provider;
pub use reconcile::KeyTuple;
pub use resolver::{PAGE_SIZE, PageSource, resolve_id_by_name};
pub use resource::{Identified, Resource};
pub use resources::{AccessRule, CertificateMap, Hosts, ResourceKind, SecurityZone};
pub use value::{Attr, DefaultRule, FieldDefault};
