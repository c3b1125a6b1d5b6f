//! Concrete FMC resources.

mod access_rule;
mod certificate_map;
mod hosts;
mod security_zone;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

pub use access_rule::{AccessRule, AccessRuleWire, NetworkLiteral, ObjectRef, PortLiteral, ZoneRef};
pub use certificate_map::{CertificateMap, CertificateMapRule, CertificateMapWire};
pub use hosts::{HostItem, HostWire, Hosts, HostsWire};
pub use security_zone::{SecurityZone, SecurityZoneWire};

/// Every resource type this crate manages, by its type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
pub enum ResourceKind {
    #[strum(serialize = "fmc_access_rule")]
    AccessRule,
    #[strum(serialize = "fmc_hosts")]
    Hosts,
    #[strum(serialize = "fmc_certificate_map")]
    CertificateMap,
    #[strum(serialize = "fmc_security_zone")]
    SecurityZone,
}
