// ── Version-gated features ──
//
// Some resources only exist on newer FMC releases. The connected server's
// version is resolved once per session into a `Capabilities` table, which
// resources consult before issuing any request.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::CoreError;

/// A parsed FMC release, e.g. `7.4.1 (build 172)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FmcVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<u32>,
}

impl FmcVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build: None,
        }
    }

    /// Compare release numbers only; build numbers never gate features.
    fn release(self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl FromStr for FmcVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Internal(format!("unrecognised FMC version string '{s}'"));

        let s = s.trim();
        let (release, rest) = s.split_once(' ').unwrap_or((s, ""));
        let mut parts = release.split('.').map(|p| p.parse::<u32>().map_err(|_| invalid()));
        let major = parts.next().ok_or_else(invalid)??;
        let minor = parts.next().transpose()?.unwrap_or(0);
        // Hotfix releases carry a fourth component (7.2.5.1), ignored here.
        let patch = parts.next().transpose()?.unwrap_or(0);

        let build = rest
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .strip_prefix("build ")
            .and_then(|b| b.trim().parse().ok());

        Ok(Self {
            major,
            minor,
            patch,
            build,
        })
    }
}

impl fmt::Display for FmcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = self.build {
            write!(f, " (build {build})")?;
        }
        Ok(())
    }
}

/// Features that require a minimum FMC release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
pub enum Feature {
    CertificateMap,
    BulkHostDelete,
}

impl Feature {
    pub const fn min_version(self) -> FmcVersion {
        match self {
            Self::CertificateMap => FmcVersion::new(7, 2, 0),
            Self::BulkHostDelete => FmcVersion::new(7, 4, 0),
        }
    }
}

/// Per-session feature availability, computed from the server version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    version: FmcVersion,
    supported: Vec<Feature>,
}

impl Capabilities {
    pub fn resolve(version: FmcVersion) -> Self {
        let supported = Feature::iter()
            .filter(|f| version.release() >= f.min_version().release())
            .collect();
        Self { version, supported }
    }

    pub fn version(&self) -> FmcVersion {
        self.version
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.supported.contains(&feature)
    }

    /// Fail with `UnsupportedVersion` when the server is too old.
    pub fn require(&self, feature: Feature) -> Result<(), CoreError> {
        if self.supports(feature) {
            return Ok(());
        }
        Err(CoreError::UnsupportedVersion {
            feature: feature.to_string(),
            required: feature.min_version().to_string(),
            actual: self.version.to_string(),
        })
    }

    /// Every feature with its minimum version and availability.
    pub fn table(&self) -> Vec<(Feature, FmcVersion, bool)> {
        Feature::iter()
            .map(|f| (f, f.min_version(), self.supports(f)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_server_version_string() {
        let v: FmcVersion = "7.4.1 (build 172)".parse().unwrap();
        assert_eq!(v.release(), (7, 4, 1));
        assert_eq!(v.build, Some(172));
        assert_eq!(v.to_string(), "7.4.1 (build 172)");
    }

    #[test]
    fn parses_short_and_hotfix_versions() {
        assert_eq!("7.2".parse::<FmcVersion>().unwrap(), FmcVersion::new(7, 2, 0));
        assert_eq!("7.2.5.1".parse::<FmcVersion>().unwrap().release(), (7, 2, 5));
        assert!("seven".parse::<FmcVersion>().is_err());
    }

    #[test]
    fn gates_by_minimum_version() {
        let caps = Capabilities::resolve("7.2.0 (build 82)".parse().unwrap());
        assert!(caps.supports(Feature::CertificateMap));
        assert!(!caps.supports(Feature::BulkHostDelete));

        let err = caps.require(Feature::BulkHostDelete).unwrap_err();
        assert_eq!(err.summary(), "UnsupportedVersion");
        assert!(err.to_string().contains("7.4.0"));
    }

    #[test]
    fn feature_names_parse() {
        assert_eq!("CertificateMap".parse::<Feature>().unwrap(), Feature::CertificateMap);
        assert_eq!(Capabilities::resolve(FmcVersion::new(7, 6, 0)).table().len(), 2);
    }
}
