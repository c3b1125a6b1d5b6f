//! Desired-state and state-file documents.
//!
//! `.yaml`/`.yml` files are read and written as YAML, everything else as
//! JSON. Unknown values are stored as `{"$unknown": true}`.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CliError;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn document_error(path: &Path, reason: impl ToString) -> CliError {
    CliError::StateDocument {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|e| document_error(path, e))?;
    if is_yaml(path) {
        serde_yaml::from_str(&raw).map_err(|e| document_error(path, e))
    } else {
        serde_json::from_str(&raw).map_err(|e| document_error(path, e))
    }
}

/// Read the prior state, `None` when no state file exists yet.
pub fn read_prior<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CliError> {
    if path.exists() {
        read_document(path).map(Some)
    } else {
        Ok(None)
    }
}

pub fn write_document<T: Serialize>(path: &Path, state: &T) -> Result<(), CliError> {
    let out = if is_yaml(path) {
        serde_yaml::to_string(state).map_err(|e| document_error(path, e))?
    } else {
        let mut json = serde_json::to_string_pretty(state).map_err(|e| document_error(path, e))?;
        json.push('\n');
        json
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fmc_core::{Attr, SecurityZone};

    use super::*;

    #[test]
    fn yaml_desired_state_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone.yaml");
        std::fs::write(&path, "name: outside\ninterface_type: ROUTED\n").unwrap();

        let zone: SecurityZone = read_document(&path).unwrap();
        assert_eq!(zone.name, Attr::Known("outside".into()));
        assert!(zone.id.is_null());
    }

    #[test]
    fn unknown_survives_a_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let zone = SecurityZone {
            id: Attr::Unknown,
            name: "outside".into(),
            ..SecurityZone::default()
        };
        write_document(&path, &zone).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("$unknown"));
        let back: SecurityZone = read_document(&path).unwrap();
        assert_eq!(back, zone);
    }

    #[test]
    fn missing_state_file_is_no_prior() {
        let dir = tempfile::tempdir().unwrap();
        let prior: Option<SecurityZone> = read_prior(&dir.path().join("absent.json")).unwrap();
        assert_eq!(prior, None);
    }

    #[test]
    fn malformed_document_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_document::<SecurityZone>(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
