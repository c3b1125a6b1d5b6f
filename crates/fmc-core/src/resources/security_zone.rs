// `fmc_security_zone`: a named group of interfaces sharing an interface mode.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::path::ResourcePath;
use crate::resource::{Identified, Resource, require};
use crate::value::Attr;

const PATH: &str = "/api/fmc_config/v1/domain/{DOMAIN_UUID}/object/securityzones";
const WIRE_TYPE: &str = "SecurityZone";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityZone {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub domain: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub name: Attr<String>,
    /// `ROUTED`, `SWITCHED`, `INLINE`, `PASSIVE` or `ASA`.
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub interface_type: Attr<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityZoneWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_mode: Option<String>,
}

impl Resource for SecurityZone {
    const TYPE_NAME: &'static str = "fmc_security_zone";

    type Wire = SecurityZoneWire;

    fn path(&self) -> Result<ResourcePath, CoreError> {
        Ok(ResourcePath::new(PATH))
    }

    fn domain(&self) -> &Attr<String> {
        &self.domain
    }

    fn to_body(&self) -> SecurityZoneWire {
        SecurityZoneWire {
            id: self.id.to_wire(),
            object_type: Some(WIRE_TYPE.to_owned()),
            name: self.name.to_wire(),
            interface_mode: self.interface_type.to_wire(),
        }
    }

    fn from_body(&mut self, wire: &SecurityZoneWire) {
        self.id.adopt_unless_known(wire.id.clone());
        self.name = Attr::from_option(wire.name.clone());
        self.interface_type = Attr::from_option(wire.interface_mode.clone());
    }

    fn from_body_partial(&mut self, wire: &SecurityZoneWire) {
        self.name.refresh(wire.name.clone());
        self.interface_type.refresh(wire.interface_mode.clone());
    }

    fn from_body_unknowns(&mut self, wire: &SecurityZoneWire) {
        self.id.resolve_unknown(wire.id.clone());
    }

    fn validate(&self) -> Result<(), CoreError> {
        require(Self::TYPE_NAME, "name", &self.name)?;
        require(Self::TYPE_NAME, "interface_type", &self.interface_type)
    }
}

impl Identified for SecurityZone {
    fn id(&self) -> &Attr<String> {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Attr<String> {
        &mut self.id
    }

    fn name(&self) -> &Attr<String> {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn encodes_declared_fields_only() {
        let zone = SecurityZone {
            id: Attr::Unknown,
            name: "outside".into(),
            ..SecurityZone::default()
        };
        assert_eq!(
            serde_json::to_value(zone.to_body()).unwrap(),
            json!({ "type": "SecurityZone", "name": "outside" })
        );
    }

    #[test]
    fn partial_refresh_ignores_undeclared_mode() {
        let mut zone = SecurityZone {
            id: "z1".into(),
            name: "outside".into(),
            ..SecurityZone::default()
        };
        let wire: SecurityZoneWire = serde_json::from_value(json!({
            "id": "z1", "type": "SecurityZone", "name": "outside-renamed", "interfaceMode": "ROUTED"
        }))
        .unwrap();

        zone.from_body_partial(&wire);
        assert_eq!(zone.name, Attr::Known("outside-renamed".into()));
        assert!(zone.interface_type.is_null());
    }

    #[test]
    fn round_trips_declared_fields() {
        let zone = SecurityZone {
            id: "z1".into(),
            name: "outside".into(),
            interface_type: "ROUTED".into(),
            ..SecurityZone::default()
        };
        let mut decoded = SecurityZone::default();
        decoded.from_body(&zone.to_body());
        assert_eq!(decoded, zone);
    }

    #[test]
    fn full_decode_keeps_known_id() {
        let mut zone = SecurityZone {
            id: "z1".into(),
            ..SecurityZone::default()
        };
        let wire: SecurityZoneWire =
            serde_json::from_value(json!({ "id": "z2", "name": "outside", "interfaceMode": "ROUTED" })).unwrap();
        zone.from_body(&wire);
        assert_eq!(zone.id, Attr::Known("z1".into()));
        assert_eq!(zone.interface_type, Attr::Known("ROUTED".into()));
    }

    #[test]
    fn validate_requires_mode() {
        let zone = SecurityZone {
            name: "outside".into(),
            ..SecurityZone::default()
        };
        assert!(zone.validate().is_err());
    }
}
