// `fmc_access_rule`: one rule inside an access control policy.
//
// State keeps literals and objects in separate lists (networks and ports)
// mirroring the wire's `literals` and `objects` arrays, so each list round-trips
// in order.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::path::ResourcePath;
use crate::reconcile::{KeyTuple, attr_key, opt_key, reconcile_keyed, resolve_keyed};
use crate::resource::{Identified, Resource, ensure_unique_keys, require};
use crate::value::{Attr, FieldDefault};

const PATH: &str =
    "/api/fmc_config/v1/domain/{DOMAIN_UUID}/policy/accesspolicies/{access_policy_id}/accessrules";
const WIRE_TYPE: &str = "AccessRule";

const ACTIONS: &[&str] = &[
    "ALLOW",
    "TRUST",
    "BLOCK",
    "MONITOR",
    "BLOCK_RESET",
    "BLOCK_INTERACTIVE",
    "BLOCK_RESET_INTERACTIVE",
];

const ENABLED: FieldDefault<bool> = FieldDefault::null_unless_default(true);
const LOG_FLAG: FieldDefault<bool> = FieldDefault::null_unless_default(false);

// ── State ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessRule {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub domain: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub access_policy_id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub name: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub action: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub enabled: Attr<bool>,
    /// `mandatory` or `default`; only sent when creating.
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub section: Attr<String>,
    /// Only sent when creating.
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub category: Attr<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_zones: Vec<ZoneRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_zones: Vec<ZoneRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_network_literals: Vec<NetworkLiteral>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_network_literals: Vec<NetworkLiteral>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_network_objects: Vec<ObjectRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_network_objects: Vec<ObjectRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_port_literals: Vec<PortLiteral>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_port_literals: Vec<PortLiteral>,
    /// Port objects; `type` defaults to `ProtocolPortObject` when unset.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_port_objects: Vec<ObjectRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_port_objects: Vec<ObjectRef>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub log_begin: Attr<bool>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub log_end: Attr<bool>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub log_files: Attr<bool>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub send_events_to_fmc: Attr<bool>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub enable_syslog: Attr<bool>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub syslog_severity: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub ips_policy_id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub file_policy_id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub description: Attr<String>,
}

/// Security zone reference, keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneRef {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub id: Attr<String>,
}

/// Inline address, keyed by `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkLiteral {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub value: Attr<String>,
}

/// Reference to a network object, keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRef {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub id: Attr<String>,
    #[serde(rename = "type", skip_serializing_if = "Attr::is_null")]
    pub object_type: Attr<String>,
}

/// Inline port or ICMP literal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortLiteral {
    #[serde(rename = "type", skip_serializing_if = "Attr::is_null")]
    pub object_type: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub port: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub protocol: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub icmp_type: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub icmp_code: Attr<i64>,
}

const PORT_OBJECT_TYPE: &str = "ProtocolPortObject";
const ICMPV6_PROTOCOL: &str = "58";

impl PortLiteral {
    /// The wire `type`, filled in when the caller left it unset.
    fn effective_type(&self) -> String {
        if let Some(t) = self.object_type.known() {
            return t.clone();
        }
        if !self.icmp_type.is_known() {
            "PortLiteral".to_owned()
        } else if self.protocol.known().is_some_and(|p| p == ICMPV6_PROTOCOL) {
            "ICMPv6PortLiteral".to_owned()
        } else {
            "ICMPv4PortLiteral".to_owned()
        }
    }
}

// ── Key tuples ───────────────────────────────────────────────────────

impl KeyTuple for ZoneRef {
    fn key(&self) -> Vec<String> {
        vec![attr_key(&self.id)]
    }
}

impl KeyTuple for NetworkLiteral {
    fn key(&self) -> Vec<String> {
        vec![attr_key(&self.value)]
    }
}

impl KeyTuple for ObjectRef {
    fn key(&self) -> Vec<String> {
        vec![attr_key(&self.id)]
    }
}

impl KeyTuple for PortLiteral {
    fn key(&self) -> Vec<String> {
        vec![
            self.effective_type(),
            attr_key(&self.port),
            attr_key(&self.protocol),
            attr_key(&self.icmp_type),
            attr_key(&self.icmp_code),
        ]
    }
}

// ── Wire ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRuleWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_zones: Option<Objects<ReferenceWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_zones: Option<Objects<ReferenceWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_networks: Option<Split<LiteralWire, ReferenceWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_networks: Option<Split<LiteralWire, ReferenceWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ports: Option<Split<PortWire, ReferenceWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ports: Option<Split<PortWire, ReferenceWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_begin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_end: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_files: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_events_to_fmc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_syslog: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips_policy: Option<ReferenceWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_policy: Option<ReferenceWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `{ "objects": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objects<O> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<O>,
}

/// `{ "literals": [...], "objects": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Split<L, O> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<L>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<O>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteralWire {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub literal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortWire {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl KeyTuple for ReferenceWire {
    fn key(&self) -> Vec<String> {
        vec![opt_key(self.id.as_ref())]
    }
}

impl KeyTuple for LiteralWire {
    fn key(&self) -> Vec<String> {
        vec![opt_key(self.value.as_ref())]
    }
}

impl KeyTuple for PortWire {
    fn key(&self) -> Vec<String> {
        vec![
            opt_key(self.object_type.as_ref()),
            opt_key(self.port.as_ref()),
            opt_key(self.protocol.as_ref()),
            opt_key(self.icmp_type.as_ref()),
            opt_key(self.code.as_ref()),
        ]
    }
}

/// FMC wants a literal type alongside each inline address.
fn literal_type(value: &str) -> &'static str {
    if value.contains('/') {
        "Network"
    } else if value.contains('-') {
        "Range"
    } else {
        "Host"
    }
}

// ── Encoding helpers ─────────────────────────────────────────────────

fn encode_zones(zones: &[ZoneRef]) -> Option<Objects<ReferenceWire>> {
    let objects: Vec<_> = zones
        .iter()
        .filter_map(|z| z.id.to_wire())
        .map(|id| ReferenceWire {
            id: Some(id),
            object_type: Some("SecurityZone".to_owned()),
            name: None,
        })
        .collect();
    (!objects.is_empty()).then_some(Objects { objects })
}

fn encode_networks(
    literals: &[NetworkLiteral],
    objects: &[ObjectRef],
) -> Option<Split<LiteralWire, ReferenceWire>> {
    let split = Split {
        literals: literals
            .iter()
            .filter_map(|l| l.value.to_wire())
            .map(|value| LiteralWire {
                literal_type: Some(literal_type(&value).to_owned()),
                value: Some(value),
            })
            .collect(),
        objects: objects
            .iter()
            .map(|o| ReferenceWire {
                id: o.id.to_wire(),
                object_type: o.object_type.to_wire(),
                name: None,
            })
            .collect(),
    };
    (!split.literals.is_empty() || !split.objects.is_empty()).then_some(split)
}

fn encode_ports(literals: &[PortLiteral], objects: &[ObjectRef]) -> Option<Split<PortWire, ReferenceWire>> {
    let split = Split {
        literals: literals
            .iter()
            .map(|l| PortWire {
                object_type: Some(l.effective_type()),
                port: l.port.to_wire(),
                protocol: l.protocol.to_wire(),
                icmp_type: l.icmp_type.to_wire(),
                code: l.icmp_code.to_wire(),
            })
            .collect(),
        objects: objects
            .iter()
            .map(|o| ReferenceWire {
                id: o.id.to_wire(),
                object_type: Some(o.object_type.to_wire().unwrap_or_else(|| PORT_OBJECT_TYPE.to_owned())),
                name: None,
            })
            .collect(),
    };
    (!split.literals.is_empty() || !split.objects.is_empty()).then_some(split)
}

fn reference(id: &Attr<String>) -> Option<ReferenceWire> {
    id.to_wire().map(|id| ReferenceWire {
        id: Some(id),
        ..ReferenceWire::default()
    })
}

// ── Decoding helpers ─────────────────────────────────────────────────

fn zone_wire(zones: Option<&Objects<ReferenceWire>>) -> &[ReferenceWire] {
    zones.map(|z| z.objects.as_slice()).unwrap_or_default()
}

fn network_literals(networks: Option<&Split<LiteralWire, ReferenceWire>>) -> &[LiteralWire] {
    networks.map(|n| n.literals.as_slice()).unwrap_or_default()
}

fn network_objects(networks: Option<&Split<LiteralWire, ReferenceWire>>) -> &[ReferenceWire] {
    networks.map(|n| n.objects.as_slice()).unwrap_or_default()
}

fn port_literals(ports: Option<&Split<PortWire, ReferenceWire>>) -> &[PortWire] {
    ports.map(|p| p.literals.as_slice()).unwrap_or_default()
}

fn port_objects(ports: Option<&Split<PortWire, ReferenceWire>>) -> &[ReferenceWire] {
    ports.map(|p| p.objects.as_slice()).unwrap_or_default()
}

fn decode_port(wire: &PortWire) -> PortLiteral {
    PortLiteral {
        object_type: Attr::from_option(wire.object_type.clone()),
        port: Attr::from_option(wire.port.clone()),
        protocol: Attr::from_option(wire.protocol.clone()),
        icmp_type: Attr::from_option(wire.icmp_type.clone()),
        icmp_code: Attr::from_option(wire.code),
    }
}

fn decode_reference(wire: &ReferenceWire) -> ObjectRef {
    ObjectRef {
        id: Attr::from_option(wire.id.clone()),
        object_type: Attr::from_option(wire.object_type.clone()),
    }
}

fn reference_id(wire: Option<&ReferenceWire>) -> Option<String> {
    wire.and_then(|r| r.id.clone())
}

// ── Resource ─────────────────────────────────────────────────────────

impl Resource for AccessRule {
    const TYPE_NAME: &'static str = "fmc_access_rule";

    type Wire = AccessRuleWire;

    fn path(&self) -> Result<ResourcePath, CoreError> {
        let policy = self
            .access_policy_id
            .known()
            .ok_or_else(|| CoreError::validation(format!("{}: access_policy_id is required", Self::TYPE_NAME)))?;
        ResourcePath::new(PATH).bind("access_policy_id", policy)
    }

    fn domain(&self) -> &Attr<String> {
        &self.domain
    }

    fn to_body(&self) -> AccessRuleWire {
        AccessRuleWire {
            id: self.id.to_wire(),
            object_type: Some(WIRE_TYPE.to_owned()),
            name: self.name.to_wire(),
            action: self.action.to_wire(),
            enabled: self.enabled.to_wire(),
            source_zones: encode_zones(&self.source_zones),
            destination_zones: encode_zones(&self.destination_zones),
            source_networks: encode_networks(&self.source_network_literals, &self.source_network_objects),
            destination_networks: encode_networks(
                &self.destination_network_literals,
                &self.destination_network_objects,
            ),
            source_ports: encode_ports(&self.source_port_literals, &self.source_port_objects),
            destination_ports: encode_ports(&self.destination_port_literals, &self.destination_port_objects),
            log_begin: self.log_begin.to_wire(),
            log_end: self.log_end.to_wire(),
            log_files: self.log_files.to_wire(),
            send_events_to_fmc: self.send_events_to_fmc.to_wire(),
            enable_syslog: self.enable_syslog.to_wire(),
            syslog_severity: self.syslog_severity.to_wire(),
            ips_policy: reference(&self.ips_policy_id),
            file_policy: reference(&self.file_policy_id),
            description: self.description.to_wire(),
        }
    }

    fn from_body(&mut self, wire: &AccessRuleWire) {
        self.id.adopt_unless_known(wire.id.clone());
        self.name = Attr::from_option(wire.name.clone());
        self.action = Attr::from_option(wire.action.clone());
        self.enabled = ENABLED.decode(wire.enabled);

        self.source_zones = zone_wire(wire.source_zones.as_ref())
            .iter()
            .map(|z| ZoneRef {
                id: Attr::from_option(z.id.clone()),
            })
            .collect();
        self.destination_zones = zone_wire(wire.destination_zones.as_ref())
            .iter()
            .map(|z| ZoneRef {
                id: Attr::from_option(z.id.clone()),
            })
            .collect();

        self.source_network_literals = network_literals(wire.source_networks.as_ref())
            .iter()
            .map(|l| NetworkLiteral {
                value: Attr::from_option(l.value.clone()),
            })
            .collect();
        self.destination_network_literals = network_literals(wire.destination_networks.as_ref())
            .iter()
            .map(|l| NetworkLiteral {
                value: Attr::from_option(l.value.clone()),
            })
            .collect();
        self.source_network_objects = network_objects(wire.source_networks.as_ref())
            .iter()
            .map(decode_reference)
            .collect();
        self.destination_network_objects = network_objects(wire.destination_networks.as_ref())
            .iter()
            .map(decode_reference)
            .collect();

        self.source_port_literals = port_literals(wire.source_ports.as_ref())
            .iter()
            .map(decode_port)
            .collect();
        self.destination_port_literals = port_literals(wire.destination_ports.as_ref())
            .iter()
            .map(decode_port)
            .collect();
        self.source_port_objects = port_objects(wire.source_ports.as_ref())
            .iter()
            .map(decode_reference)
            .collect();
        self.destination_port_objects = port_objects(wire.destination_ports.as_ref())
            .iter()
            .map(decode_reference)
            .collect();

        self.log_begin = LOG_FLAG.decode(wire.log_begin);
        self.log_end = LOG_FLAG.decode(wire.log_end);
        self.log_files = LOG_FLAG.decode(wire.log_files);
        self.send_events_to_fmc = LOG_FLAG.decode(wire.send_events_to_fmc);
        self.enable_syslog = LOG_FLAG.decode(wire.enable_syslog);
        self.syslog_severity = Attr::from_option(wire.syslog_severity.clone());
        self.ips_policy_id = Attr::from_option(reference_id(wire.ips_policy.as_ref()));
        self.file_policy_id = Attr::from_option(reference_id(wire.file_policy.as_ref()));
        self.description = Attr::from_option(wire.description.clone());
    }

    fn from_body_partial(&mut self, wire: &AccessRuleWire) {
        self.name.refresh(wire.name.clone());
        self.action.refresh(wire.action.clone());
        ENABLED.refresh(&mut self.enabled, wire.enabled);

        reconcile_keyed(
            "source_zones",
            &mut self.source_zones,
            zone_wire(wire.source_zones.as_ref()),
            |_, _| {},
        );
        reconcile_keyed(
            "destination_zones",
            &mut self.destination_zones,
            zone_wire(wire.destination_zones.as_ref()),
            |_, _| {},
        );
        reconcile_keyed(
            "source_network_literals",
            &mut self.source_network_literals,
            network_literals(wire.source_networks.as_ref()),
            |_, _| {},
        );
        reconcile_keyed(
            "destination_network_literals",
            &mut self.destination_network_literals,
            network_literals(wire.destination_networks.as_ref()),
            |_, _| {},
        );
        reconcile_keyed(
            "source_network_objects",
            &mut self.source_network_objects,
            network_objects(wire.source_networks.as_ref()),
            |local, w| local.object_type.refresh(w.object_type.clone()),
        );
        reconcile_keyed(
            "destination_network_objects",
            &mut self.destination_network_objects,
            network_objects(wire.destination_networks.as_ref()),
            |local, w| local.object_type.refresh(w.object_type.clone()),
        );
        // Every port literal field is part of the key, so matches need no update.
        reconcile_keyed(
            "source_port_literals",
            &mut self.source_port_literals,
            port_literals(wire.source_ports.as_ref()),
            |_, _| {},
        );
        reconcile_keyed(
            "destination_port_literals",
            &mut self.destination_port_literals,
            port_literals(wire.destination_ports.as_ref()),
            |_, _| {},
        );
        reconcile_keyed(
            "source_port_objects",
            &mut self.source_port_objects,
            port_objects(wire.source_ports.as_ref()),
            |local, w| local.object_type.refresh(w.object_type.clone()),
        );
        reconcile_keyed(
            "destination_port_objects",
            &mut self.destination_port_objects,
            port_objects(wire.destination_ports.as_ref()),
            |local, w| local.object_type.refresh(w.object_type.clone()),
        );

        LOG_FLAG.refresh(&mut self.log_begin, wire.log_begin);
        LOG_FLAG.refresh(&mut self.log_end, wire.log_end);
        LOG_FLAG.refresh(&mut self.log_files, wire.log_files);
        LOG_FLAG.refresh(&mut self.send_events_to_fmc, wire.send_events_to_fmc);
        LOG_FLAG.refresh(&mut self.enable_syslog, wire.enable_syslog);
        self.syslog_severity.refresh(wire.syslog_severity.clone());
        self.ips_policy_id.refresh(reference_id(wire.ips_policy.as_ref()));
        self.file_policy_id.refresh(reference_id(wire.file_policy.as_ref()));
        self.description.refresh(wire.description.clone());
    }

    fn from_body_unknowns(&mut self, wire: &AccessRuleWire) {
        self.id.resolve_unknown(wire.id.clone());
        self.name.resolve_unknown(wire.name.clone());
        self.action.resolve_unknown(wire.action.clone());
        self.enabled.resolve_unknown(wire.enabled);
        self.log_begin.resolve_unknown(wire.log_begin);
        self.log_end.resolve_unknown(wire.log_end);
        self.log_files.resolve_unknown(wire.log_files);
        self.send_events_to_fmc.resolve_unknown(wire.send_events_to_fmc);
        self.enable_syslog.resolve_unknown(wire.enable_syslog);
        self.syslog_severity.resolve_unknown(wire.syslog_severity.clone());
        self.ips_policy_id.resolve_unknown(reference_id(wire.ips_policy.as_ref()));
        self.file_policy_id.resolve_unknown(reference_id(wire.file_policy.as_ref()));
        self.description.resolve_unknown(wire.description.clone());

        resolve_keyed(
            &mut self.source_network_objects,
            network_objects(wire.source_networks.as_ref()),
            |local, w| local.object_type.resolve_unknown(w.and_then(|w| w.object_type.clone())),
        );
        resolve_keyed(
            &mut self.destination_network_objects,
            network_objects(wire.destination_networks.as_ref()),
            |local, w| local.object_type.resolve_unknown(w.and_then(|w| w.object_type.clone())),
        );
        resolve_keyed(
            &mut self.source_port_objects,
            port_objects(wire.source_ports.as_ref()),
            |local, w| local.object_type.resolve_unknown(w.and_then(|w| w.object_type.clone())),
        );
        resolve_keyed(
            &mut self.destination_port_objects,
            port_objects(wire.destination_ports.as_ref()),
            |local, w| local.object_type.resolve_unknown(w.and_then(|w| w.object_type.clone())),
        );
    }

    fn validate(&self) -> Result<(), CoreError> {
        let name = Self::TYPE_NAME;
        require(name, "access_policy_id", &self.access_policy_id)?;
        require(name, "name", &self.name)?;
        require(name, "action", &self.action)?;

        if let Some(action) = self.action.known() {
            if !ACTIONS.contains(&action.as_str()) {
                return Err(CoreError::validation(format!(
                    "{name}: action must be one of {}, got '{action}'",
                    ACTIONS.join(", ")
                )));
            }
        }
        for (field, objects) in [
            ("source_network_objects", &self.source_network_objects),
            ("destination_network_objects", &self.destination_network_objects),
        ] {
            for object in objects {
                require(name, &format!("{field}.type"), &object.object_type)?;
            }
            ensure_unique_keys(name, field, objects)?;
        }

        ensure_unique_keys(name, "source_zones", &self.source_zones)?;
        ensure_unique_keys(name, "destination_zones", &self.destination_zones)?;
        ensure_unique_keys(name, "source_network_literals", &self.source_network_literals)?;
        ensure_unique_keys(name, "destination_network_literals", &self.destination_network_literals)?;
        ensure_unique_keys(name, "source_port_literals", &self.source_port_literals)?;
        ensure_unique_keys(name, "destination_port_literals", &self.destination_port_literals)?;
        ensure_unique_keys(name, "source_port_objects", &self.source_port_objects)?;
        ensure_unique_keys(name, "destination_port_objects", &self.destination_port_objects)
    }
}

impl Identified for AccessRule {
    fn id(&self) -> &Attr<String> {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Attr<String> {
        &mut self.id
    }

    fn name(&self) -> &Attr<String> {
        &self.name
    }

    fn create_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(section) = self.section.known() {
            params.push(("section", section.clone()));
        }
        if let Some(category) = self.category.known() {
            params.push(("category", category.clone()));
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn zone(id: &str) -> ZoneRef {
        ZoneRef { id: id.into() }
    }

    fn rule() -> AccessRule {
        AccessRule {
            id: "r1".into(),
            access_policy_id: "p1".into(),
            name: "allow-web".into(),
            action: "ALLOW".into(),
            ..AccessRule::default()
        }
    }

    fn wire(value: serde_json::Value) -> AccessRuleWire {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unset_enabled_is_omitted_and_decodes_true() {
        let body = serde_json::to_value(rule().to_body()).unwrap();
        assert!(body.get("enabled").is_none());
        assert_eq!(body["type"], "AccessRule");

        let mut decoded = AccessRule::default();
        decoded.from_body(&wire(body));
        assert_eq!(decoded.enabled, Attr::Known(true));
        assert_eq!(decoded.log_begin, Attr::Known(false));
        assert_eq!(decoded.name, Attr::Known("allow-web".into()));
    }

    #[test]
    fn partial_removes_zone_missing_from_response() {
        let mut state = AccessRule {
            source_zones: vec![zone("z1"), zone("z2")],
            ..rule()
        };
        state.from_body_partial(&wire(json!({
            "id": "r1",
            "name": "allow-web",
            "action": "ALLOW",
            "sourceZones": { "objects": [{ "id": "z1", "type": "SecurityZone" }] }
        })));
        assert_eq!(state.source_zones, vec![zone("z1")]);
    }

    #[test]
    fn partial_does_not_adopt_undeclared_fields() {
        let mut state = rule();
        state.from_body_partial(&wire(json!({
            "id": "r1",
            "name": "allow-web",
            "action": "ALLOW",
            "enabled": true,
            "logBegin": true,
            "description": "managed elsewhere",
            "ipsPolicy": { "id": "ips-1" },
            "sourceZones": { "objects": [{ "id": "z9" }] }
        })));
        assert!(state.enabled.is_null());
        assert!(state.log_begin.is_null());
        assert!(state.description.is_null());
        assert!(state.ips_policy_id.is_null());
        assert!(state.source_zones.is_empty());
    }

    #[test]
    fn partial_default_flags() {
        let mut state = AccessRule {
            enabled: Attr::Known(true),
            log_end: Attr::Known(true),
            log_files: Attr::Known(false),
            ..rule()
        };
        // Server omits every flag: only values equal to the default survive.
        state.from_body_partial(&wire(json!({ "id": "r1", "name": "allow-web", "action": "ALLOW" })));
        assert_eq!(state.enabled, Attr::Known(true));
        assert!(state.log_end.is_null());
        assert_eq!(state.log_files, Attr::Known(false));
    }

    fn port(port: &str, protocol: &str) -> PortLiteral {
        PortLiteral {
            port: port.into(),
            protocol: protocol.into(),
            ..PortLiteral::default()
        }
    }

    fn icmp(protocol: &str, icmp_type: &str) -> PortLiteral {
        PortLiteral {
            protocol: protocol.into(),
            icmp_type: icmp_type.into(),
            ..PortLiteral::default()
        }
    }

    fn object(id: &str, object_type: &str) -> ObjectRef {
        ObjectRef {
            id: id.into(),
            object_type: object_type.into(),
        }
    }

    #[test]
    fn ports_split_into_literals_and_objects() {
        let state = AccessRule {
            destination_port_literals: vec![port("443", "6")],
            destination_port_objects: vec![ObjectRef {
                id: "po-1".into(),
                ..ObjectRef::default()
            }],
            ..rule()
        };
        let body = serde_json::to_value(state.to_body()).unwrap();
        assert_eq!(
            body["destinationPorts"],
            json!({
                "literals": [{ "type": "PortLiteral", "port": "443", "protocol": "6" }],
                "objects": [{ "id": "po-1", "type": "ProtocolPortObject" }]
            })
        );
    }

    #[test]
    fn icmp_literal_type_follows_protocol() {
        let state = AccessRule {
            source_port_literals: vec![icmp("58", "128"), icmp("1", "8")],
            ..rule()
        };
        let body = serde_json::to_value(state.to_body()).unwrap();
        assert_eq!(body["sourcePorts"]["literals"][0]["type"], "ICMPv6PortLiteral");
        assert_eq!(body["sourcePorts"]["literals"][1]["type"], "ICMPv4PortLiteral");
    }

    #[test]
    fn icmpv6_literal_survives_refresh() {
        let mut state = AccessRule {
            source_port_literals: vec![icmp("58", "128")],
            ..rule()
        };
        state.from_body_partial(&wire(json!({
            "id": "r1",
            "sourcePorts": { "literals": [
                { "type": "ICMPv6PortLiteral", "protocol": "58", "icmpType": "128" }
            ]}
        })));
        assert_eq!(state.source_port_literals, vec![icmp("58", "128")]);
    }

    #[test]
    fn port_key_tuple_drops_changed_literal() {
        let mut state = AccessRule {
            source_port_literals: vec![port("80", "6"), PortLiteral {
                icmp_code: Attr::Known(0),
                ..icmp("1", "8")
            }],
            ..rule()
        };
        state.from_body_partial(&wire(json!({
            "id": "r1",
            "sourcePorts": { "literals": [
                { "type": "PortLiteral", "port": "8080", "protocol": "6" },
                { "type": "ICMPv4PortLiteral", "protocol": "1", "icmpType": "8", "code": 0 }
            ]}
        })));
        assert_eq!(state.source_port_literals.len(), 1);
        assert_eq!(state.source_port_literals[0].icmp_type, Attr::Known("8".into()));
    }

    #[test]
    fn partial_drops_port_object_missing_from_response() {
        let mut state = AccessRule {
            destination_port_objects: vec![object("po-1", "ProtocolPortObject"), object("po-2", "PortObjectGroup")],
            ..rule()
        };
        state.from_body_partial(&wire(json!({
            "id": "r1",
            "destinationPorts": { "objects": [{ "id": "po-2", "type": "PortObjectGroup" }] }
        })));
        assert_eq!(state.destination_port_objects, vec![object("po-2", "PortObjectGroup")]);
    }

    #[test]
    fn every_collection_round_trips_in_order() {
        let state = AccessRule {
            source_zones: vec![zone("z2"), zone("z1")],
            destination_zones: vec![zone("z3")],
            source_network_literals: vec![
                NetworkLiteral {
                    value: "10.0.0.0/8".into(),
                },
                NetworkLiteral {
                    value: "192.0.2.1".into(),
                },
            ],
            destination_network_literals: vec![NetworkLiteral {
                value: "198.51.100.1-198.51.100.9".into(),
            }],
            source_network_objects: vec![object("n2", "Network"), object("n1", "NetworkGroup")],
            destination_network_objects: vec![object("n3", "Host")],
            source_port_literals: vec![
                PortLiteral {
                    object_type: "ICMPv6PortLiteral".into(),
                    icmp_code: Attr::Known(0),
                    ..icmp("58", "128")
                },
                PortLiteral {
                    object_type: "PortLiteral".into(),
                    ..port("53", "17")
                },
            ],
            destination_port_literals: vec![PortLiteral {
                object_type: "PortLiteral".into(),
                ..port("443", "6")
            }],
            source_port_objects: vec![object("po-2", "PortObjectGroup"), object("po-1", "ProtocolPortObject")],
            destination_port_objects: vec![object("po-3", "ProtocolPortObject")],
            ..rule()
        };

        let mut decoded = AccessRule {
            access_policy_id: "p1".into(),
            ..AccessRule::default()
        };
        decoded.from_body(&state.to_body());

        assert_eq!(decoded.source_zones, state.source_zones);
        assert_eq!(decoded.destination_zones, state.destination_zones);
        assert_eq!(decoded.source_network_literals, state.source_network_literals);
        assert_eq!(decoded.destination_network_literals, state.destination_network_literals);
        assert_eq!(decoded.source_network_objects, state.source_network_objects);
        assert_eq!(decoded.destination_network_objects, state.destination_network_objects);
        assert_eq!(decoded.source_port_literals, state.source_port_literals);
        assert_eq!(decoded.destination_port_literals, state.destination_port_literals);
        assert_eq!(decoded.source_port_objects, state.source_port_objects);
        assert_eq!(decoded.destination_port_objects, state.destination_port_objects);
    }

    #[test]
    fn full_decode_keeps_known_id() {
        let mut state = rule();
        state.from_body(&wire(json!({ "id": "other", "name": "allow-web", "action": "ALLOW" })));
        assert_eq!(state.id, Attr::Known("r1".into()));

        let mut imported = AccessRule::default();
        imported.from_body(&wire(json!({ "id": "srv-1" })));
        assert_eq!(imported.id, Attr::Known("srv-1".into()));
    }

    #[test]
    fn networks_round_trip_declared_values() {
        let state = AccessRule {
            source_network_literals: vec![NetworkLiteral {
                value: "10.0.0.0/8".into(),
            }],
            destination_network_objects: vec![ObjectRef {
                id: "n1".into(),
                object_type: "NetworkGroup".into(),
            }],
            ..rule()
        };
        let body = state.to_body();
        assert_eq!(
            body.source_networks.as_ref().unwrap().literals[0].literal_type.as_deref(),
            Some("Network")
        );

        let mut decoded = AccessRule::default();
        decoded.from_body(&body);
        assert_eq!(decoded.source_network_literals, state.source_network_literals);
        assert_eq!(decoded.destination_network_objects, state.destination_network_objects);
    }

    #[test]
    fn unknown_id_is_filled_and_known_id_kept() {
        let mut created = AccessRule {
            id: Attr::Unknown,
            ..rule()
        };
        created.from_body_unknowns(&wire(json!({ "id": "srv-1", "name": "allow-web" })));
        assert_eq!(created.id, Attr::Known("srv-1".into()));

        let mut known = rule();
        known.from_body_unknowns(&wire(json!({ "id": "other" })));
        assert_eq!(known.id, Attr::Known("r1".into()));
    }

    #[test]
    fn section_and_category_are_query_params() {
        let state = AccessRule {
            section: "mandatory".into(),
            category: "web".into(),
            ..rule()
        };
        assert_eq!(
            state.create_params(),
            vec![("section", "mandatory".to_owned()), ("category", "web".to_owned())]
        );
        let body = serde_json::to_value(state.to_body()).unwrap();
        assert!(body.get("section").is_none());
    }

    #[test]
    fn validation() {
        assert!(rule().validate().is_ok());

        let no_policy = AccessRule {
            access_policy_id: Attr::Null,
            ..rule()
        };
        assert!(no_policy.validate().is_err());
        assert!(no_policy.path().is_err());

        let bad_action = AccessRule {
            action: "PERMIT".into(),
            ..rule()
        };
        assert!(bad_action.validate().is_err());

        let duplicate = AccessRule {
            source_zones: vec![zone("z1"), zone("z1")],
            ..rule()
        };
        assert!(duplicate.validate().is_err());
    }
}
