// `fmc_certificate_map`: ordered certificate-matching rules. Rules carry no
// identifying key, so they reconcile by position.

use serde::{Deserialize, Serialize};

use crate::capability::Feature;
use crate::error::CoreError;
use crate::path::ResourcePath;
use crate::reconcile::reconcile_positional;
use crate::resource::{Identified, Resource, require};
use crate::value::Attr;

const PATH: &str = "/api/fmc_config/v1/domain/{DOMAIN_UUID}/object/certificatemaps";
const WIRE_TYPE: &str = "CertificateMap";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateMap {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub domain: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub name: Attr<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<CertificateMapRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateMapRule {
    /// `SUBJECT` or `ISSUER`.
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub field: Attr<String>,
    /// Distinguished-name component, e.g. `CN`.
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub component: Attr<String>,
    /// `EQUALS`, `CONTAINS`, `NOT_EQUAL` or `NOT_CONTAINS`.
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub operator: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub value: Attr<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateMapWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<CertificateMapRuleWire>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateMapRuleWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl CertificateMapWire {
    fn rule_list(&self) -> &[CertificateMapRuleWire] {
        self.rules.as_deref().unwrap_or_default()
    }
}

impl CertificateMapRule {
    fn decode(wire: &CertificateMapRuleWire) -> Self {
        Self {
            field: Attr::from_option(wire.field.clone()),
            component: Attr::from_option(wire.component.clone()),
            operator: Attr::from_option(wire.operator.clone()),
            value: Attr::from_option(wire.value.clone()),
        }
    }

    fn refresh(&mut self, wire: &CertificateMapRuleWire) {
        self.field.refresh(wire.field.clone());
        self.component.refresh(wire.component.clone());
        self.operator.refresh(wire.operator.clone());
        self.value.refresh(wire.value.clone());
    }

    fn resolve_unknowns(&mut self, wire: Option<&CertificateMapRuleWire>) {
        self.field.resolve_unknown(wire.and_then(|w| w.field.clone()));
        self.component.resolve_unknown(wire.and_then(|w| w.component.clone()));
        self.operator.resolve_unknown(wire.and_then(|w| w.operator.clone()));
        self.value.resolve_unknown(wire.and_then(|w| w.value.clone()));
    }
}

impl Resource for CertificateMap {
    const TYPE_NAME: &'static str = "fmc_certificate_map";
    const FEATURE: Option<Feature> = Some(Feature::CertificateMap);

    type Wire = CertificateMapWire;

    fn path(&self) -> Result<ResourcePath, CoreError> {
        Ok(ResourcePath::new(PATH))
    }

    fn domain(&self) -> &Attr<String> {
        &self.domain
    }

    fn to_body(&self) -> CertificateMapWire {
        let rules: Vec<_> = self
            .rules
            .iter()
            .map(|r| CertificateMapRuleWire {
                field: r.field.to_wire(),
                component: r.component.to_wire(),
                operator: r.operator.to_wire(),
                value: r.value.to_wire(),
            })
            .collect();
        CertificateMapWire {
            id: self.id.to_wire(),
            object_type: Some(WIRE_TYPE.to_owned()),
            name: self.name.to_wire(),
            rules: (!rules.is_empty()).then_some(rules),
        }
    }

    fn from_body(&mut self, wire: &CertificateMapWire) {
        self.id.adopt_unless_known(wire.id.clone());
        self.name = Attr::from_option(wire.name.clone());
        self.rules = wire.rule_list().iter().map(CertificateMapRule::decode).collect();
    }

    fn from_body_partial(&mut self, wire: &CertificateMapWire) {
        self.name.refresh(wire.name.clone());
        reconcile_positional("rules", &mut self.rules, wire.rule_list(), CertificateMapRule::refresh);
    }

    fn from_body_unknowns(&mut self, wire: &CertificateMapWire) {
        self.id.resolve_unknown(wire.id.clone());
        self.name.resolve_unknown(wire.name.clone());
        let rules = wire.rule_list();
        for (i, rule) in self.rules.iter_mut().enumerate() {
            rule.resolve_unknowns(rules.get(i));
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        require(Self::TYPE_NAME, "name", &self.name)?;
        for rule in &self.rules {
            require(Self::TYPE_NAME, "rules.field", &rule.field)?;
            require(Self::TYPE_NAME, "rules.operator", &rule.operator)?;
        }
        Ok(())
    }
}

impl Identified for CertificateMap {
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
