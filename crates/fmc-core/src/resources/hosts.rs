// `fmc_hosts`: many host objects managed as one resource.
//
// State is a name-keyed map; the wire is a plain array with the map key
// carried in each element's `name`. Creates and deletes use FMC's bulk
// endpoints, updates go out one object at a time.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::capability::Feature;
use crate::error::CoreError;
use crate::lifecycle::{Lifecycle, ReadMode};
use crate::path::ResourcePath;
use crate::provider::Provider;
use crate::reconcile::{reconcile_named, resolve_named};
use crate::resolver::PAGE_SIZE;
use crate::resource::{Resource, require};
use crate::value::{Attr, FieldDefault};

const PATH: &str = "/api/fmc_config/v1/domain/{DOMAIN_UUID}/object/hosts";
const WIRE_TYPE: &str = "Host";

const OVERRIDABLE: FieldDefault<bool> = FieldDefault::converge(false);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hosts {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub domain: Attr<String>,
    /// Host objects keyed by name.
    pub items: IndexMap<String, HostItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostItem {
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub id: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub ip: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub description: Attr<String>,
    #[serde(skip_serializing_if = "Attr::is_null")]
    pub overridable: Attr<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostsWire {
    #[serde(default = "Vec::new")]
    pub items: Vec<HostWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridable: Option<bool>,
}

fn wire_name(wire: &HostWire) -> Option<&str> {
    wire.name.as_deref()
}

impl HostItem {
    fn encode(&self, name: &str) -> HostWire {
        HostWire {
            id: self.id.to_wire(),
            object_type: Some(WIRE_TYPE.to_owned()),
            name: Some(name.to_owned()),
            value: self.ip.to_wire(),
            description: self.description.to_wire(),
            overridable: self.overridable.to_wire(),
        }
    }

    fn decode(wire: &HostWire) -> Self {
        Self {
            id: Attr::from_option(wire.id.clone()),
            ip: Attr::from_option(wire.value.clone()),
            description: Attr::from_option(wire.description.clone()),
            overridable: OVERRIDABLE.decode(wire.overridable),
        }
    }

    fn refresh(&mut self, wire: &HostWire) {
        self.ip.refresh(wire.value.clone());
        self.description.refresh(wire.description.clone());
        OVERRIDABLE.refresh(&mut self.overridable, wire.overridable);
    }

    fn resolve_unknowns(&mut self, wire: Option<&HostWire>) {
        self.id.resolve_unknown(wire.and_then(|w| w.id.clone()));
        self.ip.resolve_unknown(wire.and_then(|w| w.value.clone()));
        self.description.resolve_unknown(wire.and_then(|w| w.description.clone()));
        self.overridable.resolve_unknown(wire.and_then(|w| w.overridable));
    }

    /// True when the declared fields differ from `other`.
    fn differs_from(&self, other: &Self) -> bool {
        self.ip != other.ip || self.description != other.description || self.overridable != other.overridable
    }
}

impl Resource for Hosts {
    const TYPE_NAME: &'static str = "fmc_hosts";

    type Wire = HostsWire;

    fn path(&self) -> Result<ResourcePath, CoreError> {
        Ok(ResourcePath::new(PATH))
    }

    fn domain(&self) -> &Attr<String> {
        &self.domain
    }

    fn to_body(&self) -> HostsWire {
        HostsWire {
            items: self.items.iter().map(|(name, item)| item.encode(name)).collect(),
        }
    }

    fn from_body(&mut self, wire: &HostsWire) {
        self.items = wire
            .items
            .iter()
            .filter_map(|w| Some((w.name.clone()?, HostItem::decode(w))))
            .collect();
    }

    fn from_body_partial(&mut self, wire: &HostsWire) {
        reconcile_named("items", &mut self.items, &wire.items, wire_name, HostItem::refresh);
    }

    fn from_body_unknowns(&mut self, wire: &HostsWire) {
        resolve_named(&mut self.items, &wire.items, wire_name, HostItem::resolve_unknowns);
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.items.is_empty() {
            return Err(CoreError::validation(format!("{}: items must not be empty", Self::TYPE_NAME)));
        }
        for (name, item) in &self.items {
            if name.is_empty() {
                return Err(CoreError::validation(format!("{}: host names must not be empty", Self::TYPE_NAME)));
            }
            require(Self::TYPE_NAME, &format!("items.{name}.ip"), &item.ip)?;
        }
        Ok(())
    }
}

// ── Bulk lifecycle ───────────────────────────────────────────────────

impl Hosts {
    /// POST every item without an id in one bulk call.
    async fn bulk_create(&mut self, names: &[String], provider: &Provider) -> Result<(), CoreError> {
        if names.is_empty() {
            return Ok(());
        }
        let collection = self.path()?.collection()?;
        let body: Vec<HostWire> = names
            .iter()
            .filter_map(|name| self.items.get(name).map(|item| item.encode(name)))
            .collect();
        info!(resource = Self::TYPE_NAME, count = body.len(), "bulk creating hosts");

        let response: HostsWire = provider
            .client()
            .post(&collection, &[("bulk", "true".to_owned())], &body, &self.request_opts())
            .await?;

        for name in names {
            if let Some(item) = self.items.get_mut(name) {
                if item.id.is_null() {
                    item.id = Attr::Unknown;
                }
            }
        }
        self.from_body_unknowns(&response);
        Ok(())
    }

    /// DELETE the given ids with one bulk call.
    async fn bulk_delete(&self, ids: &[String], provider: &Provider) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        provider.capabilities().require(Feature::BulkHostDelete)?;

        let collection = self.path()?.collection()?;
        info!(resource = Self::TYPE_NAME, count = ids.len(), "bulk deleting hosts");
        let params = [
            ("bulk", "true".to_owned()),
            ("filter", format!("ids:{}", ids.join(","))),
        ];
        provider
            .client()
            .delete(&collection, &params, &self.request_opts())
            .await?;
        Ok(())
    }
}

impl Lifecycle for Hosts {
    async fn create(mut self, provider: &Provider) -> Result<Self, CoreError> {
        self.validate()?;
        let names: Vec<String> = self.items.keys().cloned().collect();
        self.bulk_create(&names, provider).await?;
        Ok(self)
    }

    async fn read(mut self, provider: &Provider, mode: ReadMode) -> Result<Self, CoreError> {
        let collection = self.path()?.collection()?;
        let items: Vec<HostWire> = provider
            .client()
            .list_all(&collection, PAGE_SIZE, true, &self.request_opts())
            .await?;
        let wire = HostsWire { items };

        match mode {
            ReadMode::Refresh => self.from_body_partial(&wire),
            ReadMode::Import => self.from_body(&wire),
        }
        Ok(self)
    }

    async fn update(mut self, prior: &Self, provider: &Provider) -> Result<Self, CoreError> {
        self.validate()?;

        // Carry server ids over from the prior state.
        for (name, item) in &mut self.items {
            if let (false, Some(old)) = (item.id.is_known(), prior.items.get(name)) {
                if old.id.is_known() {
                    item.id = old.id.clone();
                }
            }
        }

        let removed: Vec<String> = prior
            .items
            .iter()
            .filter(|(name, _)| !self.items.contains_key(*name))
            .filter_map(|(_, item)| item.id.known().cloned())
            .collect();
        self.bulk_delete(&removed, provider).await?;

        let added: Vec<String> = self
            .items
            .iter()
            .filter(|(_, item)| !item.id.is_known())
            .map(|(name, _)| name.clone())
            .collect();
        self.bulk_create(&added, provider).await?;

        let changed: Vec<String> = self
            .items
            .iter()
            .filter(|(name, item)| {
                !added.contains(name) && prior.items.get(*name).is_none_or(|old| item.differs_from(old))
            })
            .map(|(name, _)| name.clone())
            .collect();

        let collection = self.path()?.collection()?;
        let opts = self.request_opts();
        for name in changed {
            let Some(item) = self.items.get_mut(&name) else {
                continue;
            };
            let Some(id) = item.id.known().cloned() else {
                continue;
            };
            info!(resource = Self::TYPE_NAME, %id, host = %name, "updating host");
            let path = ResourcePath::new(collection.clone()).object(&id)?;
            let response: HostWire = provider.client().put(&path, &item.encode(&name), &opts).await?;
            item.resolve_unknowns(Some(&response));
        }
        Ok(self)
    }

    async fn delete(&self, provider: &Provider) -> Result<(), CoreError> {
        let ids: Vec<String> = self.items.values().filter_map(|i| i.id.known().cloned()).collect();
        self.bulk_delete(&ids, provider).await
    }
}
