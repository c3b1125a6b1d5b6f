//! The per-resource mapping contract.
//!
//! A resource type owns an explicit, field-by-field mapping between its
//! declarative state and a typed wire DTO:
//!
//! - [`Resource::to_body`]: encode the declared (non-null, known) fields.
//! - [`Resource::from_body`]: decode a full response, applying per-field
//!   defaults for absent wire fields.
//! - [`Resource::from_body_partial`]: refresh existing state without
//!   adopting fields the caller never declared.
//! - [`Resource::from_body_unknowns`]: fill server-computed values after a
//!   create or update.

use fmc_api::RequestOpts;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::capability::Feature;
use crate::error::CoreError;
use crate::path::ResourcePath;
use crate::value::Attr;

pub trait Resource: Sized + Send + Sync {
    /// Resource type name, e.g. `fmc_access_rule`.
    const TYPE_NAME: &'static str;

    /// Feature the connected FMC must support, if any.
    const FEATURE: Option<Feature> = None;

    type Wire: Serialize + DeserializeOwned + Send + Sync;

    /// Collection path with parent identifiers bound.
    fn path(&self) -> Result<ResourcePath, CoreError>;

    /// Domain override for requests on behalf of this resource.
    fn domain(&self) -> &Attr<String>;

    fn to_body(&self) -> Self::Wire;

    fn from_body(&mut self, wire: &Self::Wire);

    fn from_body_partial(&mut self, wire: &Self::Wire);

    fn from_body_unknowns(&mut self, wire: &Self::Wire);

    /// Configuration checks run before any mutating call.
    fn validate(&self) -> Result<(), CoreError>;

    fn request_opts(&self) -> RequestOpts {
        RequestOpts {
            domain: self.domain().to_wire(),
        }
    }
}

/// A resource that maps to a single FMC object with its own id.
pub trait Identified: Resource {
    fn id(&self) -> &Attr<String>;

    fn id_mut(&mut self) -> &mut Attr<String>;

    fn name(&self) -> &Attr<String>;

    /// Extra query parameters for the create call.
    fn create_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Lookups need exactly one of `id` or `name`.
    fn validate_lookup(&self) -> Result<(), CoreError> {
        match (self.id().is_known(), self.name().is_known()) {
            (true, false) | (false, true) => Ok(()),
            _ => Err(CoreError::Validation {
                message: format!("{}: exactly one of id or name must be set", Self::TYPE_NAME),
            }),
        }
    }
}

/// Reject duplicate key tuples within one collection.
pub(crate) fn ensure_unique_keys<T: crate::reconcile::KeyTuple>(
    resource: &str,
    collection: &str,
    items: &[T],
) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        let key = item.key();
        if !seen.insert(key.clone()) {
            return Err(CoreError::Validation {
                message: format!("{resource}: duplicate entry {key:?} in {collection}"),
            });
        }
    }
    Ok(())
}

/// Required-field check used by `validate`.
pub(crate) fn require<T>(resource: &str, field: &str, value: &Attr<T>) -> Result<(), CoreError> {
    if value.is_null() {
        return Err(CoreError::Validation {
            message: format!("{resource}: {field} is required"),
        });
    }
    Ok(())
}
