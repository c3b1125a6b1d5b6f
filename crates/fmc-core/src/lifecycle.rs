// ── Lifecycle ──
//
// Create / Read / Update / Delete for one resource. Every resource with its
// own object id gets the single-object flow below; bulk resources supply
// their own implementation.

use std::future::Future;

use tracing::info;

use crate::error::CoreError;
use crate::provider::Provider;
use crate::resolver::resolve_id_by_name;
use crate::resource::{Identified, Resource};
use crate::value::Attr;

/// How `read` folds the response into state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Partial reconciliation: declared fields only.
    #[default]
    Refresh,
    /// Full decode, e.g. importing or showing an existing object.
    Import,
}

pub trait Lifecycle: Resource {
    fn create(self, provider: &Provider) -> impl Future<Output = Result<Self, CoreError>> + Send;

    fn read(self, provider: &Provider, mode: ReadMode) -> impl Future<Output = Result<Self, CoreError>> + Send;

    /// Push the declared state, using `prior` for server-assigned ids.
    fn update(self, prior: &Self, provider: &Provider) -> impl Future<Output = Result<Self, CoreError>> + Send;

    fn delete(&self, provider: &Provider) -> impl Future<Output = Result<(), CoreError>> + Send;
}

fn known_id<R: Identified>(resource: &R) -> Result<String, CoreError> {
    resource.id().known().cloned().ok_or_else(|| CoreError::Validation {
        message: format!("{}: id is not known", R::TYPE_NAME),
    })
}

fn map_not_found(err: fmc_api::Error, resource: &str, id: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            resource: resource.to_owned(),
            id: id.to_owned(),
        }
    } else {
        err.into()
    }
}

impl<R: Identified> Lifecycle for R {
    async fn create(mut self, provider: &Provider) -> Result<Self, CoreError> {
        self.validate()?;
        provider.check::<R>()?;

        let path = self.path()?.collection()?;
        let opts = self.request_opts();
        info!(resource = R::TYPE_NAME, name = %self.name(), "creating");

        let body = self.to_body();
        let response: R::Wire = provider
            .client()
            .post(&path, &self.create_params(), &body, &opts)
            .await?;

        if self.id().is_null() {
            *self.id_mut() = Attr::Unknown;
        }
        self.from_body_unknowns(&response);
        Ok(self)
    }

    async fn read(mut self, provider: &Provider, mode: ReadMode) -> Result<Self, CoreError> {
        provider.check::<R>()?;

        let opts = self.request_opts();
        let id = match (self.id().known().cloned(), self.name().known().cloned()) {
            (Some(id), _) => id,
            (None, Some(name)) => {
                let collection = self.path()?.collection()?;
                let id = resolve_id_by_name(provider.client(), R::TYPE_NAME, &collection, &name, &opts).await?;
                *self.id_mut() = Attr::Known(id.clone());
                id
            }
            (None, None) => return Err(CoreError::validation(format!("{}: id or name is required", R::TYPE_NAME))),
        };

        let path = self.path()?.object(&id)?;
        let wire: R::Wire = provider
            .client()
            .get(&path, &opts)
            .await
            .map_err(|e| map_not_found(e, R::TYPE_NAME, &id))?;

        match mode {
            ReadMode::Refresh => self.from_body_partial(&wire),
            ReadMode::Import => self.from_body(&wire),
        }
        Ok(self)
    }

    async fn update(mut self, prior: &Self, provider: &Provider) -> Result<Self, CoreError> {
        if !self.id().is_known() {
            if let Some(id) = prior.id().known() {
                *self.id_mut() = Attr::Known(id.clone());
            }
        }
        self.validate()?;
        provider.check::<R>()?;

        let id = known_id(&self)?;
        let path = self.path()?.object(&id)?;
        let opts = self.request_opts();
        info!(resource = R::TYPE_NAME, %id, "updating");

        let body = self.to_body();
        let response: R::Wire = provider.client().put(&path, &body, &opts).await?;
        self.from_body_unknowns(&response);
        Ok(self)
    }

    async fn delete(&self, provider: &Provider) -> Result<(), CoreError> {
        provider.check::<R>()?;

        let id = known_id(self)?;
        let path = self.path()?.object(&id)?;
        info!(resource = R::TYPE_NAME, %id, "deleting");

        provider
            .client()
            .delete(&path, &[], &self.request_opts())
            .await
            .map_err(|e| map_not_found(e, R::TYPE_NAME, &id))
    }
}
