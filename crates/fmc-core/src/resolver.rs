// ── Name resolution ──
//
// FMC has no filtered lookup by name, so resolving a name to an id scans the
// collection page by page until an exact, case-sensitive match turns up or
// the server stops advertising a next page. No caching: every call rescans.

use std::future::Future;

use fmc_api::{FmcClient, NamedObject, Page, RequestOpts};
use tracing::debug;

use crate::error::CoreError;

/// Fixed page size used for name scans.
pub const PAGE_SIZE: u64 = 1000;

/// Anything that can serve one page of a collection.
pub trait PageSource {
    fn fetch_page(
        &self,
        path: &str,
        offset: u64,
        limit: u64,
        opts: &RequestOpts,
    ) -> impl Future<Output = Result<Page<NamedObject>, CoreError>> + Send;
}

impl PageSource for FmcClient {
    async fn fetch_page(
        &self,
        path: &str,
        offset: u64,
        limit: u64,
        opts: &RequestOpts,
    ) -> Result<Page<NamedObject>, CoreError> {
        Ok(self.list_page(path, offset, limit, false, opts).await?)
    }
}

/// Resolve `name` to an object id within the collection at `path`.
///
/// Page fetch errors abort the scan immediately. Exhausting the collection
/// yields [`CoreError::NotFoundByName`].
pub async fn resolve_id_by_name<S: PageSource + Sync>(
    source: &S,
    resource: &str,
    path: &str,
    name: &str,
    opts: &RequestOpts,
) -> Result<String, CoreError> {
    let mut offset = 0;
    let mut page_no = 1u32;

    loop {
        debug!(resource, offset, page = page_no, "scanning for name");
        let page = source.fetch_page(path, offset, PAGE_SIZE, opts).await?;

        if let Some(found) = page.items.iter().find(|o| o.name == name) {
            debug!(resource, name, id = %found.id, "resolved name");
            return Ok(found.id.clone());
        }
        if !page.has_next() {
            return Err(CoreError::NotFoundByName {
                resource: resource.to_owned(),
                name: name.to_owned(),
            });
        }

        offset += PAGE_SIZE;
        page_no += 1;
    }
}
