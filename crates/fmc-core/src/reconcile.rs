// ── Collection reconciliation ──
//
// Partial reconciliation of nested collections against a fresh server
// response. Elements are correlated by key tuple (keyed lists), by index
// (positional lists) or by map key against the wire `name` (name-keyed maps).
// Local elements with no counterpart are dropped; that is drift, not an error.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::value::Attr;

/// The fields that identify a collection element when it has no stable id.
///
/// Keys compare as strings; null and unknown fields contribute `""`.
pub trait KeyTuple {
    fn key(&self) -> Vec<String>;
}

/// Key-tuple component for an optional wire field.
pub fn opt_key<T: fmt::Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// Key-tuple component for a state attribute.
pub fn attr_key<T: fmt::Display>(value: &Attr<T>) -> String {
    value.key_str()
}

fn find_by_key<'w, W: KeyTuple>(wire: &'w [W], key: &[String]) -> Option<&'w W> {
    wire.iter().find(|w| w.key() == key)
}

/// Reconcile a keyed list in place, preserving the order of survivors.
pub fn reconcile_keyed<L, W, F>(collection: &str, local: &mut Vec<L>, wire: &[W], mut update: F)
where
    L: KeyTuple,
    W: KeyTuple,
    F: FnMut(&mut L, &W),
{
    local.retain_mut(|item| {
        let key = item.key();
        match find_by_key(wire, &key) {
            Some(w) => {
                update(item, w);
                true
            }
            None => {
                debug!(collection, key = ?key, "removing element not present in response");
                false
            }
        }
    });
}

/// Reconcile a list whose elements have no identifying key: resize to the
/// wire length, then reconcile index by index.
pub fn reconcile_positional<L, W, F>(collection: &str, local: &mut Vec<L>, wire: &[W], mut update: F)
where
    L: Default,
    F: FnMut(&mut L, &W),
{
    if local.len() > wire.len() {
        debug!(
            collection,
            removed = local.len() - wire.len(),
            "truncating to response length"
        );
    }
    local.resize_with(wire.len(), L::default);
    for (item, w) in local.iter_mut().zip(wire) {
        update(item, w);
    }
}

/// Reconcile a name-keyed map against wire elements carrying a `name`.
pub fn reconcile_named<L, W, N, F>(
    collection: &str,
    local: &mut IndexMap<String, L>,
    wire: &[W],
    name_of: N,
    mut update: F,
) where
    N: Fn(&W) -> Option<&str>,
    F: FnMut(&mut L, &W),
{
    local.retain(|name, item| match wire.iter().find(|w| name_of(w) == Some(name.as_str())) {
        Some(w) => {
            update(item, w);
            true
        }
        None => {
            debug!(collection, name = %name, "removing entry not present in response");
            false
        }
    });
}

/// Resolve unknown values of keyed elements. Unmatched elements are kept and
/// receive `None`, so their unknowns become null.
pub fn resolve_keyed<L, W, F>(local: &mut [L], wire: &[W], mut resolve: F)
where
    L: KeyTuple,
    W: KeyTuple,
    F: FnMut(&mut L, Option<&W>),
{
    for item in local {
        let key = item.key();
        resolve(item, find_by_key(wire, &key));
    }
}

/// Resolve unknown values of name-keyed map entries.
pub fn resolve_named<L, W, N, F>(local: &mut IndexMap<String, L>, wire: &[W], name_of: N, mut resolve: F)
where
    N: Fn(&W) -> Option<&str>,
    F: FnMut(&mut L, Option<&W>),
{
    for (name, item) in local.iter_mut() {
        resolve(item, wire.iter().find(|w| name_of(w) == Some(name.as_str())));
    }
}
