//! Command dispatch: bridges CLI args -> typed resource lifecycles -> output.

pub mod apply;
pub mod config_cmd;
pub mod delete;
pub mod refresh;
pub mod resolve;
pub mod show;
pub mod version;

use serde::Serialize;
use serde::de::DeserializeOwned;

use fmc_core::{Lifecycle, Provider};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// A resource the CLI can move between documents and the server.
pub trait StateResource: Lifecycle + Serialize + DeserializeOwned + Default + Send + Sync {}

impl<T: Lifecycle + Serialize + DeserializeOwned + Default + Send + Sync> StateResource for T {}

/// Run `$body` with `$r` bound to the resource type selected by `$kind`.
macro_rules! with_kind {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            $crate::cli::Kind::AccessRule => {
                type $r = fmc_core::AccessRule;
                $body
            }
            $crate::cli::Kind::Hosts => {
                type $r = fmc_core::Hosts;
                $body
            }
            $crate::cli::Kind::CertificateMap => {
                type $r = fmc_core::CertificateMap;
                $body
            }
            $crate::cli::Kind::SecurityZone => {
                type $r = fmc_core::SecurityZone;
                $body
            }
        }
    };
}

/// Dispatch a connection-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, provider: &Provider, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Apply(args) => with_kind!(args.kind, R => apply::handle::<R>(provider, &args, global).await),
        Command::Refresh(args) => with_kind!(args.kind, R => refresh::handle::<R>(provider, &args, global).await),
        Command::Show(args) => show::dispatch(provider, &args, global).await,
        Command::Delete(args) => with_kind!(args.kind, R => delete::handle::<R>(provider, &args, global).await),
        Command::Resolve(args) => resolve::dispatch(provider, &args, global).await,
        Command::Version => version::handle(provider, global),
        // Config and Completions are handled before a connection is made
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need an FMC connection".into(),
        )),
    }
}

/// Build a resource state from the given top-level fields, e.g. an id or a
/// name to look up.
pub(crate) fn seed<R: DeserializeOwned>(fields: &[(&str, Option<&str>)]) -> Result<R, CliError> {
    let map: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .filter_map(|(key, value)| value.map(|v| ((*key).to_owned(), serde_json::Value::from(v))))
        .collect();
    serde_json::from_value(serde_json::Value::Object(map))
        .map_err(|e| CliError::Internal(format!("failed to build lookup state: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fmc_core::{AccessRule, Attr, Hosts};

    use super::*;

    #[test]
    fn seed_sets_only_given_fields() {
        let rule: AccessRule = seed(&[("name", Some("allow-web")), ("id", None), ("access_policy_id", Some("p1"))]).unwrap();
        assert_eq!(rule.name, Attr::Known("allow-web".into()));
        assert_eq!(rule.access_policy_id, Attr::Known("p1".into()));
        assert!(rule.id.is_null());
    }

    #[test]
    fn seed_ignores_fields_a_resource_lacks() {
        let hosts: Hosts = seed(&[("name", Some("ignored"))]).unwrap();
        assert!(hosts.items.is_empty());
    }
}
