//! `fmc show`: import an existing object by id or name.

use fmc_core::{Hosts, Identified, Provider, ReadMode};

use super::{StateResource, seed};
use crate::cli::{GlobalOpts, Kind, ShowArgs};
use crate::error::CliError;
use crate::output;

pub async fn dispatch(provider: &Provider, args: &ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.kind {
        Kind::AccessRule => handle::<fmc_core::AccessRule>(provider, args, global).await,
        Kind::CertificateMap => handle::<fmc_core::CertificateMap>(provider, args, global).await,
        Kind::SecurityZone => handle::<fmc_core::SecurityZone>(provider, args, global).await,
        // The whole host collection; there is no single object to address.
        Kind::Hosts => import(Hosts::default(), provider, global).await,
    }
}

async fn handle<R: StateResource + Identified>(
    provider: &Provider,
    args: &ShowArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let lookup: R = seed(&[
        ("id", args.id.as_deref()),
        ("name", args.name.as_deref()),
        ("access_policy_id", args.access_policy_id.as_deref()),
    ])?;
    lookup.validate_lookup()?;
    import(lookup, provider, global).await
}

async fn import<R: StateResource>(lookup: R, provider: &Provider, global: &GlobalOpts) -> Result<(), CliError> {
    let found = lookup.read(provider, ReadMode::Import).await?;
    let out = output::render_state(&global.output, &found)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
