//! `fmc resolve`: name to id.

use serde::Serialize;
use serde::de::DeserializeOwned;

use fmc_core::{Identified, Provider, Resource, resolve_id_by_name};

use super::seed;
use crate::cli::{GlobalOpts, Kind, OutputFormat, ResolveArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Resolved<'a> {
    name: &'a str,
    id: String,
}

pub async fn dispatch(provider: &Provider, args: &ResolveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.kind {
        Kind::AccessRule => handle::<fmc_core::AccessRule>(provider, args, global).await,
        Kind::CertificateMap => handle::<fmc_core::CertificateMap>(provider, args, global).await,
        Kind::SecurityZone => handle::<fmc_core::SecurityZone>(provider, args, global).await,
        Kind::Hosts => Err(CliError::validation(
            "fmc_hosts is a bulk resource; resolve individual hosts with `fmc show hosts`",
        )),
    }
}

async fn handle<R: Identified + DeserializeOwned>(
    provider: &Provider,
    args: &ResolveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(feature) = R::FEATURE {
        provider.capabilities().require(feature)?;
    }

    let lookup: R = seed(&[
        ("name", Some(args.name.as_str())),
        ("access_policy_id", args.access_policy_id.as_deref()),
    ])?;
    let collection = lookup.path()?.collection()?;
    let id = resolve_id_by_name(
        provider.client(),
        R::TYPE_NAME,
        &collection,
        &args.name,
        &lookup.request_opts(),
    )
    .await?;

    let out = match global.output {
        OutputFormat::Table => id,
        ref format => output::render_state(format, &Resolved { name: &args.name, id })?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
