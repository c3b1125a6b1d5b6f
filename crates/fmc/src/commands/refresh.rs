//! `fmc refresh`: partial reconciliation of a state file.

use fmc_core::{CoreError, Provider, ReadMode};
use tracing::warn;

use super::StateResource;
use crate::cli::{GlobalOpts, StateArgs};
use crate::error::CliError;
use crate::{output, state};

pub async fn handle<R: StateResource>(provider: &Provider, args: &StateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let current: R = state::read_document(&args.state)?;

    let refreshed = match current.read(provider, ReadMode::Refresh).await {
        Ok(refreshed) => refreshed,
        Err(CoreError::NotFound { resource, id }) => {
            warn!(%resource, %id, "object no longer exists, removing state file");
            std::fs::remove_file(&args.state)?;
            if !global.quiet {
                eprintln!("✓ {resource} '{id}' was deleted outside of fmc; state removed");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    state::write_document(&args.state, &refreshed)?;
    let out = output::render_state(&global.output, &refreshed)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
