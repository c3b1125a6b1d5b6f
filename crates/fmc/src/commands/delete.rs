//! `fmc delete`: delete the recorded object and drop its state file.

use fmc_core::Provider;

use super::StateResource;
use crate::cli::{GlobalOpts, StateArgs};
use crate::error::CliError;
use crate::state;

pub async fn handle<R: StateResource>(provider: &Provider, args: &StateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let current: R = state::read_document(&args.state)?;
    current.delete(provider).await?;

    std::fs::remove_file(&args.state)?;
    if !global.quiet {
        eprintln!("✓ Deleted {} (state removed: {})", R::TYPE_NAME, args.state.display());
    }
    Ok(())
}
