//! `fmc apply`: create on first apply, update against the prior state after.

use fmc_core::Provider;
use tracing::debug;

use super::StateResource;
use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;
use crate::{output, state};

pub async fn handle<R: StateResource>(provider: &Provider, args: &ApplyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let desired: R = state::read_document(&args.file)?;
    let prior: Option<R> = state::read_prior(&args.state)?;

    let (verb, applied) = match prior {
        Some(prior) => {
            debug!(state = %args.state.display(), "prior state found");
            ("Updated", desired.update(&prior, provider).await?)
        }
        None => ("Created", desired.create(provider).await?),
    };

    state::write_document(&args.state, &applied)?;
    if !global.quiet {
        eprintln!("✓ {verb} {} (state: {})", R::TYPE_NAME, args.state.display());
    }

    let out = output::render_state(&global.output, &applied)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
