use anyhow::Result;
use clap::Args;

use crate::{render, Context};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Recipe index, as shown by `list`
    index: usize,
}

pub fn run(ctx: &Context, args: ShowArgs) -> Result<()> {
    ctx.with_store(|store| {
        let recipe = store.get(args.index)?;
        render::print_card(&mut anstream::stdout().lock(), recipe)?;
        Ok(())
    })
}
