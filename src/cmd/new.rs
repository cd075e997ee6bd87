use anstream::eprintln;
use anyhow::{bail, Result};
use clap::Args;
use recipe_store::Draft;

use crate::{args::DraftArgs, form, Context};

#[derive(Debug, Args)]
pub struct NewArgs {
    #[command(flatten)]
    pub(crate) fields: DraftArgs,

    /// Do not ask for the fields that were not given
    #[arg(long)]
    no_prompt: bool,
}

pub fn run(ctx: &Context, args: NewArgs) -> Result<()> {
    let mut draft = Draft::default();
    args.fields.apply(&mut draft);

    if !args.no_prompt && !draft.blank_fields().is_empty() && !form::prompt_missing(&mut draft)? {
        bail!("Cancelled");
    }

    ctx.with_store(|store| {
        let index = store.create(&draft)?;
        eprintln!("Added '{}' at index {index}", draft.title);
        Ok(())
    })
}
