use anstream::eprintln;
use anyhow::Result;
use clap::Args;

use crate::{args::DraftArgs, form, Context};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Recipe index, as shown by `list`
    index: usize,

    /// Fields to change. Without any, every field is asked for.
    #[command(flatten)]
    fields: DraftArgs,

    /// Do not ask for anything
    #[arg(long)]
    no_prompt: bool,
}

pub fn run(ctx: &Context, args: EditArgs) -> Result<()> {
    ctx.with_store(|store| {
        let mut draft = store.begin_edit(args.index)?;
        let prompt = args.fields.is_empty() && !args.no_prompt;
        args.fields.apply(&mut draft);

        if prompt && !form::prompt_draft(&mut draft)? {
            eprintln!("Nothing changed");
            return Ok(());
        }

        let recipe = store.update(args.index, &draft)?;
        eprintln!("Saved changes to '{}'", recipe.title);
        Ok(())
    })
}
