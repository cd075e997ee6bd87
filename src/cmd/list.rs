use anstream::{eprintln, print, println};
use anyhow::Result;
use clap::Args;
use recipe_store::{Recipe, SearchHit};

use crate::Context;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only recipes whose title contains this text, ignoring case
    #[arg(default_value = "")]
    query: String,

    /// Only count the number of recipes
    #[arg(short = 'n', long, conflicts_with = "json")]
    count: bool,

    /// Print the recipes as JSON
    #[arg(short, long)]
    json: bool,
}

pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    ctx.with_store(|store| {
        let hits = store.search(&args.query);

        if args.count {
            println!("{}", hits.len());
            return Ok(());
        }

        if args.json {
            let recipes = hits.iter().map(|h| h.recipe).collect::<Vec<&Recipe>>();
            println!("{}", serde_json::to_string_pretty(&recipes)?);
            return Ok(());
        }

        if hits.is_empty() {
            if store.is_empty() {
                eprintln!("No recipes yet. Add one with `recipes new`");
            } else {
                eprintln!("No recipe title contains '{}'", args.query);
            }
            return Ok(());
        }

        let mut table = tabular::Table::new("{:>}  {:<}  {:<}  {:>}");
        for hit in &hits {
            table.add_row(list_row(hit));
        }
        print!("{table}");
        Ok(())
    })
}

fn list_row(hit: &SearchHit) -> tabular::Row {
    use owo_colors::OwoColorize;

    let mut row = tabular::Row::new();
    row.add_ansi_cell(hit.index.dimmed());
    row.add_ansi_cell(hit.recipe.title.bold());
    row.add_cell(ingredient_count(hit.recipe));
    row.add_ansi_cell(hit.recipe.time.yellow());
    row
}

fn ingredient_count(recipe: &Recipe) -> String {
    let n = recipe.ingredients.len();
    format!("{n} ingredient{}", if n == 1 { "" } else { "s" })
}
