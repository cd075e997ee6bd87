use anstream::{print, println};
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Args;
use recipe_store::{FileStorage, RECIPES_KEY};

use crate::{
    config::{default_data_dir, global_file_path, global_store, BookConfig, CONFIG_FILE},
    Context,
};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Run the basic interactive config setup
    #[arg(long)]
    setup: bool,
}

pub fn run(ctx: &Context, args: ConfigArgs) -> Result<()> {
    if args.setup {
        run_setup(&ctx.config)
    } else {
        display(ctx)
    }
}

fn run_setup(config: &BookConfig) -> Result<()> {
    use inquire::{Confirm, Text};
    use owo_colors::OwoColorize;

    let default_dir = default_data_dir()?;
    let current = config.data_dir.as_ref().unwrap_or(&default_dir);

    println!("Welcome to your {}!", "recipe book".magenta().bold());
    println!();
    for line in textwrap::wrap(
        &format!(
            "Recipes are saved in a single `{RECIPES_KEY}.json` file. You can \
            keep it in the default place or choose another directory, for \
            example one that is synced between your computers."
        ),
        textwrap::termwidth().min(80),
    ) {
        println!("{line}");
    }
    println!();

    let data_dir = Text::new("Recipes directory:")
        .with_initial_value(current.as_str())
        .with_help_message("Leave empty or press ESC for the default")
        .prompt_skippable()?
        .filter(|s| !s.is_empty())
        .map(Utf8PathBuf::from)
        .filter(|p| *p != default_dir);

    let warn_on_save_failure = Confirm::new("Warn when recipes could not be saved?")
        .with_default(config.warn_on_save_failure)
        .prompt()?;

    global_store(
        CONFIG_FILE,
        BookConfig {
            data_dir,
            warn_on_save_failure,
        },
    )?;

    println!();
    println!("Configuration saved to {}", global_file_path(CONFIG_FILE)?.yellow());
    Ok(())
}

fn display(ctx: &Context) -> Result<()> {
    use owo_colors::OwoColorize;

    let config_path = global_file_path(CONFIG_FILE)?;
    print!("Config: {}", config_path.yellow());
    if config_path.is_file() {
        println!();
    } else {
        println!(" {}", "(not found, using defaults)".dimmed());
    }

    let recipes = FileStorage::new(ctx.data_dir()).path(RECIPES_KEY);
    print!("Recipes: {} {} ", recipes.yellow(), "--".dimmed());
    if recipes.is_file() {
        println!("{}", "found".green().bold());
    } else {
        println!("{}", "not found".red().bold());
    }

    let fence = "+++".dimmed().to_string();
    println!("{fence}");
    let c = toml::to_string_pretty(&ctx.config)?;
    println!("{}", c.trim());
    println!("{fence}");
    Ok(())
}
