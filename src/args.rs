use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::cmd::{app, config, delete, edit, generate_completions, list, new, show};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(Debug, Subcommand, strum::Display)]
pub enum Command {
    /// List the recipes, optionally searching by title
    #[command(visible_alias = "ls")]
    List(list::ListArgs),
    /// Show a recipe
    #[command(visible_alias = "s")]
    Show(show::ShowArgs),
    /// Add a new recipe
    #[command(visible_alias = "add")]
    New(new::NewArgs),
    /// Edit an existing recipe
    Edit(edit::EditArgs),
    /// Delete a recipe, after confirming
    #[command(visible_alias = "rm")]
    Delete(delete::DeleteArgs),
    /// Browse and edit the book interactively
    App(app::AppArgs),
    /// See loaded configuration
    Config(config::ConfigArgs),
    /// Generate shell completions
    GenerateCompletions(generate_completions::GenerateCompletionsArgs),
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    #[command(flatten)]
    pub color: colorchoice_clap::Color,

    /// Change the directory the recipes are saved in
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath, global = true)]
    pub path: Option<Utf8PathBuf>,

    #[arg(long, hide_short_help = true, global = true)]
    pub debug_trace: bool,
}

/// Fields of a recipe given on the command line
#[derive(Debug, Default, Args)]
pub struct DraftArgs {
    /// Recipe title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Ingredients, separated by commas
    #[arg(short, long)]
    pub ingredients: Option<String>,

    /// Time in minutes
    #[arg(short = 'm', long, value_name = "MINUTES")]
    pub time: Option<String>,
}

impl DraftArgs {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.ingredients.is_none() && self.time.is_none()
    }

    /// Overwrites the fields of `draft` that were given
    pub fn apply(self, draft: &mut recipe_store::Draft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(ingredients) = self.ingredients {
            draft.ingredients = ingredients;
        }
        if let Some(time) = self.time {
            draft.time = time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use recipe_store::Draft;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_new() {
        let args = CliArgs::try_parse_from([
            "recipes",
            "new",
            "--title",
            "Cake",
            "-i",
            "flour, sugar",
            "-m",
            "45",
        ])
        .unwrap();
        assert_eq!(args.command.to_string(), "New");
        let Command::New(new) = args.command else {
            panic!("expected new");
        };
        let mut draft = Draft::default();
        new.fields.apply(&mut draft);
        assert_eq!(draft, Draft::new("Cake", "flour, sugar", "45"));
    }

    #[test]
    fn parse_global_path() {
        let args = CliArgs::try_parse_from(["recipes", "ls", "bre", "--path", "/tmp/book"]).unwrap();
        assert_eq!(
            args.global_args.path.as_deref(),
            Some(camino::Utf8Path::new("/tmp/book"))
        );
        assert!(matches!(args.command, Command::List(_)));
    }

    #[test]
    fn delete_has_no_skip_flag() {
        assert!(CliArgs::try_parse_from(["recipes", "rm", "0", "--yes"]).is_err());
        assert!(CliArgs::try_parse_from(["recipes", "rm", "0"]).is_ok());
    }

    #[test]
    fn apply_keeps_missing_fields() {
        let mut draft = Draft::new("Cake", "flour", "45");
        DraftArgs {
            time: Some("50".into()),
            ..Default::default()
        }
        .apply(&mut draft);
        assert_eq!(draft, Draft::new("Cake", "flour", "50"));
        assert!(DraftArgs::default().is_empty());
    }
}
