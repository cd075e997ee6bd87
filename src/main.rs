use anstream::ColorChoice;
use anyhow::{Context as _, Result};
use args::{CliArgs, Command, GlobalArgs};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use config::{global_load, BookConfig, CONFIG_FILE};
use recipe_store::{FileStorage, RecipeStore};

// commands
mod cmd;

// other modules
mod args;
mod config;
mod form;
mod render;

const APP_NAME: &str = "recipe-book";
const UTF8_PATH_PANIC: &str = "recipes only supports UTF-8 paths. If this is problem for you, file an issue in the recipe-book repository";

pub fn main() -> Result<()> {
    let args = CliArgs::parse();

    let color_ctx = init_color(args.global_args.color);
    if args.global_args.debug_trace {
        tracing_subscriber::FmtSubscriber::builder()
            .compact()
            .with_max_level(tracing::Level::TRACE)
            .with_span_events(
                tracing_subscriber::fmt::format::FmtSpan::CLOSE
                    | tracing_subscriber::fmt::format::FmtSpan::NEW,
            )
            .with_ansi(color_ctx.color_stderr)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::FmtSubscriber::builder()
            .compact()
            .with_target(false)
            .with_ansi(color_ctx.color_stderr)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Command::GenerateCompletions(args) => return cmd::generate_completions::run(args),
        _ => {}
    }

    let ctx = configure_context(args.global_args)?;

    match args.command {
        Command::List(args) => cmd::list::run(&ctx, args),
        Command::Show(args) => cmd::show::run(&ctx, args),
        Command::New(args) => cmd::new::run(&ctx, args),
        Command::Edit(args) => cmd::edit::run(&ctx, args),
        Command::Delete(args) => cmd::delete::run(&ctx, args),
        Command::App(args) => cmd::app::run(&ctx, args),
        Command::Config(args) => cmd::config::run(&ctx, args),
        Command::GenerateCompletions(_) => unreachable!(),
    }
}

struct ColorContext {
    color_stderr: bool,
}

fn init_color(color: colorchoice_clap::Color) -> ColorContext {
    color.write_global();
    let color_stderr = anstream::AutoStream::choice(&std::io::stderr()) != ColorChoice::Never;

    ColorContext { color_stderr }
}

pub struct Context {
    data_dir: Utf8PathBuf,
    config: BookConfig,
}

#[tracing::instrument(level = "debug", skip_all)]
fn configure_context(args: GlobalArgs) -> Result<Context> {
    let config: BookConfig =
        global_load(CONFIG_FILE).context("Error loading global config file")?;

    let data_dir = match args.path.as_deref().or(config.data_dir.as_deref()) {
        Some(dir) => dir.to_owned(),
        None => config::default_data_dir()?,
    };
    if data_dir.exists() && !data_dir.is_dir() {
        anyhow::bail!("Data path is not a directory: '{data_dir}'");
    }
    tracing::debug!(%data_dir, "using data dir");

    Ok(Context { data_dir, config })
}

impl Context {
    fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    fn open_store(&self) -> Result<RecipeStore> {
        let store = RecipeStore::load(FileStorage::new(&self.data_dir))
            .context("Failed to open the recipe book")?;
        self.report_failures(&store);
        Ok(store)
    }

    /// Runs `f` with the book and waits for its writes before returning
    fn with_store<T>(&self, f: impl FnOnce(&mut RecipeStore) -> Result<T>) -> Result<T> {
        let mut store = self.open_store()?;
        let out = f(&mut store);
        store.flush();
        self.report_failures(&store);
        out
    }

    /// Prints load and save problems without stopping
    fn report_failures(&self, store: &RecipeStore) {
        for err in store.take_persist_failures() {
            if self.config.warn_on_save_failure {
                render::warning(&err);
            } else {
                tracing::debug!(error = %err, "persistence failure");
            }
        }
    }
}
