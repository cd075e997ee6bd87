//! Format recipes for humans to read

use std::io;

use owo_colors::OwoColorize;
use recipe_store::Recipe;

pub type Result<T = ()> = std::result::Result<T, io::Error>;

pub fn print_card(w: &mut impl io::Write, recipe: &Recipe) -> Result {
    writeln!(w, "{} {}", "\u{2665}".red(), recipe.title.bold())?;
    for ingredient in &recipe.ingredients {
        print_wrapped_with_options(w, ingredient, |o| {
            o.initial_indent("  \u{2022} ").subsequent_indent("    ")
        })?;
    }
    writeln!(w, "{}", format!(" {} ", recipe.time).black().on_yellow())
}

pub fn print_header(w: &mut impl io::Write, text: &str) -> Result {
    writeln!(w, "{}", format!("  {text}  ").white().on_magenta().bold())?;
    writeln!(w)
}

fn print_wrapped_with_options<F>(w: &mut impl io::Write, text: &str, f: F) -> Result
where
    F: FnOnce(textwrap::Options) -> textwrap::Options,
{
    let width = textwrap::termwidth().min(80);
    let options = f(textwrap::Options::new(width));
    for line in textwrap::wrap(text, options) {
        writeln!(w, "{line}")?;
    }
    Ok(())
}

/// Prints an error that does not stop the program
pub fn warning(err: &dyn std::error::Error) {
    anstream::eprintln!("{} {err}", "warning:".yellow().bold());
    let mut source = err.source();
    while let Some(cause) = source {
        anstream::eprintln!("  {} {cause}", "caused by:".dimmed());
        source = cause.source();
    }
}

pub fn error(err: &dyn std::fmt::Display) {
    anstream::eprintln!("{} {err}", "error:".red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card() {
        let recipe = Recipe {
            title: "Cake".into(),
            ingredients: vec!["flour".into(), "sugar".into()],
            time: "45 MIN".into(),
        };
        let mut out = Vec::new();
        print_card(&mut out, &recipe).unwrap();
        let out = String::from_utf8(out).unwrap();

        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Cake"));
        assert_eq!(lines[1], "  \u{2022} flour");
        assert_eq!(lines[2], "  \u{2022} sugar");
        assert!(lines[3].contains(" 45 MIN "));
    }
}
