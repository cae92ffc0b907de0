//! plugwiz's main application entry point.
//! Handles command-line argument parsing and reports the outcome of a run.

use plugwiz::{
    cli::{get_args, print_help, Args},
    config::load_settings,
    constants::SETTINGS_FILES,
    error::{default_error_handler, Result},
    logger::init_logger,
    tokens::TokenTableBuilder,
    wizard::{RunStatus, Wizard},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Prints every datum with its forms, using placeholders for missing input.
fn list_tokens(args: Args) -> Result<()> {
    let table = TokenTableBuilder::new(args.id.unwrap_or_default(), args.name.unwrap_or_default())
        .author(args.author)
        .org(args.org)
        .testing_fallbacks(true)
        .build()?;
    print!("{}", table.listing(3));
    Ok(())
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the settings file of the blueprint collection
/// 2. Resolves the token table and the rule set
/// 3. Generates the plugin at every destination
/// 4. Prints a summary of per-item diagnostics, if any
fn run(args: Args) -> Result<()> {
    if args.list_tokens {
        return list_tokens(args);
    }
    if args.id.is_none() || args.name.is_none() {
        print_help();
        std::process::exit(1);
    }

    let settings = load_settings(args.collection(), &SETTINGS_FILES)?.unwrap_or_default();
    let wizard = Wizard::new(args.into_config(&settings))?;
    let report = wizard.run()?;

    for destination in &report.destinations {
        println!("Created '{}'.", destination.target.display());
    }

    if let RunStatus::Degraded(count) = report.status() {
        eprintln!("Finished with {count} problem(s):");
        for issue in wizard.rule_issues() {
            eprintln!("  {issue}");
        }
        for destination in &report.destinations {
            for issue in destination.names.issues.iter().chain(&destination.contents.issues) {
                eprintln!("  {issue}");
            }
        }
    }
    Ok(())
}
