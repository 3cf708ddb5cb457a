//! `list` and `search` handlers.

use holocron_core::DataSource;

use crate::cli::{ListArgs, OutputFormat, PagingArgs, SearchArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle_list(args: ListArgs, settings: &Settings) -> Result<(), CliError> {
    show_page(&args.paging, args.search.as_deref(), args.cards, settings).await
}

pub async fn handle_search(args: SearchArgs, settings: &Settings) -> Result<(), CliError> {
    if args.term.trim().is_empty() {
        return Err(CliError::Validation {
            field: "term".into(),
            reason: "search text cannot be empty".into(),
        });
    }
    show_page(&args.paging, Some(&args.term), args.cards, settings).await
}

async fn show_page(
    paging: &PagingArgs,
    search: Option<&str>,
    cards: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let source = DataSource::from_config(&settings.archive)?;
    let params = util::load_params(paging, search);
    let state = util::run_load(&source, params, settings.quiet).await?;
    source.teardown();

    let color = output::should_color(settings.color);
    let out = output::render_records(settings.output, &state.rows, cards, color)?;
    output::print_output(&out, settings.quiet);

    if settings.output == OutputFormat::Table && !settings.quiet {
        if state.rows.is_empty() {
            eprintln!("No characters found");
        }
        eprintln!("{}", output::page_footer(&state, color));
    }
    Ok(())
}
