//! Interactive pager over the archive.
//!
//! Each step issues a load on a single [`DataSource`] and renders whatever
//! its channels publish, so a failed page shows the archive's message and
//! the session carries on.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use owo_colors::OwoColorize;

use holocron_core::{
    DataSource, ListSource, ListingState, LoadParams, LoadPhase, SortDescriptor, SortDirection,
};

use crate::cli::BrowseArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

const HELP: &str = "\
  n, <enter>        next page
  p                 previous page
  g N               go to page N
  l N               show N records per page
  s FIELD [asc|desc] sort by FIELD (plain `s` clears the sort)
  / TEXT            filter by name (plain `/` clears the filter)
  f                 fetch the current page again
  r                 reset to the first unfiltered page
  q                 quit";

// ── Actions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseAction {
    Next,
    Previous,
    Goto(u32),
    PageSize(u32),
    Sort(Option<SortDescriptor>),
    Search(String),
    Refresh,
    Reset,
    Help,
    Quit,
}

fn parse_action(input: &str) -> Result<BrowseAction, String> {
    let input = input.trim();
    if let Some(term) = input.strip_prefix('/') {
        return Ok(BrowseAction::Search(term.trim().to_owned()));
    }

    let mut words = input.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(BrowseAction::Next);
    };
    let rest: Vec<&str> = words.collect();

    match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("n" | "next", []) => Ok(BrowseAction::Next),
        ("p" | "prev" | "previous", []) => Ok(BrowseAction::Previous),
        ("g" | "go" | "page", [n]) => positive(n).map(BrowseAction::Goto),
        ("l" | "limit" | "size", [n]) => positive(n).map(BrowseAction::PageSize),
        ("s" | "sort", []) => Ok(BrowseAction::Sort(None)),
        ("s" | "sort", [field]) => Ok(BrowseAction::Sort(Some(SortDescriptor::new(
            (*field).into(),
            SortDirection::Asc,
        )))),
        ("s" | "sort", [field, dir]) => {
            let direction = dir
                .parse::<SortDirection>()
                .map_err(|_| format!("unknown direction '{dir}', use asc or desc"))?;
            Ok(BrowseAction::Sort(Some(SortDescriptor::new(
                (*field).into(),
                direction,
            ))))
        }
        ("f" | "fetch" | "refresh", []) => Ok(BrowseAction::Refresh),
        ("r" | "reset", []) => Ok(BrowseAction::Reset),
        ("?" | "h" | "help", []) => Ok(BrowseAction::Help),
        ("q" | "quit" | "exit", []) => Ok(BrowseAction::Quit),
        _ => Err(format!("unrecognized command '{input}', type ? for help")),
    }
}

fn positive(raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a positive number, got '{raw}'")),
    }
}

/// Parameters that reload exactly what `state` describes.
fn params_from(state: &ListingState) -> LoadParams {
    LoadParams::new()
        .page(state.page)
        .page_size(state.page_size)
        .sort(state.sort.clone())
        .search(state.search.clone())
}

/// Work out the next load for `action`, or a message explaining why there
/// is nothing to load.
fn next_params(action: &BrowseAction, state: &ListingState) -> Result<LoadParams, String> {
    let here = params_from(state);
    match action {
        BrowseAction::Next if state.has_next_page() => {
            Ok(here.page(state.page.saturating_add(1)))
        }
        BrowseAction::Next => Err("already on the last page".into()),
        BrowseAction::Previous if state.has_previous_page() => {
            Ok(here.page(state.page.saturating_sub(1)))
        }
        BrowseAction::Previous => Err("already on the first page".into()),
        BrowseAction::Goto(page) => {
            let last = state.total_pages();
            if last > 0 && u64::from(*page) > last {
                Err(format!("there are only {last} pages"))
            } else {
                Ok(here.page(*page))
            }
        }
        BrowseAction::PageSize(size) => Ok(here.page(1).page_size(*size)),
        BrowseAction::Sort(sort) => Ok(here.page(1).sort(sort.clone())),
        BrowseAction::Search(term) => Ok(here.page(1).search(term.clone())),
        BrowseAction::Refresh => Ok(here),
        BrowseAction::Reset => Ok(LoadParams::new()),
        BrowseAction::Help | BrowseAction::Quit => Err(String::new()),
    }
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(args: BrowseArgs, settings: &Settings) -> Result<(), CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "stdin".into(),
            reason: "browse needs an interactive terminal, use `holocron list` in scripts".into(),
        });
    }

    let source = DataSource::from_config(&settings.archive)?;
    let color = output::should_color(settings.color);
    let mut pending = Some(util::load_params(&args.paging, args.search.as_deref()));

    loop {
        if let Some(params) = pending.take() {
            load_and_show(&source, params, settings, color).await?;
        }

        let line = prompt().await?;
        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match action {
            BrowseAction::Quit => break,
            BrowseAction::Help => eprintln!("{HELP}"),
            BrowseAction::Reset => {
                source.reset();
                pending = Some(LoadParams::new());
            }
            other => match next_params(&other, &source.snapshot()) {
                Ok(params) => pending = Some(params),
                Err(message) => eprintln!("{message}"),
            },
        }
    }

    source.teardown();
    Ok(())
}

async fn load_and_show<C: ListSource>(
    source: &DataSource<C>,
    params: LoadParams,
    settings: &Settings,
    color: bool,
) -> Result<(), CliError> {
    let handle = source.load(params);
    let tracker = util::track_loading(source, settings.quiet);
    let outcome = handle.await?;
    if let Some(tracker) = tracker {
        let _ = tracker.await;
    }
    tracing::debug!(?outcome, "browse load finished");

    if source.current_phase() == LoadPhase::Errored {
        let message = source.error().latest().unwrap_or_default();
        if color {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{message}");
        }
        return Ok(());
    }

    let rows = source.rows().latest();
    if rows.is_empty() {
        eprintln!("No characters found");
    } else {
        let out = output::render_records(settings.output, &rows, false, color)?;
        output::print_output(&out, false);
    }
    eprintln!("{}", output::page_footer(&source.snapshot(), color));
    Ok(())
}

async fn prompt() -> Result<String, CliError> {
    tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("browse (? for help)")
            .allow_empty(true)
            .interact_text()
    })
    .await?
    .map_err(|e| CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use holocron_core::SortField;
    use pretty_assertions::assert_eq;

    use super::*;

    fn state(page: u32, page_size: u32, count: u64) -> ListingState {
        ListingState {
            page,
            page_size,
            sort: None,
            search: String::new(),
            loading: false,
            count,
            rows: Arc::default(),
            phase: LoadPhase::Loaded,
            error: None,
        }
    }

    #[test]
    fn parses_navigation() {
        assert_eq!(parse_action(""), Ok(BrowseAction::Next));
        assert_eq!(parse_action("n"), Ok(BrowseAction::Next));
        assert_eq!(parse_action(" prev "), Ok(BrowseAction::Previous));
        assert_eq!(parse_action("g 4"), Ok(BrowseAction::Goto(4)));
        assert_eq!(parse_action("l 25"), Ok(BrowseAction::PageSize(25)));
        assert_eq!(parse_action("Q"), Ok(BrowseAction::Quit));
        assert!(parse_action("g 0").is_err());
        assert!(parse_action("g x").is_err());
        assert!(parse_action("dance").is_err());
    }

    #[test]
    fn parses_sort_and_search() {
        assert_eq!(
            parse_action("s height desc"),
            Ok(BrowseAction::Sort(Some(SortDescriptor::desc(
                SortField::Height
            ))))
        );
        assert_eq!(
            parse_action("sort name"),
            Ok(BrowseAction::Sort(Some(SortDescriptor::asc(SortField::Name))))
        );
        assert_eq!(parse_action("s"), Ok(BrowseAction::Sort(None)));
        assert!(parse_action("s height sideways").is_err());
        assert_eq!(
            parse_action("/ sky walker"),
            Ok(BrowseAction::Search("sky walker".into()))
        );
        assert_eq!(parse_action("/"), Ok(BrowseAction::Search(String::new())));
    }

    #[test]
    fn paging_stays_in_bounds() {
        let middle = state(2, 10, 82);
        assert_eq!(
            next_params(&BrowseAction::Next, &middle).map(|p| p.page),
            Ok(Some(3))
        );
        assert_eq!(
            next_params(&BrowseAction::Previous, &middle).map(|p| p.page),
            Ok(Some(1))
        );

        let last = state(9, 10, 82);
        assert!(next_params(&BrowseAction::Next, &last).is_err());

        let far = state(u32::MAX, 1, u64::MAX);
        assert!(far.has_next_page());
        assert_eq!(
            next_params(&BrowseAction::Next, &far).map(|p| p.page),
            Ok(Some(u32::MAX))
        );
        assert!(next_params(&BrowseAction::Goto(10), &last).is_err());
        assert!(next_params(&BrowseAction::Previous, &state(1, 10, 82)).is_err());
    }

    #[test]
    fn filter_and_sort_return_to_first_page() {
        let mut current = state(3, 5, 82);
        current.sort = Some(SortDescriptor::desc(SortField::Mass));

        let params = next_params(&BrowseAction::Search("sky".into()), &current);
        assert_eq!(
            params,
            Ok(LoadParams::new()
                .page(1)
                .page_size(5)
                .sort(Some(SortDescriptor::desc(SortField::Mass)))
                .search("sky"))
        );

        let params = next_params(&BrowseAction::Sort(None), &current);
        assert_eq!(params.map(|p| (p.page, p.sort)), Ok((Some(1), None)));
    }
}
