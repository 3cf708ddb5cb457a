//! `get` handler: a single record by archive id.

use holocron_core::ListSource;

use crate::cli::GetArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: GetArgs, settings: &Settings) -> Result<(), CliError> {
    let id = args.id.trim();
    if id.is_empty() {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: "id cannot be empty".into(),
        });
    }

    let client = settings.archive.build_client()?;
    let bar = util::spinner("Looking up the record...", settings.quiet);
    let result = ListSource::fetch_by_id(&client, id).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let record = result?;

    let color = output::should_color(settings.color);
    let out = output::render_single(
        settings.output,
        &record,
        |r| output::character_card(r, color),
        |r| r.name.clone(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
