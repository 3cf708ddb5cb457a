//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const OUTPUT_CHOICES: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
const COLOR_CHOICES: &[&str] = &["auto", "always", "never"];

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn describe(cfg: &Config) -> String {
    [
        ("api_url", cfg.api_url.clone()),
        ("page_size", cfg.page_size.to_string()),
        ("timeout", format!("{}s", cfg.timeout)),
        ("retries", cfg.retries.to_string()),
        ("output", cfg.output.clone()),
        ("color", cfg.color.clone()),
    ]
    .iter()
    .map(|(key, value)| format!("{key:<10} {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}

fn choice_index(choices: &[&str], current: &str) -> usize {
    choices
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
        .unwrap_or(0)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                config::output_format(global, &cfg),
                &cfg,
                describe,
                |c| c.api_url.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Init => {
            let current = config::load_config_or_default();
            eprintln!("holocron configuration");
            eprintln!("  Config path: {}\n", config::config_path().display());

            let api_url: String = Input::new()
                .with_prompt("Archive API URL")
                .default(current.api_url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let page_size: u32 = Input::new()
                .with_prompt("Records per page")
                .default(current.page_size)
                .validate_with(|n: &u32| {
                    if *n == 0 {
                        Err("must be at least 1")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            let output = Select::new()
                .with_prompt("Default output format")
                .items(OUTPUT_CHOICES)
                .default(choice_index(OUTPUT_CHOICES, &current.output))
                .interact()
                .map_err(prompt_err)?;

            let color = Select::new()
                .with_prompt("Color")
                .items(COLOR_CHOICES)
                .default(choice_index(COLOR_CHOICES, &current.color))
                .interact()
                .map_err(prompt_err)?;

            let cfg = Config {
                api_url,
                page_size,
                output: OUTPUT_CHOICES[output].to_owned(),
                color: COLOR_CHOICES[color].to_owned(),
                ..current
            };
            cfg.to_archive_config()?;

            let path = config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Try it: holocron list");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_every_key() {
        let text = describe(&Config::default());
        for key in ["api_url", "page_size", "timeout", "retries", "output", "color"] {
            assert!(text.contains(key), "missing {key}");
        }
    }

    #[test]
    fn choice_index_falls_back_to_first() {
        assert_eq!(choice_index(OUTPUT_CHOICES, "YAML"), 3);
        assert_eq!(choice_index(COLOR_CHOICES, "sometimes"), 0);
    }
}
