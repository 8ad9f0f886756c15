//! Command-line argument parsing.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use pitchdesk_core::models::Domain;
use pitchdesk_core::utils::parse_calendar_date;
use pitchdesk_core::DateRange;

pub const USAGE: &str = "\
Usage: pitchdesk [members|teams|matches] [options]

Filters one admin list and prints the matching rows with facet badge counts.
Filter options are applied in the order given.

Options:
  --preset <id>          Apply a quick preset (replaces all filters)
  --facet <id>=<value>   Set one facet, e.g. --facet status=active
  --search <text>        Case-insensitive search over the list's text fields
  --date <range>         today, yesterday, tomorrow, thisWeek, last7Days,
                         last30Days, last90Days, last365Days, custom, all
  --from <YYYY-MM-DD>    Lower date bound (switches to a custom range)
  --to <YYYY-MM-DD>      Upper date bound (switches to a custom range)
  --live                 Fetch live records from the backend first
  --json                 Print the result as JSON
  --list                 Show the list's facets and presets, then exit
  --init-config          Write the current settings to the config file
  -h, --help             Show this help";

/// One filter edit, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Preset(String),
    Facet { id: String, value: String },
    Search(String),
    Date(DateRange),
    From(NaiveDate),
    To(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub domain: Domain,
    pub steps: Vec<Step>,
    pub live: bool,
    pub json: bool,
    pub list: bool,
    pub init_config: bool,
    pub help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            domain: Domain::Members,
            steps: Vec::new(),
            live: false,
            json: false,
            list: false,
            init_config: false,
            help: false,
        }
    }
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut domain_seen = false;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{} needs a value", flag))
            };
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--live" => parsed.live = true,
                "--json" => parsed.json = true,
                "--list" => parsed.list = true,
                "--init-config" => parsed.init_config = true,
                "--preset" => parsed.steps.push(Step::Preset(value("--preset")?)),
                "--search" => parsed.steps.push(Step::Search(value("--search")?)),
                "--facet" => {
                    let raw = value("--facet")?;
                    let (id, val) = raw
                        .split_once('=')
                        .ok_or_else(|| anyhow!("--facet expects <id>=<value>, got '{}'", raw))?;
                    parsed.steps.push(Step::Facet {
                        id: id.trim().to_string(),
                        value: val.trim().to_string(),
                    });
                }
                "--date" => {
                    let raw = value("--date")?;
                    let range = raw.parse::<DateRange>().context("Invalid --date value")?;
                    parsed.steps.push(Step::Date(range));
                }
                "--from" => parsed.steps.push(Step::From(parse_date("--from", &value("--from")?)?)),
                "--to" => parsed.steps.push(Step::To(parse_date("--to", &value("--to")?)?)),
                flag if flag.starts_with('-') => bail!("Unknown option: {}", flag),
                other => {
                    if domain_seen {
                        bail!("Unexpected argument: {}", other);
                    }
                    parsed.domain = other.parse::<Domain>().map_err(|e| anyhow!(e))?;
                    domain_seen = true;
                }
            }
        }

        Ok(parsed)
    }
}

fn parse_date(flag: &str, raw: &str) -> Result<NaiveDate> {
    parse_calendar_date(raw).ok_or_else(|| anyhow!("{} expects YYYY-MM-DD, got '{}'", flag, raw))
}
