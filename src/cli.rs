use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use xChart::indicators::OverlaySpec;
use xChart::models::ColumnField;

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub file: PathBuf,
    pub config: PathBuf,
    pub assume_ms: bool,
    pub overlays: Vec<OverlaySpec>,
    pub mapping: Vec<(ColumnField, String)>,
    pub accept_mapping: bool,
    pub summary: bool,
}

const MAPPING_ARGS: [(&str, ColumnField); 6] = [
    ("date", ColumnField::Date),
    ("open", ColumnField::Open),
    ("high", ColumnField::High),
    ("low", ColumnField::Low),
    ("close", ColumnField::Close),
    ("volume", ColumnField::Volume),
];

fn command() -> Command {
    let mut cmd = Command::new("xchart")
        .version(xChart::VERSION)
        .about("Normalizes an OHLC(V) CSV export and computes moving-average overlays")
        .arg(
            Arg::new("file")
                .help("CSV file with a header row")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to the config.json configuration file")
                .default_value(xChart::config::DEFAULT_CONFIG_PATH)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("assume-ms")
                .long("assume-ms")
                .help("Treat every numeric date as epoch milliseconds")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sma")
                .long("sma")
                .help("Add an SMA overlay with this period (repeatable, replaces configured overlays)")
                .action(ArgAction::Append)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("ema")
                .long("ema")
                .help("Add an EMA overlay with this period (repeatable, replaces configured overlays)")
                .action(ArgAction::Append)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("Accept an auto-detected column mapping that needs confirmation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("summary")
                .short('s')
                .long("summary")
                .help("Print a text summary instead of the JSON render payload")
                .action(ArgAction::SetTrue),
        );

    for (name, field) in MAPPING_ARGS {
        cmd = cmd.arg(
            Arg::new(name)
                .long(name)
                .value_name("HEADER")
                .help(format!("Header holding the {} column", field)),
        );
    }
    cmd
}

impl Args {
    pub fn parse() -> Self {
        Args::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let periods = |id: &str| -> Vec<usize> {
            matches
                .get_many::<usize>(id)
                .map(|vals| vals.copied().collect())
                .unwrap_or_default()
        };

        let mut overlays: Vec<OverlaySpec> = periods("sma").into_iter().map(OverlaySpec::sma).collect();
        overlays.extend(periods("ema").into_iter().map(OverlaySpec::ema));

        let mapping = MAPPING_ARGS
            .iter()
            .filter_map(|(name, field)| matches.get_one::<String>(name).map(|h| (*field, h.clone())))
            .collect();

        Args {
            file: matches.get_one::<PathBuf>("file").cloned().unwrap_or_default(),
            config: matches.get_one::<PathBuf>("config").cloned().unwrap_or_default(),
            assume_ms: matches.get_flag("assume-ms"),
            overlays,
            mapping,
            accept_mapping: matches.get_flag("yes"),
            summary: matches.get_flag("summary"),
        }
    }
}
