//! Command-line deck selection.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};
use u_deck::config::{FeatureGroup, SelectionConfig};
use u_deck::io::{export_deck, load_pool, normalize_path, read_identity_list};
use u_deck::report::{listing, ListingMode};
use u_deck::sa::SaConfig;
use u_deck::selection::DeckRunner;

/// Group layout used when neither `--group` nor `--plan` supplies one.
const DEFAULT_GROUPS: &[(&str, &[usize])] = &[
    ("TAMANHO E COR", &[11, 12, 13]),
    ("TIPO DE NINHO", &[14, 15, 16, 17]),
    ("2 PONTOS", &[19, 20, 21, 22]),
    ("GEOGRAFIA", &[23, 24]),
    ("HABITATS", &[5, 6, 7]),
];

const DEFAULT_INDIVIDUALS: &[usize] = &[8, 9, 10, 18, 25, 26, 27, 28, 29, 30];

#[derive(Parser, Debug)]
#[command(
    name = "u-deck",
    about = "Select a deck of records whose feature flags match target percentages"
)]
struct Cli {
    /// CSV file with a header row; cell 0 of each row is the record name.
    #[arg(long)]
    input: String,

    /// JSON selection config (size, tolerance, groups, individuals, mandatory).
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Number of records in the deck.
    #[arg(long)]
    size: Option<usize>,

    /// Allowed deviation per column, in percentage points.
    #[arg(long)]
    tolerance: Option<f64>,

    /// Feature group, e.g. `HABITATS=5-7:30` or `GEO=23,24:50`.
    #[arg(long = "group", value_name = "NAME=COLS:TARGET")]
    groups: Vec<String>,

    /// Target for a group of the default layout, e.g. `HABITATS=30`.
    #[arg(long = "target", value_name = "NAME=TARGET")]
    targets: Vec<String>,

    /// Columns that must appear on at least one record.
    #[arg(long, value_delimiter = ',')]
    individual: Vec<usize>,

    /// Name of a record that must be in the deck.
    #[arg(long)]
    mandatory: Vec<String>,

    /// File with one mandatory record name per line (`-` for stdin).
    #[arg(long)]
    mandatory_file: Option<String>,

    /// Which records to list.
    #[arg(long, value_enum, default_value = "full")]
    mode: ModeArg,

    /// Write the deck, with the input header, to this CSV file.
    #[arg(long)]
    export: Option<String>,

    /// Print the report as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 50_000)]
    iterations: usize,

    #[arg(long, default_value_t = 1.0)]
    initial_temperature: f64,

    #[arg(long, default_value_t = 0.9999)]
    cooling_rate: f64,

    /// Independent annealing runs; the best deck is kept.
    #[arg(long, default_value_t = 1)]
    restarts: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// The whole deck.
    Full,
    /// Only records added beyond the mandatory ones.
    Added,
    /// Only pool records left out of the deck.
    Removed,
}

impl From<ModeArg> for ListingMode {
    fn from(value: ModeArg) -> ListingMode {
        match value {
            ModeArg::Full => ListingMode::Full,
            ModeArg::Added => ListingMode::Added,
            ModeArg::Removed => ListingMode::Removed,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let input = normalize_path(&cli.input);
    let pool = load_pool(&input).with_context(|| format!("reading {}", input.display()))?;

    let config = build_config(&cli)?;
    let sa = SaConfig {
        initial_temperature: cli.initial_temperature,
        cooling_rate: cli.cooling_rate,
        max_iterations: cli.iterations,
        seed: cli.seed,
        ..SaConfig::default()
    };

    let outcome = if cli.restarts > 1 {
        DeckRunner::select_multistart(&pool, &config, &sa, cli.restarts)?
    } else {
        DeckRunner::select(&pool, &config, &sa)?
    };

    if outcome.feasible {
        info!(iterations = outcome.iterations, "deck within tolerance");
    } else {
        warn!(
            iterations = outcome.iterations,
            "no deck within tolerance found, showing the best one"
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        let mode = ListingMode::from(cli.mode);
        let heading = match mode {
            ListingMode::Full => "Deck",
            ListingMode::Added => "Added beyond the mandatory records",
            ListingMode::Removed => "Left out of the deck",
        };
        println!("{heading}:");
        for record in listing(&pool, &outcome.deck, &outcome.plan, mode) {
            println!(" - {}", record.identity());
        }
        println!();
        print!("{}", outcome.report);
    }

    if let Some(export) = &cli.export {
        let path = normalize_path(export);
        export_deck(&path, &pool, &outcome.deck)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<SelectionConfig> {
    let mut config = match &cli.plan {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading plan {}", path.display()))?;
            serde_json::from_str::<SelectionConfig>(&text)
                .with_context(|| format!("parsing plan {}", path.display()))?
        }
        None => SelectionConfig::new(0),
    };

    if let Some(size) = cli.size {
        config.size = size;
    }
    if config.size == 0 {
        bail!("deck size is required (--size or a plan file)");
    }
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }

    if !cli.groups.is_empty() {
        config.groups = cli
            .groups
            .iter()
            .map(|spec| parse_group(spec))
            .collect::<Result<_>>()?;
    } else if config.groups.is_empty() {
        config.groups = default_groups(&cli.targets)?;
        if cli.individual.is_empty() && config.individuals.is_empty() {
            config = config.with_individuals(DEFAULT_INDIVIDUALS.iter().copied());
        }
    }

    if !cli.individual.is_empty() {
        config.individuals.clear();
        config = config.with_individuals(cli.individual.iter().copied());
    }

    config = config.with_mandatory(cli.mandatory.iter().cloned());
    if let Some(source) = &cli.mandatory_file {
        let names = if source == "-" {
            read_identity_list(io::stdin().lock())?
        } else {
            let path = normalize_path(source);
            let file = fs::File::open(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            read_identity_list(BufReader::new(file))?
        };
        config = config.with_mandatory(names);
    }

    Ok(config)
}

/// Parses `NAME=COLS:TARGET`, where COLS is a comma list of columns or ranges.
fn parse_group(spec: &str) -> Result<FeatureGroup> {
    let (name, rest) = spec
        .split_once('=')
        .with_context(|| format!("group '{spec}' is missing '='"))?;
    let (columns, target) = rest
        .rsplit_once(':')
        .with_context(|| format!("group '{spec}' is missing ':TARGET'"))?;
    let target: f64 = target
        .trim()
        .parse()
        .with_context(|| format!("group '{spec}' has a bad target"))?;
    Ok(FeatureGroup::new(name.trim(), parse_columns(columns)?, target))
}

fn parse_columns(list: &str) -> Result<Vec<usize>> {
    let mut columns = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: usize = lo.trim().parse().with_context(|| format!("bad column '{part}'"))?;
                let hi: usize = hi.trim().parse().with_context(|| format!("bad column '{part}'"))?;
                if lo > hi {
                    bail!("empty column range '{part}'");
                }
                columns.extend(lo..=hi);
            }
            None => columns.push(part.parse().with_context(|| format!("bad column '{part}'"))?),
        }
    }
    Ok(columns)
}

/// The default layout, with one `--target NAME=PCT` required per group.
fn default_groups(targets: &[String]) -> Result<Vec<FeatureGroup>> {
    let mut parsed = Vec::new();
    for spec in targets {
        let (name, value) = spec
            .split_once('=')
            .with_context(|| format!("target '{spec}' is missing '='"))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("target '{spec}' is not a number"))?;
        parsed.push((name.trim().to_lowercase(), value));
    }

    let mut missing = Vec::new();
    let mut groups = Vec::new();
    for (name, columns) in DEFAULT_GROUPS {
        match parsed.iter().find(|(n, _)| *n == name.to_lowercase()) {
            Some(&(_, target)) => {
                groups.push(FeatureGroup::new(*name, columns.iter().copied(), target))
            }
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        bail!(
            "no --group given; the default layout needs --target for: {}",
            missing.join(", ")
        );
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        let group = parse_group("HABITATS=5-7, 9:30.5").unwrap();
        assert_eq!(group.name, "HABITATS");
        assert_eq!(
            group.columns.iter().map(|c| c.0).collect::<Vec<_>>(),
            vec![5, 6, 7, 9]
        );
        assert_eq!(group.target, 30.5);
        assert!(parse_group("nocolon=1,2").is_err());
        assert!(parse_group("bad=7-5:10").is_err());
    }

    #[test]
    fn test_default_groups_need_all_targets() {
        let targets: Vec<String> = DEFAULT_GROUPS
            .iter()
            .map(|(name, _)| format!("{}=20", name.to_lowercase()))
            .collect();
        let groups = default_groups(&targets).unwrap();
        assert_eq!(groups.len(), DEFAULT_GROUPS.len());
        assert!(default_groups(&targets[1..]).is_err());
    }
}
