use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use flexi_logger::Logger;
use skymatch::search::healpix::order_for_catalog;
use skymatch::{
    match_with_options, search_around_with_options, Angle, AngleUnit, MatchOptions, MatchReport,
    Pair, PointRole, PointSet, SearchStrategy,
};

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Auto,
    Scan,
    Healpix,
}

#[derive(Parser)]
#[command(name = "skymatch")]
#[command(about = "Match celestial coordinates against a reference catalog")]
struct Cli {
    /// Log search details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Inputs {
    /// Query position as "LON,LAT" in degrees (repeatable)
    #[arg(long = "query", value_parser = parse_point, required = true, allow_hyphen_values = true)]
    query: Vec<(f64, f64)>,
    /// Catalog position as "LON,LAT" in degrees (repeatable)
    #[arg(long = "catalog", value_parser = parse_point, required = true, allow_hyphen_values = true)]
    catalog: Vec<(f64, f64)>,
    /// Search strategy
    #[arg(long, value_enum, default_value = "auto")]
    strategy: StrategyArg,
    /// HEALPix order for --strategy healpix (default: chosen from catalog size)
    #[arg(long)]
    order: Option<u32>,
    /// Spread queries over all cores
    #[arg(long)]
    parallel: bool,
    /// Unit for printed separations (deg, rad, arcmin, arcsec)
    #[arg(long, default_value = "arcsec")]
    unit: AngleUnit,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Nearest catalog entry for every query position
    Nearest {
        #[command(flatten)]
        inputs: Inputs,
        /// Neighbor rank (2 skips the point itself in a self-match)
        #[arg(long, default_value = "1")]
        nth: usize,
        /// Drop matches farther than this many degrees
        #[arg(long)]
        max_sep: Option<f64>,
    },
    /// Every (query, catalog) pair within a radius
    Around {
        #[command(flatten)]
        inputs: Inputs,
        /// Search radius in degrees
        #[arg(long)]
        radius: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _logger = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .start()?;

    match cli.command {
        Commands::Nearest {
            inputs,
            nth,
            max_sep,
        } => {
            let (query, catalog) = load_inputs(&inputs)?;
            let options = options_for(&inputs, catalog.len())?.with_nth_neighbor(nth);
            let result = match_with_options(&query, &catalog, &options)?;
            let report = MatchReport::new(&result, &catalog)?;

            let report = match max_sep {
                Some(deg) => report.restricted_to(Angle::from_degrees(deg)),
                None => report,
            };

            if let Some(summary) = report.summary() {
                log::info!("{}", summary);
            }
            let rows = match_rows(&report, &query, inputs.unit);
            write_matches(&mut io::stdout().lock(), &report, &rows, inputs.unit, inputs.format)?;
        }
        Commands::Around { inputs, radius } => {
            let (query, catalog) = load_inputs(&inputs)?;
            let options = options_for(&inputs, catalog.len())?;
            let pairs =
                search_around_with_options(&query, &catalog, Angle::from_degrees(radius), &options)?;
            write_pairs(&mut io::stdout().lock(), &pairs, inputs.unit, inputs.format)?;
        }
    }

    Ok(())
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got '{}'", s))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude '{}': {}", lon, e))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude '{}': {}", lat, e))?;
    Ok((lon, lat))
}

fn load_inputs(inputs: &Inputs) -> anyhow::Result<(PointSet, PointSet)> {
    let query = PointSet::from_degrees(&inputs.query, PointRole::Query)?;
    let catalog = PointSet::from_degrees(&inputs.catalog, PointRole::Candidate)?;
    Ok((query, catalog))
}

fn options_for(inputs: &Inputs, catalog_len: usize) -> anyhow::Result<MatchOptions> {
    let strategy = match (inputs.strategy, inputs.order) {
        (StrategyArg::Auto, None) => SearchStrategy::Auto,
        (StrategyArg::Scan, None) => SearchStrategy::Scan,
        (StrategyArg::Healpix, order) => SearchStrategy::Healpix {
            order: order.unwrap_or_else(|| order_for_catalog(catalog_len)),
        },
        (_, Some(_)) => anyhow::bail!("--order only applies to --strategy healpix"),
    };
    Ok(MatchOptions::default()
        .with_strategy(strategy)
        .with_parallel(inputs.parallel))
}

#[derive(serde::Serialize)]
struct MatchRow {
    query_index: usize,
    query_lon: f64,
    query_lat: f64,
    catalog_index: usize,
    catalog_lon: f64,
    catalog_lat: f64,
    separation: f64,
}

fn match_rows(report: &MatchReport, query: &PointSet, unit: AngleUnit) -> Vec<MatchRow> {
    report
        .iter()
        .filter_map(|r| {
            let (query_lon, query_lat) = query.get(r.query_index)?.to_degrees();
            let (catalog_lon, catalog_lat) = r.candidate.to_degrees();
            Some(MatchRow {
                query_index: r.query_index,
                query_lon,
                query_lat,
                catalog_index: r.candidate_index,
                catalog_lon,
                catalog_lat,
                separation: r.separation.to_unit(unit),
            })
        })
        .collect()
}

fn write_matches<W: Write>(
    out: &mut W,
    report: &MatchReport,
    rows: &[MatchRow],
    unit: AngleUnit,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            if report.is_empty() {
                writeln!(out, "No matches.")?;
            } else {
                write!(out, "{}", report.table(unit))?;
                writeln!(out, "\nTotal matches: {}", report.len())?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(rows)?)?,
        OutputFormat::Csv => {
            writeln!(
                out,
                "query_index,query_lon,query_lat,catalog_index,catalog_lon,catalog_lat,separation"
            )?;
            for r in rows {
                writeln!(
                    out,
                    "{},{},{},{},{},{},{}",
                    r.query_index,
                    r.query_lon,
                    r.query_lat,
                    r.catalog_index,
                    r.catalog_lon,
                    r.catalog_lat,
                    r.separation
                )?;
            }
        }
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct PairRow {
    query_index: usize,
    catalog_index: usize,
    separation: f64,
}

fn write_pairs<W: Write>(
    out: &mut W,
    pairs: &[Pair],
    unit: AngleUnit,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rows: Vec<PairRow> = pairs
        .iter()
        .map(|p| PairRow {
            query_index: p.query_index,
            catalog_index: p.candidate_index,
            separation: p.separation.to_unit(unit),
        })
        .collect();

    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                writeln!(out, "No pairs within radius.")?;
                return Ok(());
            }
            let sep_header = format!("sep [{}]", unit.symbol());
            writeln!(out, "{:>6}  {:>9}  {:>14}", "query", "candidate", sep_header)?;
            for r in &rows {
                writeln!(
                    out,
                    "{:>6}  {:>9}  {:>14.4}",
                    r.query_index, r.catalog_index, r.separation
                )?;
            }
            writeln!(out, "\nTotal pairs: {}", rows.len())?;
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?,
        OutputFormat::Csv => {
            writeln!(out, "query_index,catalog_index,separation")?;
            for r in &rows {
                writeln!(out, "{},{},{}", r.query_index, r.catalog_index, r.separation)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10.5,-20").unwrap(), (10.5, -20.0));
        assert_eq!(parse_point(" 1 , 2 ").unwrap(), (1.0, 2.0));
        assert!(parse_point("10.5").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn test_cli_parses_nearest() {
        let cli = Cli::try_parse_from([
            "skymatch", "-v", "nearest", "--query", "1,0", "--catalog", "0,0", "--catalog",
            "90,0", "--nth", "1", "--format", "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Nearest { inputs, nth, .. } => {
                assert_eq!(inputs.catalog.len(), 2);
                assert_eq!(nth, 1);
            }
            Commands::Around { .. } => panic!("Expected nearest"),
        }
    }

    #[test]
    fn test_order_requires_healpix() {
        let cli = Cli::try_parse_from([
            "skymatch", "around", "--query", "1,0", "--catalog", "0,0", "--radius", "2",
            "--order", "4",
        ])
        .unwrap();
        let Commands::Around { inputs, .. } = cli.command else {
            panic!("Expected around");
        };
        assert!(options_for(&inputs, 1).is_err());
    }

    fn nearest_report(max_sep_deg: Option<f64>) -> (PointSet, MatchReport) {
        let query = PointSet::from_degrees(&[(0.0, 0.5), (45.0, 0.0), (91.0, 0.0)], PointRole::Query)
            .unwrap();
        let catalog =
            PointSet::from_degrees(&[(0.0, 0.0), (90.0, 0.0)], PointRole::Candidate).unwrap();
        let result = match_with_options(&query, &catalog, &MatchOptions::default()).unwrap();
        let report = MatchReport::new(&result, &catalog).unwrap();
        let report = match max_sep_deg {
            Some(deg) => report.restricted_to(Angle::from_degrees(deg)),
            None => report,
        };
        (query, report)
    }

    fn render_matches(max_sep_deg: Option<f64>, unit: AngleUnit, format: OutputFormat) -> String {
        let (query, report) = nearest_report(max_sep_deg);
        let rows = match_rows(&report, &query, unit);
        let mut out = Vec::new();
        write_matches(&mut out, &report, &rows, unit, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_unit_flag_parses_angle_unit() {
        let cli = Cli::try_parse_from([
            "skymatch", "around", "--query", "1,0", "--catalog", "0,0", "--radius", "2",
            "--unit", "deg",
        ])
        .unwrap();
        let Commands::Around { inputs, .. } = cli.command else {
            panic!("Expected around");
        };
        assert_eq!(inputs.unit, AngleUnit::Degrees);

        let bad = Cli::try_parse_from([
            "skymatch", "around", "--query", "1,0", "--catalog", "0,0", "--radius", "2",
            "--unit", "furlong",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_max_sep_drops_far_matches() {
        let (query, report) = nearest_report(Some(2.0));
        let rows = match_rows(&report, &query, AngleUnit::Degrees);
        let kept: Vec<(usize, usize)> = rows.iter().map(|r| (r.query_index, r.catalog_index)).collect();
        assert_eq!(kept, vec![(0, 0), (2, 1)]);
        assert!(rows.iter().all(|r| r.separation <= 2.0));

        let (query, report) = nearest_report(None);
        assert_eq!(match_rows(&report, &query, AngleUnit::Degrees).len(), 3);
    }

    #[test]
    fn test_json_rows_shape() {
        let text = render_matches(Some(2.0), AngleUnit::Arcseconds, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for key in [
            "query_index",
            "query_lon",
            "query_lat",
            "catalog_index",
            "catalog_lon",
            "catalog_lat",
            "separation",
        ] {
            assert!(rows[0].get(key).is_some(), "missing {}", key);
        }
        assert_eq!(rows[1]["query_index"], 2);
        assert_eq!(rows[1]["catalog_index"], 1);
        let sep = rows[0]["separation"].as_f64().unwrap();
        assert!((sep - 1800.0).abs() < 1e-6);
    }

    #[test]
    fn test_csv_header_and_rows() {
        let text = render_matches(None, AngleUnit::Degrees, OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "query_index,query_lon,query_lat,catalog_index,catalog_lon,catalog_lat,separation"
        );
        assert_eq!(lines.len(), 4);
        let fields: Vec<f64> = lines[3].split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], 2.0);
        assert_eq!(fields[3], 1.0);
        assert!((fields[1] - 91.0).abs() < 1e-9);
        assert!((fields[6] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_table_uses_report_layout() {
        let text = render_matches(Some(2.0), AngleUnit::Arcminutes, OutputFormat::Table);
        let (_, report) = nearest_report(Some(2.0));
        assert!(text.starts_with(&report.table(AngleUnit::Arcminutes).to_string()));
        assert!(text.contains("sep [arcmin]"));
        assert!(text.trim_end().ends_with("Total matches: 2"));

        let empty = render_matches(Some(0.1), AngleUnit::Arcseconds, OutputFormat::Table);
        assert_eq!(empty.trim(), "No matches.");
    }

    #[test]
    fn test_pairs_output() {
        let query = PointSet::from_degrees(&[(0.0, 0.0)], PointRole::Query).unwrap();
        let catalog =
            PointSet::from_degrees(&[(1.0, 0.0), (50.0, 0.0), (0.0, -2.0)], PointRole::Candidate)
                .unwrap();
        let pairs = search_around_with_options(
            &query,
            &catalog,
            Angle::from_degrees(3.0),
            &MatchOptions::default(),
        )
        .unwrap();

        let mut out = Vec::new();
        write_pairs(&mut out, &pairs, AngleUnit::Degrees, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["catalog_index"], 0);
        assert_eq!(rows[1]["catalog_index"], 2);
        assert!((rows[1]["separation"].as_f64().unwrap() - 2.0).abs() < 1e-9);

        let mut out = Vec::new();
        write_pairs(&mut out, &pairs, AngleUnit::Degrees, OutputFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "query_index,catalog_index,separation");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0,0,"));
    }
}
