//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use envcat_core::models::{SearchFilters, SpatialExtent};

#[derive(Debug, Parser)]
#[command(name = "envcat", version, about = "Environmental dataset catalogue: ingest, index, search")]
pub struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile and store every dataset listed in a file.
    Ingest {
        /// One natural key per line; blank lines and `#` comments ignored.
        #[arg(long)]
        ids: PathBuf,
    },
    /// Rebuild the similarity index from every stored record.
    Embed,
    /// Semantic search, or hybrid search when any filter is given.
    Search(SearchArgs),
    /// Print one stored record as JSON.
    Show {
        natural_key: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct SearchArgs {
    pub query: String,

    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Required keyword; repeat for several (all must match).
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Earliest publication date, YYYY-MM-DD.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest publication date, YYYY-MM-DD.
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Bounding box as `west,south,east,north`.
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Option<SpatialExtent>,

    /// Author name; repeat for several (any may match).
    #[arg(long = "author")]
    pub authors: Vec<String>,

    /// Organisation name; repeat for several (any may match).
    #[arg(long = "organisation")]
    pub organisations: Vec<String>,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            keywords: self.keywords.clone(),
            date_from: self.from,
            date_to: self.to,
            spatial_bounds: self.bbox,
            authors: self.authors.clone(),
            organisations: self.organisations.clone(),
        }
    }
}

/// Parse `west,south,east,north`.
pub fn parse_bbox(value: &str) -> Result<SpatialExtent, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("bbox values must be numbers: {e}"))?;
    match parts.as_slice() {
        [west, south, east, north] => Ok(SpatialExtent::new(*west, *east, *south, *north)),
        _ => Err(format!("bbox needs 4 values (west,south,east,north), got {}", parts.len())),
    }
}
