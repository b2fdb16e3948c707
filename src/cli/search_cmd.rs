//! `search` command: submit a search and print or save what comes back.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args};
use tracing::info;

use crate::cli::output;
use crate::client::BenchmarkClient;
use crate::search::criteria::{SearchCriteria, SearchType};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("term").required(true).multiple(false)))]
pub struct SearchArgs {
    /// Search by party name (format: "Last, First")
    #[arg(long, group = "term")]
    pub name: Option<String>,

    /// Search by case number
    #[arg(long, group = "term")]
    pub case_number: Option<String>,

    /// Search by attorney name
    #[arg(long, group = "term")]
    pub attorney: Option<String>,

    /// Comma-separated court type IDs (default: 22,2,20,21,7,10)
    #[arg(long)]
    pub court_types: Option<String>,

    /// Comma-separated party type IDs (default: 1,2,3,4,5)
    #[arg(long)]
    pub party_types: Option<String>,

    /// Comma-separated division IDs (default: 1)
    #[arg(long)]
    pub divisions: Option<String>,

    /// Case opened from date (YYYY-MM-DD)
    #[arg(long)]
    pub opened_from: Option<String>,

    /// Case opened to date (YYYY-MM-DD)
    #[arg(long)]
    pub opened_to: Option<String>,

    /// Case closed from date (YYYY-MM-DD)
    #[arg(long)]
    pub closed_from: Option<String>,

    /// Case closed to date (YYYY-MM-DD)
    #[arg(long)]
    pub closed_to: Option<String>,

    /// Maximum number of results to return
    #[arg(long, default_value_t = 50)]
    pub max_results: u32,

    /// Output file path (JSON). Prints to stdout when not given
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SearchArgs {
    fn term_and_type(&self) -> (&str, SearchType) {
        if let Some(number) = &self.case_number {
            (number, SearchType::CaseNumber)
        } else if let Some(attorney) = &self.attorney {
            (attorney, SearchType::Attorney)
        } else {
            (self.name.as_deref().unwrap_or_default(), SearchType::Name)
        }
    }

    fn criteria(&self) -> SearchCriteria {
        let (term, search_type) = self.term_and_type();
        let mut criteria = SearchCriteria::new(term, search_type)
            .max_results(self.max_results)
            .opened_between(self.opened_from.as_deref(), self.opened_to.as_deref())
            .closed_between(self.closed_from.as_deref(), self.closed_to.as_deref());
        if let Some(ids) = &self.court_types {
            criteria = criteria.court_types(ids.split(','));
        }
        if let Some(ids) = &self.party_types {
            criteria = criteria.party_types(ids.split(','));
        }
        if let Some(ids) = &self.divisions {
            criteria = criteria.divisions(ids.split(','));
        }
        criteria
    }
}

pub async fn run(base_url: &str, args: &SearchArgs) -> Result<()> {
    let client = BenchmarkClient::new(base_url)?;
    let results = client.search_to_records(&args.criteria()).await?;
    output::write_results(&results, args.output.as_deref())?;
    info!("found {} results", results.len());
    Ok(())
}
