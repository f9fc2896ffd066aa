use std::path::PathBuf;

use ajera_core::config::DEFAULT_CONFIG_FILE;
use ajera_core::ListProjectsArgs;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ajera")]
#[command(about = "Query projects from an Ajera API endpoint", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML file with api_url, username and password; AJERA_* variables override it.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List matching project summaries (key, ID, description).
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List matching projects, then fetch their full records.
    Projects {
        #[command(flatten)]
        filters: FilterArgs,

        /// Include phases and invoice groups.
        #[arg(long)]
        full: bool,
    },

    /// Fetch full records for the given project keys.
    Get {
        #[arg(required = true)]
        keys: Vec<i64>,
    },
}

/// `ListProjects` filters. Repeated flags accumulate; unset flags are not sent.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<String>,

    #[arg(long = "company", value_delimiter = ',')]
    pub companies: Vec<i64>,

    #[arg(long)]
    pub name_like: Option<String>,

    #[arg(long)]
    pub description_like: Option<String>,

    #[arg(long)]
    pub description_equals: Option<String>,

    #[arg(long)]
    pub id_like: Option<String>,

    /// Project type keys; `none` matches projects without a type.
    #[arg(long = "project-type", value_delimiter = ',', value_parser = parse_project_type)]
    pub project_types: Vec<Option<i64>>,

    #[arg(long = "sync-to-crm", value_delimiter = ',')]
    pub sync_to_crm: Vec<bool>,

    /// Earliest last-modified date, YYYY-MM-DD.
    #[arg(long)]
    pub modified_since: Option<NaiveDate>,

    /// Latest last-modified date, YYYY-MM-DD.
    #[arg(long)]
    pub modified_until: Option<NaiveDate>,
}

fn parse_project_type(raw: &str) -> Result<Option<i64>, String> {
    match raw {
        "none" | "null" => Ok(None),
        _ => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("expected a project type key or 'none', got '{raw}'")),
    }
}

impl FilterArgs {
    pub fn into_list_args(self) -> ListProjectsArgs {
        let mut args = ListProjectsArgs::default();
        if !self.statuses.is_empty() {
            args = args.by_status(self.statuses);
        }
        if !self.companies.is_empty() {
            args = args.by_company(self.companies);
        }
        if let Some(pattern) = self.name_like {
            args = args.by_name_like(pattern);
        }
        if let Some(pattern) = self.description_like {
            args = args.by_description_like(pattern);
        }
        if let Some(description) = self.description_equals {
            args = args.by_description_equals(description);
        }
        if let Some(pattern) = self.id_like {
            args = args.by_id_like(pattern);
        }
        if !self.project_types.is_empty() {
            args = args.by_project_type(self.project_types);
        }
        if !self.sync_to_crm.is_empty() {
            args = args.by_sync_to_crm(self.sync_to_crm);
        }
        if let Some(date) = self.modified_since {
            args = args.by_earliest_modified_date(date);
        }
        if let Some(date) = self.modified_until {
            args = args.by_latest_modified_date(date);
        }
        args
    }
}
