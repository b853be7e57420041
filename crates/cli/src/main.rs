//! fluxpanel operator tool
//!
//! Answers access questions against the configured rules and previews how
//! the paginator rewrites a listing request.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fluxpanel_core::access::{groups, AccessLevel, LevelComparison};
use fluxpanel_core::auth::{ActionAccess, Caller, DEFAULT_ACTION};
use fluxpanel_core::config::{configs_dir, ConfigFile, PanelConfig};
use fluxpanel_core::paging::{SortDirection, SortableColumn};
use fluxpanel_core::Panel;

#[derive(Parser)]
#[command(name = "fluxpanel")]
#[command(about = "Inspect fluxpanel access rules and listing pagination")]
#[command(version)]
struct Cli {
    /// Configs directory (default: $FLUXPANEL_HOME/configs)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a caller may run a module action
    Action {
        /// Module name
        module: String,

        /// Action name
        #[arg(default_value = DEFAULT_ACTION)]
        action: String,

        #[command(flatten)]
        who: Who,
    },

    /// Check whether a caller has a feature
    Feature {
        /// Feature key, e.g. SeeAccountID
        name: String,

        #[command(flatten)]
        who: Who,
    },

    /// List the account groups
    Groups {
        /// Only groups whose level compares to LEVEL, e.g. `--where '>=' LOWGM`
        #[arg(long = "where", num_args = 2, value_names = ["OP", "LEVEL"])]
        filter: Option<Vec<String>>,
    },

    /// Show the paged query and links for a listing request
    Page {
        /// Total number of rows
        #[arg(long)]
        total: u64,

        /// Request URI including the query string
        #[arg(long)]
        uri: String,

        /// Base SQL query
        #[arg(long, default_value = "SELECT * FROM listing")]
        sql: String,

        /// Sortable column, optionally with a default: `login.userid=desc`
        #[arg(long = "sort", value_parser = parse_sortable)]
        sort: Vec<SortableColumn>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Who is asking: a group id or a raw level
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Who {
    /// Group id, resolved through the group table
    #[arg(long)]
    group: Option<i32>,

    /// Access level, as a number or a name like HIGHGM
    #[arg(long)]
    level: Option<AccessLevel>,
}

impl Who {
    fn caller(&self) -> Caller {
        match (self.group, self.level) {
            (Some(group_id), _) => Caller::from_group(0, group_id, groups()),
            (None, Some(level)) => Caller {
                account_id: None,
                group_id: None,
                level,
            },
            (None, None) => Caller::anonymous(),
        }
    }
}

fn parse_sortable(value: &str) -> Result<SortableColumn, String> {
    match value.split_once('=') {
        Some((name, direction)) => {
            let direction: SortDirection = direction.parse()?;
            Ok(SortableColumn::new(name, Some(direction)))
        }
        None => Ok(SortableColumn::new(value, None)),
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let configs = match cli.config_dir {
        Some(dir) => dir,
        None => configs_dir().context("Failed to resolve configs directory")?,
    };

    // The debug flag picks the log level, so peek at it before logging starts
    let debug = PanelConfig::read_in(&configs)
        .ok()
        .flatten()
        .is_some_and(|settings| settings.debug);
    init_tracing(debug);
    debug!("Using configs directory {}", configs.display());

    let settings = PanelConfig::load_in(&configs)
        .with_context(|| format!("Failed to load panel settings from {}", configs.display()))?;
    let panel = Panel::with_settings(settings, &configs)
        .with_context(|| format!("Failed to load configuration from {}", configs.display()))?;

    match cli.command {
        Commands::Action {
            module,
            action,
            who,
        } => {
            let caller = who.caller();
            let result = panel
                .auth
                .for_caller(&caller)
                .action_allowed(&module, &action);
            println!("{}.{} for {}: {}", module, action, caller.level, result);
            if result == ActionAccess::NoRule {
                println!("(no rule for {}.{} or {}.*)", module, action, module);
            }
        }

        Commands::Feature { name, who } => {
            let caller = who.caller();
            let allowed = panel.auth.for_caller(&caller).feature_allowed(&name);
            let required = panel
                .auth
                .feature_level(&name)
                .map(|level| level.to_string())
                .unwrap_or_else(|| "not configured".to_string());
            println!(
                "{} for {}: {} (requires {})",
                name,
                caller.level,
                if allowed { "allowed" } else { "denied" },
                required
            );
        }

        Commands::Groups { filter } => {
            let table = groups();
            let ids = match filter.as_deref() {
                Some([op, level]) => {
                    let comparison: LevelComparison =
                        op.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                    let level: AccessLevel = level.parse()?;
                    table.ids_where(comparison, level)
                }
                Some(other) => bail!("--where takes OP and LEVEL, got {:?}", other),
                None => table.iter().map(|group| group.id).collect(),
            };

            for id in ids {
                println!("{:>4}  {:<20} {}", id, table.name(id), table.level(id));
            }
        }

        Commands::Page {
            total,
            uri,
            sql,
            sort,
            json,
        } => {
            let mut pager = panel.paginator(total, &uri);
            let names: Vec<String> = sort.iter().map(|c| c.name().to_string()).collect();
            let query = pager.sorted_paged_query(&sql, sort);
            let headers: Vec<_> = names
                .iter()
                .map(|name| pager.sortable_column(name, None))
                .collect();

            if json {
                let out = serde_json::json!({
                    "sql": query,
                    "current_page": pager.current_page(),
                    "number_of_pages": pager.number_of_pages(),
                    "headers": headers,
                    "pages": pager.page_list(),
                    "info": pager.info_text(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", query);
                println!();
                for header in &headers {
                    println!("{}", header.to_html());
                }
                print!("{}", pager.render_html());
                println!();
                println!("{}", pager.info_text());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sortable() {
        let column = parse_sortable("login.userid=DESC").unwrap();
        assert_eq!(column.name(), "login.userid");
        assert_eq!(column.default_direction(), Some(SortDirection::Desc));

        let bare = parse_sortable("userid").unwrap();
        assert_eq!(bare.default_direction(), None);

        assert!(parse_sortable("userid=sideways").is_err());
    }

    #[test]
    fn test_who_requires_one() {
        assert!(Cli::try_parse_from(["fluxpanel", "action", "account"]).is_err());
        assert!(Cli::try_parse_from(["fluxpanel", "action", "account", "--level", "HIGHGM"]).is_ok());
        assert!(Cli::try_parse_from([
            "fluxpanel", "feature", "SDStaff", "--group", "2", "--level", "1"
        ])
        .is_err());
    }
}
