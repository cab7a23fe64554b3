use anyhow::Result;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use member_visits::config::Config;
use member_visits::hook::LoginHook;
use member_visits::members::{InMemoryMemberDirectory, MemberDirectory};
use member_visits::models::Enriched;
use member_visits::policy::Role;
use member_visits::report::{ReportParams, VisitReportQuery};
use member_visits::storage;
use member_visits::summary::VisitSummaryService;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "visits-admin")]
#[command(about = "Member visit log management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the visit table and indexes
    Migrate,
    /// Show first visit, last visit and visit count for a member
    Summary {
        /// Member ID
        member_id: i64,
    },
    /// Print the member login activity report
    Report {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Partial first name match
        #[arg(long)]
        first_name: Option<String>,
        /// Partial surname match
        #[arg(long)]
        last_name: Option<String>,
        /// Only show one row per member
        #[arg(long)]
        unique: bool,
        /// visit, member_name, member_first_visit or member_last_visit
        #[arg(long)]
        sort: Option<String>,
        /// asc or desc
        #[arg(long)]
        direction: Option<String>,
    },
    /// Log a visit for a member right now
    Log {
        /// Member ID
        member_id: i64,
    },
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn format_enriched_timestamp(value: &Enriched<i64>) -> String {
    value
        .known()
        .map(|t| format_timestamp(*t))
        .unwrap_or_else(|| Enriched::<i64>::UNKNOWN.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = storage::connect(&config.database).await?;

    let directory: Arc<dyn MemberDirectory> = match config.members.seed_file.as_deref() {
        Some(path) => Arc::new(InMemoryMemberDirectory::from_json_file(path)?),
        None => Arc::new(InMemoryMemberDirectory::new()),
    };

    match cli.command {
        Commands::Migrate => {
            store.init().await?;
            println!("✓ Visit table is ready");
        }
        Commands::Summary { member_id } => {
            let summary = VisitSummaryService::new(Arc::clone(&store))
                .summarize(member_id)
                .await?;
            let profile = directory.get(member_id).await;
            let name = profile
                .as_ref()
                .map(|profile| profile.display_name())
                .unwrap_or_else(|| Enriched::<String>::UNKNOWN.to_string());

            println!("Member:            {} ({})", name, member_id);
            if let Some(profile) = profile.as_ref() {
                println!("Dashboard role:    {:?}", Role::from_groups(&profile.groups));
            }
            println!(
                "First logged in:   {}",
                summary.first_visit.map(format_timestamp).unwrap_or_else(|| "never".to_string())
            );
            println!(
                "Last visited:      {}",
                summary.last_visit.map(format_timestamp).unwrap_or_else(|| "never".to_string())
            );
            println!("Number of visits:  {}", summary.visit_count);
        }
        Commands::Report {
            start,
            end,
            first_name,
            last_name,
            unique,
            sort,
            direction,
        } => {
            let params = ReportParams {
                start,
                end,
                first_name,
                last_name,
                unique: unique.then(|| "on".to_string()),
                sort,
                direction,
                ..Default::default()
            };
            let report = VisitReportQuery::new(Arc::clone(&store), directory)
                .run_params(&params)
                .await?;

            println!(
                "Total visits: {}   Total visitors: {}   First time visitors: {}",
                report.stats.total_visits,
                report.stats.total_visitors,
                report.stats.first_time_visitors
            );
            println!();

            if report.rows.is_empty() {
                println!("No visits found.");
            } else {
                println!(
                    "{:<20} {:<30} {:<20} {}",
                    "Visit", "Member name", "First logged in", "Last visit"
                );
                println!("{}", "-".repeat(92));
                for row in report.rows {
                    let name = row
                        .member_name
                        .known()
                        .cloned()
                        .unwrap_or_else(|| Enriched::<String>::UNKNOWN.to_string());
                    println!(
                        "{:<20} {:<30} {:<20} {}",
                        format_timestamp(row.visited_at),
                        name,
                        format_enriched_timestamp(&row.member_first_visit),
                        format_enriched_timestamp(&row.member_last_visit)
                    );
                }
            }
        }
        Commands::Log { member_id } => {
            let hook = LoginHook::new(Arc::clone(&store));
            match hook.on_login(member_id).await {
                Some(record) => println!(
                    "✓ Logged visit {} for member {} at {}",
                    record.id,
                    member_id,
                    format_timestamp(record.created_at)
                ),
                None => println!("⚠ Visit store is not ready; run `visits-admin migrate` first"),
            }
        }
    }

    Ok(())
}
