use anyhow::anyhow;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use content_tracker::{
    calendar, stats, ApiClient, ApiConfig, PipelineBoard, PostFilter, TokenGate,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "content-tracker", about = "Content production pipeline tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts, optionally filtered
    List {
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        content_type: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show pipeline statistics derived from the current collection
    Stats,
    /// Move a post to a new pipeline stage
    Move { id: Uuid, status: String },
    /// Show the scheduling calendar for a month
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ApiConfig::from_env();

    info!("Connecting to tracker API at {}", config.base_url);

    let gate = Arc::new(TokenGate::new(config.token.clone()));
    let remote = Arc::new(ApiClient::new(config)?);
    let board = PipelineBoard::new(remote, gate);

    match cli.command {
        Command::List {
            platform,
            status,
            content_type,
            priority,
            search,
            tag,
        } => {
            let filter = PostFilter {
                platform: parse_opt(platform)?,
                status: parse_opt(status)?,
                content_type: parse_opt(content_type)?,
                priority: parse_opt(priority)?,
                search,
                tag,
            };
            board.refresh(&filter).await?;
            for post in board.posts().await {
                println!(
                    "{}  [{:>9}] {:<10} {:<8} {}",
                    post.id, post.status, post.platform, post.priority, post.title
                );
            }
        }
        Command::Stats => {
            board.refresh(&PostFilter::default()).await?;
            let posts = board.posts().await;
            let summary = stats::summary(&posts);
            println!(
                "total: {}  ideas: {}  in progress: {}  ready: {}  published: {}",
                summary.total, summary.ideas, summary.in_progress, summary.ready, summary.published
            );
            println!("by stage:");
            for (status, count) in stats::counts_by_status(&posts) {
                println!("  {:<10} {}", status, count);
            }
            println!("by platform:");
            for (platform, count) in stats::counts_by_platform(&posts) {
                println!("  {:<10} {}", platform, count);
            }
        }
        Command::Move { id, status } => {
            let status = status.parse().map_err(|e: String| anyhow!(e))?;
            board.refresh(&PostFilter::default()).await?;
            let outcome = board.move_status(id, status).await?;
            println!("moved {} to {} ({:?})", id, status, outcome);
        }
        Command::Calendar { year, month } => {
            let today = Utc::now().date_naive();
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            board.refresh(&PostFilter::default()).await?;
            let posts = board.posts().await;
            for bucket in calendar::day_buckets(&posts, year, month)? {
                if bucket.posts.is_empty() {
                    continue;
                }
                let marker = if bucket.in_month { " " } else { "~" };
                for post in &bucket.posts {
                    println!("{}{}  [{}] {}", marker, bucket.date, post.status, post.title);
                }
            }
        }
    }

    Ok(())
}

fn parse_opt<T>(raw: Option<String>) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    raw.map(|s| s.parse::<T>().map_err(|e| anyhow!(e))).transpose()
}
