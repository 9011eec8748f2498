mod changelog;
mod config;
mod parser;
mod render;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cr_changelog", about = "CodeRabbit PR summaries to CHANGELOG.json/md")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a PR summary fragment and record it in the changelog
    Update {
        /// HTML fragment holding the PR summary
        #[arg(short, long, default_value = "summary_section.html")]
        summary: PathBuf,
        /// Changelog JSON file to update
        #[arg(short, long, default_value = "CHANGELOG.json")]
        changelog: PathBuf,
    },
    /// Regenerate the Markdown changelog from the JSON record
    Render {
        #[arg(short, long, default_value = "CHANGELOG.json")]
        changelog: PathBuf,
        /// Markdown file to write
        #[arg(short, long, default_value = "CHANGELOG.md")]
        output: PathBuf,
    },
    /// Update + render in one pipeline
    Run {
        #[arg(short, long, default_value = "summary_section.html")]
        summary: PathBuf,
        #[arg(short, long, default_value = "CHANGELOG.json")]
        changelog: PathBuf,
        #[arg(short, long, default_value = "CHANGELOG.md")]
        output: PathBuf,
    },
    /// Show changelog statistics
    Stats {
        #[arg(short, long, default_value = "CHANGELOG.json")]
        changelog: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Update { summary, changelog } => update(&summary, &changelog),
        Commands::Render { changelog, output } => render_markdown(&changelog, &output),
        Commands::Run {
            summary,
            changelog,
            output,
        } => {
            update(&summary, &changelog)?;
            render_markdown(&changelog, &output)
        }
        Commands::Stats { changelog } => stats(&changelog),
    }
}

fn update(summary: &Path, changelog_path: &Path) -> Result<()> {
    let env = config::ReleaseEnv::from_env()?;
    let html = fs::read_to_string(summary)
        .with_context(|| format!("Failed to read {}", summary.display()))?;

    let categories = parser::parse_categories(&html);
    let raw_summary = parser::text::strip_tags(&html).trim().to_string();

    let mut log = changelog::Changelog::load_or_new(changelog_path, &env);
    let count = categories.len();
    log.record_release(&env, raw_summary, categories);
    log.save(changelog_path)?;

    println!(
        "Recorded release {} (PR #{}) with {} categories; {} releases total.",
        env.version,
        env.pr_number,
        count,
        log.metadata.total_releases
    );
    Ok(())
}

fn render_markdown(changelog_path: &Path, output: &Path) -> Result<()> {
    let log = changelog::Changelog::load(changelog_path)?;
    let md = render::render_markdown(&log);
    fs::write(output, md).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} ({} releases).", output.display(), log.releases.len());
    Ok(())
}

fn stats(changelog_path: &Path) -> Result<()> {
    let log = changelog::Changelog::load(changelog_path)?;
    let categories: usize = log.releases.iter().map(|r| r.parsed_changes.len()).sum();
    let items: usize = log
        .releases
        .iter()
        .flat_map(|r| r.parsed_changes.values())
        .map(|entry| entry.items().len())
        .sum();

    println!("Version:    {}", log.metadata.current_version);
    println!("Updated:    {}", log.metadata.last_updated);
    println!("Releases:   {}", log.releases.len());
    println!("Categories: {}", categories);
    println!("Items:      {}", items);
    Ok(())
}
