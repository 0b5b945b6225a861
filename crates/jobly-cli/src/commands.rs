use crate::cli::{CompaniesCommand, JobsCommand};
use crate::config::Settings;
use anyhow::Context;
use jobly::{CompanyRepo, JobRepo, create_pool, migrate};
use serde::Serialize;

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{out}");
    Ok(())
}

async fn connect(settings: &Settings) -> anyhow::Result<jobly::deadpool_postgres::Client> {
    let pool = create_pool(&settings.db).context("invalid database settings")?;
    pool.get().await.context("failed to connect to database")
}

pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = create_pool(&settings.db).context("invalid database settings")?;
    let report = migrate::run_pool(&pool)
        .await
        .context("failed to apply migrations")?;

    let applied = report.applied_migrations();
    if applied.is_empty() {
        println!("Database is up to date.");
    } else {
        for m in applied {
            println!("Applied V{}__{}", m.version(), m.name());
        }
    }
    Ok(())
}

pub async fn companies(settings: &Settings, cmd: CompaniesCommand) -> anyhow::Result<()> {
    let client = connect(settings).await?;
    match cmd {
        CompaniesCommand::List { filter, .. } => {
            let companies = CompanyRepo::find_all(&client, &filter).await?;
            tracing::info!(count = companies.len(), "listed companies");
            print_json(&companies)
        }
        CompaniesCommand::Get { handle, .. } => {
            let company = CompanyRepo::get(&client, &handle).await?;
            print_json(&company)
        }
    }
}

pub async fn jobs(settings: &Settings, cmd: JobsCommand) -> anyhow::Result<()> {
    let client = connect(settings).await?;
    match cmd {
        JobsCommand::List { filter, .. } => {
            let jobs = JobRepo::find_all(&client, &filter).await?;
            tracing::info!(count = jobs.len(), "listed jobs");
            print_json(&jobs)
        }
        JobsCommand::Get { id, .. } => {
            let job = JobRepo::get(&client, id).await?;
            print_json(&job)
        }
    }
}
