//! Embedded schema migrations via [`refinery`].
//!
//! The SQL files under `migrations/` are compiled into the crate, so a binary
//! can bring an empty database up to date without shipping the files.

use crate::error::JoblyResult;

pub use refinery::Report;

mod embedded {
    refinery::embed_migrations!("./migrations");
}

/// Apply all pending migrations on one connection.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = embedded::migrations::runner().run_async(client).await?;
    for migration in report.applied_migrations() {
        tracing::info!(
            target: "jobly.migrate",
            version = migration.version(),
            name = migration.name(),
            "applied migration"
        );
    }
    Ok(report)
}

/// Pool variant of [`run`].
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
