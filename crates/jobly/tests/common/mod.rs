//! Shared harness for the database tests.
//!
//! Tests connect through `DATABASE_URL`; without it they print a note and
//! return early. Each test holds the harness lock, seeds fixtures inside its
//! own transaction and never commits it.

#![allow(dead_code)]

use jobly::rust_decimal::Decimal;
use jobly::{JoblyError, JoblyResult};
use std::sync::LazyLock;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tokio_postgres::{Client, NoTls, Transaction};

static MIGRATED: OnceCell<()> = OnceCell::const_new();
static SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Ids of the seeded jobs, in title order `j1, j2, j3`.
pub struct Fixtures {
    pub job_ids: [i32; 3],
}

pub struct TestDb {
    pub client: Client,
    _serial: MutexGuard<'static, ()>,
}

async fn connect(url: &str) -> JoblyResult<Client> {
    let (client, connection) = tokio_postgres::connect(url, NoTls)
        .await
        .map_err(JoblyError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Ok(client)
}

/// Connect, apply migrations once per test binary and take the harness lock.
pub async fn test_db(test_name: &str) -> JoblyResult<Option<TestDb>> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test_name}");
            return Ok(None);
        }
    };

    MIGRATED
        .get_or_try_init(|| async {
            let mut client = connect(&url).await?;
            // Test binaries may race on a fresh database.
            client
                .execute("SELECT pg_advisory_lock(7243901)", &[])
                .await
                .map_err(JoblyError::from_db_error)?;
            let result = jobly::migrate::run(&mut client).await.map(|_| ());
            client
                .execute("SELECT pg_advisory_unlock(7243901)", &[])
                .await
                .map_err(JoblyError::from_db_error)?;
            result
        })
        .await?;

    let serial = SERIAL.lock().await;
    let client = connect(&url).await?;
    Ok(Some(TestDb {
        client,
        _serial: serial,
    }))
}

/// Replace all table contents with the standard fixtures.
///
/// Companies `c1..c3`, jobs `j1..j3` (one per company, salaries 1/20/300,
/// equity 0.1/0.2/0.3) and users `u1, u2`.
pub async fn seed(tx: &Transaction<'_>) -> JoblyResult<Fixtures> {
    tx.batch_execute(
        "DELETE FROM applications;
         DELETE FROM jobs;
         DELETE FROM companies;
         DELETE FROM users;
         INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                ('c3', 'C3', 3, 'Desc3', 'http://c3.img');
         INSERT INTO users (username, password, first_name, last_name, email)
         VALUES ('u1', '$2b$04$u1hash', 'U1F', 'U1L', 'u1@email.com'),
                ('u2', '$2b$04$u2hash', 'U2F', 'U2L', 'u2@email.com');",
    )
    .await
    .map_err(JoblyError::from_db_error)?;

    let mut job_ids = [0; 3];
    let jobs = [
        ("j1", 1, Decimal::new(1, 1), "c1"),
        ("j2", 20, Decimal::new(2, 1), "c2"),
        ("j3", 300, Decimal::new(3, 1), "c3"),
    ];
    for (slot, (title, salary, equity, handle)) in job_ids.iter_mut().zip(jobs) {
        let row = tx
            .query_one(
                "INSERT INTO jobs (title, salary, equity, company_handle)
                 VALUES ($1, $2, $3, $4) RETURNING id",
                &[&title, &salary, &equity, &handle],
            )
            .await
            .map_err(JoblyError::from_db_error)?;
        *slot = row.get(0);
    }

    Ok(Fixtures { job_ids })
}
