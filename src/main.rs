use std::{process, str::FromStr};

use anyhow::{Context, Result};
use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use superstore_batch::{
    config::ImportConfig,
    core::job::JobExecution,
    item::rdbc::SqliteItemWriter,
    superstore::{create_table_statement, run_import_job, SalesRecord, SalesRecordBinder, COLUMNS},
};

#[tokio::main]
async fn main() {
    // Detect parsing errors in the .env file only.
    if let Err(e @ dotenvy::Error::LineParse(..)) = dotenvy::dotenv() {
        eprintln!("Error parsing .env file\n{e}");
        process::exit(1);
    }

    env_logger::init();

    let config = ImportConfig::from_env().unwrap_or_else(|error| {
        eprintln!("Could not build config\n{error}");
        process::exit(1);
    });

    match run(&config).await {
        Ok(execution) => info!(
            "Job {} {:?} in {:?}, inserted count: {}",
            execution.name,
            execution.status,
            execution.duration,
            execution
                .record_count
                .map_or_else(|| "unknown".to_string(), |count| count.to_string())
        ),
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

async fn run(config: &ImportConfig) -> Result<JobExecution> {
    if config.database_url.starts_with("postgres") {
        run_postgres(config).await
    } else {
        run_sqlite(config).await
    }
}

async fn run_sqlite(config: &ImportConfig) -> Result<JobExecution> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("invalid database url {}", config.database_url))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("unable to connect to SQLite")?;

    if config.init_schema {
        sqlx::query(&create_table_statement(&config.table_name))
            .execute(&pool)
            .await?;
    }

    let binder = SalesRecordBinder;
    let writer = COLUMNS.into_iter().fold(
        SqliteItemWriter::<SalesRecord>::new()
            .pool(&pool)
            .table(&config.table_name)
            .item_binder(&binder),
        |writer, column| writer.add_column(column),
    );

    let execution = run_import_job(config, &writer, &pool)?;
    Ok(execution)
}

#[cfg(feature = "rdbc-postgres")]
async fn run_postgres(config: &ImportConfig) -> Result<JobExecution> {
    use sqlx::postgres::PgPoolOptions;
    use superstore_batch::item::rdbc::PostgresItemWriter;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("unable to connect to PostgreSQL")?;

    if config.init_schema {
        sqlx::query(&create_table_statement(&config.table_name))
            .execute(&pool)
            .await?;
    }

    let binder = SalesRecordBinder;
    let writer = COLUMNS.into_iter().fold(
        PostgresItemWriter::<SalesRecord>::new()
            .pool(&pool)
            .table(&config.table_name)
            .item_binder(&binder),
        |writer, column| writer.add_column(column),
    );

    let execution = run_import_job(config, &writer, &pool)?;
    Ok(execution)
}

#[cfg(not(feature = "rdbc-postgres"))]
async fn run_postgres(_config: &ImportConfig) -> Result<JobExecution> {
    anyhow::bail!("PostgreSQL support is disabled, rebuild with the rdbc-postgres feature")
}
