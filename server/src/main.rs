mod config;
mod seed;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_api::Directory;
use platform_db::{DbPool, SeaOrmStore, connect};
use platform_obs::{init_tracing, shutdown_tracing};
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "org-directory", version, about = "Employee directory operator tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Load the bundled employee fixture.
    Seed,
    /// Print one employee.
    Employee { id: String },
    /// Print an employee with their total report count.
    ReportingStructure { id: String },
    /// Print the reports-to graph below an employee.
    OrgChart { id: String },
    /// Print the current compensation for an employee.
    Compensation {
        employee_id: String,
        #[arg(long, help = "Show every record, oldest first")]
        history: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Roll back the most recent migration.
    Down,
    /// Roll back everything.
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(config.obs.clone())?;
    let pool = connect(&config.database).await?;
    let outcome = run(cli.command, pool).await;
    shutdown_tracing();
    outcome
}

async fn run(command: Command, pool: DbPool) -> Result<()> {
    match command {
        Command::Migrate(action) => migrate(action, &pool).await,
        Command::Seed => {
            let report = seed::seed(&directory(pool)).await?;
            println!("created {} employees, skipped {}", report.created, report.skipped);
            Ok(())
        }
        Command::Employee { id } => print_json(&directory(pool).get_employee(&id).await?),
        Command::ReportingStructure { id } => {
            print_json(&directory(pool).reporting_structure(&id).await?)
        }
        Command::OrgChart { id } => print_json(&directory(pool).org_chart(&id).await?),
        Command::Compensation {
            employee_id,
            history,
        } => {
            let directory = directory(pool);
            if history {
                print_json(&directory.compensation_history(&employee_id).await?)
            } else {
                print_json(&directory.compensation(&employee_id).await?)
            }
        }
    }
}

fn directory(pool: DbPool) -> Directory {
    Directory::new(Arc::new(SeaOrmStore::new(pool)))
}

async fn migrate(action: MigrateCommand, pool: &DbPool) -> Result<()> {
    match action {
        MigrateCommand::Up => {
            Migrator::up(pool, None).await?;
            info!("database migrations applied");
        }
        MigrateCommand::Down => {
            Migrator::down(pool, Some(1)).await?;
            info!("most recent migration rolled back");
        }
        MigrateCommand::Reset => {
            Migrator::reset(pool).await?;
            info!("all migrations rolled back");
        }
    }
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
