//! `ospo-stats migrate`: manage the crawl schema.
//!
//! Applied migrations are recorded in the `ospo_migrations` table of the
//! target database.

use ospo_stats::db;
use ospo_stats::migration::{MIGRATION_TABLE, Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};

use crate::MigrateAction;

/// Applied and pending migration names, in migration order.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct MigrationStatus {
    pub applied: Vec<String>,
    pub pending: Vec<String>,
}

pub(crate) async fn migration_status(db: &DatabaseConnection) -> Result<MigrationStatus, DbErr> {
    let applied = Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    let pending = Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    Ok(MigrationStatus { applied, pending })
}

/// Run one migrate action against an open connection.
pub(crate) async fn run_migrate(
    action: MigrateAction,
    db: &DatabaseConnection,
) -> Result<MigrationStatus, DbErr> {
    match action {
        MigrateAction::Up => {
            let before = migration_status(db).await?;
            tracing::info!(
                table = MIGRATION_TABLE,
                pending = before.pending.len(),
                "Applying migrations"
            );
            Migrator::up(db, None).await?;
        }
        MigrateAction::Down => {
            tracing::info!(table = MIGRATION_TABLE, "Rolling back last migration");
            Migrator::down(db, Some(1)).await?;
        }
        MigrateAction::Status => {}
        MigrateAction::Fresh => {
            tracing::warn!(table = MIGRATION_TABLE, "Dropping all tables");
            Migrator::fresh(db).await?;
        }
    }

    migration_status(db).await
}

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;
    let status = run_migrate(action, &db).await?;

    for name in &status.applied {
        println!("  applied  {name}");
    }
    for name in &status.pending {
        println!("  pending  {name}");
    }
    println!(
        "{} applied, {} pending ({MIGRATION_TABLE})",
        status.applied.len(),
        status.pending.len()
    );

    Ok(())
}
