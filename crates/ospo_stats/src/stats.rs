//! Yearly series over the stored crawl data.

use sea_orm::sea_query::{Asterisk, Expr, SimpleExpr};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect,
};

use crate::entity::{commit, repository, stargazer};
use crate::persist;

/// Rows in one calendar year, plus the running total through that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyCount {
    pub year: i32,
    pub count: u64,
    pub cumulative: u64,
}

/// Attach running totals to `(year, count)` rows already ordered by year.
pub fn cumulative(rows: Vec<(i32, i64)>) -> Vec<YearlyCount> {
    let mut running = 0u64;
    rows.into_iter()
        .map(|(year, count)| {
            let count = u64::try_from(count).unwrap_or(0);
            running += count;
            YearlyCount {
                year,
                count,
                cumulative: running,
            }
        })
        .collect()
}

/// Integer year of a timestamp column on `backend`.
fn year_expr(backend: DatabaseBackend, column: &str) -> SimpleExpr {
    match backend {
        // Timestamps are stored as ISO-8601 text.
        DatabaseBackend::Sqlite => Expr::cust(format!("CAST(substr(\"{column}\", 1, 4) AS INTEGER)")),
        DatabaseBackend::Postgres => {
            Expr::cust(format!("CAST(EXTRACT(YEAR FROM \"{column}\") AS INTEGER)"))
        }
        DatabaseBackend::MySql => Expr::cust(format!("YEAR(`{column}`)")),
    }
}

async fn by_year<E: EntityTrait>(
    db: &DatabaseConnection,
    column: &str,
) -> persist::Result<Vec<YearlyCount>> {
    let year = year_expr(db.get_database_backend(), column);
    let rows = E::find()
        .select_only()
        .column_as(year.clone(), "year")
        .column_as(Expr::col(Asterisk).count(), "count")
        .group_by(year.clone())
        .order_by_asc(year)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?;
    Ok(cumulative(rows))
}

/// Repositories by creation year.
pub async fn repos_by_year(db: &DatabaseConnection) -> persist::Result<Vec<YearlyCount>> {
    by_year::<repository::Entity>(db, "created_at").await
}

/// Commits by commit year.
pub async fn commits_by_year(db: &DatabaseConnection) -> persist::Result<Vec<YearlyCount>> {
    by_year::<commit::Entity>(db, "committed_at").await
}

/// Stars by the year they were given.
pub async fn stargazers_by_year(db: &DatabaseConnection) -> persist::Result<Vec<YearlyCount>> {
    by_year::<stargazer::Entity>(db, "starred_at").await
}
