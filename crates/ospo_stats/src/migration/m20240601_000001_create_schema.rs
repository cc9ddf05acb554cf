//! Initial migration creating the repository, commit and stargazer tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_repo(manager).await?;
        self.create_commit_history(manager).await?;
        self.create_stargazer_history(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StargazerHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CommitHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repo::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_repo(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repo::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Repo::Url).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Repo::CrawlAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Naming
                    .col(ColumnDef::new(Repo::Owner).string().not_null())
                    .col(ColumnDef::new(Repo::Name).string().not_null())
                    // Content
                    .col(ColumnDef::new(Repo::Description).text().null())
                    .col(ColumnDef::new(Repo::HomepageUrl).text().null())
                    .col(ColumnDef::new(Repo::LicenseKey).string().null())
                    .col(ColumnDef::new(Repo::LicenseName).string().null())
                    .col(ColumnDef::new(Repo::Readme).text().null())
                    .col(ColumnDef::new(Repo::ReadmeHasImage).boolean().null())
                    // Timestamps
                    .col(
                        ColumnDef::new(Repo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Repo::LastPushedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // Statistics
                    .col(
                        ColumnDef::new(Repo::TotalStargazerCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repo::TotalIssuesCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repo::TotalOpenIssuesCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repo::TotalForksCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repo::TotalWatchersCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    // Enrichment
                    .col(ColumnDef::new(Repo::IsActive).boolean().null())
                    .col(ColumnDef::new(Repo::Category).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repo_created_at")
                    .table(Repo::Table)
                    .col(Repo::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_commit_history(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommitHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommitHistory::Url)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommitHistory::RepoUrl).string().not_null())
                    .col(
                        ColumnDef::new(CommitHistory::CommittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommitHistory::Additions)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommitHistory::Deletions)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommitHistory::CommitterName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommitHistory::CommitterEmail)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commit_history_repo")
                            .from(CommitHistory::Table, CommitHistory::RepoUrl)
                            .to(Repo::Table, Repo::Url)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs the skip-if-exists predicate
        manager
            .create_index(
                Index::create()
                    .name("idx_commit_history_repo_url")
                    .table(CommitHistory::Table)
                    .col(CommitHistory::RepoUrl)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_stargazer_history(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StargazerHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StargazerHistory::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StargazerHistory::RepoUrl)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StargazerHistory::User).string().not_null())
                    .col(
                        ColumnDef::new(StargazerHistory::StarredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stargazer_history_repo")
                            .from(StargazerHistory::Table, StargazerHistory::RepoUrl)
                            .to(Repo::Table, Repo::Url)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stargazer_history_repo_url")
                    .table(StargazerHistory::Table)
                    .col(StargazerHistory::RepoUrl)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Repo {
    Table,
    Url,
    CrawlAt,
    Owner,
    Name,
    Description,
    HomepageUrl,
    LicenseKey,
    LicenseName,
    Readme,
    ReadmeHasImage,
    CreatedAt,
    LastPushedAt,
    TotalStargazerCount,
    TotalIssuesCount,
    TotalOpenIssuesCount,
    TotalForksCount,
    TotalWatchersCount,
    IsActive,
    Category,
}

#[derive(DeriveIden)]
enum CommitHistory {
    Table,
    Url,
    RepoUrl,
    CommittedAt,
    Additions,
    Deletions,
    CommitterName,
    CommitterEmail,
}

#[derive(DeriveIden)]
enum StargazerHistory {
    Table,
    Id,
    RepoUrl,
    User,
    StarredAt,
}
