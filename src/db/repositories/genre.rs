use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{genres, prelude::*};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_names(&self) -> Result<Vec<String>> {
        let rows = Genres::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list genres")?;

        Ok(rows.into_iter().map(|g| g.name).collect())
    }

    pub async fn get_or_create(&self, name: &str) -> Result<i32> {
        get_or_create(&self.conn, name)
            .await
            .with_context(|| format!("Failed to get or create genre '{name}'"))
    }

    pub async fn count(&self) -> Result<u64> {
        Genres::find()
            .count(&self.conn)
            .await
            .context("Failed to count genres")
    }
}

/// Id of the genre called `name`, inserting it first when missing.
///
/// Concurrent callers race on the unique index; the loser's insert is a no-op
/// and both read back the same row.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<i32, DbErr> {
    Genres::insert(genres::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(genres::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    Genres::find()
        .filter(genres::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|g| g.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("genre '{name}'")))
}
