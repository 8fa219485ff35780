use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{cast_members, prelude::*};

pub struct CastRepository {
    conn: DatabaseConnection,
}

impl CastRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_or_create(&self, name: &str) -> Result<i32> {
        get_or_create(&self.conn, name)
            .await
            .with_context(|| format!("Failed to get or create cast member '{name}'"))
    }

    pub async fn count(&self) -> Result<u64> {
        CastMembers::find()
            .count(&self.conn)
            .await
            .context("Failed to count cast members")
    }
}

/// Same contract as [`super::genre::get_or_create`], for cast members.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<i32, DbErr> {
    CastMembers::insert(cast_members::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(cast_members::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    CastMembers::find()
        .filter(cast_members::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("cast member '{name}'")))
}
