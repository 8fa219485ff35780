use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Four digit year, kept as text.
    pub release_year: String,

    pub language: String,

    pub rating: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub image_url: String,

    pub watch_url: String,

    /// JSON array of genre names. Read fallback when the movie has no
    /// `movie_genres` rows.
    #[sea_orm(column_type = "Text", default_value = "[]")]
    pub genre_json: String,

    /// JSON array of cast names. Read fallback when the movie has no
    /// `movie_casts` rows.
    #[sea_orm(column_type = "Text", default_value = "[]")]
    pub cast_json: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_casts::Entity")]
    MovieCasts,
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_casts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCasts.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Movie.def().rev())
    }
}

impl Related<super::cast_members::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_casts::Relation::CastMember.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movie_casts::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
