use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "titles")]
pub struct Model {
    /// Assigned as `max(id) + 1` at insert time and rewritable by an update.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub alt_name: Option<String>,
    pub seal: Option<String>,
    pub synopsis: Option<String>,
    pub rating: Option<String>,
    pub status: Option<String>,
    pub seasons: Option<i32>,
    pub release_year: Option<i32>,
    pub posted_at: String,
    pub ova_notes: Option<String>,
    pub studio: Option<String>,
    pub director: Option<String>,
    /// JSON array of genre tags.
    pub genres: String,
    pub media_type: Option<String>,
    pub views: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episodes::Entity")]
    Episodes,
    #[sea_orm(has_many = "super::collection_entries::Entity")]
    CollectionEntries,
    #[sea_orm(has_one = "super::display_titles::Entity")]
    DisplayTitles,
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl Related<super::collection_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionEntries.def()
    }
}

impl Related<super::display_titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DisplayTitles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
