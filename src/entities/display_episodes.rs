use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "display_episodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title_id: i32,
    pub season: i32,
    pub episode_number: i32,
    pub description: String,
    pub link: String,
    pub extra_link1: Option<String>,
    pub extra_link2: Option<String>,
    pub extra_link3: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::display_titles::Entity",
        from = "Column::TitleId",
        to = "super::display_titles::Column::TitleId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    DisplayTitles,
}

impl Related<super::display_titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DisplayTitles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
