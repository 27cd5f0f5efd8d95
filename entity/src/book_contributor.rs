//! Entity for book contributors (authors, editors, translators, ...).
//!
//! Contributors have no lifecycle of their own: every update that carries a
//! contributors payload deletes the book's rows and inserts the new list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ContributorType {
    #[sea_orm(string_value = "author")]
    Author,
    #[sea_orm(string_value = "editor")]
    Editor,
    #[sea_orm(string_value = "translator")]
    Translator,
    #[sea_orm(string_value = "illustrator")]
    Illustrator,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "book_contributors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub book_id: i32,
    pub contributor_type: ContributorType,
    pub full_name: String,
    pub email: Option<String>,

    /// Display order among the book's contributors
    pub sequence_number: i32,

    pub biographical_note: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
