//! Entity for catalog books.
//!
//! Holds the bibliographic record plus denormalized usage counters and the
//! paths of uploaded cover/PDF files. Rows are soft-deleted via `deleted_at`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a book exists digitally, physically, or both.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BookType {
    #[sea_orm(string_value = "digital")]
    Digital,
    #[sea_orm(string_value = "physical")]
    Physical,
    #[sea_orm(string_value = "both")]
    Both,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "premium")]
    Premium,
    #[sea_orm(string_value = "institutional")]
    Institutional,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CopyrightStatus {
    #[sea_orm(string_value = "copyrighted")]
    Copyrighted,
    #[sea_orm(string_value = "public_domain")]
    PublicDomain,
    #[sea_orm(string_value = "creative_commons")]
    CreativeCommons,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// ISBN-10 or ISBN-13
    #[sea_orm(unique)]
    pub isbn: String,

    /// URL-safe identifier derived from the title
    #[sea_orm(unique)]
    pub slug: String,

    pub publisher_id: Option<i32>,
    pub language_code: String,

    pub pages: Option<i32>,
    pub publication_year: Option<i32>,

    /// Relative storage path of the cover image
    pub cover_image: Option<String>,
    /// Relative storage path of the PDF
    pub pdf_file: Option<String>,

    pub is_active: bool,
    pub downloadable: bool,
    pub book_type: BookType,

    // Denormalized counters, maintained by the service layer
    pub total_downloads: i32,
    pub total_physical_copies: i32,
    pub available_physical_copies: i32,
    pub total_loans: i32,
    pub total_views: i32,

    pub featured: bool,
    pub access_level: AccessLevel,
    pub copyright_status: CopyrightStatus,
    pub license_type: Option<String>,

    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publisher::Entity",
        from = "Column::PublisherId",
        to = "super::publisher::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Publisher,

    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::LanguageCode",
        to = "super::language::Column::Code",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Language,

    #[sea_orm(has_many = "super::book_contributor::Entity")]
    Contributors,

    #[sea_orm(has_one = "super::book_detail::Entity")]
    Details,
}

impl Related<super::publisher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl Related<super::language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Language.def()
    }
}

impl Related<super::book_contributor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributors.def()
    }
}

impl Related<super::book_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_category::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
