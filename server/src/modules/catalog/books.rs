//! Book service layer.
//!
//! Sequences every mutation as authorization, field validation, slug
//! computation, file handling, persistence, then relation sync. Validation
//! failures abort before any write; a freshly stored upload is deleted
//! again if the following database write fails.

use std::collections::BTreeSet;

use chrono::{Datelike, Utc};
use entity::book::{self, AccessLevel, BookType, CopyrightStatus};
use entity::book_contributor::{self, ContributorType};
use entity::{book_category, book_detail, category, language, publisher};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    Select,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::modules::auth::{policy, CurrentUser};
use crate::modules::storage::{FileStorage, UploadedFile, BOOKS_DIR, COVERS_DIR};

use super::slug;
use super::validation::{self, FieldErrors};
use super::{Page, ServiceError};

/// Fixed page size for book listings.
pub const PER_PAGE: u64 = 10;

// ============================================================================
// Inputs
// ============================================================================

/// Create/update payload. Absent optional flags leave the stored value
/// untouched on update and take the column default on create.
#[derive(Debug, Clone, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub isbn: String,
    #[serde(default)]
    pub publisher_id: Option<i32>,
    pub language_code: String,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    pub book_type: String,
    pub access_level: String,
    pub copyright_status: String,
    #[serde(default)]
    pub license_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub downloadable: Option<bool>,
    #[serde(default)]
    pub categories: Option<Vec<i32>>,
    #[serde(default)]
    pub contributors: Option<Vec<ContributorInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorInput {
    pub full_name: String,
    pub contributor_type: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sequence_number: Option<i32>,
    #[serde(default)]
    pub biographical_note: Option<String>,
}

/// Optional filters for book listings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookFilters {
    pub search: Option<String>,
    pub category: Option<i32>,
    /// "1" means active, any other value inactive
    pub status: Option<String>,
}

// ============================================================================
// Outputs
// ============================================================================

/// A book together with its eager-loaded relations.
#[derive(Debug)]
pub struct BookWithRelations {
    pub book: book::Model,
    pub publisher: Option<publisher::Model>,
    pub language: Option<language::Model>,
    pub categories: Vec<category::Model>,
    pub contributors: Vec<book_contributor::Model>,
    pub details: Option<book_detail::Model>,
}

#[derive(Debug, Clone, Copy)]
pub struct BookStats {
    pub total_books: u64,
    pub active_books: u64,
    pub featured_books: u64,
}

/// Enum fields and contributors after validation.
struct ParsedBook {
    book_type: BookType,
    access_level: AccessLevel,
    copyright_status: CopyrightStatus,
    contributors: Option<Vec<ContributorRecord>>,
}

struct ContributorRecord {
    contributor_type: ContributorType,
    full_name: String,
    email: Option<String>,
    sequence_number: Option<i32>,
    biographical_note: Option<String>,
}

// ============================================================================
// Book Service
// ============================================================================

pub struct BookService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a FileStorage,
}

impl<'a> BookService<'a> {
    pub fn new(db: &'a DatabaseConnection, storage: &'a FileStorage) -> Self {
        Self { db, storage }
    }

    /// Quick catalog counts for the book management screen.
    pub async fn stats(&self) -> Result<BookStats, ServiceError> {
        let alive = book::Entity::find().filter(book::Column::DeletedAt.is_null());

        let total_books = alive.clone().count(self.db).await?;
        let active_books = alive
            .clone()
            .filter(book::Column::IsActive.eq(true))
            .count(self.db)
            .await?;
        let featured_books = alive
            .filter(book::Column::Featured.eq(true))
            .count(self.db)
            .await?;

        Ok(BookStats {
            total_books,
            active_books,
            featured_books,
        })
    }

    /// Staff/member listing with filters, newest first.
    pub async fn list(
        &self,
        actor: &CurrentUser,
        filters: &BookFilters,
        page: u64,
    ) -> Result<Page<BookWithRelations>, ServiceError> {
        if !policy::books::view_any(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        self.paginate(self.filtered(filters, false), page).await
    }

    /// Public catalog listing: active books only, status filter ignored.
    pub async fn list_public(
        &self,
        filters: &BookFilters,
        page: u64,
    ) -> Result<Page<BookWithRelations>, ServiceError> {
        self.paginate(self.filtered(filters, true), page).await
    }

    pub async fn get(
        &self,
        actor: &CurrentUser,
        id: i32,
    ) -> Result<BookWithRelations, ServiceError> {
        let book = self.find_alive(id).await?;

        if !policy::books::view(actor.role, book.is_active) {
            return Err(ServiceError::Forbidden);
        }

        self.with_relations(book).await
    }

    /// Public lookup by slug; counts the view.
    pub async fn get_public_by_slug(
        &self,
        slug_value: &str,
    ) -> Result<BookWithRelations, ServiceError> {
        let book = book::Entity::find()
            .filter(book::Column::Slug.eq(slug_value))
            .filter(book::Column::DeletedAt.is_null())
            .filter(book::Column::IsActive.eq(true))
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Book '{slug_value}'")))?;

        book::Entity::update_many()
            .col_expr(
                book::Column::TotalViews,
                Expr::col(book::Column::TotalViews).add(1),
            )
            .filter(book::Column::Id.eq(book.id))
            .exec(self.db)
            .await?;

        let book = book::Model {
            total_views: book.total_views + 1,
            ..book
        };

        self.with_relations(book).await
    }

    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: BookInput,
        cover: Option<UploadedFile>,
        pdf: Option<UploadedFile>,
    ) -> Result<BookWithRelations, ServiceError> {
        if !policy::books::create(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let parsed = self
            .validate(&input, None, cover.as_ref(), pdf.as_ref())
            .await?;

        let slug_value = self.unique_slug(&input.title, None).await?;

        // Files are written only after validation has passed
        let cover_path = match cover {
            Some(file) => Some(self.storage.store(COVERS_DIR, &file)?),
            None => None,
        };
        let pdf_path = match pdf {
            Some(file) => Some(self.storage.store(BOOKS_DIR, &file)?),
            None => None,
        };

        let now = Utc::now();
        let model = book::ActiveModel {
            title: Set(input.title.clone()),
            isbn: Set(input.isbn.clone()),
            slug: Set(slug_value),
            publisher_id: Set(input.publisher_id),
            language_code: Set(input.language_code.clone()),
            pages: Set(input.pages),
            publication_year: Set(input.publication_year),
            cover_image: Set(cover_path.clone()),
            pdf_file: Set(pdf_path.clone()),
            is_active: Set(input.is_active.unwrap_or(true)),
            downloadable: Set(input.downloadable.unwrap_or(true)),
            book_type: Set(parsed.book_type),
            featured: Set(input.featured.unwrap_or(false)),
            access_level: Set(parsed.access_level),
            copyright_status: Set(parsed.copyright_status),
            license_type: Set(input.license_type.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let book = match model.insert(self.db).await {
            Ok(book) => book,
            Err(e) => {
                self.discard_stored(cover_path.as_deref());
                self.discard_stored(pdf_path.as_deref());
                return Err(e.into());
            }
        };

        if input.description.as_deref().is_some_and(|d| !d.is_empty()) {
            self.upsert_details(book.id, input.description.as_deref())
                .await?;
        }

        if let Some(category_ids) = input.categories.as_deref() {
            if !category_ids.is_empty() {
                self.sync_categories(book.id, category_ids).await?;
            }
        }

        if let Some(contributors) = parsed.contributors.as_deref() {
            if !contributors.is_empty() {
                self.replace_contributors(book.id, contributors).await?;
            }
        }

        info!(book_id = book.id, title = %book.title, "Book created");

        self.with_relations(book).await
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i32,
        input: BookInput,
        cover: Option<UploadedFile>,
        pdf: Option<UploadedFile>,
    ) -> Result<BookWithRelations, ServiceError> {
        if !policy::books::update(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let book = self.find_alive(id).await?;

        let parsed = self
            .validate(&input, Some(id), cover.as_ref(), pdf.as_ref())
            .await?;

        // The stored slug is kept unless the title itself changed
        let slug_value = if input.title != book.title {
            self.unique_slug(&input.title, Some(id)).await?
        } else {
            book.slug.clone()
        };

        // A replacement upload supersedes the stored file
        let new_cover = match cover {
            Some(file) => {
                if let Some(old) = book.cover_image.as_deref() {
                    self.discard_stored(Some(old));
                }
                Some(self.storage.store(COVERS_DIR, &file)?)
            }
            None => None,
        };
        let new_pdf = match pdf {
            Some(file) => {
                if let Some(old) = book.pdf_file.as_deref() {
                    self.discard_stored(Some(old));
                }
                Some(self.storage.store(BOOKS_DIR, &file)?)
            }
            None => None,
        };

        let mut model = book.clone().into_active_model();
        model.title = Set(input.title.clone());
        model.isbn = Set(input.isbn.clone());
        model.slug = Set(slug_value);
        model.publisher_id = Set(input.publisher_id);
        model.language_code = Set(input.language_code.clone());
        model.pages = Set(input.pages);
        model.publication_year = Set(input.publication_year);
        model.book_type = Set(parsed.book_type);
        model.access_level = Set(parsed.access_level);
        model.copyright_status = Set(parsed.copyright_status);
        model.license_type = Set(input.license_type.clone());
        if let Some(value) = input.is_active {
            model.is_active = Set(value);
        }
        if let Some(value) = input.featured {
            model.featured = Set(value);
        }
        if let Some(value) = input.downloadable {
            model.downloadable = Set(value);
        }
        if let Some(path) = new_cover.clone() {
            model.cover_image = Set(Some(path));
        }
        if let Some(path) = new_pdf.clone() {
            model.pdf_file = Set(Some(path));
        }
        model.updated_at = Set(Utc::now().into());

        let book = match model.update(self.db).await {
            Ok(book) => book,
            Err(e) => {
                self.discard_stored(new_cover.as_deref());
                self.discard_stored(new_pdf.as_deref());
                return Err(e.into());
            }
        };

        if input.description.is_some() {
            self.upsert_details(book.id, input.description.as_deref())
                .await?;
        }

        if let Some(category_ids) = input.categories.as_deref() {
            self.sync_categories(book.id, category_ids).await?;
        }

        if let Some(contributors) = parsed.contributors.as_deref() {
            self.replace_contributors(book.id, contributors).await?;
        }

        info!(book_id = book.id, "Book updated");

        self.with_relations(book).await
    }

    /// Soft delete: the row is flagged, never purged.
    pub async fn delete(&self, actor: &CurrentUser, id: i32) -> Result<(), ServiceError> {
        if !policy::books::delete(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let book = self.find_alive(id).await?;

        let mut model = book.into_active_model();
        model.deleted_at = Set(Some(Utc::now().into()));
        model.update(self.db).await?;

        info!(book_id = id, "Book soft-deleted");
        Ok(())
    }

    pub async fn toggle_active(
        &self,
        actor: &CurrentUser,
        id: i32,
    ) -> Result<book::Model, ServiceError> {
        if !policy::books::update(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let book = self.find_alive(id).await?;
        let flipped = !book.is_active;

        let mut model = book.into_active_model();
        model.is_active = Set(flipped);
        Ok(model.update(self.db).await?)
    }

    pub async fn toggle_featured(
        &self,
        actor: &CurrentUser,
        id: i32,
    ) -> Result<book::Model, ServiceError> {
        if !policy::books::update(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let book = self.find_alive(id).await?;
        let flipped = !book.featured;

        let mut model = book.into_active_model();
        model.featured = Set(flipped);
        Ok(model.update(self.db).await?)
    }

    // ========================================================================
    // Relation synchronization
    // ========================================================================

    /// Reconcile the book's category set against `desired`: memberships no
    /// longer wanted are removed, new ones added, unchanged rows untouched.
    pub async fn sync_categories(
        &self,
        book_id: i32,
        desired: &[i32],
    ) -> Result<(), ServiceError> {
        let current = book_category::Entity::find()
            .filter(book_category::Column::BookId.eq(book_id))
            .all(self.db)
            .await?;

        let current_ids: BTreeSet<i32> = current.iter().map(|row| row.category_id).collect();
        let desired_ids: BTreeSet<i32> = desired.iter().copied().collect();

        let to_remove: Vec<i32> = current
            .iter()
            .filter(|row| !desired_ids.contains(&row.category_id))
            .map(|row| row.id)
            .collect();

        if !to_remove.is_empty() {
            book_category::Entity::delete_many()
                .filter(book_category::Column::Id.is_in(to_remove))
                .exec(self.db)
                .await?;
        }

        let now = Utc::now();
        for category_id in desired_ids.difference(&current_ids) {
            book_category::ActiveModel {
                book_id: Set(book_id),
                category_id: Set(*category_id),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }

    /// Contributors have no independent lifecycle: drop every existing row
    /// and insert the supplied list fresh. Sequence numbers come from an
    /// explicit field or 1-based list position.
    async fn replace_contributors(
        &self,
        book_id: i32,
        contributors: &[ContributorRecord],
    ) -> Result<(), ServiceError> {
        book_contributor::Entity::delete_many()
            .filter(book_contributor::Column::BookId.eq(book_id))
            .exec(self.db)
            .await?;

        let now = Utc::now();
        for (index, record) in contributors.iter().enumerate() {
            let sequence = record.sequence_number.unwrap_or(index as i32 + 1);

            book_contributor::ActiveModel {
                book_id: Set(book_id),
                contributor_type: Set(record.contributor_type),
                full_name: Set(record.full_name.clone()),
                email: Set(record.email.clone()),
                sequence_number: Set(sequence),
                biographical_note: Set(record.biographical_note.clone()),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn find_alive(&self, id: i32) -> Result<book::Model, ServiceError> {
        book::Entity::find_by_id(id)
            .filter(book::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Book {id}")))
    }

    fn filtered(&self, filters: &BookFilters, public: bool) -> Select<book::Entity> {
        let mut query = book::Entity::find().filter(book::Column::DeletedAt.is_null());

        if public {
            query = query.filter(book::Column::IsActive.eq(true));
        } else if let Some(status) = filters.status.as_deref() {
            query = query.filter(book::Column::IsActive.eq(status == "1"));
        }

        if let Some(term) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(book::Column::Title.like(&pattern))
                    .add(book::Column::Isbn.like(&pattern)),
            );
        }

        if let Some(category_id) = filters.category {
            let member_of = book_category::Entity::find()
                .select_only()
                .column(book_category::Column::BookId)
                .filter(book_category::Column::CategoryId.eq(category_id))
                .into_query();
            query = query.filter(book::Column::Id.in_subquery(member_of));
        }

        query.order_by_desc(book::Column::CreatedAt)
    }

    async fn paginate(
        &self,
        query: Select<book::Entity>,
        page: u64,
    ) -> Result<Page<BookWithRelations>, ServiceError> {
        let paginator = query.paginate(self.db, PER_PAGE);
        let counts = paginator.num_items_and_pages().await?;

        let current_page = page.max(1);
        let books = paginator.fetch_page(current_page - 1).await?;
        let items = self.load_relations(books).await?;

        Ok(Page {
            items,
            total: counts.number_of_items,
            per_page: PER_PAGE,
            current_page,
            last_page: counts.number_of_pages.max(1),
        })
    }

    async fn with_relations(&self, book: book::Model) -> Result<BookWithRelations, ServiceError> {
        let mut loaded = self.load_relations(vec![book]).await?;
        loaded
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Book".to_string()))
    }

    async fn load_relations(
        &self,
        books: Vec<book::Model>,
    ) -> Result<Vec<BookWithRelations>, ServiceError> {
        let publishers = books.load_one(publisher::Entity, self.db).await?;
        let languages = books.load_one(language::Entity, self.db).await?;
        let details = books.load_one(book_detail::Entity, self.db).await?;
        let categories = books
            .load_many_to_many(category::Entity, book_category::Entity, self.db)
            .await?;
        let contributors = books.load_many(book_contributor::Entity, self.db).await?;

        let mut publishers = publishers.into_iter();
        let mut languages = languages.into_iter();
        let mut details = details.into_iter();
        let mut categories = categories.into_iter();
        let mut contributors = contributors.into_iter();

        let mut result = Vec::with_capacity(books.len());
        for book in books {
            let mut ordered = contributors.next().unwrap_or_default();
            ordered.sort_by_key(|c| c.sequence_number);

            result.push(BookWithRelations {
                book,
                publisher: publishers.next().flatten(),
                language: languages.next().flatten(),
                details: details.next().flatten(),
                categories: categories.next().unwrap_or_default(),
                contributors: ordered,
            });
        }

        Ok(result)
    }

    /// Walk slug candidates until one is free, skipping the record being
    /// edited. Checks the whole table, soft-deleted rows included, since
    /// the unique index does too.
    async fn unique_slug(
        &self,
        title: &str,
        exclude_id: Option<i32>,
    ) -> Result<String, ServiceError> {
        let base = slug::slugify(title);

        for candidate in slug::candidates(&base) {
            let mut query = book::Entity::find().filter(book::Column::Slug.eq(&candidate));
            if let Some(id) = exclude_id {
                query = query.filter(book::Column::Id.ne(id));
            }

            if query.count(self.db).await? == 0 {
                return Ok(candidate);
            }
        }

        unreachable!("slug candidate sequence is infinite")
    }

    async fn validate(
        &self,
        input: &BookInput,
        exclude_id: Option<i32>,
        cover: Option<&UploadedFile>,
        pdf: Option<&UploadedFile>,
    ) -> Result<ParsedBook, ServiceError> {
        let mut errors = FieldErrors::new();

        validation::require(&mut errors, "title", &input.title, 255);
        validation::require(&mut errors, "isbn", &input.isbn, 20);

        if !input.isbn.trim().is_empty() {
            let mut query = book::Entity::find().filter(book::Column::Isbn.eq(&input.isbn));
            if let Some(id) = exclude_id {
                query = query.filter(book::Column::Id.ne(id));
            }
            if query.count(self.db).await? > 0 {
                errors.add("isbn", "The ISBN has already been taken");
            }
        }

        if let Some(publisher_id) = input.publisher_id {
            let found = publisher::Entity::find_by_id(publisher_id)
                .filter(publisher::Column::DeletedAt.is_null())
                .count(self.db)
                .await?;
            if found == 0 {
                errors.add("publisher_id", "The selected publisher is invalid");
            }
        }

        if input.language_code.trim().is_empty() {
            errors.add("language_code", "The language_code field is required");
        } else {
            let found = language::Entity::find_by_id(input.language_code.clone())
                .count(self.db)
                .await?;
            if found == 0 {
                errors.add("language_code", "The selected language is invalid");
            }
        }

        if let Some(year) = input.publication_year {
            let max_year = Utc::now().year() + 1;
            if year < 1000 || year > max_year {
                errors.add(
                    "publication_year",
                    format!("The publication_year field must be between 1000 and {max_year}"),
                );
            }
        }

        if let Some(pages) = input.pages {
            if pages < 1 {
                errors.add("pages", "The pages field must be at least 1");
            }
        }

        let book_type = parse_book_type(&input.book_type);
        if book_type.is_none() {
            errors.add("book_type", "The selected book type is invalid");
        }
        let access_level = parse_access_level(&input.access_level);
        if access_level.is_none() {
            errors.add("access_level", "The selected access level is invalid");
        }
        let copyright_status = parse_copyright_status(&input.copyright_status);
        if copyright_status.is_none() {
            errors.add("copyright_status", "The selected copyright status is invalid");
        }

        if let Some(category_ids) = input.categories.as_deref() {
            if !category_ids.is_empty() {
                let distinct: BTreeSet<i32> = category_ids.iter().copied().collect();
                let found = category::Entity::find()
                    .filter(category::Column::Id.is_in(distinct.clone()))
                    .filter(category::Column::DeletedAt.is_null())
                    .count(self.db)
                    .await?;
                if found != distinct.len() as u64 {
                    errors.add("categories", "One or more selected categories are invalid");
                }
            }
        }

        let contributors = input.contributors.as_deref().map(|list| {
            list.iter()
                .enumerate()
                .map(|(index, c)| {
                    validation::require(
                        &mut errors,
                        &format!("contributors.{index}.full_name"),
                        &c.full_name,
                        255,
                    );
                    validation::optional_max(
                        &mut errors,
                        &format!("contributors.{index}.email"),
                        c.email.as_deref(),
                        100,
                    );

                    let contributor_type = parse_contributor_type(&c.contributor_type);
                    if contributor_type.is_none() {
                        errors.add(
                            format!("contributors.{index}.contributor_type"),
                            "The selected contributor type is invalid",
                        );
                    }

                    ContributorRecord {
                        contributor_type: contributor_type.unwrap_or(ContributorType::Author),
                        full_name: c.full_name.clone(),
                        email: c.email.clone(),
                        sequence_number: c.sequence_number,
                        biographical_note: c.biographical_note.clone(),
                    }
                })
                .collect::<Vec<_>>()
        });

        if let Some(file) = cover {
            validation::check_image(&mut errors, "cover_image", file);
        }
        if let Some(file) = pdf {
            validation::check_pdf(&mut errors, "pdf_file", file);
        }

        match (book_type, access_level, copyright_status) {
            (Some(book_type), Some(access_level), Some(copyright_status))
                if errors.is_empty() =>
            {
                Ok(ParsedBook {
                    book_type,
                    access_level,
                    copyright_status,
                    contributors,
                })
            }
            _ => Err(ServiceError::Validation(errors)),
        }
    }

    async fn upsert_details(
        &self,
        book_id: i32,
        description: Option<&str>,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();
        let existing = book_detail::Entity::find()
            .filter(book_detail::Column::BookId.eq(book_id))
            .one(self.db)
            .await?;

        match existing {
            Some(detail) => {
                let mut model = detail.into_active_model();
                model.description = Set(description.map(str::to_string));
                model.updated_at = Set(now.into());
                model.update(self.db).await?;
            }
            None => {
                book_detail::ActiveModel {
                    book_id: Set(book_id),
                    description: Set(description.map(str::to_string)),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Best-effort removal of a stored file; a leftover file is logged,
    /// never turned into a request failure.
    fn discard_stored(&self, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = self.storage.delete(path) {
                warn!(path = %path, error = %e, "Failed to remove stored file");
            }
        }
    }
}

fn parse_book_type(value: &str) -> Option<BookType> {
    match value {
        "digital" => Some(BookType::Digital),
        "physical" => Some(BookType::Physical),
        "both" => Some(BookType::Both),
        _ => None,
    }
}

fn parse_access_level(value: &str) -> Option<AccessLevel> {
    match value {
        "free" => Some(AccessLevel::Free),
        "premium" => Some(AccessLevel::Premium),
        "institutional" => Some(AccessLevel::Institutional),
        _ => None,
    }
}

fn parse_copyright_status(value: &str) -> Option<CopyrightStatus> {
    match value {
        "copyrighted" => Some(CopyrightStatus::Copyrighted),
        "public_domain" => Some(CopyrightStatus::PublicDomain),
        "creative_commons" => Some(CopyrightStatus::CreativeCommons),
        _ => None,
    }
}

fn parse_contributor_type(value: &str) -> Option<ContributorType> {
    match value {
        "author" => Some(ContributorType::Author),
        "editor" => Some(ContributorType::Editor),
        "translator" => Some(ContributorType::Translator),
        "illustrator" => Some(ContributorType::Illustrator),
        "other" => Some(ContributorType::Other),
        _ => None,
    }
}
