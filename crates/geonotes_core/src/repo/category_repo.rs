//! Category store contract and SQLite implementation.
//!
//! # Responsibility
//! - Read the category table (seeded by the first migration).
//! - Apply name/color edits and additions through a single `upsert` entry.
//!
//! # Invariants
//! - Categories are never deleted.
//! - Persisted colors must parse as `#rrggbb`; anything else is invalid data.

use crate::model::category::{Category, CategoryId, RgbColor};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Persistent table of categories.
pub trait CategoryStore {
    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Returns all categories ordered by id.
    fn all(&self) -> RepoResult<Vec<Category>>;
    /// Updates `id` when given, otherwise inserts a new category.
    fn upsert(&self, id: Option<CategoryId>, color: RgbColor, name: &str)
        -> RepoResult<CategoryId>;
}

impl<C: CategoryStore + ?Sized> CategoryStore for &C {
    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        (**self).get(id)
    }

    fn all(&self) -> RepoResult<Vec<Category>> {
        (**self).all()
    }

    fn upsert(
        &self,
        id: Option<CategoryId>,
        color: RgbColor,
        name: &str,
    ) -> RepoResult<CategoryId> {
        (**self).upsert(id, color, name)
    }
}

/// SQLite-backed category store.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryStore for SqliteCategoryRepository<'_> {
    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, color, name FROM categories WHERE id = ?1;",
                [id.get()],
                |row| Ok(parse_category_row(row)),
            )
            .optional()?;
        category.transpose()
    }

    fn all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, color, name FROM categories ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn upsert(
        &self,
        id: Option<CategoryId>,
        color: RgbColor,
        name: &str,
    ) -> RepoResult<CategoryId> {
        match id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE categories SET color = ?2, name = ?3 WHERE id = ?1;",
                    params![id.get(), color.to_hex(), name],
                )?;
                if changed == 0 {
                    return Err(RepoError::CategoryNotFound(id));
                }
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO categories (color, name) VALUES (?1, ?2);",
                    params![color.to_hex(), name],
                )?;
                Ok(CategoryId(self.conn.last_insert_rowid()))
            }
        }
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id = CategoryId(row.get("id")?);
    let color_text: String = row.get("color")?;
    let color = color_text.parse::<RgbColor>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid color `{color_text}` in categories.color for id {id}"
        ))
    })?;

    Ok(Category {
        id,
        color,
        name: row.get("name")?,
    })
}
