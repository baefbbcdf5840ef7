//! Category list use-cases.
//!
//! # Responsibility
//! - Render the category table as plain list rows for the settings screen.
//! - Apply row edits through `CategoryStore::upsert` only.
//!
//! # Invariants
//! - Category names are trimmed and never empty.
//! - Rows are ordered by category id.

use crate::model::category::{CategoryId, RgbColor};
use crate::repo::category_repo::CategoryStore;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// One editable row of the category list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub color: RgbColor,
}

/// Category list facade over a `CategoryStore`.
pub struct CategoryService<C: CategoryStore> {
    store: C,
}

impl<C: CategoryStore> CategoryService<C> {
    pub fn new(store: C) -> Self {
        Self { store }
    }

    /// Lists all categories as rows ordered by id.
    pub fn rows(&self) -> RepoResult<Vec<CategoryRow>> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .map(|category| CategoryRow {
                id: category.id,
                name: category.name,
                color: category.color,
            })
            .collect())
    }

    pub fn rename(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        let category = self
            .store
            .get(id)?
            .ok_or(RepoError::CategoryNotFound(id))?;
        self.store
            .upsert(Some(id), category.color, normalize_name(name)?.as_str())?;
        Ok(())
    }

    pub fn recolor(&self, id: CategoryId, color: RgbColor) -> RepoResult<()> {
        let category = self
            .store
            .get(id)?
            .ok_or(RepoError::CategoryNotFound(id))?;
        self.store.upsert(Some(id), color, &category.name)?;
        Ok(())
    }

    /// Adds a new category and returns its id.
    pub fn add(&self, color: RgbColor, name: &str) -> RepoResult<CategoryId> {
        self.store.upsert(None, color, normalize_name(name)?.as_str())
    }

    /// Persists every row that differs from storage; returns the number of
    /// rows written.
    ///
    /// All names are validated before anything is written.
    pub fn save_rows(&self, rows: &[CategoryRow]) -> RepoResult<usize> {
        let mut normalized = Vec::with_capacity(rows.len());
        for row in rows {
            normalized.push((row, normalize_name(&row.name)?));
        }

        let mut written = 0;
        for (row, name) in normalized {
            let stored = self
                .store
                .get(row.id)?
                .ok_or(RepoError::CategoryNotFound(row.id))?;
            if stored.name != name || stored.color != row.color {
                self.store.upsert(Some(row.id), row.color, &name)?;
                written += 1;
            }
        }

        info!("event=categories_save module=service status=ok written={written}");
        Ok(written)
    }
}

fn normalize_name(name: &str) -> RepoResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidData(
            "category name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
