//! Marker icon derivation.
//!
//! # Responsibility
//! - Resolve category display attributes from a cached category table.
//! - Map `(category, selected, has_photo)` to one of four tinted icon variants.
//!
//! # Invariants
//! - `resolve_icon` is pure: equal inputs against the same resolver state give
//!   equal handles.
//! - Unknown categories are a data-integrity error; no fallback tint is
//!   fabricated.

use crate::model::category::{Category, CategoryId, RgbColor};
use crate::repo::category_repo::CategoryStore;
use crate::repo::RepoResult;
use log::error;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Icon derivation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconError {
    UnknownCategory(CategoryId),
}

impl Display for IconError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(id) => write!(f, "unknown category id {id}"),
        }
    }
}

impl Error for IconError {}

/// Rendered marker glyph, before tinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconVariant {
    Unselected,
    UnselectedWithPhoto,
    Selected,
    SelectedWithPhoto,
}

impl IconVariant {
    pub fn from_state(is_selected: bool, has_photo: bool) -> Self {
        match (is_selected, has_photo) {
            (false, false) => Self::Unselected,
            (false, true) => Self::UnselectedWithPhoto,
            (true, false) => Self::Selected,
            (true, true) => Self::SelectedWithPhoto,
        }
    }

    /// Drawable resource name the map renderer loads for this variant.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Unselected => "ic_note",
            Self::UnselectedWithPhoto => "ic_note_photo",
            Self::Selected => "ic_note_selected",
            Self::SelectedWithPhoto => "ic_note_photo_selected",
        }
    }

    pub fn is_selected(self) -> bool {
        matches!(self, Self::Selected | Self::SelectedWithPhoto)
    }

    pub fn has_photo(self) -> bool {
        matches!(self, Self::UnselectedWithPhoto | Self::SelectedWithPhoto)
    }
}

/// Concrete icon: glyph variant tinted with the category color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconHandle {
    pub variant: IconVariant,
    pub tint: RgbColor,
}

/// Cached id -> category lookup backed by a `CategoryStore`.
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    categories: HashMap<CategoryId, Category>,
}

impl CategoryResolver {
    /// Loads the full category table.
    pub fn load(store: &impl CategoryStore) -> RepoResult<Self> {
        Ok(Self::from_categories(store.all()?))
    }

    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|category| (category.id, category))
                .collect(),
        }
    }

    /// Re-reads the table after category edits.
    pub fn refresh(&mut self, store: &impl CategoryStore) -> RepoResult<()> {
        *self = Self::load(store)?;
        Ok(())
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.categories.contains_key(&id)
    }

    pub fn color_of(&self, id: CategoryId) -> Result<RgbColor, IconError> {
        self.categories
            .get(&id)
            .map(|category| category.color)
            .ok_or(IconError::UnknownCategory(id))
    }

    /// Categories ordered by id.
    pub fn all(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.values().collect();
        categories.sort_by_key(|category| category.id);
        categories
    }
}

/// Derives the icon for a marker.
///
/// # Errors
/// - `IconError::UnknownCategory` when `category_id` is not in the resolver;
///   logged as an integrity error.
pub fn resolve_icon(
    resolver: &CategoryResolver,
    category_id: CategoryId,
    is_selected: bool,
    has_photo: bool,
) -> Result<IconHandle, IconError> {
    let tint = resolver.color_of(category_id).map_err(|err| {
        error!(
            "event=icon_resolve module=map status=error error_code=unknown_category category_id={category_id}"
        );
        err
    })?;

    Ok(IconHandle {
        variant: IconVariant::from_state(is_selected, has_photo),
        tint,
    })
}
