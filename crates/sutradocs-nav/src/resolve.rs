//! Previous/next page resolution over a catalog.

use crate::catalog::{Catalog, Category, Entry};

/// The pages linked from a page footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjacent<'a> {
    pub previous: Option<&'a Entry>,
    pub next: Option<&'a Entry>,
}

/// Resolve the previous and next navigable entries for `current_path`.
///
/// Within a category, the neighbours are the closest non-group entries.
/// Past either end of a category, resolution moves to the neighbouring
/// category (wrapping around the catalog) and takes its first or last
/// navigable entry. Categories without any navigable entry are passed over.
///
/// The catalog's introduction page never has a previous link. Paths that
/// are not in the catalog resolve to no links at all.
pub fn resolve_adjacent<'a>(catalog: &'a Catalog, current_path: &str) -> Adjacent<'a> {
    let Some((category_index, entry_index)) = catalog.locate(current_path) else {
        return Adjacent::default();
    };

    let categories = catalog.categories();
    let Some(category) = categories.get(category_index) else {
        return Adjacent::default();
    };

    let before = category.entries.get(..entry_index).unwrap_or_default();
    let after = category.entries.get(entry_index + 1..).unwrap_or_default();

    let next = after
        .iter()
        .find(|e| e.is_navigable())
        .or_else(|| first_navigable_after(categories, category_index));

    let previous = before
        .iter()
        .rev()
        .find(|e| e.is_navigable())
        .or_else(|| last_navigable_before(categories, category_index));

    if current_path == catalog.introduction() {
        return Adjacent {
            previous: None,
            next,
        };
    }

    Adjacent { previous, next }
}

/// First navigable entry of the categories following `index`, wrapping
/// around and ending with the category at `index` itself.
fn first_navigable_after(categories: &[Category], index: usize) -> Option<&Entry> {
    categories
        .iter()
        .cycle()
        .skip(index + 1)
        .take(categories.len())
        .find_map(Category::first_navigable)
}

/// Last navigable entry of the categories preceding `index`, wrapping
/// around and ending with the category at `index` itself.
fn last_navigable_before(categories: &[Category], index: usize) -> Option<&Entry> {
    let len = categories.len();
    categories
        .iter()
        .rev()
        .cycle()
        .skip(len - index)
        .take(len)
        .find_map(Category::last_navigable)
}
