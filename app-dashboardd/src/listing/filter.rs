use std::cmp::Ordering;
use shared::types::SortKey;
use crate::records::normalize::Application;

/// Case-insensitive substring match against name, authority or owner address.
/// `needle` must already be lowercased.
fn matches(app: &Application, needle: &str) -> bool {
    [&app.name, &app.authority, &app.owner]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Case-folded comparison; names that differ only by case put lowercase first,
/// as locale collation does. Not a full collation: accented letters compare by
/// code point and so sort after `z`.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn compare(a: &Application, b: &Application, sort: SortKey) -> Ordering {
    match sort {
        // Newest first; records without a parseable time sink to the end
        SortKey::Time => b.created.cmp(&a.created),
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Authority => a.authority.cmp(&b.authority),
        SortKey::Owner => a.owner.cmp(&b.owner),
    }
}

/// Filter by `search` and order by `sort`. Recomputed from scratch on every call;
/// the sort is stable so equal keys keep their fetched order.
pub fn filter_and_sort<'a>(
    apps: &'a [Application],
    search: &str,
    sort: SortKey,
) -> Vec<&'a Application> {
    let needle = search.to_lowercase();
    let mut view: Vec<&Application> = apps.iter().filter(|app| matches(app, &needle)).collect();
    view.sort_by(|a, b| compare(a, b, sort));
    view
}
