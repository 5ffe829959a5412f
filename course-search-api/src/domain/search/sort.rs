use super::types::{CourseField, ResolvedSort, SortMode, SortOrder};

/// Maps a `sort` token to the engine sort key. Total: unknown tokens sort by upcoming session.
pub fn resolve_sort(token: &str) -> ResolvedSort {
    SortMode::from_token(token).into()
}

impl From<SortMode> for ResolvedSort {
    fn from(mode: SortMode) -> Self {
        match mode {
            SortMode::PriceAsc => ResolvedSort {
                field: CourseField::Price,
                order: SortOrder::Asc,
            },
            SortMode::PriceDesc => ResolvedSort {
                field: CourseField::Price,
                order: SortOrder::Desc,
            },
            SortMode::Upcoming => ResolvedSort {
                field: CourseField::NextSessionDate,
                order: SortOrder::Asc,
            },
        }
    }
}
