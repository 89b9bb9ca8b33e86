use crate::models::MediaRecord;
use crate::query::Category;
use serde::{Deserialize, Serialize};

/// Per-category totals over the full record set, for sidebar badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub all: usize,
    pub movies: usize,
    pub books: usize,
    pub favorites: usize,
    pub high_rating: usize,
    pub watched: usize,
}

impl CategoryCounts {
    pub fn from_records(records: &[MediaRecord]) -> Self {
        let count = |category: Category| records.iter().filter(|r| category.matches(r)).count();

        Self {
            all: records.len(),
            movies: count(Category::Movie),
            books: count(Category::Book),
            favorites: count(Category::Favorites),
            high_rating: count(Category::HighRating),
            watched: count(Category::Watched),
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::All => self.all,
            Category::Movie => self.movies,
            Category::Book => self.books,
            Category::Favorites => self.favorites,
            Category::HighRating => self.high_rating,
            Category::Watched => self.watched,
        }
    }
}
