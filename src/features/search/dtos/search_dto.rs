use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::search::matcher::{Category, KeywordStat};

/// Query string for GET /api/search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParamsDto {
    /// Free-text query matched against filenames and keywords
    pub q: String,
    /// Optional category filter, defaults to all
    pub category: Option<Category>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KeywordStatDto {
    pub name: String,
    pub count: i64,
}

impl From<KeywordStat> for KeywordStatDto {
    fn from(stat: KeywordStat) -> Self {
        Self {
            name: stat.name,
            count: stat.count,
        }
    }
}
