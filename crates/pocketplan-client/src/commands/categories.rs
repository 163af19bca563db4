use crate::ClientResult;
use crate::budget::policy::{ALLOCATION_POLICY_V1, ALLOCATION_POLICY_VERSION};
use crate::budget::taxonomy::Category;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CategoriesData, CategoryEntry};

/// The compiled-in taxonomy with each category's allocation ratio. Needs no store.
pub fn run() -> ClientResult<SuccessEnvelope> {
    let categories = Category::ALL
        .into_iter()
        .map(|category| CategoryEntry {
            category,
            label: category.label().to_string(),
            allocation_ratio: ALLOCATION_POLICY_V1.ratio(category),
            subcategories: category
                .subcategories()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        })
        .collect();

    success(
        "categories",
        CategoriesData {
            policy_version: ALLOCATION_POLICY_VERSION.to_string(),
            categories,
        },
    )
}
