use serde::Serialize;

const FIXED_SUBCATEGORIES: [&str; 6] = [
    "Housing",
    "Transportation",
    "Insurance",
    "Debt payments",
    "Childcare and education",
    "Subscriptions and memberships",
];

const VARIABLE_SUBCATEGORIES: [&str; 8] = [
    "Food",
    "Utilities",
    "Transportation",
    "Household supplies",
    "Personal care",
    "Entertainment",
    "Clothing",
    "Pet care",
];

const PERIODIC_SUBCATEGORIES: [&str; 6] = [
    "Home maintenance and repairs",
    "Medical and dental",
    "Gifts and donations",
    "Travel and vacations",
    "Annual and seasonal expenses",
    "Large purchases",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fixed,
    Variable,
    Periodic,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Fixed, Self::Variable, Self::Periodic];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Periodic => "periodic",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed Expenses",
            Self::Variable => "Variable Expenses",
            Self::Periodic => "Periodic and Occasional Expenses",
        }
    }

    pub const fn subcategories(self) -> &'static [&'static str] {
        match self {
            Self::Fixed => &FIXED_SUBCATEGORIES,
            Self::Variable => &VARIABLE_SUBCATEGORIES,
            Self::Periodic => &PERIODIC_SUBCATEGORIES,
        }
    }

    pub fn subcategory_refs(self) -> impl Iterator<Item = SubcategoryRef> {
        self.subcategories()
            .iter()
            .copied()
            .map(move |name| SubcategoryRef {
                category: self,
                name,
            })
    }

    /// Accepts the slug (`fixed`) or the display label (`Fixed Expenses`),
    /// case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|category| {
            trimmed.eq_ignore_ascii_case(category.as_str())
                || trimmed.eq_ignore_ascii_case(category.label())
        })
    }

    pub fn contains(self, subcategory: &str) -> bool {
        self.subcategories().iter().any(|name| *name == subcategory)
    }
}

/// One (category, subcategory) pair from the taxonomy.
///
/// Subcategory names are not unique across categories (`Transportation` is
/// both a fixed and a variable expense), so membership is always checked as
/// a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SubcategoryRef {
    pub category: Category,
    pub name: &'static str,
}

impl SubcategoryRef {
    pub fn matches(&self, category: Category, subcategory: &str) -> bool {
        self.category == category && self.name == subcategory
    }
}

/// Every pair in taxonomy order.
pub fn all_subcategories() -> impl Iterator<Item = SubcategoryRef> {
    Category::ALL
        .into_iter()
        .flat_map(|category| category.subcategory_refs())
}

/// Exact lookup of a stored pair.
pub fn lookup(category: Category, subcategory: &str) -> Option<SubcategoryRef> {
    category
        .subcategory_refs()
        .find(|candidate| candidate.name == subcategory)
}

/// Case-insensitive lookup for user input, returning the canonical spelling.
pub fn resolve_input(category: Category, subcategory: &str) -> Option<SubcategoryRef> {
    let trimmed = subcategory.trim();
    category
        .subcategory_refs()
        .find(|candidate| candidate.name.eq_ignore_ascii_case(trimmed))
}

#[cfg(test)]
mod tests {
    use super::{Category, all_subcategories, lookup, resolve_input};

    #[test]
    fn parse_accepts_slugs_and_labels() {
        assert_eq!(Category::parse("fixed"), Some(Category::Fixed));
        assert_eq!(Category::parse(" Variable "), Some(Category::Variable));
        assert_eq!(
            Category::parse("periodic and occasional expenses"),
            Some(Category::Periodic)
        );
        assert_eq!(Category::parse("savings"), None);
    }

    #[test]
    fn shared_subcategory_name_resolves_per_category() {
        let fixed = lookup(Category::Fixed, "Transportation");
        let variable = lookup(Category::Variable, "Transportation");
        assert!(fixed.is_some());
        assert!(variable.is_some());
        assert_ne!(fixed, variable);
        assert!(lookup(Category::Periodic, "Transportation").is_none());
    }

    #[test]
    fn resolve_input_returns_canonical_spelling() {
        let resolved = resolve_input(Category::Variable, "  pet CARE ");
        assert_eq!(resolved.map(|value| value.name), Some("Pet care"));
        assert!(resolve_input(Category::Fixed, "Food").is_none());
    }

    #[test]
    fn taxonomy_lists_twenty_pairs_in_category_order() {
        let pairs = all_subcategories().collect::<Vec<_>>();
        assert_eq!(pairs.len(), 20);
        assert_eq!(pairs[0].name, "Housing");
        assert_eq!(pairs[6].category, Category::Variable);
        assert_eq!(pairs[19].name, "Large purchases");
    }
}
