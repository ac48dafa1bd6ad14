use super::deal::Deal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithDeals {
    pub category_id: i32,
    pub category_name: String,
    #[serde(default)]
    pub deals: Vec<Deal>,
}

impl CategoryWithDeals {
    fn is_catch_all(&self) -> bool {
        self.category_name.eq_ignore_ascii_case("other")
    }
}

/// Browse ordering: the "Other" catch-all always goes last.
pub fn order_for_display(categories: Vec<CategoryWithDeals>) -> Vec<CategoryWithDeals> {
    let (others, mut rest): (Vec<_>, Vec<_>) =
        categories.into_iter().partition(|c| c.is_catch_all());
    rest.extend(others);
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, name: &str) -> CategoryWithDeals {
        CategoryWithDeals {
            category_id: id,
            category_name: name.to_string(),
            deals: Vec::new(),
        }
    }

    #[test]
    fn test_other_moves_to_the_end() {
        let ordered = order_for_display(vec![
            category(1, "Other"),
            category(2, "Electronics"),
            category(3, "Fashion"),
        ]);
        let names: Vec<_> = ordered.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, ["Electronics", "Fashion", "Other"]);
    }

    #[test]
    fn test_ordering_is_stable_without_other() {
        let ordered = order_for_display(vec![category(1, "Pets"), category(2, "Fashion")]);
        let names: Vec<_> = ordered.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, ["Pets", "Fashion"]);
    }
}
