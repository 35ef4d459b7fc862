use crate::models::CategoryRule;

/// `keyword` must already be lowercase, as [`CategoryRule::new`] stores it.
fn matches(description: &str, keyword: &str) -> bool {
    description.contains(keyword)
}

/// Category of the first rule whose keyword occurs in `description`, ignoring case.
/// Returns an empty string when no rule matches. Rule order decides ties.
///
/// Rules are expected to come from [`CategoryRule::new`], which folds the keyword.
pub fn classify<'r>(description: &str, rules: &'r [CategoryRule]) -> &'r str {
    let desc_lower = description.to_lowercase();
    rules
        .iter()
        .find(|rule| matches(&desc_lower, &rule.keyword))
        .map(|rule| rule.category.as_str())
        .unwrap_or("")
}
