//! Filter operators and value comparison.

/// The allow-listed comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Neq,
    Like,
}

impl FilterOperator {
    /// Parse a wire token. Anything outside the allow-list is rejected by
    /// the compiler.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(FilterOperator::Eq),
            ">" => Some(FilterOperator::Gt),
            ">=" => Some(FilterOperator::Gte),
            "<" => Some(FilterOperator::Lt),
            "<=" => Some(FilterOperator::Lte),
            "!=" => Some(FilterOperator::Neq),
            "like" => Some(FilterOperator::Like),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Neq => "!=",
            FilterOperator::Like => "like",
        }
    }

    /// Apply the operator to two stored-text operands.
    ///
    /// Ordering operators compare numerically when both sides parse as
    /// numbers and fall back to string ordering otherwise; values are stored
    /// as text regardless of attribute type.
    pub fn compare(&self, lhs: &str, rhs: &str) -> bool {
        match self {
            FilterOperator::Eq => lhs == rhs,
            FilterOperator::Neq => lhs != rhs,
            FilterOperator::Like => matches_like_pattern(lhs, rhs),
            FilterOperator::Gt => ordering(lhs, rhs).is_gt(),
            FilterOperator::Gte => ordering(lhs, rhs).is_ge(),
            FilterOperator::Lt => ordering(lhs, rhs).is_lt(),
            FilterOperator::Lte => ordering(lhs, rhs).is_le(),
        }
    }
}

fn ordering(lhs: &str, rhs: &str) -> std::cmp::Ordering {
    if let (Ok(a), Ok(b)) = (lhs.parse::<f64>(), rhs.parse::<f64>()) {
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    } else {
        lhs.cmp(rhs)
    }
}

/// SQL LIKE matching: `%` matches any sequence, `_` a single character.
fn matches_like_pattern(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    like_match(&value, &pattern)
}

fn like_match(value: &[char], pattern: &[char]) -> bool {
    match pattern.first() {
        None => value.is_empty(),
        Some('%') => {
            if like_match(value, &pattern[1..]) {
                return true;
            }
            // consume one value character at a time under the wildcard
            (1..=value.len()).any(|skip| like_match(&value[skip..], &pattern[1..]))
        }
        Some('_') => !value.is_empty() && like_match(&value[1..], &pattern[1..]),
        Some(c) => value.first() == Some(c) && like_match(&value[1..], &pattern[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_list() {
        for token in ["=", ">", ">=", "<", "<=", "!=", "like"] {
            assert_eq!(FilterOperator::parse(token).unwrap().as_str(), token);
        }
        assert!(FilterOperator::parse("in").is_none());
        assert!(FilterOperator::parse("invalid").is_none());
        assert!(FilterOperator::parse("LIKE").is_none());
    }

    #[test]
    fn test_numeric_comparison_when_both_sides_parse() {
        assert!(FilterOperator::Gte.compare("1000", "1000"));
        assert!(FilterOperator::Gte.compare("1500", "1000"));
        // lexically "500" > "1000" but numerically it is less
        assert!(!FilterOperator::Gte.compare("500", "1000"));
        assert!(FilterOperator::Lt.compare("99.5", "100"));
    }

    #[test]
    fn test_string_comparison_fallback() {
        assert!(FilterOperator::Gt.compare("beta", "alpha"));
        assert!(FilterOperator::Eq.compare("active", "active"));
        assert!(FilterOperator::Neq.compare("active", "inactive"));
    }

    #[test]
    fn test_like_patterns() {
        assert!(FilterOperator::Like.compare("Johnson", "%son"));
        assert!(FilterOperator::Like.compare("Wilson", "%son"));
        assert!(!FilterOperator::Like.compare("Smith", "%son"));
        assert!(FilterOperator::Like.compare("alpha", "a%"));
        assert!(FilterOperator::Like.compare("abc", "a_c"));
        assert!(!FilterOperator::Like.compare("abbc", "a_c"));
        assert!(FilterOperator::Like.compare("anything", "%"));
        assert!(FilterOperator::Like.compare("exact", "exact"));
        assert!(!FilterOperator::Like.compare("exacts", "exact"));
    }
}
