//! Built-in merge operators

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOperator {
    /// Join existing and operand with a comma
    StringAppend,
    /// Keep the lexicographically larger string
    Max,
    /// Operand replaces the existing value
    Put,
}

impl MergeOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stringappend" => Some(MergeOperator::StringAppend),
            "max" => Some(MergeOperator::Max),
            "put" => Some(MergeOperator::Put),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MergeOperator::StringAppend => "stringappend",
            MergeOperator::Max => "max",
            MergeOperator::Put => "put",
        }
    }

    pub fn merge(&self, existing: Option<&str>, operand: &str) -> String {
        match (self, existing) {
            (_, None) => operand.to_string(),
            (MergeOperator::StringAppend, Some(existing)) => format!("{},{}", existing, operand),
            (MergeOperator::Max, Some(existing)) => existing.max(operand).to_string(),
            (MergeOperator::Put, Some(_)) => operand.to_string(),
        }
    }
}

impl fmt::Display for MergeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        for op in [MergeOperator::StringAppend, MergeOperator::Max, MergeOperator::Put] {
            assert_eq!(MergeOperator::from_name(op.name()), Some(op));
        }
        assert_eq!(MergeOperator::from_name("uint64add"), None);
    }

    #[test]
    fn test_string_append() {
        let op = MergeOperator::StringAppend;
        assert_eq!(op.merge(None, "a"), "a");
        assert_eq!(op.merge(Some("a"), "b"), "a,b");
    }

    #[test]
    fn test_max_and_put() {
        assert_eq!(MergeOperator::Max.merge(Some("b"), "a"), "b");
        assert_eq!(MergeOperator::Max.merge(Some("a"), "c"), "c");
        assert_eq!(MergeOperator::Put.merge(Some("old"), "new"), "new");
    }
}
