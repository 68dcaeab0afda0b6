//! Shared helpers for command handlers.

use serde::Serialize;
use serde_json::Value;

use crate::cli::ListArgs;

/// Apply `--filter` and `--limit` to a fetched list.
///
/// The filter matches case-insensitively against every top-level string
/// field of the item's serialized form, so it covers canonical fields and
/// passthrough keys alike.
pub fn filter_and_limit<T: Serialize>(items: Vec<T>, args: &ListArgs) -> Vec<T> {
    let needle = args
        .filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase);

    let matched = items.into_iter().filter(|item| match &needle {
        Some(needle) => matches_text(item, needle),
        None => true,
    });

    match args.limit {
        Some(limit) => matched.take(limit).collect(),
        None => matched.collect(),
    }
}

fn matches_text<T: Serialize>(item: &T, needle: &str) -> bool {
    let Ok(Value::Object(fields)) = serde_json::to_value(item) else {
        return false;
    };
    fields.values().any(|v| match v {
        Value::String(s) => s.to_lowercase().contains(needle),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args(filter: Option<&str>, limit: Option<usize>) -> ListArgs {
        ListArgs {
            filter: filter.map(Into::into),
            limit,
        }
    }

    #[test]
    fn filter_matches_any_text_field() {
        let items = vec![
            json!({"hostName": "Laptop-01", "band": "5GHz"}),
            json!({"hostName": "phone", "band": "2.4GHz"}),
        ];
        let kept = filter_and_limit(items, &args(Some("laptop"), None));
        assert_eq!(kept, vec![json!({"hostName": "Laptop-01", "band": "5GHz"})]);
    }

    #[test]
    fn numbers_are_not_searched() {
        let items = vec![json!({"vlan": 10})];
        assert!(filter_and_limit(items, &args(Some("10"), None)).is_empty());
    }

    #[test]
    fn limit_applies_after_filter() {
        let items = vec![json!({"n": "a1"}), json!({"n": "b"}), json!({"n": "a2"})];
        let kept = filter_and_limit(items, &args(Some("a"), Some(1)));
        assert_eq!(kept, vec![json!({"n": "a1"})]);
        let blank = filter_and_limit(vec![json!({"n": "x"})], &args(Some("  "), None));
        assert_eq!(blank.len(), 1);
    }
}
