use std::env;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing environment variables: {}", .0.join(", "))]
pub struct MissingVars(pub Vec<String>);

/// Reads every named variable, treating empty values as unset.
/// Reports all missing names at once rather than stopping at the first.
pub fn require_vars<const N: usize>(names: [&str; N]) -> Result<[String; N], MissingVars> {
    let mut missing = Vec::new();
    let values = names.map(|name| match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    });

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(MissingVars(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_missing_name() {
        env::set_var("COMMON_TEST_PRESENT", "value");
        env::set_var("COMMON_TEST_EMPTY", "");
        env::remove_var("COMMON_TEST_ABSENT");

        let err = require_vars(["COMMON_TEST_PRESENT", "COMMON_TEST_EMPTY", "COMMON_TEST_ABSENT"])
            .unwrap_err();

        assert_eq!(
            err.0,
            vec!["COMMON_TEST_EMPTY".to_string(), "COMMON_TEST_ABSENT".to_string()]
        );
        assert_eq!(
            err.to_string(),
            "missing environment variables: COMMON_TEST_EMPTY, COMMON_TEST_ABSENT"
        );
    }

    #[test]
    fn returns_values_in_order() {
        env::set_var("COMMON_TEST_FIRST", "one");
        env::set_var("COMMON_TEST_SECOND", "two");

        let [first, second] = require_vars(["COMMON_TEST_FIRST", "COMMON_TEST_SECOND"]).unwrap();

        assert_eq!(first, "one");
        assert_eq!(second, "two");
    }
}
