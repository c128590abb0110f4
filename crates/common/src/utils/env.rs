use std::str::FromStr;

/// Gets the value of an environment variable, treating an empty value as unset.
///
/// # Arguments
///
/// * `key` - The environment variable name to retrieve
///
/// # Returns
///
/// * `Option<String>` - The environment variable value if it exists
pub fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Gets an environment variable and parses it into `T`.
///
/// Returns `None` when the variable is unset, and an error message naming the variable when
/// it is set but does not parse.
pub fn get_env_parsed<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("invalid value for {key} ('{value}'): {e}")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_parsed_unset() {
        let value: Option<u64> =
            get_env_parsed("MIMIR_TEST_SURELY_UNSET_VARIABLE").expect("should not fail");
        assert_eq!(value, None);
    }

    #[test]
    fn test_get_env_parsed_invalid() {
        // PATH is always set, and never a number
        let result = get_env_parsed::<u64>("PATH");
        assert!(result.is_err());
    }
}
