// src/util/util.rs

use crate::error::Error;

/// retrieve environment variable
pub fn getenv(key: &str) -> Result<String, Error> {
    std::env::var(key).map_err(|_| Error::MissingEnv(key.to_string()))
}

/// retrieve environment variable, with default value
pub fn getenv_default(key: &str, default_val: &str) -> String {
    match std::env::var(key) {
        Ok(v) => v,
        Err(_) => String::from(default_val),
    }
}

/// parse the list of key-value tuples to find the value associated with the given key.
/// This is useful for parsing the results of `serde_urlencoded::from_str`,
/// for example the query string of a request.
///
/// ```
///   use kms_core::util::form_get;
///   let fields = vec!{ ("one".to_string(),"apple".to_string()),
///                      ("two".to_string(),"banana".to_string()) };
///   assert_eq!(form_get(&fields, "one"), Some("apple"));
///   assert_eq!(form_get(&fields, "two"), Some("banana"));
///   assert_eq!(form_get(&fields, "three"), None);
/// ```
pub fn form_get<'v>(fields: &'v [(String, String)], key: &str) -> Option<&'v str> {
    fields.iter().find(|v| v.0 == key).map(|v| v.1.as_str())
}

#[cfg(test)]
mod test {

    use super::{getenv, getenv_default};
    use crate::error::Error;

    #[test]
    fn env_lookup() {
        const VAR: &str = "TEST_KMS_UTIL_GETENV_41f7";
        std::env::set_var(VAR, "value");
        assert_eq!(getenv(VAR).expect("defined"), "value");
        assert_eq!(getenv_default(VAR, "fallback"), "value");
        std::env::remove_var(VAR);

        match getenv(VAR) {
            Err(Error::MissingEnv(name)) => assert_eq!(name, VAR),
            other => panic!("expected MissingEnv, got {:?}", other),
        }
        assert_eq!(getenv_default(VAR, "fallback"), "fallback");
    }
}
