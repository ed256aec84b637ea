use std::str::FromStr;

use strum::EnumString;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// Falls back to the build profile when ENV is unset or unrecognised.
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => Environment::from_str(&v).unwrap_or(default_env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(
            Environment::from_str("production").ok(),
            Some(Environment::Production)
        );
        assert_eq!(
            Environment::from_str("development").ok(),
            Some(Environment::Development)
        );
        assert!(Environment::from_str("staging").is_err());
    }
}
