/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased
/// env var names (`admin_email` ← `ADMIN_EMAIL`). Comma separated values
/// deserialize into `Vec<String>` fields.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    /// Only call at startup.
    fn from_env() -> Self {
        envy::from_env().unwrap_or_else(|e| panic!("failed to load config from environment: {e}"))
    }

    /// Load from an explicit set of `(NAME, value)` pairs.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
