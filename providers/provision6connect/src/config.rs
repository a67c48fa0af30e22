//! Provider configuration
//!
//! Connection parameters come from the provider block, falling back to the
//! `PROVISION_HOST`, `PROVISION_USERNAME` and `PROVISION_PASSWORD` environment
//! variables. A declared value always wins over the environment, even when it is
//! empty. Environment access is injected so resolution stays a pure function.

use crate::error::ProviderError;
use provision_client::{ProVisionClient, ProVisionError};
use serde::Deserialize;
use std::fmt;

pub const HOST_ENV: &str = "PROVISION_HOST";
pub const USERNAME_ENV: &str = "PROVISION_USERNAME";
pub const PASSWORD_ENV: &str = "PROVISION_PASSWORD";

/// Provider block as declared by the practitioner; every field is optional
#[derive(Clone, Default, Deserialize)]
pub struct ProviderConfigInput {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for ProviderConfigInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfigInput")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolved, validated connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Resolve the configuration, reporting one error per missing or empty field.
    pub fn resolve<F>(input: &ProviderConfigInput, env: F) -> Result<Self, Vec<ProviderError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |declared: &Option<String>, env_var: &str| {
            declared.clone().or_else(|| env(env_var)).unwrap_or_default()
        };

        let host = pick(&input.host, HOST_ENV);
        let username = pick(&input.username, USERNAME_ENV);
        let password = pick(&input.password, PASSWORD_ENV);

        let errors: Vec<ProviderError> = [
            ("host", HOST_ENV, &host),
            ("username", USERNAME_ENV, &username),
            ("password", PASSWORD_ENV, &password),
        ]
        .into_iter()
        .filter(|(_, _, value)| value.is_empty())
        .map(|(attribute, env_var, _)| ProviderError::Configuration { attribute, env_var })
        .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            host,
            username,
            password,
        })
    }

    /// Build the HTTP client for these parameters
    pub fn build_client(&self) -> Result<ProVisionClient, ProVisionError> {
        ProVisionClient::new(self.host.clone(), &self.username, &self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_all_empty_reports_three_distinct_errors() {
        let input = ProviderConfigInput {
            host: Some(String::new()),
            username: Some(String::new()),
            password: Some(String::new()),
        };
        let errors = ProviderConfig::resolve(&input, env_of(&[])).unwrap_err();
        let attributes: Vec<&str> = errors
            .iter()
            .map(|e| match e {
                ProviderError::Configuration { attribute, .. } => *attribute,
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(attributes, vec!["host", "username", "password"]);
    }

    #[test]
    fn test_declared_value_wins_over_environment() {
        let input = ProviderConfigInput {
            host: Some("https://declared.example.net".to_string()),
            ..Default::default()
        };
        let env = env_of(&[
            (HOST_ENV, "https://env.example.net"),
            (USERNAME_ENV, "api"),
            (PASSWORD_ENV, "secret"),
        ]);
        let config = ProviderConfig::resolve(&input, env).unwrap();
        assert_eq!(config.host, "https://declared.example.net");
        assert_eq!(config.username, "api");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn test_declared_empty_value_is_not_replaced_by_environment() {
        let input = ProviderConfigInput {
            username: Some(String::new()),
            ..Default::default()
        };
        let env = env_of(&[
            (HOST_ENV, "https://env.example.net"),
            (USERNAME_ENV, "api"),
            (PASSWORD_ENV, "secret"),
        ]);
        let errors = ProviderConfig::resolve(&input, env).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ProviderError::Configuration { attribute: "username", .. }));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ProviderConfig {
            host: "https://pv.example.net".to_string(),
            username: "api".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
