use std::env;
use std::fmt;

use crate::errors::{GasError, Result};

const GAS_MACRO_BASE: &str = "https://script.google.com/macros/s";

/// Connection settings for the Apps Script deployment.
///
/// Loaded once and treated as read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub deploy_id: String,
    pub auth_token: String,
    pub sheet_id: String,
    pub default_sheet: Option<String>,
    pub endpoint: Option<String>,
}

impl Settings {
    pub fn new(
        deploy_id: impl Into<String>,
        auth_token: impl Into<String>,
        sheet_id: impl Into<String>,
    ) -> Self {
        Self {
            deploy_id: deploy_id.into(),
            auth_token: auth_token.into(),
            sheet_id: sheet_id.into(),
            default_sheet: None,
            endpoint: None,
        }
    }

    pub fn with_default_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.default_sheet = Some(sheet_name.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            deploy_id: required_var("GAS_DEPLOY_ID")?,
            auth_token: required_var("GAS_AUTH_TOKEN")?,
            sheet_id: required_var("GAS_SHEET_ID")?,
            default_sheet: optional_var("GAS_DEFAULT_SHEET"),
            endpoint: optional_var("GAS_ENDPOINT"),
        })
    }

    /// The web app URL requests are sent to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}/{}/exec", GAS_MACRO_BASE, self.deploy_id),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_none() && self.deploy_id.trim().is_empty() {
            return Err(GasError::Configuration("deploy_id is empty".to_string()));
        }
        if self.auth_token.trim().is_empty() {
            return Err(GasError::Configuration("auth_token is empty".to_string()));
        }
        if self.sheet_id.trim().is_empty() {
            return Err(GasError::Configuration("sheet_id is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("deploy_id", &self.deploy_id)
            .field("auth_token", &"***")
            .field("sheet_id", &self.sheet_id)
            .field("default_sheet", &self.default_sheet)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name)
        .map_err(|_| GasError::Configuration(format!("{} not set", name)))?;
    if value.trim().is_empty() {
        return Err(GasError::Configuration(format!("{} is empty", name)));
    }
    Ok(value)
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Source of [`Settings`], consulted once per facade initialization.
pub trait SettingsProvider: Send + Sync {
    fn load(&self) -> Result<Settings>;
}

/// Reads settings from `GAS_*` environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl SettingsProvider for EnvSettings {
    fn load(&self) -> Result<Settings> {
        Settings::from_env()
    }
}

impl<F> SettingsProvider for F
where
    F: Fn() -> Result<Settings> + Send + Sync,
{
    fn load(&self) -> Result<Settings> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_from_deploy_id() {
        let settings = Settings::new("AKfy123", "token", "sheet");
        assert_eq!(
            settings.endpoint_url(),
            "https://script.google.com/macros/s/AKfy123/exec"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let settings =
            Settings::new("AKfy123", "token", "sheet").with_endpoint("http://127.0.0.1:9000/exec");
        assert_eq!(settings.endpoint_url(), "http://127.0.0.1:9000/exec");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(Settings::new("id", "token", "sheet").validate().is_ok());
        assert!(Settings::new(" ", "token", "sheet").validate().is_err());
        assert!(Settings::new("id", "", "sheet").validate().is_err());
        assert!(Settings::new("id", "token", "").validate().is_err());

        let proxied = Settings::new("", "token", "sheet").with_endpoint("http://localhost/exec");
        assert!(proxied.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings::new("id", "super-secret", "sheet");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_closure_provider() {
        let provider =
            || -> Result<Settings> { Ok(Settings::new("id", "token", "sheet").with_default_sheet("Logs")) };
        let settings = provider.load().unwrap();
        assert_eq!(settings.default_sheet.as_deref(), Some("Logs"));
    }
}
