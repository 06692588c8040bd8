//! Settings read from the process environment

use pkgdef_platform::{FixedProbe, HostProbe, PlatformProbe};

use crate::activation::AppendPolicy;
use crate::error::Error;
use crate::Result;

/// Overrides the detected host platform identifier
pub const PLATFORM_ENV: &str = "PKGDEF_PLATFORM";

/// Selects the [`AppendPolicy`] (`dedup` or `allow-duplicates`)
pub const APPEND_POLICY_ENV: &str = "PKGDEF_APPEND_POLICY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Host platform identifier to use instead of the detected one
    pub platform: Option<String>,
    pub append_policy: AppendPolicy,
}

impl Settings {
    /// Read settings from environment variables; empty values count as unset
    pub fn from_env() -> Result<Self> {
        let platform = non_empty_var(PLATFORM_ENV);
        let append_policy = match non_empty_var(APPEND_POLICY_ENV) {
            Some(value) => value.parse::<AppendPolicy>().map_err(|message| Error::Settings {
                name: APPEND_POLICY_ENV.to_string(),
                message,
            })?,
            None => AppendPolicy::default(),
        };

        Ok(Self {
            platform,
            append_policy,
        })
    }

    /// The probe to evaluate manifests with
    pub fn probe(&self) -> Box<dyn PlatformProbe> {
        match &self.platform {
            Some(identifier) => Box::new(FixedProbe::new(identifier.clone())),
            None => Box::new(HostProbe),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgdef_platform::Platform;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        temp_env::with_vars(
            [(PLATFORM_ENV, None::<&str>), (APPEND_POLICY_ENV, None::<&str>)],
            || {
                let settings = Settings::from_env().unwrap();
                assert_eq!(settings, Settings::default());
                assert_eq!(settings.probe().identifier(), std::env::consts::OS);
            },
        );
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        temp_env::with_vars(
            [
                (PLATFORM_ENV, Some("win32")),
                (APPEND_POLICY_ENV, Some("dedup")),
            ],
            || {
                let settings = Settings::from_env().unwrap();
                assert_eq!(settings.platform.as_deref(), Some("win32"));
                assert_eq!(settings.append_policy, AppendPolicy::Dedup);
                assert_eq!(Platform::detect(settings.probe().as_ref()), Platform::Windows);
            },
        );
    }

    #[test]
    #[serial]
    fn test_empty_values_are_ignored() {
        temp_env::with_vars(
            [(PLATFORM_ENV, Some(" ")), (APPEND_POLICY_ENV, Some(""))],
            || {
                assert_eq!(Settings::from_env().unwrap(), Settings::default());
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_policy() {
        temp_env::with_var(APPEND_POLICY_ENV, Some("maybe"), || {
            let err = Settings::from_env().unwrap_err();
            assert!(matches!(err, Error::Settings { ref name, .. } if name == APPEND_POLICY_ENV));
        });
    }
}
