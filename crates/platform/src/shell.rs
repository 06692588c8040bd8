//! Shell detection and environment script fragments

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PlatformError;

/// Supported shell types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Sh,
}

impl Shell {
    /// Detect the current shell from environment
    ///
    /// Checks `$SHELL` on Unix, falls back to reasonable defaults.
    pub fn detect() -> Self {
        if let Ok(shell) = env::var("SHELL") {
            let shell_name = PathBuf::from(&shell)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_lowercase();

            return shell_name.parse().unwrap_or_else(|_| {
                if shell_name.contains("zsh") {
                    Shell::Zsh
                } else if shell_name.contains("bash") {
                    Shell::Bash
                } else if shell_name.contains("fish") {
                    Shell::Fish
                } else {
                    Shell::Sh // Safe fallback for POSIX
                }
            });
        }

        #[cfg(target_os = "windows")]
        return Shell::PowerShell;

        #[cfg(not(target_os = "windows"))]
        Shell::Sh
    }

    /// Get the shell name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
            Shell::Sh => "sh",
        }
    }

    /// Quote a value so the shell reads it back verbatim
    pub fn quote(&self, value: &str) -> String {
        match self {
            Shell::Fish => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'")),
            Shell::PowerShell => format!("'{}'", value.replace('\'', "''")),
            Shell::Bash | Shell::Zsh | Shell::Sh => format!("'{}'", value.replace('\'', r"'\''")),
        }
    }

    /// Generate an export statement for setting an environment variable
    pub fn export_var(&self, name: &str, value: &str) -> String {
        let value = self.quote(value);
        match self {
            Shell::Fish => format!("set -gx {} {}", name, value),
            Shell::PowerShell => format!("$env:{} = {}", name, value),
            Shell::Bash | Shell::Zsh | Shell::Sh => format!("export {}={}", name, value),
        }
    }

    /// Generate a statement removing an environment variable
    pub fn unset_var(&self, name: &str) -> String {
        match self {
            Shell::Fish => format!("set -e {}", name),
            Shell::PowerShell => format!("Remove-Item Env:{} -ErrorAction SilentlyContinue", name),
            Shell::Bash | Shell::Zsh | Shell::Sh => format!("unset {}", name),
        }
    }

    /// Generate a comment for this shell
    pub fn comment(&self, text: &str) -> String {
        format!("# {}", text)
    }

    /// Generate the script header/shebang
    pub fn header(&self) -> &'static str {
        match self {
            Shell::Bash => "#!/usr/bin/env bash",
            Shell::Zsh => "#!/usr/bin/env zsh",
            Shell::Fish => "# Fish shell environment",
            Shell::PowerShell => "# PowerShell environment",
            Shell::Sh => "#!/bin/sh",
        }
    }
}

impl FromStr for Shell {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            "sh" => Ok(Shell::Sh),
            "powershell" | "pwsh" => Ok(Shell::PowerShell),
            _ => Err(PlatformError::UnknownShell(s.to_string())),
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_from_str() {
        assert_eq!("bash".parse::<Shell>().unwrap(), Shell::Bash);
        assert_eq!("ZSH".parse::<Shell>().unwrap(), Shell::Zsh);
        assert_eq!("pwsh".parse::<Shell>().unwrap(), Shell::PowerShell);
        assert!(matches!(
            "tcsh".parse::<Shell>(),
            Err(PlatformError::UnknownShell(name)) if name == "tcsh"
        ));
    }

    #[test]
    fn test_bash_export() {
        let export = Shell::Bash.export_var("HDCYCLES_ROOT", "/pkg");
        assert_eq!(export, "export HDCYCLES_ROOT='/pkg'");
    }

    #[test]
    fn test_bash_export_escapes_quotes() {
        let export = Shell::Bash.export_var("NAME", "it's");
        assert_eq!(export, r"export NAME='it'\''s'");
    }

    #[test]
    fn test_fish_export() {
        let export = Shell::Fish.export_var("EDITOR", "nvim");
        assert_eq!(export, "set -gx EDITOR 'nvim'");
    }

    #[test]
    fn test_powershell_export_keeps_backslashes() {
        let export = Shell::PowerShell.export_var("HDCYCLES_ROOT", r"R:\int\hdcycles");
        assert_eq!(export, r"$env:HDCYCLES_ROOT = 'R:\int\hdcycles'");
    }

    #[test]
    fn test_unset() {
        assert_eq!(Shell::Sh.unset_var("FOO"), "unset FOO");
        assert_eq!(Shell::Fish.unset_var("FOO"), "set -e FOO");
    }

    #[test]
    fn test_shell_detect() {
        // This test just ensures detection doesn't panic
        let shell = Shell::detect();
        assert!(!shell.as_str().is_empty());
    }

    #[test]
    fn test_shell_header() {
        assert!(Shell::Bash.header().contains("bash"));
        assert!(Shell::Zsh.header().contains("zsh"));
    }
}
