//! Environment activation.
//!
//! An [`ActivationPlan`] is the ordered list of environment mutations a
//! package declares. [`activate`] applies it to an [`Environment`] snapshot
//! and returns the resulting snapshot without touching the process
//! environment. Materialising the result is left to the caller (see
//! [`crate::script`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use pkgdef_platform::{Platform, join_path_list, split_path_list};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ActivationError, Error};
use crate::template::{self, Resolver, TemplateError};

/// How an action changes its variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvOperation {
    /// Replace any existing value
    Set,
    /// Add an entry to the end of a PATH-like variable
    Append,
}

impl fmt::Display for EnvOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvOperation::Set => write!(f, "set"),
            EnvOperation::Append => write!(f, "append"),
        }
    }
}

/// A single environment mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationAction {
    /// Environment variable name
    pub name: String,
    pub op: EnvOperation,
    /// Value template, see [`crate::template`]
    pub value: String,
}

impl ActivationAction {
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: EnvOperation::Set,
            value: value.into(),
        }
    }

    pub fn append(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: EnvOperation::Append,
            value: value.into(),
        }
    }
}

/// Ordered environment mutations, applied at activation time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationPlan {
    actions: Vec<ActivationAction>,
}

impl ActivationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: ActivationAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[ActivationAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl FromIterator<ActivationAction> for ActivationPlan {
    fn from_iter<I: IntoIterator<Item = ActivationAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// What `append` does when the entry is already present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppendPolicy {
    /// Skip entries already in the list, making re-activation idempotent
    Dedup,
    /// Always add the entry
    #[default]
    AllowDuplicates,
}

impl AppendPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AppendPolicy::Dedup => "dedup",
            AppendPolicy::AllowDuplicates => "allow-duplicates",
        }
    }
}

impl fmt::Display for AppendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dedup" => Ok(AppendPolicy::Dedup),
            "allow-duplicates" | "allow_duplicates" => Ok(AppendPolicy::AllowDuplicates),
            other => Err(format!(
                "unknown append policy '{}', expected 'dedup' or 'allow-duplicates'",
                other
            )),
        }
    }
}

/// Snapshot of environment variables, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Stored spelling of `name`, compared the way `platform` compares names
    ///
    /// Windows variable names are case-insensitive, so `PATH` finds an
    /// existing `Path` there. On POSIX only the exact name matches.
    pub fn key_of(&self, name: &str, platform: Platform) -> Option<&str> {
        if let Some((key, _)) = self.vars.get_key_value(name) {
            return Some(key);
        }
        match platform {
            Platform::Windows => self
                .vars
                .keys()
                .find(|key| key.eq_ignore_ascii_case(name))
                .map(String::as_str),
            Platform::Posix => None,
        }
    }

    /// Value of `name`, looked up with the naming rules of `platform`
    pub fn lookup(&self, name: &str, platform: Platform) -> Option<&str> {
        self.key_of(name, platform).and_then(|key| self.get(key))
    }

    /// Entries of a PATH-like variable
    pub fn path_entries(&self, name: &str, platform: Platform) -> Vec<&str> {
        self.lookup(name, platform)
            .map(|value| split_path_list(value, platform.path_list_separator()))
            .unwrap_or_default()
    }

    /// Variables that differ between `before` and `self`, in name order
    pub fn changes_from(&self, before: &Environment) -> Vec<EnvChange> {
        let mut changes = Vec::new();
        for (name, value) in &self.vars {
            let old = before.vars.get(name);
            if old != Some(value) {
                changes.push(EnvChange {
                    name: name.clone(),
                    before: old.cloned(),
                    after: Some(value.clone()),
                });
            }
        }
        for (name, value) in &before.vars {
            if !self.vars.contains_key(name) {
                changes.push(EnvChange {
                    name: name.clone(),
                    before: Some(value.clone()),
                    after: None,
                });
            }
        }
        changes.sort_by(|a, b| a.name.cmp(&b.name));
        changes
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A single variable difference between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvChange {
    pub name: String,
    pub before: Option<String>,
    /// `None` when the variable was removed
    pub after: Option<String>,
}

/// Everything activation needs besides the plan and the starting snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationContext {
    root: String,
    platform: Platform,
    policy: AppendPolicy,
}

impl ActivationContext {
    pub fn new(root: impl Into<String>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
            policy: AppendPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AppendPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn policy(&self) -> AppendPolicy {
        self.policy
    }
}

struct StepResolver<'a> {
    root: &'a str,
    env: &'a Environment,
    platform: Platform,
}

impl Resolver for StepResolver<'_> {
    fn resolve_root(&self) -> Result<&str, TemplateError> {
        Ok(self.root)
    }

    fn resolve_env(&self, name: &str) -> Result<&str, TemplateError> {
        self.env
            .lookup(name, self.platform)
            .ok_or_else(|| TemplateError::UnsetVariable(name.to_string()))
    }
}

/// Apply `plan` to `snapshot`, returning the activated environment
///
/// Actions run in order and each value template sees the variables set by
/// the actions before it. On Windows an action updates an existing variable
/// whose name differs only in case, keeping that spelling.
pub fn activate(
    snapshot: &Environment,
    plan: &ActivationPlan,
    ctx: &ActivationContext,
) -> Result<Environment, Error> {
    let mut env = snapshot.clone();

    for action in plan.actions() {
        let resolver = StepResolver {
            root: &ctx.root,
            env: &env,
            platform: ctx.platform,
        };
        let value = template::substitute(&action.value, &resolver).map_err(|source| {
            ActivationError::Template {
                variable: action.name.clone(),
                source,
            }
        })?;

        debug!(variable = %action.name, op = %action.op, %value, "activation step");

        let key = env
            .key_of(&action.name, ctx.platform)
            .unwrap_or(action.name.as_str())
            .to_string();
        match action.op {
            EnvOperation::Set => env.set(key, value),
            EnvOperation::Append => {
                let merged = append_entry(env.get(&key), &value, ctx.platform, ctx.policy);
                if let Some(merged) = merged {
                    env.set(key, merged);
                }
            }
        }
    }

    Ok(env)
}

/// New value of a PATH-like variable after appending `entry`
///
/// Returns `None` when the variable should stay unchanged. Existing text is
/// kept verbatim so prior entries and their order survive.
fn append_entry(
    current: Option<&str>,
    entry: &str,
    platform: Platform,
    policy: AppendPolicy,
) -> Option<String> {
    let separator = platform.path_list_separator();
    match current {
        None | Some("") => Some(entry.to_string()),
        Some(current) => {
            if policy == AppendPolicy::Dedup
                && split_path_list(current, separator).contains(&entry)
            {
                return None;
            }
            Some(join_path_list([current, entry], separator))
        }
    }
}
