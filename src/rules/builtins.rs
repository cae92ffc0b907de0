//! Functions that rule values may call.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeSet;
use std::env;

const MODULES: [&str; 2] = ["time", "os"];

/// Evaluation environment of one rules file.
///
/// Unqualified built-ins are always available. Module functions become
/// available once an import directive names their module.
#[derive(Debug, Clone)]
pub struct Environment {
    now: DateTime<FixedOffset>,
    imported: BTreeSet<String>,
}

impl Environment {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now, imported: BTreeSet::new() }
    }

    pub fn import(&mut self, module: &str) -> Result<(), String> {
        if !MODULES.contains(&module) {
            return Err(format!("module '{module}' is not available to rules"));
        }
        self.imported.insert(module.to_string());
        Ok(())
    }

    pub fn is_imported(&self, module: &str) -> bool {
        self.imported.contains(module)
    }

    /// Calls `name` with already evaluated `args`.
    pub fn call(&self, name: &str, args: &[String]) -> Result<String, String> {
        if let Some((module, _)) = name.split_once('.') {
            if !self.is_imported(module) {
                return Err(format!("'{name}' requires '# import {module}'"));
            }
        }

        match (name, args) {
            ("currentYear" | "time.year", []) => Ok(self.now.format("%Y").to_string()),
            ("currentDate", []) => Ok(self.now.format("%Y-%m-%d").to_string()),
            ("currentTime", []) => Ok(self.now.format("%H:%M:%S").to_string()),
            ("today" | "time.strftime", [format]) => self.strftime(format),
            ("os.getenv", [variable]) => env::var(variable)
                .map_err(|_| format!("environment variable '{variable}' is not set")),
            ("os.getenv", [variable, default]) => {
                Ok(env::var(variable).unwrap_or_else(|_| default.clone()))
            }
            ("os.environ", [variable]) => {
                env::var(variable).map_err(|_| format!("KeyError: '{variable}'"))
            }
            (
                "currentYear" | "currentDate" | "currentTime" | "today" | "time.year"
                | "time.strftime" | "os.getenv" | "os.environ",
                _,
            ) => Err(format!("wrong number of arguments for '{name}()': {}", args.len())),
            _ => Err(format!("unknown function '{name}'")),
        }
    }

    fn strftime(&self, format: &str) -> Result<String, String> {
        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid time format '{format}'"));
        }
        Ok(self.now.format_with_items(items.into_iter()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn environment() -> Environment {
        let now = FixedOffset::east_opt(0)
            .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single())
            .unwrap();
        Environment::new(now)
    }

    #[test]
    fn test_unqualified_builtins() {
        let env = environment();
        assert_eq!(env.call("currentYear", &[]).unwrap(), "2024");
        assert_eq!(env.call("currentDate", &[]).unwrap(), "2024-03-09");
        assert_eq!(env.call("currentTime", &[]).unwrap(), "14:05:07");
        assert_eq!(env.call("today", &["%d.%m.%Y".to_string()]).unwrap(), "09.03.2024");
    }

    #[test]
    fn test_module_functions_require_import() {
        let mut env = environment();
        assert!(env.call("time.year", &[]).is_err());
        env.import("time").unwrap();
        assert_eq!(env.call("time.year", &[]).unwrap(), "2024");
    }

    #[test]
    fn test_unknown_module() {
        assert!(environment().import("subprocess").is_err());
    }

    #[test]
    fn test_invalid_format_is_an_error() {
        assert!(environment().call("today", &["%Q".to_string()]).is_err());
    }

    #[test]
    fn test_wrong_arity() {
        let err = environment().call("currentYear", &["x".to_string()]).unwrap_err();
        assert!(err.contains("wrong number of arguments"));
    }
}
