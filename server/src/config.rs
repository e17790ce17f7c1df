use anyhow::{Result, anyhow};
use platform_db::DatabaseSettings;

use crate::session::LoginAliases;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    /// `(alias, user_name)` pairs preloaded into [`LoginAliases`].
    pub login_aliases: Vec<(String, String)>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let login_aliases = parse_login_aliases(&std::env::var("LOGIN_ALIASES").unwrap_or_default())?;
        Ok(Self {
            database: DatabaseSettings::from_env(),
            login_aliases,
        })
    }

    pub fn aliases(&self) -> LoginAliases {
        self.login_aliases
            .iter()
            .map(|(alias, user)| (alias.as_str(), user.as_str()))
            .collect()
    }
}

/// Parses `alias=user` entries separated by commas.
fn parse_login_aliases(raw: &str) -> Result<Vec<(String, String)>> {
    let mut aliases = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (alias, user) = entry
            .split_once('=')
            .map(|(alias, user)| (alias.trim(), user.trim()))
            .filter(|(alias, user)| !alias.is_empty() && !user.is_empty())
            .ok_or_else(|| anyhow!("invalid LOGIN_ALIASES entry '{entry}', expected alias=user"))?;
        aliases.push((alias.to_string(), user.to_string()));
    }
    Ok(aliases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alias_pairs() {
        let parsed = parse_login_aliases(" jdoe@CORP=jdoe, ,root@CORP = admin").unwrap();
        assert_eq!(
            parsed,
            vec![
                ("jdoe@CORP".to_string(), "jdoe".to_string()),
                ("root@CORP".to_string(), "admin".to_string()),
            ]
        );
        assert!(parse_login_aliases("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_entries() {
        let err = parse_login_aliases("jdoe").unwrap_err();
        assert!(err.to_string().contains("expected alias=user"));
        assert!(parse_login_aliases("=jdoe").is_err());
    }
}
