//! Login aliases: external login names (e.g. from a directory) that stand for
//! a local user name.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tracing::info;

#[derive(Debug, Default)]
pub struct LoginAliases {
    aliases: RwLock<HashMap<String, String>>,
}

impl LoginAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_login_alias(&self, user_name: &str, alias: &str) {
        info!(alias, user_name, "adding login alias");
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alias.to_string(), user_name.to_string());
    }

    /// The user name `alias` stands for, or `alias` itself when unmapped.
    pub fn resolve_login_alias(&self, alias: &str) -> String {
        self.aliases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(alias)
            .cloned()
            .unwrap_or_else(|| alias.to_string())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for LoginAliases {
    /// Pairs are `(alias, user_name)`.
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let aliases = Self::new();
        for (alias, user_name) in iter {
            aliases.add_login_alias(user_name, alias);
        }
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_alias_resolves_to_itself() {
        let aliases = LoginAliases::new();
        assert_eq!(aliases.resolve_login_alias("jdoe"), "jdoe");
    }

    #[test]
    fn alias_resolves_to_local_user() {
        let aliases: LoginAliases = [("jdoe@CORP.EXAMPLE", "jdoe")].into_iter().collect();
        assert_eq!(aliases.resolve_login_alias("jdoe@CORP.EXAMPLE"), "jdoe");

        aliases.add_login_alias("admin", "root@CORP.EXAMPLE");
        assert_eq!(aliases.resolve_login_alias("root@CORP.EXAMPLE"), "admin");
    }
}
