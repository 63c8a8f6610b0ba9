//! Static credential table
//!
//! Seeded once at startup and read-only afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{MuralError, MuralResult};

/// User name to password table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialTable {
    users: HashMap<String, String>,
}

impl CredentialTable {
    pub fn new<I, U, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        CredentialTable {
            users: entries
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    /// Check a user/password pair, returning the identity on success
    pub fn verify<'a>(&self, user: &'a str, pass: &str) -> MuralResult<&'a str> {
        match self.users.get(user) {
            Some(expected) if expected == pass => Ok(user),
            _ => Err(MuralError::InvalidCredentials),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for CredentialTable {
    fn default() -> Self {
        CredentialTable::new([("ana", "senha321"), ("carlos", "senha654")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_users() {
        let table = CredentialTable::default();
        assert_eq!(table.verify("ana", "senha321").unwrap(), "ana");
        assert_eq!(table.verify("carlos", "senha654").unwrap(), "carlos");
    }

    #[test]
    fn test_mismatch() {
        let table = CredentialTable::default();
        assert!(matches!(
            table.verify("ana", "senha654"),
            Err(MuralError::InvalidCredentials)
        ));
        assert!(table.verify("mallory", "").is_err());
        assert!(table.verify("", "").is_err());
    }
}
