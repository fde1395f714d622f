use std::sync::Arc;

use crate::error::HostListError;

/// Hosts the service answers on, in the order they are tried by default.
pub const DEFAULT_HOSTS: [&str; 2] = ["www.pgyer.com", "p.frontjs.com"];

/// Ordered, non-empty list of candidate hosts. The first entry is tried first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostList {
    hosts: Arc<[String]>,
}

impl HostList {
    /// # Errors
    /// Returns [`HostListError::Empty`] when `hosts` yields nothing.
    pub fn new<I, S>(hosts: I) -> Result<Self, HostListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts: Arc<[String]> = hosts.into_iter().map(Into::into).collect();
        if hosts.is_empty() {
            return Err(HostListError::Empty);
        }
        Ok(Self { hosts })
    }

    /// A single-host list; failures are never retried elsewhere.
    pub fn single(host: impl Into<String>) -> Self {
        Self {
            hosts: Arc::from([host.into()]),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for HostList {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_HOSTS.iter().map(|host| (*host).to_string()).collect(),
        }
    }
}
