//! Host-specific overlay directories.
//!
//! The `[hosts]` config table maps host names to top-level directories.
//! Files under the directory for the current host are installed with
//! the directory prefix stripped; directories for other hosts are
//! ignored entirely. The internal `doot/` directory is always ignored.

use std::collections::BTreeMap;

use crate::consts::INTERNAL_DIR;
use crate::paths::RelativePath;

#[derive(Debug, Clone)]
pub struct HostnameFilter {
    /// Overlay prefix for the current host, including the trailing `/`.
    host_prefix: Option<String>,
    /// Prefixes (trailing `/` included) that never install.
    ignore_prefixes: Vec<String>,
}

impl HostnameFilter {
    #[must_use]
    pub fn new(hosts: &BTreeMap<String, String>, hostname: &str) -> Self {
        let mut host_prefix = None;
        let mut ignore_prefixes = vec![format!("{INTERNAL_DIR}/")];
        for (host, dir) in hosts {
            let prefix = format!("{dir}/");
            if host == hostname {
                host_prefix = Some(prefix);
            } else {
                ignore_prefixes.push(prefix);
            }
        }
        Self {
            host_prefix,
            ignore_prefixes,
        }
    }

    /// Build the filter for the machine we are running on.
    #[must_use]
    pub fn from_system(hosts: &BTreeMap<String, String>) -> Self {
        let hostname = gethostname::gethostname().to_string_lossy().into_owned();
        Self::new(hosts, &hostname)
    }

    /// True if the file belongs to another host (or the internal
    /// directory) and must not be installed.
    #[must_use]
    pub fn is_ignored(&self, path: &RelativePath) -> bool {
        self.ignore_prefixes.iter().any(|p| path.has_prefix(p))
    }

    /// When `path` lies in the current host's overlay, the byte length
    /// of the prefix to strip.
    #[must_use]
    pub fn host_specific_prefix_len(&self, path: &RelativePath) -> Option<usize> {
        self.host_prefix
            .as_ref()
            .filter(|p| path.has_prefix(p))
            .map(String::len)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hosts(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(h, d)| ((*h).to_string(), (*d).to_string()))
            .collect()
    }

    #[test]
    fn internal_directory_is_always_ignored() {
        let filter = HostnameFilter::new(&BTreeMap::new(), "anyhost");
        assert!(filter.is_ignored(&"doot/config.toml".into()));
        assert!(!filter.is_ignored(&"bashrc".into()));
    }

    #[test]
    fn other_hosts_directories_are_ignored() {
        let filter = HostnameFilter::new(
            &hosts(&[("laptop", "laptop-dots"), ("server", "server-dots")]),
            "laptop",
        );
        assert!(filter.is_ignored(&"server-dots/bashrc".into()));
        assert!(!filter.is_ignored(&"laptop-dots/bashrc".into()));
        assert!(!filter.is_ignored(&"bashrc".into()));
    }

    #[test]
    fn current_host_prefix_is_strippable() {
        let filter = HostnameFilter::new(&hosts(&[("laptop", "laptop-dots")]), "laptop");
        let path: RelativePath = "laptop-dots/config/rc".into();
        let len = filter.host_specific_prefix_len(&path).unwrap();
        assert_eq!(path.strip_prefix_len(len), "config/rc".into());
        assert_eq!(filter.host_specific_prefix_len(&"config/rc".into()), None);
    }

    #[test]
    fn unknown_host_has_no_overlay() {
        let filter = HostnameFilter::new(&hosts(&[("laptop", "laptop-dots")]), "desktop");
        assert!(filter.is_ignored(&"laptop-dots/bashrc".into()));
        assert_eq!(
            filter.host_specific_prefix_len(&"laptop-dots/bashrc".into()),
            None
        );
    }

    #[test]
    fn prefix_match_requires_the_separator() {
        let filter = HostnameFilter::new(&hosts(&[("h", "host")]), "other");
        assert!(filter.is_ignored(&"host/file".into()));
        assert!(!filter.is_ignored(&"hostfile".into()));
    }
}
