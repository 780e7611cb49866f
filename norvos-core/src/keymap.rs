//! Domain name to store key mapping
//!
//! A record for `www.example.com` lives at `<root>com/example/www`: labels are
//! reversed and joined with `/` so that every subtree of the DNS namespace is a
//! subtree of the key space.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Key root read by the CoreDNS `etcd` plugin's default configuration.
pub const COREDNS_ROOT: &str = "/coredns/";
/// Key root used by SkyDNS.
pub const SKYDNS_ROOT: &str = "/skydns/";

/// Which key root records are stored under.
///
/// ```json
/// "coredns"                 // "/coredns/"
/// "skydns"                  // "/skydns/"
/// { "custom": "/dns/prod/" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRoot {
    #[default]
    CoreDns,
    SkyDns,
    Custom(String),
}

impl KeyRoot {
    /// Root path, always starting and ending with `/`.
    pub fn path(&self) -> String {
        match self {
            Self::CoreDns => COREDNS_ROOT.to_string(),
            Self::SkyDns => SKYDNS_ROOT.to_string(),
            Self::Custom(raw) => {
                let trimmed = raw.trim().trim_matches('/');
                if trimmed.is_empty() {
                    "/".to_string()
                } else {
                    format!("/{trimmed}/")
                }
            }
        }
    }
}

/// Maps domain names onto keys below a fixed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapper {
    root: String,
}

impl KeyMapper {
    pub fn new(root: &KeyRoot) -> Self {
        Self { root: root.path() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Map a domain name to its record key.
    ///
    /// Surrounding whitespace is ignored. Labels are kept verbatim, so an empty
    /// interior label (`a..b`) becomes an empty path segment and case is not
    /// folded.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] when the name is empty.
    pub fn map_to_key(&self, name: &str) -> CoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("domain name is empty".to_string()));
        }

        let mut key = String::with_capacity(self.root.len() + name.len());
        key.push_str(&self.root);
        for (i, label) in name.rsplit('.').enumerate() {
            if i > 0 {
                key.push('/');
            }
            key.push_str(label);
        }
        Ok(key)
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new(&KeyRoot::default())
    }
}

/// Reverse-lookup domain name for an address, suitable for [`KeyMapper::map_to_key`].
///
/// IPv4 uses `in-addr.arpa` octets, IPv6 uses `ip6.arpa` nibbles.
pub fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa")
        }
        IpAddr::V6(v6) => {
            let mut name = String::with_capacity(72);
            for byte in v6.octets().iter().rev() {
                name.push_str(&format!("{:x}.{:x}.", byte & 0x0f, byte >> 4));
            }
            name.push_str("ip6.arpa");
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> KeyMapper {
        KeyMapper::default()
    }

    #[test]
    fn test_map_www_example_com() {
        assert_eq!(
            mapper().map_to_key("www.example.com").unwrap(),
            "/coredns/com/example/www"
        );
    }

    #[test]
    fn test_map_single_label() {
        assert_eq!(mapper().map_to_key("localhost").unwrap(), "/coredns/localhost");
    }

    #[test]
    fn test_map_trims_whitespace() {
        assert_eq!(
            mapper().map_to_key("  api.example.org\n").unwrap(),
            "/coredns/org/example/api"
        );
    }

    #[test]
    fn test_map_keeps_empty_labels() {
        assert_eq!(mapper().map_to_key("a..b").unwrap(), "/coredns/b//a");
    }

    #[test]
    fn test_map_trailing_dot_yields_leading_empty_segment() {
        assert_eq!(
            mapper().map_to_key("example.com.").unwrap(),
            "/coredns//com/example"
        );
    }

    #[test]
    fn test_map_preserves_case() {
        assert_eq!(
            mapper().map_to_key("WWW.Example.COM").unwrap(),
            "/coredns/COM/Example/WWW"
        );
    }

    #[test]
    fn test_map_rejects_empty_name() {
        for name in ["", "   ", "\t\n"] {
            let err = mapper().map_to_key(name).unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)), "{name:?}: {err:?}");
        }
    }

    #[test]
    fn test_key_roots() {
        assert_eq!(KeyRoot::CoreDns.path(), "/coredns/");
        assert_eq!(KeyRoot::SkyDns.path(), "/skydns/");
        assert_eq!(KeyRoot::Custom("dns/prod".into()).path(), "/dns/prod/");
        assert_eq!(KeyRoot::Custom("/dns/".into()).path(), "/dns/");
        assert_eq!(KeyRoot::Custom(String::new()).path(), "/");
    }

    #[test]
    fn test_skydns_root_mapping() {
        let mapper = KeyMapper::new(&KeyRoot::SkyDns);
        assert_eq!(
            mapper.map_to_key("www.example.com").unwrap(),
            "/skydns/com/example/www"
        );
    }

    #[test]
    fn test_key_root_serde() {
        let root: KeyRoot = serde_json::from_str(r#""skydns""#).unwrap();
        assert_eq!(root, KeyRoot::SkyDns);
        let root: KeyRoot = serde_json::from_str(r#"{"custom":"/dns/"}"#).unwrap();
        assert_eq!(root, KeyRoot::Custom("/dns/".into()));
        assert_eq!(serde_json::to_string(&KeyRoot::CoreDns).unwrap(), r#""coredns""#);
    }

    #[test]
    fn test_reverse_name_v4() {
        let ip: IpAddr = "192.0.2.10".parse().unwrap();
        assert_eq!(reverse_name(ip), "10.2.0.192.in-addr.arpa");
        assert_eq!(
            mapper().map_to_key(&reverse_name(ip)).unwrap(),
            "/coredns/arpa/in-addr/192/0/2/10"
        );
    }

    #[test]
    fn test_reverse_name_v6() {
        let ip: IpAddr = "2001:db8::567:89ab".parse().unwrap();
        assert_eq!(
            reverse_name(ip),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa"
        );
    }
}
