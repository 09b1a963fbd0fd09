use sqlx::types::ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;

use crate::error::CoreError;

/// A syntactically valid network prefix such as `10.0.0.0/24`.
///
/// Host bits beyond the prefix length must be zero, the same rule the
/// Postgres `cidr` type enforces, so a value of this type can always be
/// compared against a `cidr` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkPrefix(IpNetwork);

impl NetworkPrefix {
    /// Validates the two path segments of a prefix lookup.
    pub fn parse(address: &str, prefix_length: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPrefix {
            address: address.to_string(),
            prefix_length: prefix_length.to_string(),
            reason: reason.to_string(),
        };

        let ip: IpAddr = address
            .parse()
            .map_err(|_| invalid("address is not an IPv4 or IPv6 address"))?;
        let len: u8 = prefix_length
            .parse()
            .map_err(|_| invalid("prefix length is not a number"))?;

        let network = IpNetwork::new(ip, len).map_err(|_| {
            let max_len = if ip.is_ipv4() { 32 } else { 128 };
            invalid(&format!("prefix length must be at most {}", max_len))
        })?;
        if network.network() != network.ip() {
            return Err(invalid("address has bits set to the right of the prefix length"));
        }

        Ok(Self(network))
    }

    /// The prefix as bound into queries against `cidr` columns.
    pub fn network(&self) -> IpNetwork {
        self.0
    }

    pub fn address(&self) -> IpAddr {
        self.0.ip()
    }

    pub fn prefix_length(&self) -> u8 {
        self.0.prefix()
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.prefix_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ipv4_and_ipv6_networks() {
        let v4 = NetworkPrefix::parse("10.0.0.0", "24").unwrap();
        assert_eq!(v4.to_string(), "10.0.0.0/24");
        assert_eq!(v4.network(), "10.0.0.0/24".parse::<IpNetwork>().unwrap());
        let v6 = NetworkPrefix::parse("2001:db8::", "32").unwrap();
        assert_eq!(v6.to_string(), "2001:db8::/32");
        assert_eq!(NetworkPrefix::parse("0.0.0.0", "0").unwrap().prefix_length(), 0);
        assert_eq!(NetworkPrefix::parse("192.0.2.1", "32").unwrap().prefix_length(), 32);
    }

    #[test]
    fn rejects_garbage_address() {
        let err = NetworkPrefix::parse("not-an-ip", "24").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrefix { .. }));
        assert!(err.accepted_values().is_none());
    }

    #[test]
    fn rejects_out_of_range_length() {
        let err = NetworkPrefix::parse("10.0.0.0", "99").unwrap_err();
        assert!(err.to_string().contains("at most 32"));
        let err = NetworkPrefix::parse("2001:db8::", "129").unwrap_err();
        assert!(err.to_string().contains("at most 128"));
        assert!(NetworkPrefix::parse("10.0.0.0", "-1").is_err());
        assert!(NetworkPrefix::parse("10.0.0.0", "abc").is_err());
    }

    #[test]
    fn rejects_host_bits() {
        let err = NetworkPrefix::parse("10.0.0.1", "24").unwrap_err();
        assert!(err.to_string().contains("10.0.0.1/24"));
        assert!(NetworkPrefix::parse("2001:db8::1", "64").is_err());
        assert!(NetworkPrefix::parse("2001:db8::", "64").is_ok());
    }
}
