//! Ethernet II addressing and the fixed 14-byte header.

use core::fmt;
use core::str::FromStr;

enum_sim! {
    /// An enum-like type for representing the Ethertype field.
    ///
    /// Besides payload protocols it names the two tag protocol identifiers
    /// that announce a vlan tag in place of the payload protocol.
    pub struct EtherType (u16) {
        /// Frame payload is Ipv4 protocol.
        IPV4 = 0x0800,
        /// Frame payload is Arp protocol.
        ARP =  0x0806,
        /// Frame payload is Ipv6 protocol.
        IPV6 = 0x86DD,
        /// An IEEE 802.1Q vlan tag follows.
        VLAN = 0x8100,
        /// An IEEE 802.1ad service tag follows, itself followed by an 802.1Q tag.
        QINQ = 0x88a8,
    }
}

impl EtherType {
    /// Whether this value is a tag protocol identifier rather than a payload
    /// protocol.
    #[inline]
    pub const fn is_tag_protocol(&self) -> bool {
        matches!(self.0, 0x8100 | 0x88a8)
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// A six-octet Ethernet II hardware address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct EtherAddr(pub [u8; 6]);

/// Length of an [`EtherAddr`] on the wire.
pub const ETHER_ADDR_LEN: usize = 6;

impl EtherAddr {
    /// The broadcast address.
    pub const BROADCAST: EtherAddr = EtherAddr([0xff; 6]);

    /// Copy an address out of `data`, which must be exactly six octets.
    pub fn from_bytes(data: &[u8]) -> Option<EtherAddr> {
        let bytes: [u8; ETHER_ADDR_LEN] = data.try_into().ok()?;
        Some(EtherAddr(bytes))
    }

    /// Return the address as a sequence of octets, in big-endian.
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !(self.is_broadcast() || self.is_multicast())
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the 'multicast' bit in the OUI is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Query whether the 'locally administered' bit in the OUI is set.
    pub const fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl From<[u8; ETHER_ADDR_LEN]> for EtherAddr {
    fn from(bytes: [u8; ETHER_ADDR_LEN]) -> Self {
        EtherAddr(bytes)
    }
}

impl fmt::Display for EtherAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Error returned when a string is not of the form `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrParseError;

impl fmt::Display for AddrParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hardware address syntax")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AddrParseError {}

impl FromStr for EtherAddr {
    type Err = AddrParseError;

    /// Parse a string with the form 'Aa:0b:Cc:11:02:33'.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = [0; ETHER_ADDR_LEN];
        let mut groups = s.split(':');
        for octet in result.iter_mut() {
            let group = groups.next().ok_or(AddrParseError)?;
            if group.len() != 2 || !group.bytes().all(|c| c.is_ascii_hexdigit()) {
                return Err(AddrParseError);
            }
            *octet = u8::from_str_radix(group, 16).map_err(|_| AddrParseError)?;
        }
        if groups.next().is_some() {
            return Err(AddrParseError);
        }
        Ok(Self(result))
    }
}

mod header;
pub use header::{EtherHeader, ETHER_HEADER_LEN};
