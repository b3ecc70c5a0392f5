#![allow(missing_docs)]

use byteorder::{ByteOrder, NetworkEndian};

use crate::ether::{EtherAddr, EtherType};

/// A constant that defines the fixed byte length of the Ethernet II header.
pub const ETHER_HEADER_LEN: usize = 14;

/// A zero-copy view over the fixed Ethernet II header at the start of `buf`.
///
/// The `ethertype` field holds either the payload protocol or a tag protocol
/// identifier announcing a vlan tag.
#[derive(Debug, Clone, Copy)]
pub struct EtherHeader<T> {
    buf: T,
}

impl<T: AsRef<[u8]>> EtherHeader<T> {
    /// Wrap `buf`, handing it back if it cannot hold the header.
    #[inline]
    pub fn parse(buf: T) -> Result<Self, T> {
        if buf.as_ref().len() < ETHER_HEADER_LEN {
            return Err(buf);
        }
        Ok(Self { buf })
    }

    #[inline]
    pub fn buf(&self) -> &T {
        &self.buf
    }

    #[inline]
    pub fn release(self) -> T {
        self.buf
    }

    #[inline]
    pub fn header_slice(&self) -> &[u8] {
        &self.buf.as_ref()[0..ETHER_HEADER_LEN]
    }

    #[inline]
    pub fn dst_addr(&self) -> EtherAddr {
        EtherAddr(read_addr(&self.buf.as_ref()[0..6]))
    }

    #[inline]
    pub fn src_addr(&self) -> EtherAddr {
        EtherAddr(read_addr(&self.buf.as_ref()[6..12]))
    }

    #[inline]
    pub fn ethertype(&self) -> EtherType {
        EtherType::from(NetworkEndian::read_u16(&self.buf.as_ref()[12..14]))
    }
}

impl<T: AsMut<[u8]>> EtherHeader<T> {
    #[inline]
    pub fn set_dst_addr(&mut self, value: EtherAddr) {
        self.buf.as_mut()[0..6].copy_from_slice(value.as_bytes());
    }

    #[inline]
    pub fn set_src_addr(&mut self, value: EtherAddr) {
        self.buf.as_mut()[6..12].copy_from_slice(value.as_bytes());
    }

    #[inline]
    pub fn set_ethertype(&mut self, value: EtherType) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[12..14], value.into());
    }
}

#[inline]
fn read_addr(bytes: &[u8]) -> [u8; 6] {
    let mut addr = [0; 6];
    addr.copy_from_slice(bytes);
    addr
}
