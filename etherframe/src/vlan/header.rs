#![allow(missing_docs)]

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::Result;
use crate::ether::EtherType;
use crate::vlan::{VlanTag, PCP_MAX, VID_MAX};

/// A constant that defines the fixed byte length of a vlan header: the tag
/// control information followed by the next ethertype.
pub const VLAN_HEADER_LEN: usize = 4;

/// A zero-copy view over a vlan header at the start of `buf`.
///
/// The view starts right after the tag protocol identifier, so its own
/// `ethertype` is either the payload protocol or the identifier of the next
/// tag.
#[derive(Debug, Clone, Copy)]
pub struct VlanHeader<T> {
    buf: T,
}

impl<T: AsRef<[u8]>> VlanHeader<T> {
    /// Wrap `buf`, handing it back if it cannot hold the header.
    #[inline]
    pub fn parse(buf: T) -> core::result::Result<Self, T> {
        if buf.as_ref().len() < VLAN_HEADER_LEN {
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
    pub fn tci(&self) -> u16 {
        NetworkEndian::read_u16(&self.buf.as_ref()[0..2])
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.buf.as_ref()[0] >> 5
    }

    #[inline]
    pub fn dei_flag(&self) -> bool {
        self.buf.as_ref()[0] & 0x10 != 0
    }

    #[inline]
    pub fn vlan_id(&self) -> u16 {
        self.tci() & 0xfff
    }

    /// Decode the tag body through the tag codec.
    #[inline]
    pub fn tag(&self) -> Result<VlanTag> {
        VlanTag::decode(&self.buf.as_ref()[0..2])
    }

    #[inline]
    pub fn ethertype(&self) -> EtherType {
        EtherType::from(NetworkEndian::read_u16(&self.buf.as_ref()[2..4]))
    }
}

impl<T: AsMut<[u8]>> VlanHeader<T> {
    /// Encode `tag` into the tag control information, leaving the buffer
    /// untouched when a field is out of range.
    #[inline]
    pub fn set_tag(&mut self, tag: &VlanTag) -> Result<()> {
        let body = tag.encode()?;
        self.buf.as_mut()[0..2].copy_from_slice(&body);
        Ok(())
    }

    #[inline]
    pub fn set_priority(&mut self, value: u8) {
        assert!(value <= PCP_MAX);
        let buf = self.buf.as_mut();
        buf[0] = (buf[0] & 0x1f) | (value << 5);
    }

    #[inline]
    pub fn set_dei_flag(&mut self, value: bool) {
        let buf = self.buf.as_mut();
        buf[0] = (buf[0] & 0xef) | (u8::from(value) << 4);
    }

    #[inline]
    pub fn set_vlan_id(&mut self, value: u16) {
        assert!(value <= VID_MAX);
        let buf = self.buf.as_mut();
        let write_value = value | (u16::from(buf[0] & 0xf0) << 8);
        NetworkEndian::write_u16(&mut buf[0..2], write_value);
    }

    #[inline]
    pub fn set_ethertype(&mut self, value: EtherType) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[2..4], value.into());
    }
}
