//! IEEE 802.1Q vlan tags.
//!
//! A vlan tag body is a single big-endian 16-bit word, the tag control
//! information (TCI):
//!
//! ```text
//!  15  13  12  11                    0
//! +-------+---+-----------------------+
//! |  PCP  |DEI|          VID          |
//! +-------+---+-----------------------+
//! ```
//!
//! - **PCP (Priority Code Point)**: 3-bit 802.1p priority (0-7)
//! - **DEI (Drop Eligible Indicator)**: frame may be dropped under congestion
//! - **VID (VLAN Identifier)**: 12-bit vlan id (0-4095)
//!
//! On the wire the tag body is preceded by a tag protocol identifier, 0x8100
//! for 802.1Q and 0x88a8 for the outer service tag of an 802.1ad frame.
//!
//! # Example
//!
//! ```rust
//! use etherframe::vlan::VlanTag;
//!
//! let tag = VlanTag::decode(&[0x70, 0x0c]).unwrap();
//! assert_eq!(tag.priority, 3);
//! assert!(tag.drop_eligible);
//! assert_eq!(tag.vlan_id, 12);
//! assert_eq!(tag.encode().unwrap(), [0x70, 0x0c]);
//! ```

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{FrameError, Result};

/// The largest valid vlan identifier.
pub const VID_MAX: u16 = 0xfff;

/// The largest valid priority code point.
pub const PCP_MAX: u8 = 0x7;

/// Byte length of a vlan tag body.
pub const VLAN_TAG_LEN: usize = 2;

/// A decoded 802.1Q tag body.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct VlanTag {
    /// Priority code point, 3 bits.
    pub priority: u8,
    /// Drop eligible indicator, formerly the canonical format indicator.
    pub drop_eligible: bool,
    /// Vlan identifier, 12 bits.
    pub vlan_id: u16,
}

impl VlanTag {
    /// Build a tag from its three fields. Range checks happen on encode.
    pub const fn new(priority: u8, drop_eligible: bool, vlan_id: u16) -> Self {
        Self {
            priority,
            drop_eligible,
            vlan_id,
        }
    }

    /// Decode a tag body, which must be exactly [`VLAN_TAG_LEN`] bytes.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != VLAN_TAG_LEN {
            return Err(FrameError::malformed_tag(buf.len()));
        }

        let tci = NetworkEndian::read_u16(buf);
        let tag = Self {
            priority: (tci >> 13) as u8,
            drop_eligible: tci & 0x1000 != 0,
            vlan_id: tci & 0x0fff,
        };

        // Unreachable with a 12-bit mask, kept in case the id field widens.
        if tag.vlan_id > VID_MAX {
            return Err(FrameError::invalid_vlan_id(tag.vlan_id));
        }
        Ok(tag)
    }

    /// Encode the tag body as a big-endian word.
    pub fn encode(&self) -> Result<[u8; VLAN_TAG_LEN]> {
        self.validate()?;
        let mut out = [0; VLAN_TAG_LEN];
        NetworkEndian::write_u16(&mut out, self.tci());
        Ok(out)
    }

    /// Pack the fields into the tag control information word.
    ///
    /// Out-of-range fields bleed into their neighbours; use [`encode`] for
    /// a checked conversion.
    ///
    /// [`encode`]: VlanTag::encode
    #[inline]
    pub fn tci(&self) -> u16 {
        (u16::from(self.priority) << 13) | (u16::from(self.drop_eligible) << 12) | self.vlan_id
    }

    /// Check the field ranges without encoding.
    pub fn validate(&self) -> Result<()> {
        if self.vlan_id > VID_MAX {
            return Err(FrameError::invalid_vlan_id(self.vlan_id));
        }
        if self.priority > PCP_MAX {
            return Err(FrameError::invalid_priority(self.priority));
        }
        Ok(())
    }
}

mod header;
pub use header::{VlanHeader, VLAN_HEADER_LEN};
