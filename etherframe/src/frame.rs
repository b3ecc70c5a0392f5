//! Owned Ethernet II frames with zero, one or two vlan tags.
//!
//! Wire layout, big-endian throughout:
//!
//! ```text
//! untagged:  | dst(6) | src(6) | ethertype(2)                                             | payload |
//! 802.1Q:    | dst(6) | src(6) | 0x8100 | tci(2) | ethertype(2)                          | payload |
//! 802.1ad:   | dst(6) | src(6) | 0x88a8 | s-tci(2) | 0x8100 | c-tci(2) | ethertype(2)   | payload |
//! ```
//!
//! No frame check sequence is stripped or appended: trailing bytes the link
//! delivers stay part of the payload.

use alloc::vec::Vec;

use bytes::{BufMut, Bytes};
use log::{debug, trace};

use crate::error::{FrameError, Result, Stage};
use crate::ether::{EtherAddr, EtherHeader, EtherType, ETHER_HEADER_LEN};
use crate::vlan::{VlanHeader, VlanTag, VLAN_HEADER_LEN, VLAN_TAG_LEN};

/// Header length of a single tagged 802.1Q frame.
pub const DOT1Q_HEADER_LEN: usize = ETHER_HEADER_LEN + VLAN_HEADER_LEN;

/// Header length of a double tagged 802.1ad frame.
pub const QINQ_HEADER_LEN: usize = ETHER_HEADER_LEN + 2 * VLAN_HEADER_LEN;

/// The vlan tags carried by a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tagging {
    /// Plain Ethernet II frame.
    #[default]
    Untagged,
    /// 802.1Q frame with a single tag.
    Single(VlanTag),
    /// 802.1ad (QinQ) frame with an outer service tag and an inner customer
    /// tag.
    Double {
        /// The outer tag, announced by 0x88a8.
        service: VlanTag,
        /// The inner tag, announced by 0x8100.
        customer: VlanTag,
    },
}

impl Tagging {
    /// Build the tagging from the pair of optional tags a frame may carry.
    ///
    /// A service tag is only valid on top of a customer tag.
    pub fn from_tags(customer: Option<VlanTag>, service: Option<VlanTag>) -> Result<Self> {
        match (customer, service) {
            (None, None) => Ok(Tagging::Untagged),
            (Some(customer), None) => Ok(Tagging::Single(customer)),
            (Some(customer), Some(service)) => Ok(Tagging::Double { service, customer }),
            (None, Some(_)) => Err(FrameError::inconsistent_tagging()),
        }
    }

    /// The innermost tag: the only tag of an 802.1Q frame or the customer
    /// tag of a QinQ frame.
    pub fn customer(&self) -> Option<&VlanTag> {
        match self {
            Tagging::Untagged => None,
            Tagging::Single(customer) | Tagging::Double { customer, .. } => Some(customer),
        }
    }

    /// The outer service tag, present only on QinQ frames.
    pub fn service(&self) -> Option<&VlanTag> {
        match self {
            Tagging::Double { service, .. } => Some(service),
            _ => None,
        }
    }

    /// Bytes the tags add to the Ethernet II header.
    pub fn header_len(&self) -> usize {
        match self {
            Tagging::Untagged => 0,
            Tagging::Single(_) => VLAN_HEADER_LEN,
            Tagging::Double { .. } => 2 * VLAN_HEADER_LEN,
        }
    }

    // Encoded tag bodies, service first. Nothing is written until both pass.
    fn encode(&self) -> Result<(Option<[u8; VLAN_TAG_LEN]>, Option<[u8; VLAN_TAG_LEN]>)> {
        match self {
            Tagging::Untagged => Ok((None, None)),
            Tagging::Single(customer) => {
                let customer = customer.encode().map_err(|e| e.at(Stage::CustomerTag))?;
                Ok((None, Some(customer)))
            }
            Tagging::Double { service, customer } => {
                let service = service.encode().map_err(|e| e.at(Stage::ServiceTag))?;
                let customer = customer.encode().map_err(|e| e.at(Stage::CustomerTag))?;
                Ok((Some(service), Some(customer)))
            }
        }
    }
}

/// An Ethernet II frame that owns all of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Destination hardware address.
    pub dst_addr: EtherAddr,
    /// Source hardware address.
    pub src_addr: EtherAddr,
    /// The vlan tags, if any.
    pub tagging: Tagging,
    /// Protocol of the payload, never a tag protocol identifier of a decoded
    /// tag.
    pub ethertype: EtherType,
    /// Everything after the headers.
    pub payload: Bytes,
}

impl Frame {
    /// Create an untagged frame.
    pub fn new(
        dst_addr: EtherAddr,
        src_addr: EtherAddr,
        ethertype: EtherType,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            dst_addr,
            src_addr,
            tagging: Tagging::Untagged,
            ethertype,
            payload: payload.into(),
        }
    }

    /// Replace the tagging of the frame.
    pub fn with_tagging(mut self, tagging: Tagging) -> Self {
        self.tagging = tagging;
        self
    }

    /// Replace the tagging with an optional customer and service tag, see
    /// [`Tagging::from_tags`].
    pub fn with_tags(self, vlan_tag: Option<VlanTag>, service_tag: Option<VlanTag>) -> Result<Self> {
        Ok(self.with_tagging(Tagging::from_tags(vlan_tag, service_tag)?))
    }

    /// The 802.1Q tag, or the customer tag of a QinQ frame.
    pub fn vlan_tag(&self) -> Option<&VlanTag> {
        self.tagging.customer()
    }

    /// The service tag of a QinQ frame.
    pub fn service_tag(&self) -> Option<&VlanTag> {
        self.tagging.service()
    }

    /// Length of all headers, tags included.
    pub fn header_len(&self) -> usize {
        ETHER_HEADER_LEN + self.tagging.header_len()
    }

    /// Length of the encoded frame.
    pub fn buffer_len(&self) -> usize {
        self.header_len() + self.payload.len()
    }

    /// Decode a frame, copying every field out of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let ether = EtherHeader::parse(buf).map_err(|buf| {
            debug!("frame of {} bytes is too short", buf.len());
            FrameError::too_short(ETHER_HEADER_LEN, buf.len())
        })?;

        let (tagging, ethertype, payload_start) = match ether.ethertype() {
            EtherType::VLAN => {
                let vlan = vlan_header(buf, DOT1Q_HEADER_LEN)?;
                let customer = vlan.tag().map_err(|e| e.at(Stage::CustomerTag))?;
                trace!("802.1Q frame, vlan {}", customer.vlan_id);
                (Tagging::Single(customer), vlan.ethertype(), DOT1Q_HEADER_LEN)
            }
            EtherType::QINQ => {
                let outer = vlan_header(buf, QINQ_HEADER_LEN)?;
                let inner = VlanHeader::parse(&buf[DOT1Q_HEADER_LEN..])
                    .map_err(|_| FrameError::too_short(QINQ_HEADER_LEN, buf.len()))?;
                let service = outer.tag().map_err(|e| e.at(Stage::ServiceTag))?;
                let customer = inner.tag().map_err(|e| e.at(Stage::CustomerTag))?;
                if outer.ethertype() != EtherType::VLAN {
                    debug!(
                        "QinQ frame with inner tag protocol {}, expected {}",
                        outer.ethertype(),
                        EtherType::VLAN
                    );
                }
                trace!(
                    "802.1ad frame, service vlan {}, customer vlan {}",
                    service.vlan_id,
                    customer.vlan_id
                );
                (
                    Tagging::Double { service, customer },
                    inner.ethertype(),
                    QINQ_HEADER_LEN,
                )
            }
            ethertype => (Tagging::Untagged, ethertype, ETHER_HEADER_LEN),
        };

        Ok(Self {
            dst_addr: ether.dst_addr(),
            src_addr: ether.src_addr(),
            tagging,
            ethertype,
            payload: Bytes::copy_from_slice(&buf[payload_start..]),
        })
    }

    /// Encode the frame into a freshly allocated buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.buffer_len());
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Append the encoded frame to `buf`.
    ///
    /// The tags are validated and the capacity of `buf` is checked before the
    /// first byte is written.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let (service, customer) = self.tagging.encode()?;

        let len = self.buffer_len();
        if buf.remaining_mut() < len {
            return Err(FrameError::too_short(len, buf.remaining_mut()));
        }

        buf.put_slice(self.dst_addr.as_bytes());
        buf.put_slice(self.src_addr.as_bytes());
        if let Some(service) = service {
            buf.put_u16(EtherType::QINQ.raw());
            buf.put_slice(&service);
        }
        if let Some(customer) = customer {
            buf.put_u16(EtherType::VLAN.raw());
            buf.put_slice(&customer);
        }
        buf.put_u16(self.ethertype.raw());
        buf.put_slice(&self.payload);
        Ok(())
    }
}

// The vlan header right after the Ethernet II header, once `buf` is known to
// hold `required` bytes.
fn vlan_header(buf: &[u8], required: usize) -> Result<VlanHeader<&[u8]>> {
    if buf.len() < required {
        debug!(
            "tagged frame of {} bytes is too short, {} required",
            buf.len(),
            required
        );
        return Err(FrameError::too_short(required, buf.len()));
    }
    VlanHeader::parse(&buf[ETHER_HEADER_LEN..])
        .map_err(|_| FrameError::too_short(required, buf.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use alloc::vec;

    const DST: EtherAddr = EtherAddr([0x01; 6]);
    const SRC: EtherAddr = EtherAddr([0x02; 6]);
    const TAG: VlanTag = VlanTag::new(3, true, 12);

    static UNTAGGED: [u8; 17] = [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x08, 0x00, 0x50,
        0x50, 0x50,
    ];

    static DOT1Q: [u8; 21] = [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x81, 0x00, 0x70,
        0x0c, 0x08, 0x00, 0x50, 0x50, 0x50,
    ];

    static QINQ: [u8; 25] = [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x88, 0xa8, 0x70,
        0x0c, 0x81, 0x00, 0x70, 0x0c, 0x08, 0x00, 0x50, 0x50, 0x50,
    ];

    fn frame(tagging: Tagging) -> Frame {
        Frame::new(DST, SRC, EtherType::IPV4, vec![0x50, 0x50, 0x50]).with_tagging(tagging)
    }

    #[test]
    fn decode_untagged() {
        let f = Frame::decode(&UNTAGGED).unwrap();
        assert_eq!(f.dst_addr, DST);
        assert_eq!(f.src_addr, SRC);
        assert_eq!(f.tagging, Tagging::Untagged);
        assert_eq!(f.vlan_tag(), None);
        assert_eq!(f.service_tag(), None);
        assert_eq!(f.ethertype, EtherType::IPV4);
        assert_eq!(&f.payload[..], &[0x50, 0x50, 0x50]);
    }

    #[test]
    fn decode_single_tagged() {
        let f = Frame::decode(&DOT1Q).unwrap();
        assert_eq!(f, frame(Tagging::Single(TAG)));
        assert_eq!(f.vlan_tag(), Some(&TAG));
        assert_eq!(f.service_tag(), None);
    }

    #[test]
    fn decode_double_tagged() {
        let f = Frame::decode(&QINQ).unwrap();
        assert_eq!(
            f,
            frame(Tagging::Double {
                service: TAG,
                customer: TAG
            })
        );
        assert_eq!(f.vlan_tag(), Some(&TAG));
        assert_eq!(f.service_tag(), Some(&TAG));
    }

    #[test]
    fn decode_empty_payload() {
        for input in [&UNTAGGED[..14], &DOT1Q[..18], &QINQ[..22]] {
            let f = Frame::decode(input).unwrap();
            assert!(f.payload.is_empty());
            assert_eq!(f.ethertype, EtherType::IPV4);
            assert_eq!(f.encode().unwrap(), input);
        }
    }

    #[test]
    fn decode_too_short() {
        for len in 0..ETHER_HEADER_LEN {
            let err = Frame::decode(&UNTAGGED[..len]).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::FrameTooShort {
                    required: ETHER_HEADER_LEN,
                    actual: len
                }
            );
            assert_eq!(err.stage(), Stage::Header);
        }

        let err = Frame::decode(&DOT1Q[..17]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::FrameTooShort {
                required: 18,
                actual: 17
            }
        );

        for len in 14..22 {
            let err = Frame::decode(&QINQ[..len]).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::FrameTooShort {
                    required: 22,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn decode_keeps_trailing_bytes() {
        let mut input = UNTAGGED.to_vec();
        input.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let f = Frame::decode(&input).unwrap();
        assert_eq!(&f.payload[..], &[0x50, 0x50, 0x50, 0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_copies_input() {
        let mut input = DOT1Q.to_vec();
        let f = Frame::decode(&input).unwrap();
        input.iter_mut().for_each(|b| *b = 0);
        drop(input);
        assert_eq!(f.encode().unwrap(), &DOT1Q[..]);
    }

    #[test]
    fn encode_frames() {
        assert_eq!(frame(Tagging::Untagged).encode().unwrap(), &UNTAGGED[..]);
        assert_eq!(frame(Tagging::Single(TAG)).encode().unwrap(), &DOT1Q[..]);
        assert_eq!(
            frame(Tagging::Double {
                service: TAG,
                customer: TAG
            })
            .encode()
            .unwrap(),
            &QINQ[..]
        );
    }

    #[test]
    fn encode_is_idempotent() {
        for input in [&UNTAGGED[..], &DOT1Q[..], &QINQ[..]] {
            assert_eq!(Frame::decode(input).unwrap().encode().unwrap(), input);
        }
    }

    #[test]
    fn encode_rejects_invalid_tags() {
        let bad = VlanTag::new(0, false, 4096);

        let err = frame(Tagging::Single(bad)).encode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVlanId(4096));
        assert_eq!(err.stage(), Stage::CustomerTag);

        let err = frame(Tagging::Double {
            service: bad,
            customer: TAG,
        })
        .encode()
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVlanId(4096));
        assert_eq!(err.stage(), Stage::ServiceTag);

        let err = frame(Tagging::Double {
            service: TAG,
            customer: bad,
        })
        .encode()
        .unwrap_err();
        assert_eq!(err.stage(), Stage::CustomerTag);
    }

    #[test]
    fn encode_into_short_slice() {
        let f = frame(Tagging::Single(TAG));
        let mut out = [0xffu8; 20];
        let err = f.encode_into(&mut &mut out[..]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::FrameTooShort {
                required: 21,
                actual: 20
            }
        );
        assert_eq!(out, [0xff; 20]);

        let mut out = [0u8; 21];
        f.encode_into(&mut &mut out[..]).unwrap();
        assert_eq!(out, DOT1Q);
    }

    #[test]
    fn encode_invalid_tag_writes_nothing() {
        let f = frame(Tagging::Double {
            service: TAG,
            customer: VlanTag::new(9, false, 1),
        });
        let mut out = vec![];
        let err = f.encode_into(&mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPriority(9));
        assert!(out.is_empty());
    }

    #[test]
    fn tagging_from_tags() {
        assert_eq!(Tagging::from_tags(None, None), Ok(Tagging::Untagged));
        assert_eq!(Tagging::from_tags(Some(TAG), None), Ok(Tagging::Single(TAG)));

        let service = VlanTag::new(1, false, 100);
        assert_eq!(
            Tagging::from_tags(Some(TAG), Some(service)),
            Ok(Tagging::Double {
                service,
                customer: TAG
            })
        );

        let err = Tagging::from_tags(None, Some(service)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentTagging);
        assert!(frame(Tagging::Untagged)
            .with_tags(None, Some(service))
            .is_err());
    }

    #[test]
    fn lengths() {
        assert_eq!(frame(Tagging::Untagged).buffer_len(), 17);
        assert_eq!(frame(Tagging::Single(TAG)).buffer_len(), 21);
        let f = frame(Tagging::Double {
            service: TAG,
            customer: TAG,
        });
        assert_eq!(f.header_len(), QINQ_HEADER_LEN);
        assert_eq!(f.buffer_len(), 25);
    }
}
