use core::fmt;

use crate::vlan::VID_MAX;

/// Result type returned by the frame and tag codecs.
pub type Result<T> = core::result::Result<T, FrameError>;

/// An error produced while decoding or encoding a frame or a vlan tag.
///
/// The error carries the failure [`ErrorKind`] together with the [`Stage`] of
/// the frame that was being processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameError {
    kind: ErrorKind,
    stage: Stage,
}

impl FrameError {
    /// The kind of the failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The part of the frame that failed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn too_short(required: usize, actual: usize) -> Self {
        Self {
            kind: ErrorKind::FrameTooShort { required, actual },
            stage: Stage::Header,
        }
    }

    pub(crate) fn malformed_tag(len: usize) -> Self {
        Self {
            kind: ErrorKind::MalformedTag { len },
            stage: Stage::Tag,
        }
    }

    pub(crate) fn invalid_vlan_id(vlan_id: u16) -> Self {
        Self {
            kind: ErrorKind::InvalidVlanId(vlan_id),
            stage: Stage::Tag,
        }
    }

    pub(crate) fn invalid_priority(priority: u8) -> Self {
        Self {
            kind: ErrorKind::InvalidPriority(priority),
            stage: Stage::Tag,
        }
    }

    pub(crate) fn inconsistent_tagging() -> Self {
        Self {
            kind: ErrorKind::InconsistentTagging,
            stage: Stage::ServiceTag,
        }
    }

    /// Re-attribute a tag level error to the tag position inside a frame.
    pub(crate) fn at(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Stage::Header => write!(f, "invalid ethernet header: ")?,
            Stage::ServiceTag => write!(f, "invalid QinQ service vlan tag: ")?,
            Stage::CustomerTag => write!(f, "invalid vlan tag: ")?,
            Stage::Tag => {}
        }
        fmt::Display::fmt(&self.kind, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

/// The failure categories of the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The buffer is shorter than the header implied by its tag depth.
    FrameTooShort {
        /// Bytes needed for the detected tag depth.
        required: usize,
        /// Bytes actually available.
        actual: usize,
    },
    /// A vlan tag body is not exactly 2 bytes long.
    MalformedTag {
        /// Length of the rejected tag body.
        len: usize,
    },
    /// The vlan identifier exceeds [`VID_MAX`].
    InvalidVlanId(u16),
    /// The priority code point does not fit in 3 bits.
    InvalidPriority(u8),
    /// A service tag was supplied without a customer tag.
    InconsistentTagging,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::FrameTooShort { required, actual } => write!(
                f,
                "frame is too short ({} bytes, at least {} required)",
                actual, required
            ),
            ErrorKind::MalformedTag { len } => {
                write!(f, "size of vlan tag is 2 bytes, got {}", len)
            }
            ErrorKind::InvalidVlanId(vid) => {
                write!(f, "incorrect vlan identifier {} (max {})", vid, VID_MAX)
            }
            ErrorKind::InvalidPriority(pcp) => {
                write!(f, "incorrect vlan priority {} (max 7)", pcp)
            }
            ErrorKind::InconsistentTagging => {
                write!(f, "service vlan tag present without a customer vlan tag")
            }
        }
    }
}

/// The part of a frame a [`FrameError`] is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Addresses, tag protocol identifiers and the ethertype.
    Header,
    /// The outer 802.1ad service tag of a QinQ frame.
    ServiceTag,
    /// The 802.1Q tag, or the inner customer tag of a QinQ frame.
    CustomerTag,
    /// A standalone tag body outside of any frame.
    Tag,
}
