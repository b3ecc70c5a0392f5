#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![no_std]

//! Parse and build IEEE 802.3 Ethernet II frames, including single (802.1Q)
//! and double (802.1ad, QinQ) vlan tagging.
//!
//! ```rust
//! use etherframe::{EtherType, Frame, Tagging, VlanTag};
//!
//! let bytes = [
//!     0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x81, 0x00, 0x70,
//!     0x0c, 0x08, 0x00, 0x50, 0x50, 0x50,
//! ];
//! let frame = Frame::decode(&bytes).unwrap();
//! assert_eq!(frame.tagging, Tagging::Single(VlanTag::new(3, true, 12)));
//! assert_eq!(frame.ethertype, EtherType::IPV4);
//! assert_eq!(frame.encode().unwrap(), &bytes[..]);
//! ```

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod error;
pub use error::{ErrorKind, FrameError, Result, Stage};

pub mod ether;
pub use ether::{EtherAddr, EtherType};

pub mod vlan;
pub use vlan::VlanTag;

pub mod frame;
pub use frame::{Frame, Tagging};

#[cfg(feature = "std")]
pub mod socket;
