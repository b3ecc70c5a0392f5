//! A frame level adapter over a raw link-layer device.
//!
//! The device itself (opening it, binding it to an interface, discovering its
//! hardware address and the default gateway) lives behind [`LinkDevice`].
//! [`EtherSocket`] only sizes the read buffer, runs the codec and enforces the
//! mtu on writes. Nothing is retried: a failed read or write is returned and
//! the caller decides whether to try again with a fresh read.

use std::error;
use std::fmt;
use std::io;
use std::vec;
use std::vec::Vec;

use bytes::Bytes;
use log::{debug, warn};

use crate::error::FrameError;
use crate::ether::{EtherAddr, EtherType};
use crate::frame::Frame;

/// Frame size used when the configured mtu is 0.
pub const DEFAULT_MTU: usize = 1500;

/// A blocking raw link-layer device that moves whole frames.
pub trait LinkDevice {
    /// Read one frame into `buf`, returning its length.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write one frame, returning the number of bytes accepted.
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Hardware address of the device, used as the source of written frames.
    fn hardware_addr(&self) -> EtherAddr;

    /// Hardware address of the default gateway reachable through the device.
    fn gateway_addr(&self) -> io::Result<EtherAddr>;
}

impl<D: LinkDevice + ?Sized> LinkDevice for &mut D {
    #[inline]
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }

    #[inline]
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).send(buf)
    }

    #[inline]
    fn hardware_addr(&self) -> EtherAddr {
        (**self).hardware_addr()
    }

    #[inline]
    fn gateway_addr(&self) -> io::Result<EtherAddr> {
        (**self).gateway_addr()
    }
}

/// Settings of an [`EtherSocket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketConfig {
    mtu: usize,
    ethertype: EtherType,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            mtu: DEFAULT_MTU,
            ethertype: EtherType::IPV4,
        }
    }
}

impl SocketConfig {
    /// Largest frame read from or written to the device. 0 selects
    /// [`DEFAULT_MTU`].
    pub fn with_mtu(mut self, mtu: usize) -> Self {
        self.mtu = if mtu == 0 { DEFAULT_MTU } else { mtu };
        self
    }

    /// Ethertype stamped on frames built by [`EtherSocket::write`] and
    /// [`EtherSocket::write_to`].
    pub fn with_ethertype(mut self, ethertype: EtherType) -> Self {
        self.ethertype = ethertype;
        self
    }

    /// The effective mtu.
    pub fn mtu(&self) -> usize {
        self.mtu
    }

    /// The ethertype of payload-only writes.
    pub fn ethertype(&self) -> EtherType {
        self.ethertype
    }
}

/// Reads and writes [`Frame`]s through a [`LinkDevice`].
#[derive(Debug)]
pub struct EtherSocket<D> {
    device: D,
    gateway: EtherAddr,
    config: SocketConfig,
    rx_buf: Vec<u8>,
}

impl<D: LinkDevice> EtherSocket<D> {
    /// Wrap `device`, resolving the gateway address once.
    pub fn new(device: D, config: SocketConfig) -> Result<Self, SocketError> {
        let gateway = device.gateway_addr()?;
        debug!(
            "ether socket on {} via gateway {}, mtu {}",
            device.hardware_addr(),
            gateway,
            config.mtu
        );
        Ok(Self {
            device,
            gateway,
            rx_buf: vec![0; config.mtu],
            config,
        })
    }

    /// The wrapped device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The gateway address resolved at construction.
    pub fn gateway_addr(&self) -> EtherAddr {
        self.gateway
    }

    /// The socket settings.
    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    /// Release the wrapped device.
    pub fn into_inner(self) -> D {
        self.device
    }

    /// Read one frame from the device.
    pub fn read_frame(&mut self) -> Result<Frame, SocketError> {
        let n = self.device.recv(&mut self.rx_buf)?;
        let received = &self.rx_buf[..n.min(self.rx_buf.len())];
        match Frame::decode(received) {
            Ok(frame) => {
                debug!(
                    "read frame {} -> {} ({} bytes)",
                    frame.src_addr, frame.dst_addr, n
                );
                Ok(frame)
            }
            Err(err) => {
                warn!("dropping undecodable frame of {} bytes: {}", n, err);
                Err(err.into())
            }
        }
    }

    /// Read one frame from the device and return only its payload.
    pub fn read(&mut self) -> Result<Bytes, SocketError> {
        Ok(self.read_frame()?.payload)
    }

    /// Send `data` to `to` in an untagged frame.
    pub fn write_to(&mut self, to: EtherAddr, data: &[u8]) -> Result<(), SocketError> {
        let frame = Frame::new(
            to,
            self.device.hardware_addr(),
            self.config.ethertype,
            Bytes::copy_from_slice(data),
        );
        self.write_frame(&frame)
    }

    /// Send `data` to the default gateway in an untagged frame.
    pub fn write(&mut self, data: &[u8]) -> Result<(), SocketError> {
        self.write_to(self.gateway, data)
    }

    /// Encode and send `frame`.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), SocketError> {
        let len = frame.buffer_len();
        if len > self.config.mtu {
            return Err(SocketError::Oversize {
                len,
                mtu: self.config.mtu,
            });
        }

        let bytes = frame.encode()?;
        let sent = self.device.send(&bytes)?;
        if sent != bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                std::format!("device accepted {} of {} frame bytes", sent, bytes.len()),
            )
            .into());
        }
        debug!(
            "wrote frame {} -> {} ({} bytes)",
            frame.src_addr, frame.dst_addr, len
        );
        Ok(())
    }
}

/// Errors returned by [`EtherSocket`].
#[derive(Debug)]
pub enum SocketError {
    /// The device failed.
    Io(io::Error),
    /// The frame could not be decoded or encoded.
    Frame(FrameError),
    /// The encoded frame does not fit the mtu.
    Oversize {
        /// Encoded frame length.
        len: usize,
        /// Configured mtu.
        mtu: usize,
    },
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketError::Io(err) => write!(f, "link device error: {}", err),
            SocketError::Frame(err) => write!(f, "ethernet frame error: {}", err),
            SocketError::Oversize { len, mtu } => {
                write!(f, "frame of {} bytes exceeds mtu {}", len, mtu)
            }
        }
    }
}

impl error::Error for SocketError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SocketError::Io(err) => Some(err),
            SocketError::Frame(err) => Some(err),
            SocketError::Oversize { .. } => None,
        }
    }
}

impl From<io::Error> for SocketError {
    fn from(err: io::Error) -> Self {
        SocketError::Io(err)
    }
}

impl From<FrameError> for SocketError {
    fn from(err: FrameError) -> Self {
        SocketError::Frame(err)
    }
}
