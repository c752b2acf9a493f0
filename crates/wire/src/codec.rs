//! Typed primitive framing over a single TCP connection.
//!
//! Byte order is fixed to little-endian regardless of host, per the wire
//! contract. Reads block until the requested number of bytes have arrived,
//! refilling an internal buffer 1 KiB at a time. Writes accumulate into a
//! send buffer and are only flushed to the socket by [`Codec::send`].

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::ProtocolError;

const READ_CHUNK: usize = 1024;
/// Ceiling on a decoded string's byte length, guarding against a peer
/// that sends a garbage or adversarial length prefix.
const MAX_STRING_LEN: i32 = 16 * 1024 * 1024;

pub struct Codec {
    stream: TcpStream,
    read_buf: VecDeque<u8>,
    write_buf: Vec<u8>,
}

impl Codec {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream, read_buf: VecDeque::new(), write_buf: Vec::new() }
    }

    pub fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    /// An owned handle usable to force this connection closed from another
    /// thread (e.g. the session registry during server shutdown).
    pub fn shutdown_handle(&self) -> std::io::Result<TcpStream> {
        self.stream.try_clone()
    }

    fn fill(&mut self) -> Result<(), ProtocolError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ProtocolError::Disconnected),
                Ok(n) => {
                    self.read_buf.extend(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ProtocolError::Transport(e)),
            }
        }
    }

    fn read_exact_buf(&mut self, size: usize) -> Result<Vec<u8>, ProtocolError> {
        while self.read_buf.len() < size {
            self.fill()?;
        }
        Ok(self.read_buf.drain(..size).collect())
    }

    pub fn read_opcode(&mut self) -> Result<i16, ProtocolError> {
        let buf = self.read_exact_buf(2)?;
        Ok(LittleEndian::read_i16(&buf))
    }

    pub fn write_opcode(&mut self, value: i16) {
        self.write_buf
            .write_i16::<LittleEndian>(value)
            .expect("writes into a Vec<u8> are infallible");
    }

    pub fn read_int(&mut self) -> Result<i32, ProtocolError> {
        let buf = self.read_exact_buf(4)?;
        Ok(LittleEndian::read_i32(&buf))
    }

    pub fn write_int(&mut self, value: i32) {
        self.write_buf
            .write_i32::<LittleEndian>(value)
            .expect("writes into a Vec<u8> are infallible");
    }

    pub fn read_int64(&mut self) -> Result<i64, ProtocolError> {
        let buf = self.read_exact_buf(8)?;
        Ok(LittleEndian::read_i64(&buf))
    }

    pub fn write_int64(&mut self, value: i64) {
        self.write_buf
            .write_i64::<LittleEndian>(value)
            .expect("writes into a Vec<u8> are infallible");
    }

    pub fn read_float(&mut self) -> Result<f64, ProtocolError> {
        let buf = self.read_exact_buf(8)?;
        Ok(LittleEndian::read_f64(&buf))
    }

    pub fn write_float(&mut self, value: f64) {
        self.write_buf
            .write_f64::<LittleEndian>(value)
            .expect("writes into a Vec<u8> are infallible");
    }

    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        let buf = self.read_exact_buf(1)?;
        Ok(buf[0] != 0)
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_buf.push(if value { 1 } else { 0 });
    }

    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let len = self.read_int()?;
        if !(0..=MAX_STRING_LEN).contains(&len) {
            return Err(ProtocolError::Protocol(format!(
                "string length {len} out of bounds"
            )));
        }
        let buf = self.read_exact_buf(len as usize)?;
        String::from_utf8(buf).map_err(|e| ProtocolError::Protocol(e.to_string()))
    }

    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.write_int(bytes.len() as i32);
        self.write_buf.extend_from_slice(bytes);
    }

    /// Flush the entire send buffer to the socket in one write, then clear it.
    pub fn send(&mut self) -> Result<(), ProtocolError> {
        self.stream.write_all(&self.write_buf)?;
        self.write_buf.clear();
        Ok(())
    }

    /// Discard any unread bytes still in flight on the socket, non-blockingly.
    ///
    /// Used to realign the stream after a handler bails out mid-request: the
    /// handler may have already consumed part of a request before discovering
    /// an error, but whatever the peer sent beyond that is no longer
    /// meaningful and must not be misread as the next request's opcode.
    pub fn flush_buffer(&mut self) -> Result<(), ProtocolError> {
        self.read_buf.clear();
        self.stream.set_nonblocking(true)?;
        let mut scratch = [0u8; 4096];
        let result = loop {
            match self.stream.read(&mut scratch) {
                Ok(0) => break Ok(()),
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.stream.set_nonblocking(false)?;
        result.map_err(ProtocolError::Transport)
    }

    pub fn close(&self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
