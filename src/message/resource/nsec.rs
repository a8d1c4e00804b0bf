use std::collections::HashMap;
use std::fmt;

use super::super::name::*;
use crate::error::{Error, Result};

// Largest type bitmap accepted: one window covering types 0..=255.
const MAX_BITMAP_LEN: usize = 32;

// An NsecResource is the restricted NSEC form used by mDNS responders
// (RFC 6762 section 6.1): a single block-0 window listing which record types
// exist for a name. The "next domain name" field is consumed from the wire
// but carries no information in this context and is not retained.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct NsecResource {
    pub bitmap: Vec<u8>,
}

impl fmt::Display for NsecResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dnsmessage.NSECResource{{Bitmap: {:02x?}}}", self.bitmap)
    }
}

impl NsecResource {
    /// Number of addressable bits in the bitmap.
    pub fn bitmap_length(&self) -> usize {
        self.bitmap.len() * 8
    }

    /// Whether type `i` is marked present. Indices beyond the bitmap are
    /// simply absent, not an error.
    pub fn bit(&self, i: usize) -> bool {
        let byte_num = i / 8;
        if byte_num >= self.bitmap.len() {
            return false;
        }
        let bit_num = 7 - (i % 8);
        self.bitmap[byte_num] & (1 << bit_num) != 0
    }

    // pack appends the wire format of the NsecResource to msg, with the
    // owner name standing in for the next-domain field as mDNS responders do.
    pub(crate) fn pack(
        &self,
        msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
        owner: &Name,
    ) -> Result<Vec<u8>> {
        if self.bitmap.is_empty() || self.bitmap.len() > MAX_BITMAP_LEN {
            return Err(Error::ErrInvalidNsecBitmap);
        }
        let mut msg = owner.pack(msg, compression, compression_off)?;
        msg.push(0);
        msg.push(self.bitmap.len() as u8);
        msg.extend_from_slice(&self.bitmap);
        Ok(msg)
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize, _length: usize) -> Result<usize> {
        let off = Name::skip(msg, off)?;
        if off + 2 > msg.len() {
            return Err(Error::ErrBaseLen);
        }
        let block = msg[off];
        let bitmap_len = msg[off + 1] as usize;
        if block != 0 || bitmap_len == 0 || bitmap_len > MAX_BITMAP_LEN {
            return Err(Error::ErrInvalidNsecBitmap);
        }
        let begin_off = off + 2;
        let end_off = begin_off + bitmap_len;
        if end_off > msg.len() {
            return Err(Error::ErrCalcLen);
        }
        self.bitmap = msg[begin_off..end_off].to_vec();
        Ok(end_off)
    }
}
