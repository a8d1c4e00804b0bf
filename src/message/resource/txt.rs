use std::collections::HashMap;
use std::fmt;

use super::super::packer::*;
use crate::error::{Error, Result};

// A TxtResource is a TXT Resource record: an ordered sequence of
// length-prefixed character-strings. Entries are raw bytes; TXT payloads are
// not required to be UTF-8.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TxtResource {
    pub txt: Vec<Vec<u8>>,
}

impl fmt::Display for TxtResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texts: Vec<String> = self
            .txt
            .iter()
            .map(|t| String::from_utf8_lossy(t).to_string())
            .collect();
        write!(f, "dnsmessage.TXTResource{{TXT: {:?}}}", texts)
    }
}

impl TxtResource {
    // pack appends the wire format of the TxtResource to msg.
    pub(crate) fn pack(
        &self,
        mut msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        for t in &self.txt {
            msg = pack_str(msg, t)?;
        }
        Ok(msg)
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], mut off: usize, length: usize) -> Result<usize> {
        let mut txts = Vec::with_capacity(1);
        let mut n = 0;
        while n < length {
            let (t, new_off) = unpack_str(msg, off)?;
            off = new_off;
            // A segment may be empty, but its declared length must stay
            // within the record data.
            if length - n < t.len() + 1 {
                return Err(Error::ErrCalcLen);
            }
            n += t.len() + 1;
            txts.push(t);
        }
        self.txt = txts;
        Ok(off)
    }
}
