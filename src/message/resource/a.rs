use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use super::super::packer::*;
use crate::error::Result;

// An AResource is an A Resource record: a single IPv4 address.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AResource {
    pub a: [u8; 4],
}

impl fmt::Display for AResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dnsmessage.AResource{{A: {}}}", Ipv4Addr::from(self.a))
    }
}

impl AResource {
    // pack appends the wire format of the AResource to msg.
    pub(crate) fn pack(
        &self,
        msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        Ok(pack_bytes(msg, &self.a))
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize, _length: usize) -> Result<usize> {
        unpack_bytes(msg, off, &mut self.a)
    }
}
