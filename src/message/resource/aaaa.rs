use std::collections::HashMap;
use std::fmt;
use std::net::Ipv6Addr;

use super::super::packer::*;
use crate::error::Result;

// An AaaaResource is an AAAA Resource record: a single IPv6 address.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AaaaResource {
    pub aaaa: [u8; 16],
}

impl fmt::Display for AaaaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dnsmessage.AAAAResource{{AAAA: {}}}",
            Ipv6Addr::from(self.aaaa)
        )
    }
}

impl AaaaResource {
    // pack appends the wire format of the AaaaResource to msg.
    pub(crate) fn pack(
        &self,
        msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        Ok(pack_bytes(msg, &self.aaaa))
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize, _length: usize) -> Result<usize> {
        unpack_bytes(msg, off, &mut self.aaaa)
    }
}
