use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

// Maximum length of the dotted presentation form of a name. The wire form
// allows 255 octets; with the trailing root label that leaves 254 visible
// characters including the final dot.
const NAME_LEN: usize = 254;

// The two most significant bits of a label length byte mark a compression
// pointer (RFC 1035 section 4.1.4).
const LABEL_POINTER: u8 = 0xc0;

// Upper bound on pointer indirections while unpacking a single name. Together
// with the NAME_LEN cap this terminates any pointer loop.
const MAX_POINTERS: usize = 10;

/// A domain name in dotted presentation form, e.g. `"_privet._tcp.local."`.
///
/// The trailing dot is always present. Comparisons of cache keys use
/// [`Name::lowercased`]; `data` itself preserves the case seen on the wire.
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct Name {
    pub data: String,
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}

impl Name {
    /// Builds a name from a dotted string, appending the trailing dot if it
    /// is missing. Fails with [`Error::ErrNameTooLong`] if the result exceeds
    /// the 255-octet wire limit.
    pub fn new(data: &str) -> Result<Self> {
        let data = if data.ends_with('.') {
            data.to_owned()
        } else {
            format!("{data}.")
        };
        if data.len() > NAME_LEN {
            return Err(Error::ErrNameTooLong);
        }
        Ok(Name { data })
    }

    /// The case-folded form used for ordered cache keys.
    pub fn lowercased(&self) -> String {
        self.data.to_ascii_lowercase()
    }

    // pack appends the wire format of the name to msg.
    //
    // When compression is Some, suffixes already emitted into msg (at or after
    // compression_off) are replaced by two-byte pointers and new suffixes are
    // recorded for later hits.
    pub(crate) fn pack(
        &self,
        mut msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<Vec<u8>> {
        let data = self.data.as_bytes();
        if data.is_empty() || data[data.len() - 1] != b'.' {
            return Err(Error::ErrNonCanonicalName);
        }

        // Allow the root domain.
        if data == b"." {
            msg.push(0);
            return Ok(msg);
        }

        // Emit a sequence of counted strings, chopping at dots.
        let mut begin = 0;
        for i in 0..data.len() {
            if data[i] == b'.' {
                // The two most significant bits of a length byte have special
                // meaning, so segments must fit in six bits.
                if i - begin >= 1 << 6 {
                    return Err(Error::ErrSegTooLong);
                }
                if i - begin == 0 {
                    return Err(Error::ErrZeroSegLen);
                }
                msg.push((i - begin) as u8);
                msg.extend_from_slice(&data[begin..i]);
                begin = i + 1;
                continue;
            }

            // Suffix compression can only start at a fresh segment.
            if (i == 0 || data[i - 1] == b'.')
                && let Some(compression_map) = compression
            {
                let suffix = String::from_utf8_lossy(&data[i..]).to_string();
                if let Some(&ptr) = compression_map.get(&suffix) {
                    // Hit. Emit a pointer instead of the rest of the name.
                    msg.push((ptr >> 8) as u8 | LABEL_POINTER);
                    msg.push(ptr as u8);
                    return Ok(msg);
                }
                // Miss. Remember this suffix if its offset fits in 14 bits.
                if msg.len() - compression_off <= 0x3fff {
                    compression_map.insert(suffix, msg.len() - compression_off);
                }
            }
        }

        msg.push(0);
        Ok(msg)
    }

    // unpack parses one wire-format name starting at off, following
    // compression pointers back into earlier parts of msg. Returns the offset
    // just past the name as it appears in the record being read.
    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize) -> Result<usize> {
        // curr_off walks the labels (possibly jumping backwards); new_off is
        // where parsing of the enclosing record resumes.
        let mut curr_off = off;
        let mut new_off = off;
        let mut ptr = 0;
        let mut name = String::new();

        loop {
            if curr_off >= msg.len() {
                return Err(Error::ErrBaseLen);
            }
            let c = msg[curr_off];
            curr_off += 1;
            match c & LABEL_POINTER {
                0x00 => {
                    // A zero length signals the end of the name.
                    if c == 0x00 {
                        break;
                    }
                    let end_off = curr_off + c as usize;
                    if end_off > msg.len() {
                        return Err(Error::ErrCalcLen);
                    }
                    name.push_str(&String::from_utf8_lossy(&msg[curr_off..end_off]));
                    name.push('.');
                    if name.len() > NAME_LEN {
                        return Err(Error::ErrNameTooLong);
                    }
                    curr_off = end_off;
                }
                LABEL_POINTER => {
                    if curr_off >= msg.len() {
                        return Err(Error::ErrInvalidPtr);
                    }
                    let c1 = msg[curr_off];
                    curr_off += 1;
                    if ptr == 0 {
                        new_off = curr_off;
                    }
                    ptr += 1;
                    if ptr > MAX_POINTERS {
                        return Err(Error::ErrTooManyPtr);
                    }
                    curr_off = (((c ^ LABEL_POINTER) as usize) << 8) | c1 as usize;
                }
                _ => {
                    // Prefixes 0x80 and 0x40 are reserved.
                    return Err(Error::ErrReserved);
                }
            }
        }

        if name.is_empty() {
            name.push('.');
        }
        self.data = name;
        if ptr == 0 {
            new_off = curr_off;
        }
        Ok(new_off)
    }

    // skip advances past one wire-format name without decoding it. A pointer
    // ends the name, since the remaining labels live elsewhere in msg.
    pub(crate) fn skip(msg: &[u8], off: usize) -> Result<usize> {
        let mut new_off = off;
        loop {
            if new_off >= msg.len() {
                return Err(Error::ErrBaseLen);
            }
            let c = msg[new_off];
            new_off += 1;
            match c & LABEL_POINTER {
                0x00 => {
                    if c == 0x00 {
                        break;
                    }
                    new_off += c as usize;
                    if new_off > msg.len() {
                        return Err(Error::ErrCalcLen);
                    }
                }
                LABEL_POINTER => {
                    new_off += 1;
                    break;
                }
                _ => {
                    return Err(Error::ErrReserved);
                }
            }
        }
        Ok(new_off)
    }
}
