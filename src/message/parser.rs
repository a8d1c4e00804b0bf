use super::header::*;
use super::name::*;
use super::question::*;
use super::resource::*;
use super::*;
use crate::error::{Error, Result};

// A Parser allows incrementally parsing a single DNS message.
//
// Sections must be visited in wire order. Each section's accessor returns
// ErrSectionDone once that section is exhausted, after which the next
// section becomes available.
#[derive(Default)]
pub struct Parser<'a> {
    msg: &'a [u8],
    header: HeaderInternal,
    section: Section,
    off: usize,
    index: usize,
    res_header_valid: bool,
    res_header: ResourceHeader,
}

impl<'a> Parser<'a> {
    // start parses the header and enables the parsing of Questions.
    pub fn start(&mut self, msg: &'a [u8]) -> Result<Header> {
        *self = Parser {
            msg,
            ..Default::default()
        };
        self.off = self.header.unpack(msg, 0)?;
        self.section = Section::Questions;
        Ok(self.header.header())
    }

    fn check_advance(&mut self, sec: Section) -> Result<()> {
        if self.section < sec {
            return Err(Error::ErrNotStarted);
        }
        if self.section > sec {
            return Err(Error::ErrSectionDone);
        }
        self.res_header_valid = false;
        if self.index == self.header.count(sec) as usize {
            self.index = 0;
            self.section = self.section.next();
            return Err(Error::ErrSectionDone);
        }
        Ok(())
    }

    fn resource(&mut self, sec: Section) -> Result<Resource> {
        let header = self.resource_header(sec)?;
        self.res_header_valid = false;
        let (body, off) = Rdata::unpack(header.typ, self.msg, self.off, header.length as usize)?;
        self.off = off;
        self.index += 1;
        Ok(Resource { header, body })
    }

    fn resource_header(&mut self, sec: Section) -> Result<ResourceHeader> {
        if self.res_header_valid {
            return Ok(self.res_header.clone());
        }
        self.check_advance(sec)?;
        let mut hdr = ResourceHeader::default();
        let off = hdr.unpack(self.msg, self.off)?;
        self.res_header = hdr.clone();
        self.res_header_valid = true;
        self.off = off;
        Ok(hdr)
    }

    fn skip_resource(&mut self, sec: Section) -> Result<()> {
        if self.res_header_valid {
            let new_off = self.off + self.res_header.length as usize;
            if new_off > self.msg.len() {
                return Err(Error::ErrResourceLen);
            }
            self.off = new_off;
            self.res_header_valid = false;
            self.index += 1;
            return Ok(());
        }
        self.check_advance(sec)?;
        self.off = Resource::skip(self.msg, self.off)?;
        self.index += 1;
        Ok(())
    }

    // question parses a single Question.
    pub fn question(&mut self) -> Result<Question> {
        self.check_advance(Section::Questions)?;
        let mut name = Name::default();
        let mut off = name.unpack(self.msg, self.off)?;
        let mut typ = DnsType::default();
        off = typ.unpack(self.msg, off)?;
        let mut class = DnsClass::default();
        off = class.unpack(self.msg, off)?;
        self.off = off;
        self.index += 1;
        Ok(Question { name, typ, class })
    }

    // all_questions parses all Questions.
    pub fn all_questions(&mut self) -> Result<Vec<Question>> {
        let mut qs = Vec::with_capacity(self.header.questions as usize);
        loop {
            match self.question() {
                Ok(q) => qs.push(q),
                Err(Error::ErrSectionDone) => return Ok(qs),
                Err(err) => return Err(err),
            }
        }
    }

    // skip_question skips a single Question.
    pub fn skip_question(&mut self) -> Result<()> {
        self.check_advance(Section::Questions)?;
        let mut off = Name::skip(self.msg, self.off)?;
        off = DnsType::skip(self.msg, off)?;
        off = DnsClass::skip(self.msg, off)?;
        self.off = off;
        self.index += 1;
        Ok(())
    }

    // skip_all_questions skips all Questions.
    pub fn skip_all_questions(&mut self) -> Result<()> {
        loop {
            match self.skip_question() {
                Err(Error::ErrSectionDone) => return Ok(()),
                Err(err) => return Err(err),
                Ok(_) => {}
            }
        }
    }

    // answer parses a single Answer Resource.
    pub fn answer(&mut self) -> Result<Resource> {
        self.resource(Section::Answers)
    }

    // answer_header parses a single Answer ResourceHeader.
    pub fn answer_header(&mut self) -> Result<ResourceHeader> {
        self.resource_header(Section::Answers)
    }

    // all_answers parses all Answer Resources.
    pub fn all_answers(&mut self) -> Result<Vec<Resource>> {
        let mut records = Vec::with_capacity(self.header.answers as usize);
        loop {
            match self.answer() {
                Ok(r) => records.push(r),
                Err(Error::ErrSectionDone) => return Ok(records),
                Err(err) => return Err(err),
            }
        }
    }

    // skip_all_answers skips all Answer Resources.
    pub fn skip_all_answers(&mut self) -> Result<()> {
        loop {
            match self.skip_resource(Section::Answers) {
                Err(Error::ErrSectionDone) => return Ok(()),
                Err(err) => return Err(err),
                Ok(_) => {}
            }
        }
    }

    // authority parses a single Authority Resource.
    pub fn authority(&mut self) -> Result<Resource> {
        self.resource(Section::Authorities)
    }

    // all_authorities parses all Authority Resources.
    pub fn all_authorities(&mut self) -> Result<Vec<Resource>> {
        let mut records = Vec::with_capacity(self.header.authorities as usize);
        loop {
            match self.authority() {
                Ok(r) => records.push(r),
                Err(Error::ErrSectionDone) => return Ok(records),
                Err(err) => return Err(err),
            }
        }
    }

    // additional parses a single Additional Resource.
    pub fn additional(&mut self) -> Result<Resource> {
        self.resource(Section::Additionals)
    }

    // all_additionals parses all Additional Resources.
    pub fn all_additionals(&mut self) -> Result<Vec<Resource>> {
        let mut records = Vec::with_capacity(self.header.additionals as usize);
        loop {
            match self.additional() {
                Ok(r) => records.push(r),
                Err(Error::ErrSectionDone) => return Ok(records),
                Err(err) => return Err(err),
            }
        }
    }

    /// Total number of records the header declares across the answer,
    /// authority and additional sections. Useful as the bound for a scan that
    /// tolerates individual malformed records.
    pub fn record_count(&self) -> usize {
        self.header.answers as usize
            + self.header.authorities as usize
            + self.header.additionals as usize
    }

    // next_record_header reads the header of the next record in wire order,
    // crossing section boundaries. Questions not yet consumed are skipped
    // first. Returns ErrSectionDone once all record sections are exhausted.
    pub fn next_record_header(&mut self) -> Result<ResourceHeader> {
        if self.section <= Section::Questions {
            self.skip_all_questions()?;
        }
        loop {
            let sec = self.section;
            match sec {
                Section::Answers | Section::Authorities | Section::Additionals => {
                    match self.resource_header(sec) {
                        Err(Error::ErrSectionDone) => continue,
                        other => return other,
                    }
                }
                _ => return Err(Error::ErrSectionDone),
            }
        }
    }

    // record_rdata decodes the body of the record whose header was just read
    // with next_record_header. As long as the declared length fits in the
    // message the parser advances past the body even when decoding fails, so
    // a scan can continue at the following record.
    pub fn record_rdata(&mut self) -> Result<Option<Rdata>> {
        if !self.res_header_valid {
            return Err(Error::ErrNotStarted);
        }
        let hdr = self.res_header.clone();
        let end_off = self.off + hdr.length as usize;
        if end_off > self.msg.len() {
            return Err(Error::ErrResourceLen);
        }
        let result = Rdata::unpack(hdr.typ, self.msg, self.off, hdr.length as usize);
        self.off = end_off;
        self.res_header_valid = false;
        self.index += 1;
        result.map(|(body, _)| body)
    }
}
