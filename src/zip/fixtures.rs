//! Builds small zip archives in memory for tests.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;

use super::structures::{
    CDFH_SIGNATURE, EndOfCentralDirectory, LFH_SIGNATURE, Zip64EOCD, Zip64EOCDLocator,
};

#[derive(Default)]
pub(crate) struct ZipWriter {
    data: Vec<u8>,
    central: Vec<u8>,
    count: u16,
}

impl ZipWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stored(mut self, name: &str, content: &[u8]) -> Self {
        self.add(name, 0, content, content.to_vec());
        self
    }

    pub(crate) fn deflated(mut self, name: &str, content: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        let compressed = encoder.finish().unwrap();
        self.add(name, 8, content, compressed);
        self
    }

    pub(crate) fn directory(mut self, name: &str) -> Self {
        assert!(name.ends_with('/'));
        self.add(name, 0, b"", Vec::new());
        self
    }

    fn add(&mut self, name: &str, method: u16, content: &[u8], compressed: Vec<u8>) {
        let mut crc = Crc::new();
        crc.update(content);
        let offset = self.data.len() as u32;

        let header = &mut self.data;
        header.write_all(LFH_SIGNATURE).unwrap();
        header.write_u16::<LittleEndian>(20).unwrap();
        header.write_u16::<LittleEndian>(0).unwrap();
        header.write_u16::<LittleEndian>(method).unwrap();
        header.write_u32::<LittleEndian>(0).unwrap(); // time, date
        header.write_u32::<LittleEndian>(crc.sum()).unwrap();
        header.write_u32::<LittleEndian>(compressed.len() as u32).unwrap();
        header.write_u32::<LittleEndian>(content.len() as u32).unwrap();
        header.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        header.write_u16::<LittleEndian>(0).unwrap();
        header.write_all(name.as_bytes()).unwrap();
        header.write_all(&compressed).unwrap();

        let central = &mut self.central;
        central.write_all(CDFH_SIGNATURE).unwrap();
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(method).unwrap();
        central.write_u32::<LittleEndian>(0).unwrap(); // time, date
        central.write_u32::<LittleEndian>(crc.sum()).unwrap();
        central.write_u32::<LittleEndian>(compressed.len() as u32).unwrap();
        central.write_u32::<LittleEndian>(content.len() as u32).unwrap();
        central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_all(&[0u8; 8]).unwrap(); // disk, attributes
        central.write_u32::<LittleEndian>(offset).unwrap();
        central.write_all(name.as_bytes()).unwrap();

        self.count += 1;
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.finish_with_comment(b"")
    }

    pub(crate) fn finish_with_comment(mut self, comment: &[u8]) -> Vec<u8> {
        let cd_offset = self.data.len() as u32;
        let cd_size = self.central.len() as u32;
        self.data.extend_from_slice(&self.central);

        let out = &mut self.data;
        out.write_all(EndOfCentralDirectory::SIGNATURE).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap(); // disk numbers
        out.write_u16::<LittleEndian>(self.count).unwrap();
        out.write_u16::<LittleEndian>(self.count).unwrap();
        out.write_u32::<LittleEndian>(cd_size).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(comment.len() as u16).unwrap();
        out.write_all(comment).unwrap();
        self.data
    }

    /// Finishes with ZIP64 end records and a saturated regular EOCD.
    pub(crate) fn finish_zip64(mut self) -> Vec<u8> {
        let cd_offset = self.data.len() as u64;
        let cd_size = self.central.len() as u64;
        self.data.extend_from_slice(&self.central);

        let eocd64_offset = self.data.len() as u64;
        let out = &mut self.data;
        out.write_all(Zip64EOCD::SIGNATURE).unwrap();
        out.write_u64::<LittleEndian>(Zip64EOCD::MIN_SIZE as u64 - 12).unwrap();
        out.write_u16::<LittleEndian>(45).unwrap();
        out.write_u16::<LittleEndian>(45).unwrap();
        out.write_u64::<LittleEndian>(0).unwrap(); // disk numbers
        out.write_u64::<LittleEndian>(self.count as u64).unwrap();
        out.write_u64::<LittleEndian>(self.count as u64).unwrap();
        out.write_u64::<LittleEndian>(cd_size).unwrap();
        out.write_u64::<LittleEndian>(cd_offset).unwrap();

        out.write_all(Zip64EOCDLocator::SIGNATURE).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u64::<LittleEndian>(eocd64_offset).unwrap();
        out.write_u32::<LittleEndian>(1).unwrap();

        out.write_all(EndOfCentralDirectory::SIGNATURE).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0xFFFF).unwrap();
        out.write_u16::<LittleEndian>(0xFFFF).unwrap();
        out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
        out.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        self.data
    }
}

/// An archive holding `entries`, each stored with its own name as content.
pub(crate) fn jar(entries: &[&str]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipWriter::new(), |zip, name| zip.stored(name, name.as_bytes()))
        .finish()
}
