use crate::error::{Error, Result};
use std::{fs, path::Path};

/// A binary image held entirely in memory for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
}

impl Image {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;

        Ok(Self::from_bytes(data))
    }

    pub fn from_bytes<B: Into<Vec<u8>>>(data: B) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn reader(&self) -> Reader<'_> {
        Reader::new(&self.data)
    }
}

/// Seekable little-endian cursor over an image. Every read is bounds-checked
/// and reports the offset and width that ran past the end.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    position: u64,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn seek(&mut self, position: u64) {
        self.position = position;
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes: [u8; N] = self
            .slice(N)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(Error::TruncatedImage {
                offset: self.position,
                len: N,
            })?;

        self.position += N as u64;

        Ok(bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bytes().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes().map(u32::from_le_bytes)
    }

    /// Reads up to and including the next NUL byte and returns the bytes
    /// before it.
    pub fn read_until_nul(&mut self) -> Result<&'a [u8]> {
        let start = self.position;
        let rest = usize::try_from(start)
            .ok()
            .and_then(|start| self.data.get(start..))
            .unwrap_or_default();

        let len = rest
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(Error::TruncatedImage {
                offset: start,
                len: rest.len() + 1,
            })?;

        self.position += len as u64 + 1;

        Ok(&rest[..len])
    }

    fn slice(&self, len: usize) -> Option<&'a [u8]> {
        let start = usize::try_from(self.position).ok()?;
        let end = start.checked_add(len)?;

        self.data.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let mut reader = Reader::new(&[0x4D, 0x5A, 0x78, 0x56, 0x34, 0x12]);

        assert_eq!(reader.read_u16().unwrap(), 0x5A4D);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.position(), 6);
    }

    #[test]
    fn read_past_end_reports_offset_and_width() {
        let mut reader = Reader::new(&[0u8; 6]);
        reader.seek(4);

        match reader.read_u32() {
            Err(Error::TruncatedImage { offset, len }) => {
                assert_eq!(offset, 4);
                assert_eq!(len, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn seek_beyond_end_is_truncation_not_panic() {
        let mut reader = Reader::new(b"MZ");
        reader.seek(u64::MAX);

        assert!(matches!(
            reader.read_bytes::<4>(),
            Err(Error::TruncatedImage { .. })
        ));
        assert!(matches!(
            reader.read_until_nul(),
            Err(Error::TruncatedImage { len: 1, .. })
        ));
    }

    #[test]
    fn reads_nul_terminated_strings() {
        let mut reader = Reader::new(b"ole32.dll\0user32.dll\0");

        assert_eq!(reader.read_until_nul().unwrap(), b"ole32.dll");
        assert_eq!(reader.read_until_nul().unwrap(), b"user32.dll");
        assert!(reader.read_until_nul().is_err());
    }

    #[test]
    fn unterminated_string_is_truncation() {
        let mut reader = Reader::new(b"kernel32");

        assert!(matches!(
            reader.read_until_nul(),
            Err(Error::TruncatedImage { offset: 0, len: 9 })
        ));
    }
}
