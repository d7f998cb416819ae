use crate::{
    error::{Error, Result},
    image::Reader,
};
use log::trace;

pub(crate) const SECTION_HEADER_SIZE: u64 = 40;

/// Where a section lives in the address space and in the file.
///
/// `va_max` is `va_min + raw_size`, computed in 64 bits so that a hostile
/// size cannot wrap the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub name: [u8; 8],
    pub va_min: u32,
    pub va_max: u64,
    pub file_offset: u32,
}

impl Section {
    /// Decodes the leading 24 bytes of a section header. The remaining 16
    /// bytes of the entry are skipped.
    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let start = reader.position();

        let name = reader.read_bytes::<8>()?;
        let _virtual_size = reader.read_u32()?;
        let va_min = reader.read_u32()?;
        let raw_size = reader.read_u32()?;
        let file_offset = reader.read_u32()?;

        reader.seek(start + SECTION_HEADER_SIZE);

        Ok(Self {
            name,
            va_min,
            va_max: va_min as u64 + raw_size as u64,
            file_offset,
        })
    }

    pub fn name_str(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());

        std::str::from_utf8(&self.name[..len]).unwrap_or("<invalid>")
    }

    pub fn contains(&self, rva: u32) -> bool {
        self.va_min <= rva && (rva as u64) < self.va_max
    }
}

/// Section records in table order. Lookups take the first section whose
/// range holds the RVA.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    pub fn read(reader: &mut Reader<'_>, count: u16) -> Result<Self> {
        let mut sections = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let section = Section::read(reader)?;

            trace!(
                "section {:?} va 0x{:X}..0x{:X} at file offset 0x{:X}",
                section.name_str(),
                section.va_min,
                section.va_max,
                section.file_offset
            );

            sections.push(section);
        }

        Ok(Self { sections })
    }

    pub fn rva_to_offset(&self, rva: u32) -> Result<u64> {
        self.sections
            .iter()
            .find(|section| section.contains(rva))
            .map(|section| (rva - section.va_min) as u64 + section.file_offset as u64)
            .ok_or(Error::InvalidRva(rva))
    }

    pub fn seek_to_rva(&self, reader: &mut Reader<'_>, rva: u32) -> Result<()> {
        reader.seek(self.rva_to_offset(rva)?);

        Ok(())
    }

    pub fn into_vec(self) -> Vec<Section> {
        self.sections
    }
}

impl From<Vec<Section>> for SectionTable {
    fn from(sections: Vec<Section>) -> Self {
        Self { sections }
    }
}
