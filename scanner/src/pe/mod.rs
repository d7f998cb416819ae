//! PE header layout and the import table walk.

use crate::{
    error::{Error, Result},
    image::Image,
};
use log::debug;
use std::path::Path;

pub use sections::Section;
use sections::SectionTable;

mod imports;
mod sections;

pub const DOS_SIGNATURE: [u8; 2] = *b"MZ";
pub const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";

/// File offset of `e_lfanew` in the DOS header.
const PE_OFFSET_FIELD: u64 = 60;
/// `NumberOfSections` in the COFF header, relative to the PE signature.
const SECTION_COUNT_FIELD: u64 = 6;
/// `NumberOfRvaAndSizes` of a PE32 optional header, relative to the PE
/// signature. The data directory follows it.
const DATA_DIRECTORY_COUNT_FIELD: u64 = 116;
const DATA_DIRECTORY_ENTRY_SIZE: u64 = 8;
const IMAGE_DIRECTORY_ENTRY_IMPORT: u64 = 1;

/// Header fields the import walk needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Headers {
    pe_offset: u32,
    section_count: u16,
    data_directory_offset: u64,
    data_directory_count: u32,
    import_table_rva: u32,
}

impl Headers {
    fn section_table_offset(&self) -> u64 {
        self.data_directory_offset + DATA_DIRECTORY_ENTRY_SIZE * self.data_directory_count as u64
    }
}

impl Image {
    /// Checks the `MZ` and `PE\0\0` signatures.
    ///
    /// Anything not starting with `MZ` is rejected, including files shorter
    /// than two bytes. Once `MZ` matches, an image too short to hold
    /// `e_lfanew` or the PE signature is reported as [`Error::TruncatedImage`].
    pub fn is_portable_executable(&self) -> Result<bool> {
        if !self.as_bytes().starts_with(&DOS_SIGNATURE) {
            return Ok(false);
        }

        let mut reader = self.reader();
        reader.seek(PE_OFFSET_FIELD);
        let pe_offset = reader.read_u32()?;

        reader.seek(pe_offset as u64);

        Ok(reader.read_bytes::<4>()? == PE_SIGNATURE)
    }

    fn headers(&self) -> Result<Headers> {
        if !self.is_portable_executable()? {
            return Err(Error::NotAPortableExecutable);
        }

        let mut reader = self.reader();

        reader.seek(PE_OFFSET_FIELD);
        let pe_offset = reader.read_u32()?;

        reader.seek(pe_offset as u64 + SECTION_COUNT_FIELD);
        let section_count = reader.read_u16()?;

        reader.seek(pe_offset as u64 + DATA_DIRECTORY_COUNT_FIELD);
        let data_directory_count = reader.read_u32()?;
        let data_directory_offset = reader.position();

        reader.seek(
            data_directory_offset + DATA_DIRECTORY_ENTRY_SIZE * IMAGE_DIRECTORY_ENTRY_IMPORT,
        );
        let import_table_rva = reader.read_u32()?;

        let headers = Headers {
            pe_offset,
            section_count,
            data_directory_offset,
            data_directory_count,
            import_table_rva,
        };

        debug!(
            "pe header at 0x{:X}: {} sections, {} data directories, import table rva 0x{:X}",
            headers.pe_offset,
            headers.section_count,
            headers.data_directory_count,
            headers.import_table_rva
        );

        Ok(headers)
    }

    fn section_table(&self, headers: &Headers) -> Result<SectionTable> {
        let mut reader = self.reader();
        reader.seek(headers.section_table_offset());

        SectionTable::read(&mut reader, headers.section_count)
    }

    /// Section records in table order.
    pub fn sections(&self) -> Result<Vec<Section>> {
        let headers = self.headers()?;

        Ok(self.section_table(&headers)?.into_vec())
    }

    /// Translates an RVA to a file offset through the first section whose
    /// `[va_min, va_max)` range holds it.
    pub fn rva_to_offset(&self, rva: u32) -> Result<u64> {
        let headers = self.headers()?;

        self.section_table(&headers)?.rva_to_offset(rva)
    }

    /// Names of the DLLs in the import table, in descriptor order.
    /// Duplicates are kept and case is left as written.
    pub fn imported_libraries(&self) -> Result<Vec<String>> {
        let headers = self.headers()?;
        let sections = self.section_table(&headers)?;

        let mut reader = self.reader();
        let name_rvas = imports::read_name_rvas(&mut reader, &sections, headers.import_table_rva)?;

        let names = name_rvas
            .into_iter()
            .map(|rva| imports::read_dll_name(&mut reader, &sections, rva))
            .collect::<Result<Vec<_>>>()?;

        debug!("import table lists {} libraries", names.len());

        Ok(names)
    }
}

pub fn is_portable_executable<P: AsRef<Path>>(path: P) -> Result<bool> {
    Image::open(path)?.is_portable_executable()
}

pub fn list_imported_libraries<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    Image::open(path)?.imported_libraries()
}
