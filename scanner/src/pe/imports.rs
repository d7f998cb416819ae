use super::sections::SectionTable;
use crate::{
    error::{Error, Result},
    image::Reader,
};
use log::trace;

pub(crate) const IMPORT_DESCRIPTOR_SIZE: usize = 20;

/// Walks the import descriptors starting at `import_table_rva` and returns
/// the name RVA of each one, in table order. The walk stops at the first
/// all-zero descriptor; running out of image before it is an error.
pub(crate) fn read_name_rvas(
    reader: &mut Reader<'_>,
    sections: &SectionTable,
    import_table_rva: u32,
) -> Result<Vec<u32>> {
    sections.seek_to_rva(reader, import_table_rva)?;

    let mut name_rvas = Vec::new();

    loop {
        let offset = reader.position();
        let descriptor: [u8; IMPORT_DESCRIPTOR_SIZE] = reader
            .read_bytes()
            .map_err(|_| Error::TruncatedImportTable { offset })?;

        if descriptor == [0; IMPORT_DESCRIPTOR_SIZE] {
            break;
        }

        // Name field of IMAGE_IMPORT_DESCRIPTOR.
        let name_rva = u32::from_le_bytes([
            descriptor[12],
            descriptor[13],
            descriptor[14],
            descriptor[15],
        ]);

        trace!("import descriptor at 0x{:X} names rva 0x{:X}", offset, name_rva);

        name_rvas.push(name_rva);
    }

    Ok(name_rvas)
}

pub(crate) fn read_dll_name(
    reader: &mut Reader<'_>,
    sections: &SectionTable,
    rva: u32,
) -> Result<String> {
    sections.seek_to_rva(reader, rva)?;

    let name = reader.read_until_nul()?;
    if !name.is_ascii() {
        return Err(Error::InvalidDllName { rva });
    }

    Ok(name.iter().map(|&byte| byte as char).collect())
}
