#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("not a portable executable")]
    NotAPortableExecutable,
    #[error("image truncated reading {len} bytes at offset 0x{offset:X}")]
    TruncatedImage { offset: u64, len: usize },
    #[error("import table not terminated before end of image (descriptor at offset 0x{offset:X})")]
    TruncatedImportTable { offset: u64 },
    #[error("rva 0x{0:X} is not inside any section")]
    InvalidRva(u32),
    #[error("dll name at rva 0x{rva:X} is not ascii")]
    InvalidDllName { rva: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
