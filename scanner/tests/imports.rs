//! Scans real files on disk through the path-based entry points.

use scanner::{Error, ImportReport, is_portable_executable, list_imported_libraries};
use std::{fs, path::Path};
use tempfile::TempDir;

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Minimal PE32 image: one section at va 0x1000 backed by file offset 0x400,
/// import table at rva 0x1008, names packed from rva 0x1100.
fn build_image(names: &[&str]) -> Vec<u8> {
    let mut buf = vec![0u8; 0x600];

    buf[0..2].copy_from_slice(b"MZ");
    put_u32(&mut buf, 0x3C, 0x80);
    buf[0x80..0x84].copy_from_slice(b"PE\0\0");
    buf[0x86..0x88].copy_from_slice(&1u16.to_le_bytes());
    put_u32(&mut buf, 0xF4, 16);
    put_u32(&mut buf, 0x100, 0x1008);

    let section = 0xF8 + 16 * 8;
    buf[section..section + 6].copy_from_slice(b".idata");
    put_u32(&mut buf, section + 12, 0x1000);
    put_u32(&mut buf, section + 16, 0x200);
    put_u32(&mut buf, section + 20, 0x400);

    let mut name_rva = 0x1100u32;
    for (index, name) in names.iter().enumerate() {
        put_u32(&mut buf, 0x408 + 20 * index + 12, name_rva);

        let offset = (name_rva - 0x1000 + 0x400) as usize;
        buf[offset..offset + name.len()].copy_from_slice(name.as_bytes());
        name_rva += name.len() as u32 + 1;
    }

    buf
}

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn lists_imports_of_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "Performous.exe",
        &build_image(&["libboost_filesystem-mt.dll", "SDL2.dll", "KERNEL32.dll"]),
    );

    assert!(is_portable_executable(&path).unwrap());
    assert_eq!(
        list_imported_libraries(&path).unwrap(),
        ["libboost_filesystem-mt.dll", "SDL2.dll", "KERNEL32.dll"]
    );
}

#[test]
fn repeated_scans_agree() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.dll", &build_image(&["b.dll", "c.dll", "b.dll"]));

    let first = list_imported_libraries(&path).unwrap();
    let second = list_imported_libraries(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, ["b.dll", "c.dll", "b.dll"]);
}

#[test]
fn text_files_are_not_pe() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "README.txt", b"Performous for Windows\n");

    assert!(!is_portable_executable(&path).unwrap());
    assert!(matches!(
        list_imported_libraries(&path),
        Err(Error::NotAPortableExecutable)
    ));
}

#[test]
fn truncated_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut image = build_image(&["ole32.dll"]);
    image.truncate(0x40);
    let path = write(&dir, "broken.exe", &image);

    let err = is_portable_executable(&path).unwrap_err();

    assert!(matches!(err, Error::TruncatedImage { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let err = list_imported_libraries(Path::new("/nonexistent/Performous.exe")).unwrap_err();

    assert!(matches!(err, Error::IoError(_)));
}

#[test]
fn report_serializes_file_and_imports() {
    let report = ImportReport {
        file: "stage/Performous.exe".into(),
        imports: vec!["ole32.dll".to_string()],
    };

    let json = serde_json::to_string(&report).unwrap();

    assert_eq!(json, r#"{"file":"stage/Performous.exe","imports":["ole32.dll"]}"#);
}
