use std::fs::{read, write, File};
use std::path::Path;

use crate::defs::{IntoResult, Result};

fn describe(action: &str, path: &Path) -> String {
    if let Some(path) = path.to_str() {
        format!("failed to {} file '{}'", action, path)
    } else {
        format!("failed to {} file", action)
    }
}

pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::open(path).res(|| describe("open", path))
}

pub fn create_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::create(path).res(|| describe("create", path))
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    read(path).res(|| describe("read", path))
}

pub fn read_file_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).res(|| describe("read", path))
}

pub fn write_file<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    write(path, data).res(|| describe("write", path))
}

pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::ErrorKind;

    #[test]
    fn test_open_missing_file() {
        let err = open_file("/definitely/not/here.ply").unwrap_err();
        assert_eq!(err.kind, ErrorKind::IoError);
        assert_eq!(
            &err.description,
            "failed to open file '/definitely/not/here.ply'"
        );
    }

    #[test]
    fn test_write_then_read() {
        let path = std::env::temp_dir().join("base-fs-write-then-read.bin");
        write_file(&path, &[1, 2, 3]).unwrap();
        assert!(file_exists(&path));
        assert_eq!(read_file(&path).unwrap(), vec![1, 2, 3]);
        std::fs::remove_file(&path).unwrap();
        assert!(!file_exists(&path));
    }
}
