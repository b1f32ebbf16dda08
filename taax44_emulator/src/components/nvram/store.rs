//! Storage backends for the NVRAM cell array.
use std::path::PathBuf;

use anyhow::ensure;
use anyhow::Context;
use anyhow::Result;

use super::NUM_CELLS;

/// Size of the persisted cell array: 16 words of 2 bytes.
pub const NVRAM_IMAGE_SIZE: usize = NUM_CELLS * 2;

/// Default NVRAM image file name.
pub const DEFAULT_NVRAM_FILE: &str = "NVRAM.bin";

pub type NvramImage = [u16; NUM_CELLS];

/// Persistent storage for the NVRAM cells.
///
/// The controller saves the whole array synchronously every time a cell is memorized.
/// Implementations are free to batch or defer the actual write.
pub trait NvramStore {
    /// Returns the stored image, or None if nothing has been stored yet.
    fn load(&mut self) -> Result<Option<NvramImage>>;
    fn save(&mut self, cells: &NvramImage) -> Result<()>;
}

/// Stores the cells as a flat 32 byte file of native-endian words.
///
/// The file is rewritten in place on every save. There is no atomic swap, so a crash during the
/// write can leave a truncated file behind, which is rejected on the next load.
///
/// Files of any size other than 32 bytes are rejected, including longer files whose first 32
/// bytes would form a valid image. The controller then starts with all cells zeroed.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NvramStore for FileStore {
    fn load(&mut self) -> Result<Option<NvramImage>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(&self.path)
            .with_context(|| format!("Cannot read NVRAM from {}", self.path.display()))?;
        Ok(Some(decode_image(&data).with_context(|| {
            format!("Invalid NVRAM file {}", self.path.display())
        })?))
    }

    fn save(&mut self, cells: &NvramImage) -> Result<()> {
        std::fs::write(&self.path, encode_image(cells))
            .with_context(|| format!("Cannot write NVRAM to {}", self.path.display()))
    }
}

/// Keeps the last saved image in memory. Used for tests and when persistence is disabled.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct MemoryStore {
    pub image: Option<NvramImage>,
    pub save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(image: NvramImage) -> Self {
        Self {
            image: Some(image),
            save_count: 0,
        }
    }
}

impl NvramStore for MemoryStore {
    fn load(&mut self) -> Result<Option<NvramImage>> {
        Ok(self.image)
    }

    fn save(&mut self, cells: &NvramImage) -> Result<()> {
        self.image = Some(*cells);
        self.save_count += 1;
        Ok(())
    }
}

pub fn encode_image(cells: &NvramImage) -> Vec<u8> {
    cells.iter().flat_map(|cell| cell.to_ne_bytes()).collect()
}

pub fn decode_image(data: &[u8]) -> Result<NvramImage> {
    ensure!(
        data.len() == NVRAM_IMAGE_SIZE,
        "Expected {} bytes, got {} bytes",
        NVRAM_IMAGE_SIZE,
        data.len()
    );
    let mut cells = [0_u16; NUM_CELLS];
    for (cell, word) in cells.iter_mut().zip(data.chunks_exact(2)) {
        *cell = u16::from_ne_bytes([word[0], word[1]]);
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("NVRAM.bin"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("NVRAM.bin");
        let mut cells = [0_u16; NUM_CELLS];
        cells[0] = 0x1234;
        cells[15] = 0xBEEF;

        FileStore::new(&path).save(&cells).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), NVRAM_IMAGE_SIZE);
        assert_eq!(data[0..2], 0x1234_u16.to_ne_bytes());
        assert_eq!(FileStore::new(&path).load().unwrap(), Some(cells));
    }

    #[test]
    fn test_file_store_rejects_short_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("NVRAM.bin");
        std::fs::write(&path, [0x12, 0x34, 0x56]).unwrap();
        assert!(FileStore::new(&path).load().is_err());
    }

    #[test]
    fn test_file_store_rejects_long_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("NVRAM.bin");
        let mut data = encode_image(&[0x5A5A; NUM_CELLS]);
        data.push(0);
        std::fs::write(&path, data).unwrap();
        assert!(FileStore::new(&path).load().is_err());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(&[7; NUM_CELLS]).unwrap();
        store.save(&[8; NUM_CELLS]).unwrap();
        assert_eq!(store.save_count, 2);
        assert_eq!(store.load().unwrap(), Some([8; NUM_CELLS]));
    }
}
