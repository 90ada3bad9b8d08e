use std::{fs, path::Path};

use log::info;

use crate::address::{BANK_SIZE, ROM_SIZE};
use crate::error::RomError;

/// Immutable cartridge image.
#[derive(Debug, Clone)]
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Result<Self, RomError> {
        if data.len() > ROM_SIZE as usize {
            return Err(RomError::TooLarge {
                len: data.len(),
                limit: ROM_SIZE,
            });
        }
        Ok(Self { data })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| RomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rom = Self::new(data)?;
        info!(
            "Loaded ROM {} \"{}\" ({} banks)",
            path.display(),
            rom.title(),
            rom.bank_count()
        );
        Ok(rom)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bank_count(&self) -> u32 {
        (self.data.len() as u32).div_ceil(BANK_SIZE)
    }

    /// Cartridge title from the header, NUL padding stripped.
    pub fn title(&self) -> String {
        let end = 0x0143.min(self.data.len());
        let mut slice = &self.data[0x0134.min(end)..end];
        if let Some(pos) = slice.iter().position(|&b| b == 0) {
            slice = &slice[..pos];
        }
        String::from_utf8_lossy(slice).trim().to_string()
    }
}
