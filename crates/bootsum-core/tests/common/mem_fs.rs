//! In-memory `FileAccess` for exercising the verifier without real files.

use std::collections::HashMap;

use bootsum_core::{FileAccess, IoStatus, OpenMode};

#[derive(Debug, Default)]
pub struct MemFs {
    files: HashMap<String, Vec<u8>>,
    /// Paths that fail to open with `AccessDenied`.
    pub locked: Vec<String>,
    pub opens: usize,
    pub closes: usize,
}

pub struct MemHandle {
    path: String,
    pos: usize,
    writable: bool,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, path: &str, data: &[u8]) {
        self.files.insert(path.to_string(), data.to_vec());
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn remove(&mut self, path: &str) {
        self.files.remove(path);
    }
}

impl FileAccess for MemFs {
    type Handle = MemHandle;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<MemHandle, IoStatus> {
        if self.locked.iter().any(|p| p == path) {
            return Err(IoStatus::AccessDenied);
        }
        match mode {
            OpenMode::Read if !self.files.contains_key(path) => return Err(IoStatus::NotFound),
            OpenMode::Read => {}
            OpenMode::CreateTruncate => {
                self.files.insert(path.to_string(), Vec::new());
            }
        }
        self.opens += 1;
        Ok(MemHandle {
            path: path.to_string(),
            pos: 0,
            writable: mode == OpenMode::CreateTruncate,
        })
    }

    fn read(&mut self, handle: &mut MemHandle, buf: &mut [u8]) -> Result<usize, IoStatus> {
        let data = self.files.get(&handle.path).ok_or(IoStatus::DeviceError)?;
        let rest = &data[handle.pos.min(data.len())..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        handle.pos += n;
        Ok(n)
    }

    fn write(&mut self, handle: &mut MemHandle, bytes: &[u8]) -> Result<usize, IoStatus> {
        if !handle.writable {
            return Err(IoStatus::AccessDenied);
        }
        let data = self.files.get_mut(&handle.path).ok_or(IoStatus::DeviceError)?;
        data.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn close(&mut self, _handle: MemHandle) {
        self.closes += 1;
    }
}
