//! On-disk layout for uploaded documents.
//!
//! Files live under `<root>/<request id>/`, one subdirectory per request so
//! concurrent requests never share a namespace. The stored name is a random
//! token plus the original extension; the uploader's filename is never part
//! of the path.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::access_code::generate_upload_token;
use crate::upload::validate::SNIFF_LENGTH;

#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn request_dir(&self, request_id: &Uuid) -> PathBuf {
        self.root.join(request_id.to_string())
    }

    pub fn path_of(&self, request_id: &Uuid, stored_filename: &str) -> PathBuf {
        self.request_dir(request_id).join(stored_filename)
    }

    /// Persist bytes under a fresh token name, returning the stored
    /// filename and its full path.
    pub fn store(
        &self,
        request_id: &Uuid,
        original_filename: &str,
        bytes: &[u8],
    ) -> io::Result<(String, PathBuf)> {
        let dir = self.request_dir(request_id);
        fs::create_dir_all(&dir)?;

        let stored_filename = match Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) => format!("{}.{}", generate_upload_token(), ext),
            None => generate_upload_token(),
        };
        let path = dir.join(&stored_filename);
        fs::write(&path, bytes)?;
        Ok((stored_filename, path))
    }

    /// Read the leading bytes used for signature sniffing.
    pub fn read_sniff_prefix(path: &Path) -> io::Result<Vec<u8>> {
        let mut file = File::open(path)?;
        let mut prefix = vec![0u8; SNIFF_LENGTH];
        let mut filled = 0;
        while filled < prefix.len() {
            let read = file.read(&mut prefix[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        prefix.truncate(filled);
        Ok(prefix)
    }

    /// Idempotent delete: a path that is already gone is not an error.
    pub fn remove(path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Drop a request's whole upload directory (used on cascade delete).
    pub fn remove_request_dir(&self, request_id: &Uuid) -> io::Result<()> {
        match fs::remove_dir_all(self.request_dir(request_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}
