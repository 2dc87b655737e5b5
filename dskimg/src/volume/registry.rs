//! Registry of mounted images
//!
//! Keys are caller-chosen image identifiers (typically the canonical image
//! path). A key stays reserved from the start of its mount until the
//! returned [`MountedVolume`] is dropped or unmounted, so one image cannot
//! be mounted twice at once.

use super::{mount_with_options, Volume};
use crate::device::ImageSource;
use crate::error::{DskimgError, Result};
use crate::types::MountOptions;
use alloc::collections::BTreeSet;
use alloc::string::String;
use core::ops::Deref;
use spin::Mutex;

/// Set of currently mounted image keys
pub struct MountRegistry {
    mounted: Mutex<BTreeSet<String>>,
}

impl MountRegistry {
    /// Create an empty registry; usable in a `static`
    pub const fn new() -> Self {
        Self {
            mounted: Mutex::new(BTreeSet::new()),
        }
    }

    /// Mount `source` under `key`
    ///
    /// Fails with `AlreadyMounted` while another mount holds the key. A
    /// failed mount releases the key again.
    pub fn mount<S: ImageSource>(
        &self,
        key: impl Into<String>,
        source: S,
        options: MountOptions,
    ) -> Result<MountedVolume<'_, S>> {
        let key = key.into();

        if !self.mounted.lock().insert(key.clone()) {
            tracing::debug!(key = %key, "image already mounted");
            return Err(DskimgError::AlreadyMounted);
        }

        match mount_with_options(source, options) {
            Ok(volume) => Ok(MountedVolume {
                registry: self,
                key,
                volume,
            }),
            Err(err) => {
                self.release(&key);
                Err(err)
            }
        }
    }

    /// Mount an image file, keyed by its canonical path
    #[cfg(feature = "std")]
    pub fn mount_path(
        &self,
        path: impl AsRef<std::path::Path>,
        options: MountOptions,
    ) -> Result<MountedVolume<'_, crate::device::FileImage>> {
        let path = std::fs::canonicalize(path).map_err(DskimgError::from_io)?;
        let key = path.to_string_lossy().into_owned();
        self.mount(key, crate::device::FileImage::new(path), options)
    }

    /// Is `key` currently mounted?
    pub fn is_mounted(&self, key: &str) -> bool {
        self.mounted.lock().contains(key)
    }

    /// Number of mounted images
    pub fn len(&self) -> usize {
        self.mounted.lock().len()
    }

    /// Nothing mounted?
    pub fn is_empty(&self) -> bool {
        self.mounted.lock().is_empty()
    }

    fn release(&self, key: &str) {
        self.mounted.lock().remove(key);
    }
}

impl Default for MountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A volume registered in a [`MountRegistry`]; unregisters on drop
pub struct MountedVolume<'r, S: ImageSource> {
    registry: &'r MountRegistry,
    key: String,
    volume: Volume<S>,
}

impl<S: ImageSource> MountedVolume<'_, S> {
    /// Registry key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the key
    pub fn unmount(self) {}
}

impl<S: ImageSource> Deref for MountedVolume<'_, S> {
    type Target = Volume<S>;

    fn deref(&self) -> &Volume<S> {
        &self.volume
    }
}

impl<S: ImageSource> Drop for MountedVolume<'_, S> {
    fn drop(&mut self) {
        tracing::debug!(key = %self.key, "unmounting image");
        self.registry.release(&self.key);
    }
}
