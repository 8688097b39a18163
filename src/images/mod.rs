//! Image uploads: where they are stored and how thumbnails are produced.
//!
//! Every record type with pictures keeps an `image` and a `thumbnail`
//! directory under the media root.

mod thumbnail;

pub use thumbnail::{encode_jpeg, render, Rendered};

use std::fmt;

/// Upload directories under the media root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadPath {
    BaseUserImages,
    BaseUserThumbnails,
    DispatcherImages,
    DispatcherThumbnails,
    MenuItemImages,
    MenuItemThumbnails,
}

impl UploadPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseUserImages => "base_user/images",
            Self::BaseUserThumbnails => "base_user/thumbnails",
            Self::DispatcherImages => "dispatcher/images",
            Self::DispatcherThumbnails => "dispatcher/thumbnails",
            Self::MenuItemImages => "menu_items/images",
            Self::MenuItemThumbnails => "menu_items/thumbnails",
        }
    }

    /// Storage path of `file_name` inside this directory.
    pub fn join(&self, file_name: &str) -> String {
        format!("{}/{}", self.as_str(), file_name)
    }
}

impl fmt::Display for UploadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File name used for both the re-encoded original and the thumbnail of a
/// record.
pub fn jpeg_file_name(id: impl fmt::Display) -> String {
    format!("{id}.jpeg")
}
