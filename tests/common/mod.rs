//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which pairs an in-memory DB with a temporary
//! media root and a [`UserService`] wired to both.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use foodie::config::ThumbnailConfig;
use foodie::storage::{OverwriteStorage, Storage};
use foodie::users::UserService;
use foodie_db::pool::{init_memory_pool, DbPool, PooledConnection};
use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;

pub struct TestHarness {
    pub service: UserService,
    pub db: DbPool,
    pub storage: Arc<OverwriteStorage>,
    pub media: TempDir,
}

impl TestHarness {
    /// Harness with the default 128x128 thumbnail size.
    pub fn new() -> Self {
        Self::with_thumbnails(ThumbnailConfig::default())
    }

    pub fn with_thumbnails(thumbnails: ThumbnailConfig) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let media = tempfile::tempdir().expect("failed to create media dir");
        let storage = Arc::new(OverwriteStorage::new(media.path()));
        let service = UserService::new(db.clone(), storage.clone() as Arc<dyn Storage>, thumbnails);

        Self {
            service,
            db,
            storage,
            media,
        }
    }

    pub fn conn(&self) -> PooledConnection {
        self.db.get().expect("failed to get connection")
    }

    /// Put a file straight into media storage, bypassing the user service.
    pub fn put_file(&self, path: &str, content: &[u8]) {
        self.storage.save(path, content).expect("failed to store file");
    }
}

/// Encode a solid-colour RGBA image in the given format.
pub fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 80, 40, 255]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, format)
        .expect("failed to encode sample image");
    buf.into_inner()
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    sample_image(width, height, ImageFormat::Png)
}
