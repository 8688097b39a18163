//! Account operations that touch both the database and media storage.
//!
//! Saving a [`BaseUser`] through [`UserService::save`] runs the thumbnail
//! hook: when the user has an image, it is re-encoded as JPEG, a thumbnail of
//! the configured size is written next to it, and both paths are stored on
//! the row.

use std::sync::Arc;

use foodie_core::{Error, Result};
use foodie_db::models::{BaseUser, NamedUser};
use foodie_db::pool::{get_conn, DbPool};
use foodie_db::queries::{base_users, customers, operators};

use crate::config::ThumbnailConfig;
use crate::images::{self, UploadPath};
use crate::storage::Storage;

/// Role record created alongside a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Operator,
}

pub struct UserService {
    pool: DbPool,
    storage: Arc<dyn Storage>,
    thumbnails: ThumbnailConfig,
}

impl UserService {
    pub fn new(pool: DbPool, storage: Arc<dyn Storage>, thumbnails: ThumbnailConfig) -> Self {
        Self {
            pool,
            storage,
            thumbnails,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Persist the user, generating its thumbnail first.
    ///
    /// A user without an image, or whose image file is gone from storage, is
    /// saved unchanged. Decode and write failures abort the save. `user` is
    /// only updated once the row has been written.
    pub fn save(&self, user: &mut BaseUser) -> Result<()> {
        let mut updated = user.clone();
        if let Some(image) = user.image.as_deref() {
            match self.storage.open(image) {
                Ok(data) => {
                    let (image, thumbnail) = self.store_rendered(user, &data)?;
                    updated.image = Some(image);
                    updated.thumbnail = Some(thumbnail);
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(user = %user.id, image = %image, "Image missing from storage, skipping thumbnail");
                }
                Err(e) => return Err(e),
            }
        }

        let conn = get_conn(&self.pool)?;
        base_users::save_base_user(&conn, &updated)?;
        *user = updated;
        Ok(())
    }

    /// Write the JPEG original and thumbnail, returning their stored paths.
    fn store_rendered(&self, user: &BaseUser, data: &[u8]) -> Result<(String, String)> {
        let rendered = images::render(data, self.thumbnails)?;
        let file_name = images::jpeg_file_name(user.id);

        let thumbnail = self
            .storage
            .save(&UploadPath::BaseUserThumbnails.join(&file_name), &rendered.thumbnail)?;
        let image = self
            .storage
            .save(&UploadPath::BaseUserImages.join(&file_name), &rendered.original)?;

        tracing::info!(
            user = %user.id,
            image = %image,
            thumbnail = %thumbnail,
            width = self.thumbnails.width,
            height = self.thumbnails.height,
            "Generated user thumbnail"
        );

        Ok((image, thumbnail))
    }

    /// Store an uploaded image for the user and save, which regenerates the
    /// thumbnail.
    ///
    /// The staged upload is removed once it has been re-encoded under the
    /// user's ID, or when the save fails.
    pub fn set_image(&self, user: &mut BaseUser, file_name: &str, content: &[u8]) -> Result<()> {
        if file_name.is_empty() || file_name.contains('/') {
            return Err(Error::validation(format!("invalid image file name: {file_name:?}")));
        }
        let staged = self
            .storage
            .save(&UploadPath::BaseUserImages.join(file_name), content)?;

        let mut candidate = user.clone();
        candidate.image = Some(staged.clone());
        let result = self.save(&mut candidate);

        let keep = match &result {
            Ok(()) => candidate.image.as_deref() == Some(staged.as_str()),
            Err(_) => user.image.as_deref() == Some(staged.as_str()),
        };
        if !keep {
            if let Err(e) = self.storage.delete(&staged) {
                tracing::warn!(path = %staged, error = %e, "Failed to remove staged upload");
            }
        }

        result?;
        *user = candidate;
        Ok(())
    }

    /// Create an active account with a normalized email.
    pub fn create_user(&self, email: &str) -> Result<BaseUser> {
        let conn = get_conn(&self.pool)?;
        base_users::create_user(&conn, email)
    }

    /// Create an account with names and attach a role record, atomically.
    pub fn register(
        &self,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        role: Role,
    ) -> Result<NamedUser> {
        let conn = get_conn(&self.pool)?;
        let tx = conn.unchecked_transaction().map_err(Error::database)?;

        let mut user = BaseUser::new(base_users::normalize_email(email));
        user.first_name = first_name.map(str::to_string);
        user.last_name = last_name.map(str::to_string);
        user.is_active = true;
        base_users::save_base_user(&tx, &user)?;

        let named = match role {
            Role::Customer => NamedUser::Customer(customers::create_customer(&tx, user.id)?),
            Role::Operator => NamedUser::Operator(operators::create_operator(&tx, user.id)?),
        };

        tx.commit().map_err(Error::database)?;
        tracing::info!(user = %user.id, email = %user.email, ?role, "Registered user");
        Ok(named)
    }

    pub fn find_by_email(&self, email: &str) -> Result<BaseUser> {
        let conn = get_conn(&self.pool)?;
        let email = base_users::normalize_email(email);
        base_users::get_base_user_by_email(&conn, &email)?
            .ok_or_else(|| Error::not_found("user", &email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::OverwriteStorage;
    use foodie_db::pool::init_memory_pool;

    fn service(dir: &std::path::Path) -> UserService {
        UserService::new(
            init_memory_pool().unwrap(),
            Arc::new(OverwriteStorage::new(dir)),
            ThumbnailConfig { width: 16, height: 8 },
        )
    }

    #[test]
    fn save_without_image_leaves_thumbnail_empty() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let mut user = BaseUser::new("plain@example.com");
        svc.save(&mut user).unwrap();

        let stored = svc.find_by_email("plain@example.com").unwrap();
        assert!(stored.image.is_none());
        assert!(stored.thumbnail.is_none());
    }

    #[test]
    fn register_attaches_role() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let named = svc
            .register("Op@Example.COM", Some("Grace"), Some("Hopper"), Role::Operator)
            .unwrap();
        assert!(named.is_operator());

        let user = svc.find_by_email("Op@example.com").unwrap();
        assert_eq!(user.full_name(), "Grace Hopper");
        assert_eq!(named.base_user_id(), user.id);
    }

    #[test]
    fn register_duplicate_email_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        svc.register("dup@example.com", None, None, Role::Customer).unwrap();
        let err = svc
            .register("dup@EXAMPLE.com", None, None, Role::Customer)
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn set_image_rejects_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let mut user = svc.create_user("a@example.com").unwrap();

        let err = svc.set_image(&mut user, "../x.png", b"data").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn failed_row_write_leaves_user_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        svc.create_user("taken@example.com").unwrap();
        svc.storage()
            .save("base_user/images/pic.png", &png(8, 8))
            .unwrap();

        let mut user = BaseUser::new("taken@example.com");
        user.image = Some("base_user/images/pic.png".into());
        let before = user.clone();

        let err = svc.save(&mut user).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(user, before);
    }

    #[test]
    fn set_image_removes_staged_upload() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let mut user = svc.create_user("pic@example.com").unwrap();

        svc.set_image(&mut user, "upload.png", &png(8, 8)).unwrap();

        assert!(!svc.storage().exists("base_user/images/upload.png").unwrap());
        let image = user.image.clone().unwrap();
        assert_eq!(image, format!("base_user/images/{}.jpeg", user.id));
        assert!(svc.storage().exists(&image).unwrap());
    }

    #[test]
    fn set_image_with_corrupt_upload_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let mut user = svc.create_user("bad@example.com").unwrap();
        let before = user.clone();

        let err = svc.set_image(&mut user, "bad.png", b"junk").unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert_eq!(user, before);
        assert!(!svc.storage().exists("base_user/images/bad.png").unwrap());
    }

    #[test]
    fn find_missing_user_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        assert!(svc.find_by_email("ghost@example.com").unwrap_err().is_not_found());
    }
}
