//! External collaborators behind traits
//!
//! - [`Mailer`] - verification code delivery
//! - [`ImageStore`] - product image storage

pub mod image_store;
pub mod mailer;

pub use image_store::{IMAGES_ROUTE, ImageStore, LocalImageStore, StorageError};
pub use mailer::{LogMailer, MailError, Mailer, MemoryMailer};
