use async_trait::async_trait;
use derive_more::Display;
use uuid::Uuid;

use crate::error::ClassifyError;

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// A file picked or dropped by the user. Contents are only read once the
/// declared type and size have been accepted.
#[async_trait(?Send)]
pub trait UploadSource {
    fn name(&self) -> String;
    fn mime_type(&self) -> String;
    fn size(&self) -> u64;
    async fn read_bytes(&self) -> Result<Vec<u8>, ClassifyError>;
}

pub fn validate<S: UploadSource + ?Sized>(source: &S) -> Result<(), ClassifyError> {
    let mime_type = source.mime_type();
    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(ClassifyError::InvalidType { mime_type });
    }

    let size = source.size();
    if size > MAX_UPLOAD_BYTES {
        return Err(ClassifyError::TooLarge { size });
    }

    Ok(())
}

// Tags log lines of one upload so overlapping uploads can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        UploadId(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}
