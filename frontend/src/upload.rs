use async_trait::async_trait;
use gloo_file::File as GlooFile;
use gloo_file::futures::read_as_bytes;
use shared::{ClassifyError, UploadSource};
use web_sys::FileList;

pub struct BrowserFile(GlooFile);

impl From<web_sys::File> for BrowserFile {
    fn from(file: web_sys::File) -> Self {
        BrowserFile(GlooFile::from(file))
    }
}

#[async_trait(?Send)]
impl UploadSource for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.raw_mime_type()
    }

    fn size(&self) -> u64 {
        self.0.size()
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, ClassifyError> {
        read_as_bytes(&self.0)
            .await
            .map_err(|err| ClassifyError::ReadError(err.to_string()))
    }
}

/// Files of a drop or picker event, in order. Nothing is read until the
/// workflow asks for it.
pub fn browser_files(file_list: &FileList) -> impl Iterator<Item = BrowserFile> + '_ {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .map(BrowserFile::from)
}
