//! Image upload for court and product forms. Files are checked locally
//! before anything is sent.

use crate::api::{ApiClient, ApiError, Body, Method, Query};
use std::path::Path;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_FOLDER: &str = "products";

pub struct UploadService<'a> {
    pub(super) api: &'a ApiClient,
}

/// MIME type guessed from the file extension
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Reject files over the size cap, then anything that is not an image
pub fn validate_image(mime: &str, size: u64) -> Result<(), ApiError> {
    if size > MAX_IMAGE_BYTES {
        return Err(ApiError::Invalid("File size must be less than 5MB".to_string()));
    }
    if !mime.starts_with("image/") {
        return Err(ApiError::Invalid("Only image files are allowed".to_string()));
    }
    Ok(())
}

/// Encode a `multipart/form-data` body with `file` and `folder` parts
pub fn multipart_body(
    boundary: &str,
    file_name: &str,
    mime: &str,
    bytes: &[u8],
    folder: &str,
) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            boundary,
            file_name.replace('"', "_"),
            mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(
        format!(
            "\r\n--{}\r\nContent-Disposition: form-data; name=\"folder\"\r\n\r\n{}\r\n--{}--\r\n",
            boundary, folder, boundary
        )
        .as_bytes(),
    );
    body
}

impl UploadService<'_> {
    /// Upload an image file and return its hosted URL
    pub fn image(&self, path: &Path, folder: &str) -> Result<String, ApiError> {
        let mime = mime_for(path);
        let size = std::fs::metadata(path)
            .map_err(|e| ApiError::Invalid(format!("{}: {}", path.display(), e)))?
            .len();
        validate_image(mime, size)?;

        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::Invalid(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image");
        self.image_bytes(file_name, mime, &bytes, folder)
    }

    pub fn image_bytes(
        &self,
        file_name: &str,
        mime: &str,
        bytes: &[u8],
        folder: &str,
    ) -> Result<String, ApiError> {
        validate_image(mime, bytes.len() as u64)?;

        let boundary = format!("courtside-{}", uuid::Uuid::new_v4().simple());
        let body = Body::Multipart {
            bytes: multipart_body(&boundary, file_name, mime, bytes, folder),
            boundary,
        };
        self.api
            .send(Method::Post, "upload/image", Query::new(), Some(body))?
            .into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::client;
    use crate::api::transport::mock::MockTransport;
    use serde_json::json;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("court.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("racket.webp")), "image/webp");
        assert_eq!(mime_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_validate_image() {
        assert!(validate_image("image/png", 1024).is_ok());
        assert!(validate_image("image/png", MAX_IMAGE_BYTES).is_ok());

        let err = validate_image("image/png", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 5MB");

        let err = validate_image("application/pdf", 10).unwrap_err();
        assert_eq!(err.to_string(), "Only image files are allowed");
    }

    #[test]
    fn test_size_is_checked_before_type() {
        let err = validate_image("application/pdf", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 5MB");
    }

    #[test]
    fn test_rejected_file_sends_nothing() {
        let (api, requests, dir) = client(MockTransport::new());
        let path = dir.path().join("price-list.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        assert!(api.uploads().image(&path, DEFAULT_FOLDER).is_err());
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_upload_multipart() {
        let (api, requests, dir) = client(MockTransport::new().reply(
            200,
            json!({ "success": true, "data": "https://cdn.test/courts/a.png" }),
        ));
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let url = api.uploads().image(&path, "courts").unwrap();
        assert_eq!(url, "https://cdn.test/courts/a.png");

        let sent = requests.borrow();
        assert_eq!(sent[0].url, "http://backend.test/api/upload/image");
        match &sent[0].body {
            Some(Body::Multipart { boundary, bytes }) => {
                let text = String::from_utf8_lossy(bytes);
                assert!(text.starts_with(&format!("--{}\r\n", boundary)));
                assert!(text.contains("name=\"file\"; filename=\"a.png\""));
                assert!(text.contains("Content-Type: image/png"));
                assert!(text.contains("name=\"folder\"\r\n\r\ncourts\r\n"));
                assert!(text.ends_with(&format!("--{}--\r\n", boundary)));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
