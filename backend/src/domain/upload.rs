//! Uploaded image payloads and naming rules.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Public path prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

const FALLBACK_FILE_NAME: &str = "image";

/// Validation errors for [`ImageUpload`] and stored image names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadValidationError {
    /// The request body was empty.
    EmptyPayload,
    /// The body exceeds the size limit.
    TooLarge { max: usize },
    /// The file is not a supported image type.
    UnsupportedContentType,
    /// The file name is unusable after sanitising.
    InvalidName,
}

impl UploadValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "empty_payload",
            Self::TooLarge { .. } => "payload_too_large",
            Self::UnsupportedContentType => "unsupported_content_type",
            Self::InvalidName => "invalid_name",
        }
    }
}

impl fmt::Display for UploadValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "upload body must not be empty"),
            Self::TooLarge { max } => write!(f, "upload exceeds {max} bytes"),
            Self::UnsupportedContentType => write!(f, "only image uploads are accepted"),
            Self::InvalidName => write!(f, "image name is not a plain file name"),
        }
    }
}

impl std::error::Error for UploadValidationError {}

/// Validated image upload awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate raw request parts.
    ///
    /// The file name is sanitised rather than rejected.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::ImageUpload;
    ///
    /// let upload = ImageUpload::try_new("my photo!.png", "image/png", vec![1, 2, 3]).unwrap();
    /// assert_eq!(upload.file_name(), "myphoto.png");
    /// assert!(ImageUpload::try_new("a.txt", "text/plain", vec![1]).is_err());
    /// ```
    pub fn try_new(
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadValidationError> {
        if bytes.is_empty() {
            return Err(UploadValidationError::EmptyPayload);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadValidationError::TooLarge {
                max: MAX_UPLOAD_BYTES,
            });
        }
        let content_type = content_type.trim().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(UploadValidationError::UnsupportedContentType);
        }
        Ok(Self {
            file_name: sanitize_file_name(file_name),
            content_type,
            bytes,
        })
    }

    /// Sanitised file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type guessed from the extension.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Keep only `[A-Za-z0-9.-]`; an empty result becomes `image`.
pub fn sanitize_file_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-')
        .collect();
    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        cleaned
    }
}

/// Check that `name` is a single plain segment safe to hand to a store.
pub fn validate_stored_name(name: &str) -> Result<(), UploadValidationError> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '-');
    if plain {
        Ok(())
    } else {
        Err(UploadValidationError::InvalidName)
    }
}

/// Content type guessed from a file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Location of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Stored file name, `{millis}-{sanitised name}`.
    pub name: String,
    /// Public URL, `/uploads/{name}`.
    pub url: String,
}

impl StoredImage {
    /// Record an image stored under `name`.
    pub fn new(name: String) -> Self {
        let url = format!("{UPLOADS_URL_PREFIX}{name}");
        Self { name, url }
    }
}

/// Stored image bytes ready to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// MIME type for the `Content-Type` header.
    pub content_type: &'static str,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}
