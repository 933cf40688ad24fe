use axum::extract::Multipart;

use crate::errors::AppError;
use crate::normalizer::UploadedDocument;

/// Collects every file part named `field_name`. Other parts are skipped.
///
/// A part without a `Content-Type` header gets an empty declared type, which the
/// normalizer rejects as unsupported.
pub async fn read_uploads(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Vec<UploadedDocument>, AppError> {
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let declared_media_type = field.content_type().unwrap_or_default().to_string();
        let content = field.bytes().await?;

        documents.push(UploadedDocument::new(filename, declared_media_type, content));
    }

    Ok(documents)
}
