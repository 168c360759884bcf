use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::AdminMiddleware,
    AppState,
};

/// Upload ceiling, checked while the stream is read so an oversize payload
/// is rejected before anything is written to disk.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/image")
            .wrap(AdminMiddleware)
            .route(web::post().to(upload_image)),
    );
}

/// Accepts only a fixed set of image types and maps each to the extension
/// the stored file gets.
fn validate_image_mime(m: Option<&mime::Mime>) -> AppResult<&'static str> {
    let m = m.ok_or_else(|| AppError::Validation("Missing file content type".to_string()))?;

    if m.type_() != mime::IMAGE {
        return Err(AppError::Validation(format!(
            "Unsupported file type '{}': only images are accepted",
            m
        )));
    }

    match m.subtype().as_str() {
        "png" => Ok("png"),
        "jpeg" => Ok("jpg"),
        "webp" => Ok("webp"),
        "gif" => Ok("gif"),
        other => Err(AppError::Validation(format!(
            "Unsupported image format '{}': only PNG, JPEG, WebP and GIF are accepted",
            other
        ))),
    }
}

/// Cross-checks the client filename against its extension; a filename whose
/// extension maps to a non-image type is rejected even when the part's
/// content type claims to be an image.
fn validate_filename(filename: Option<&str>) -> AppResult<()> {
    if let Some(name) = filename {
        if let Some(guessed) = mime_guess::from_path(name).first() {
            if guessed.type_() != mime::IMAGE {
                return Err(AppError::Validation(format!(
                    "File '{}' does not look like an image",
                    name
                )));
            }
        }
    }
    Ok(())
}

/// POST /image - Validated image upload (admin). The stored reference is
/// returned to the caller, which persists it in a setting or page document.
async fn upload_image(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = validate_image_mime(field.content_type())?;
        let client_filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());
        validate_filename(client_filename.as_deref())?;

        let mut data = BytesMut::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
        {
            if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(AppError::Validation(format!(
                    "Image exceeds the {} MiB size limit",
                    MAX_IMAGE_BYTES / (1024 * 1024)
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let upload_dir = std::path::Path::new(&state.config.upload_dir);
        tokio::fs::create_dir_all(upload_dir).await?;
        tokio::fs::write(upload_dir.join(&filename), &data).await?;

        tracing::info!("Stored uploaded image {} ({} bytes)", filename, data.len());

        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "path": format!("/uploads/{}", filename)
        })));
    }

    Err(AppError::Validation(
        "Missing 'file' field in upload".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mime_of(s: &str) -> mime::Mime {
        s.parse().unwrap()
    }

    #[test]
    fn test_non_image_types_rejected() {
        assert!(validate_image_mime(Some(&mime_of("application/pdf"))).is_err());
        assert!(validate_image_mime(Some(&mime_of("text/html"))).is_err());
        assert!(validate_image_mime(None).is_err());
    }

    #[test]
    fn test_unsupported_image_format_rejected() {
        assert!(validate_image_mime(Some(&mime_of("image/tiff"))).is_err());
    }

    #[test]
    fn test_image_types_accepted_with_extension() {
        assert_eq!(validate_image_mime(Some(&mime_of("image/png"))).unwrap(), "png");
        assert_eq!(validate_image_mime(Some(&mime_of("image/jpeg"))).unwrap(), "jpg");
        assert_eq!(validate_image_mime(Some(&mime_of("image/webp"))).unwrap(), "webp");
        assert_eq!(validate_image_mime(Some(&mime_of("image/gif"))).unwrap(), "gif");
    }

    #[test]
    fn test_filename_cross_check() {
        assert!(validate_filename(Some("photo.png")).is_ok());
        assert!(validate_filename(Some("report.pdf")).is_err());
        // Unknown extensions fall through to the content-type check alone
        assert!(validate_filename(Some("photo")).is_ok());
        assert!(validate_filename(None).is_ok());
    }
}
