//! Product image endpoints.
//!
//! Uploads go through the admin gates; serving is public and proxies the
//! object from S3 storage.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::Storage;

/// Response for a stored product image.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploadResponse {
    /// S3 object key
    pub key: String,
    /// Public URL path serving the image
    pub url: String,
}

/// Keys handed to the storage layer must stay inside the product image
/// prefix and free of traversal segments.
fn is_valid_image_key(key: &str) -> bool {
    key.starts_with("products/") && !key.contains("..")
}

/// Upload a product image.
///
/// Accepts a single multipart file field, validates the extension against
/// the image allow-list and stores the object under a fresh UUID key.
#[utoipa::path(
    post,
    path = "/api/admin/images",
    tag = "Images",
    responses(
        (status = 201, description = "Image stored", body = ImageUploadResponse),
        (status = 400, description = "Invalid upload", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
#[post("")]
pub async fn upload_image(
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;

        let filename = match content_disposition.get_filename() {
            Some(name) => name.to_string(),
            None => continue, // not a file field
        };

        let ext = match filename.rsplit_once('.') {
            Some((_, e)) if !e.is_empty() => e.to_lowercase(),
            _ => {
                return Err(AppError::InvalidInput(
                    "Image filename must have an extension".to_string(),
                ));
            }
        };

        if !Storage::is_allowed_image_extension(&ext) {
            return Err(AppError::InvalidInput(format!(
                "Unsupported image type: .{}",
                ext
            )));
        }

        let max = config.max_image_size;
        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            if data.len() + chunk.len() > max {
                return Err(AppError::InvalidInput(format!(
                    "Image exceeds maximum size of {} bytes",
                    max
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(AppError::InvalidInput("Empty image upload".to_string()));
        }

        let image_id = Uuid::new_v4().to_string();
        let key = Storage::product_image_key(&image_id, &ext);
        let content_type = Storage::content_type_for_extension(&ext);

        storage.put(&key, data, Some(content_type)).await?;

        info!(target: "api", key = %key, "Product image uploaded");

        return Ok(HttpResponse::Created().json(ImageUploadResponse {
            url: format!("/images/{}", key),
            key,
        }));
    }

    Err(AppError::InvalidInput(
        "No file field in upload".to_string(),
    ))
}

/// Serve a product image from S3 storage.
#[utoipa::path(
    get,
    path = "/images/{key}",
    tag = "Images",
    params(
        ("key" = String, Path, description = "S3 object key")
    ),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "No such image", body = crate::error::ErrorResponse)
    )
)]
pub async fn serve_image(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();

    // Invalid keys 404 like absent ones; the validation is not leaked.
    if !is_valid_image_key(&key) {
        return Err(AppError::NotFound("Image".to_string()));
    }

    debug!("Serving image from S3: {}", key);

    let (data, content_type) = storage.get(&key).await?;

    let content_type = content_type.unwrap_or_else(|| {
        // Infer from extension
        let ext = key.rsplit('.').next().unwrap_or("");
        Storage::content_type_for_extension(ext).to_string()
    });

    Ok(HttpResponse::Ok().content_type(content_type).body(data))
}

/// Delete a product image.
#[utoipa::path(
    delete,
    path = "/api/admin/images/{key}",
    tag = "Images",
    params(
        ("key" = String, Path, description = "S3 object key")
    ),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 404, description = "Invalid key", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_image(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();

    if !is_valid_image_key(&key) {
        return Err(AppError::NotFound("Image".to_string()));
    }

    storage.delete(&key).await?;

    info!(target: "api", key = %key, "Product image deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Image deleted" })))
}

/// Configure admin image management routes; mount behind both auth gates.
pub fn configure_admin_image_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_image)
        .service(web::resource("/{key:.*}").route(web::delete().to(delete_image)));
}

/// Configure public image serving.
pub fn configure_public_image_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/images/{key:.*}").route(web::get().to(serve_image)));
}
