use axum::extract::FromRequest;

use crate::ServerError;

/// `Json` extractor whose rejections use the service's `{error}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);
