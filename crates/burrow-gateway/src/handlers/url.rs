use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

pub async fn create_url_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<CreateUrlResponse>> {
    let Json(request) = request?;
    if request.url.trim().is_empty() {
        return Err(AppError::BadRequest("url is required".to_string()));
    }

    let code = state.shortener().create_short_url(&request.url).await?;
    info!(code = %code, "created short url");

    Ok(Json(CreateUrlResponse {
        short_url: state.short_url(&code),
        original_url: request.url,
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let long_url = state.shortener().get_long_url(&short_code).await?;

    // Long URLs are stored verbatim and may not be valid header values.
    let location =
        HeaderValue::try_from(long_url).map_err(|_| AppError::InvalidRedirect(short_code))?;

    Ok((StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response())
}
