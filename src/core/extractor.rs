use axum::{
    body::Body,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Urlencoded form extractor with the same error envelope as [`AppJson`]
pub struct AppForm<T>(pub T);

impl<T, S> FromRequest<S> for AppForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppFormRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppFormRejection(rejection)),
        }
    }
}

pub struct AppFormRejection(FormRejection);

impl IntoResponse for AppFormRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            FormRejection::FailedToDeserializeForm(err) => format!("Invalid form data: {}", err),
            FormRejection::FailedToDeserializeFormBody(err) => {
                format!("Invalid form data: {}", err)
            }
            FormRejection::InvalidFormContentType(err) => {
                format!("Invalid form content type: {}", err)
            }
            _ => "Failed to parse form body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}
