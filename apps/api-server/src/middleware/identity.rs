//! Caller identity extraction.
//!
//! Authentication itself lives at the platform edge; by the time a request
//! reaches this service the verified subject id arrives in the `X-User-Id`
//! header. This extractor only parses it.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{Ready, ready};
use uuid::Uuid;

use super::error::AppError;

const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated subject of the request.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let caller = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(|user_id| Caller { user_id })
            .ok_or(AppError::Unauthorized);

        ready(caller)
    }
}
