// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::Serialize;

mod notes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_payload_error))
            .route("/notes", web::get().to(notes::list_notes))
            .route("/notes", web::post().to(notes::create_note))
            .route("/notes/search", web::get().to(notes::search_notes))
            .route("/notes/{id}", web::put().to(notes::update_note))
            .route("/notes/{id}", web::delete().to(notes::delete_note)),
    );
}

#[derive(Serialize)]
struct SuccessBody<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

/// Wraps `data` in the `{"success": true, "data": ...}` envelope every API
/// response uses.
pub(crate) fn success_response<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(SuccessBody {
        success: true,
        data,
    })
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        success: false,
        error: message,
    })
}

/// Keeps body-extractor rejections in the envelope handler failures use.
fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_response(err.status_code(), &err.to_string());
    InternalError::from_response(err, response).into()
}
