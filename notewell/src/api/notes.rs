// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{error_response, success_response};
use crate::notes::{NoteDraft, NotePatch, NoteStore, NoteStoreError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn list_notes(store: web::Data<NoteStore>) -> HttpResponse {
    match store.list() {
        Ok(notes) => success_response(StatusCode::OK, notes),
        Err(err) => note_error_response(err),
    }
}

pub async fn create_note(
    store: web::Data<NoteStore>,
    payload: web::Json<NoteDraft>,
) -> HttpResponse {
    match store.create(payload.into_inner()) {
        Ok(note) => success_response(StatusCode::CREATED, note),
        Err(err) => note_error_response(err),
    }
}

pub async fn update_note(
    store: web::Data<NoteStore>,
    path: web::Path<String>,
    payload: web::Json<NotePatch>,
) -> HttpResponse {
    let id = path.into_inner();
    match store.update(&id, payload.into_inner()) {
        Ok(note) => success_response(StatusCode::OK, note),
        Err(err) => note_error_response(err),
    }
}

pub async fn delete_note(store: web::Data<NoteStore>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    match store.delete(&id) {
        Ok(note) => success_response(StatusCode::OK, note),
        Err(err) => note_error_response(err),
    }
}

/// A missing `q` parameter is handled like an empty one so the caller always
/// gets the same validation message.
pub async fn search_notes(
    store: web::Data<NoteStore>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let query = query.into_inner().q.unwrap_or_default();
    match store.search(&query) {
        Ok(notes) => success_response(StatusCode::OK, notes),
        Err(err) => note_error_response(err),
    }
}

fn note_error_response(err: NoteStoreError) -> HttpResponse {
    let status = match err {
        NoteStoreError::Validation(_) => StatusCode::BAD_REQUEST,
        NoteStoreError::NotFound => StatusCode::NOT_FOUND,
        NoteStoreError::Storage(_) => {
            log::error!("Note storage failure: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, &err.to_string())
}
