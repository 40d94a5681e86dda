// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(unused_imports)]
mod json_store;
pub mod model;
pub mod store;

pub use model::{Note, NoteDraft, NotePatch};
pub use store::{NoteStore, NoteStoreError};
