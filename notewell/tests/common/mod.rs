// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use notewell::api;
use notewell::bootstrap;
use notewell::config::ValidatedConfig;
use notewell::notes::NoteStore;
use notewell::runtime_paths::RuntimePaths;
use notewell::util::test_fixtures::TestFixtureRoot;
use std::sync::Arc;

/// Everything an API test needs: a bootstrapped runtime root plus the shared
/// application state built from it. The fixture directory is removed when the
/// harness is dropped.
pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub note_store: Arc<NoteStore>,
}

/// The shared state handed to `build_test_app`. Cloning is cheap, so each
/// test can build as many app instances as it needs from one harness.
#[derive(Clone)]
pub struct AppBundle {
    pub config: Arc<ValidatedConfig>,
    pub note_store: Arc<NoteStore>,
}

impl TestHarness {
    /// Bootstraps a fresh runtime root in a unique fixture directory, exactly
    /// as the server binary would on first start.
    pub fn new() -> Self {
        let fixture =
            TestFixtureRoot::new_unique("api-test-suite").expect("failed to create fixture root");
        let bootstrap = bootstrap::bootstrap_runtime(fixture.path())
            .expect("bootstrap should succeed on a fresh fixture root");

        let config = Arc::new(bootstrap.validated_config);
        let runtime_paths = bootstrap.runtime_paths;
        let note_store = Arc::new(NoteStore::new(runtime_paths.notes_file.clone()));

        Self {
            fixture,
            config,
            runtime_paths,
            note_store,
        }
    }

    pub fn app_bundle(&self) -> AppBundle {
        AppBundle {
            config: self.config.clone(),
            note_store: self.note_store.clone(),
        }
    }
}

/// Builds an actix `App` wired the same way as the production server in
/// `main.rs`, minus the request logger.
pub fn build_test_app(
    bundle: AppBundle,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(bundle.config))
        .app_data(web::Data::from(bundle.note_store))
        .configure(api::configure)
}
