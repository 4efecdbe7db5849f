//! View Shell
//!
//! Route-based switch between the viewer and debug scenes, plus the loading
//! state of whichever view is mounted.
//!
//! # Mount lifecycle
//!
//! 1. [`ViewShell::navigate`] unmounts the current view and, for a known
//!    route, starts a mount: it hands out a [`MountTicket`] and lists the
//!    resources the view needs ([`ViewShell::pending_requests`]).
//! 2. The embedder loads them however it likes and reports each result with
//!    [`ViewShell::resource_loaded`]. [`ViewShell::drive`] does both steps
//!    synchronously with an [`AssetLoader`].
//! 3. Once every resource has resolved the scene is built in one go and the
//!    mount becomes `Ready`. Any failure makes it `Failed` instead.
//!
//! Every mount gets a fresh generation number. Unmounting bumps it, so a
//! result delivered with a stale ticket is dropped without building anything.

pub mod loading;
pub mod route;

pub use loading::{LoadState, LoadTracker};
pub use route::{NAV_ITEMS, NavBar, NavItem, Route};

use std::path::{Path, PathBuf};

use crate::assets::{AssetGraph, AssetHandle, AssetLoader, EnvironmentMap};
use crate::classify::NodeClassifier;
use crate::compose::{build_debug_scene, build_viewer_scene_with};
use crate::errors::Result;
use crate::resources::material::SharedProfiles;
use crate::scene::scene::Scene;
use crate::settings::ViewerSettings;

/// Identifies one mount. Results carrying an older ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountTicket {
    generation: u64,
}

impl MountTicket {
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A resource a mounted view is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    Model(PathBuf),
    Environment(PathBuf),
}

impl ResourceRequest {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ResourceRequest::Model(p) | ResourceRequest::Environment(p) => p,
        }
    }
}

/// A resolved resource, delivered back to the shell.
#[derive(Debug, Clone)]
pub enum LoadedResource {
    Model(AssetHandle<AssetGraph>),
    Environment(AssetHandle<EnvironmentMap>),
}

/// What a delivered result did to the mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountEvent {
    /// Still waiting for more resources.
    Progress { loaded: usize, total: usize },
    /// The scene was built.
    Ready,
    /// The mount failed; the message is shown in place of the scene.
    Failed(String),
    /// The ticket is stale; the result was dropped.
    Abandoned,
    /// The mount was already terminal, or the resource was not requested.
    Ignored,
}

struct Mount {
    route: Route,
    ticket: MountTicket,
    requests: Vec<ResourceRequest>,
    tracker: LoadTracker,
    model: Option<AssetHandle<AssetGraph>>,
    environment: Option<AssetHandle<EnvironmentMap>>,
    scene: Option<Scene>,
}

impl Mount {
    fn state(&self) -> LoadState {
        self.tracker.state(self.scene.is_some())
    }

    fn is_waiting_for(&self, request: &ResourceRequest) -> bool {
        match request {
            ResourceRequest::Model(_) => self.model.is_none(),
            ResourceRequest::Environment(_) => self.environment.is_none(),
        }
    }
}

/// Route switch and per-mount loading state machine.
///
/// Single-threaded: one mount at a time, built synchronously once its
/// resources are in.
pub struct ViewShell {
    settings: ViewerSettings,
    profiles: SharedProfiles,
    classifier: Option<Box<dyn NodeClassifier>>,

    route: Route,
    generation: u64,
    mount: Option<Mount>,
}

impl ViewShell {
    /// Creates a shell with nothing mounted. Material profiles are frozen
    /// from `settings` here and shared by every scene it builds.
    #[must_use]
    pub fn new(settings: ViewerSettings) -> Self {
        let profiles = settings.materials.clone().into_shared();
        Self {
            settings,
            profiles,
            classifier: None,
            route: Route::NotFound(String::new()),
            generation: 0,
            mount: None,
        }
    }

    /// Replaces the keyword classifier from the settings.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn NodeClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    #[must_use]
    pub fn profiles(&self) -> &SharedProfiles {
        &self.profiles
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Switches to `path`.
    ///
    /// Returns the ticket of the new mount, or `None` for an unmatched route,
    /// which mounts nothing. Navigating to the route already mounted keeps
    /// the current mount and returns its ticket.
    pub fn navigate(&mut self, path: &str) -> Option<MountTicket> {
        let route = Route::parse(path);

        if let Some(mount) = &self.mount
            && mount.route == route
        {
            return Some(mount.ticket);
        }

        self.unmount();
        self.route = route.clone();

        let requests = match route {
            Route::Viewer => vec![
                ResourceRequest::Model(self.settings.assets.model.clone()),
                ResourceRequest::Environment(self.settings.viewer.environment.clone()),
            ],
            Route::Debug => vec![ResourceRequest::Environment(
                self.settings.debug.environment.clone(),
            )],
            Route::NotFound(ref p) => {
                log::warn!("No view for route '{p}'");
                return None;
            }
        };

        self.generation += 1;
        let ticket = MountTicket {
            generation: self.generation,
        };
        log::info!(
            "Mounting {route} (generation {}), {} resource(s) requested",
            ticket.generation,
            requests.len()
        );

        self.mount = Some(Mount {
            route,
            ticket,
            tracker: LoadTracker::new(requests.len()),
            requests,
            model: None,
            environment: None,
            scene: None,
        });
        Some(ticket)
    }

    /// Drops the mounted view and everything it built. Results still in
    /// flight for it become stale.
    pub fn unmount(&mut self) {
        if let Some(mount) = self.mount.take() {
            self.generation += 1;
            log::info!(
                "Unmounted {} (generation {})",
                mount.route,
                mount.ticket.generation
            );
        }
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub fn nav_bar(&self) -> NavBar {
        NavBar::for_route(&self.route)
    }

    #[must_use]
    pub fn current_ticket(&self) -> Option<MountTicket> {
        self.mount.as_ref().map(|m| m.ticket)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// State of the current mount; `None` when nothing is mounted.
    #[must_use]
    pub fn load_state(&self) -> Option<LoadState> {
        self.mount.as_ref().map(Mount::state)
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.load_state().is_some_and(|s| s.overlay_visible())
    }

    /// Requests of the current mount that have not resolved yet.
    #[must_use]
    pub fn pending_requests(&self) -> Vec<ResourceRequest> {
        match &self.mount {
            Some(mount) if !mount.state().is_terminal() => mount
                .requests
                .iter()
                .filter(|r| mount.is_waiting_for(r))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Delivers the result of one requested resource.
    pub fn resource_loaded(
        &mut self,
        ticket: MountTicket,
        result: Result<LoadedResource>,
    ) -> MountEvent {
        let Some(mount) = self.mount.as_mut().filter(|m| m.ticket == ticket) else {
            log::debug!(
                "Dropping resource for stale generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return MountEvent::Abandoned;
        };

        if mount.state().is_terminal() {
            return MountEvent::Ignored;
        }

        match result {
            Err(err) => {
                log::error!("Mount of {} failed: {err}", mount.route);
                mount.tracker.fail(err.to_string());
            }
            Ok(LoadedResource::Model(handle)) if mount.route == Route::Viewer => {
                if mount.model.is_none() {
                    mount.model = Some(handle);
                    mount.tracker.resolve();
                }
            }
            Ok(LoadedResource::Environment(handle)) => {
                if mount.environment.is_none() {
                    mount.environment = Some(handle);
                    mount.tracker.resolve();
                }
            }
            Ok(LoadedResource::Model(_)) => return MountEvent::Ignored,
        }

        if mount.tracker.all_resolved() {
            Self::build(mount, &self.settings, &self.profiles, self.classifier.as_deref());
        }

        match mount.state() {
            LoadState::Loading { loaded, total } => MountEvent::Progress { loaded, total },
            LoadState::Ready => MountEvent::Ready,
            LoadState::Failed(message) => MountEvent::Failed(message),
        }
    }

    fn build(
        mount: &mut Mount,
        settings: &ViewerSettings,
        profiles: &SharedProfiles,
        classifier: Option<&dyn NodeClassifier>,
    ) {
        let Some(environment) = &mount.environment else {
            return;
        };
        let scene = match (&mount.route, &mount.model) {
            (Route::Viewer, Some(model)) => {
                let classifier = classifier.unwrap_or(&settings.classifier);
                build_viewer_scene_with(model, environment, profiles, settings, classifier)
            }
            (Route::Debug, _) => build_debug_scene(environment, profiles, settings),
            _ => return,
        };
        mount.scene = Some(scene);
    }

    /// Resolves every pending request of the current mount with `loader`.
    ///
    /// Returns the last event, or `None` when nothing was pending.
    pub fn drive(&mut self, loader: &dyn AssetLoader) -> Option<MountEvent> {
        let ticket = self.current_ticket()?;
        let mut last = None;

        for request in self.pending_requests() {
            let result = match &request {
                ResourceRequest::Model(path) => loader.load_model(path).map(LoadedResource::Model),
                ResourceRequest::Environment(path) => {
                    loader.load_environment(path).map(LoadedResource::Environment)
                }
            };
            let event = self.resource_loaded(ticket, result);
            let done = matches!(event, MountEvent::Ready | MountEvent::Failed(_));
            last = Some(event);
            if done {
                break;
            }
        }
        last
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// The mounted scene, once `Ready`.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.mount.as_ref().and_then(|m| m.scene.as_ref())
    }
}
