//! Loading progress of a mount.

use std::fmt;

/// Where a mount is in its lifecycle.
///
/// `Loading` moves to either `Ready` or `Failed`; both are terminal for the
/// mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading { loaded: usize, total: usize },
    Ready,
    Failed(String),
}

impl LoadState {
    /// The progress overlay is shown while anything is pending.
    #[inline]
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.overlay_visible()
    }

    /// Fraction in `0.0..=1.0`. A failed mount reports no progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match *self {
            LoadState::Loading { total: 0, .. } | LoadState::Ready => 1.0,
            LoadState::Loading { loaded, total } => loaded as f32 / total as f32,
            LoadState::Failed(_) => 0.0,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loading { loaded, total } => {
                write!(f, "loading {:.0}% ({loaded}/{total})", self.progress() * 100.0)
            }
            LoadState::Ready => write!(f, "ready"),
            LoadState::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Counts resolved resources of one mount.
#[derive(Debug, Clone)]
pub struct LoadTracker {
    total: usize,
    loaded: usize,
    failure: Option<String>,
}

impl LoadTracker {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            loaded: 0,
            failure: None,
        }
    }

    /// Records one successful resource. Ignored once terminal.
    pub fn resolve(&mut self) {
        if self.failure.is_none() && self.loaded < self.total {
            self.loaded += 1;
        }
    }

    /// Records a failure; the first one wins.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.failure.is_none() {
            self.failure = Some(message.into());
        }
    }

    #[must_use]
    pub fn all_resolved(&self) -> bool {
        self.failure.is_none() && self.loaded == self.total
    }

    /// Current state, with `Ready` reported only once `built` is set.
    #[must_use]
    pub fn state(&self, built: bool) -> LoadState {
        match &self.failure {
            Some(message) => LoadState::Failed(message.clone()),
            None if built => LoadState::Ready,
            None => LoadState::Loading {
                loaded: self.loaded,
                total: self.total,
            },
        }
    }
}
