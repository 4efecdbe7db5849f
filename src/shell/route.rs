//! Routes and the navigation bar model.

use std::fmt;

/// A view selected by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: the ring viewer.
    Viewer,
    /// `/debug`: the material tuning scene.
    Debug,
    /// Any other path. Nothing is mounted for it.
    NotFound(String),
}

impl Route {
    /// Matches a location path. A trailing slash, query string and fragment
    /// are ignored; matching is case-sensitive.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.strip_suffix('/').unwrap_or(path);

        match trimmed {
            "" => Route::Viewer,
            "/debug" => Route::Debug,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path of the route.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Route::Viewer => "/",
            Route::Debug => "/debug",
            Route::NotFound(path) => path,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Route::NotFound(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Viewer => write!(f, "viewer"),
            Route::Debug => write!(f, "debug"),
            Route::NotFound(path) => write!(f, "not found ({path})"),
        }
    }
}

// ============================================================================
// Navigation bar
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Entries of the navigation bar, in display order.
pub const NAV_ITEMS: [NavItem; 2] = [
    NavItem {
        label: "Ring Viewer",
        path: "/",
    },
    NavItem {
        label: "Debug Lab",
        path: "/debug",
    },
];

/// Navigation bar state for one location. Shown on every route, including
/// unmatched ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    active: Option<usize>,
}

impl NavBar {
    #[must_use]
    pub fn for_route(route: &Route) -> Self {
        let active = NAV_ITEMS
            .iter()
            .position(|item| Route::parse(item.path) == *route);
        Self { active }
    }

    pub fn items(&self) -> impl Iterator<Item = (&'static NavItem, bool)> + '_ {
        NAV_ITEMS
            .iter()
            .enumerate()
            .map(move |(i, item)| (item, self.active == Some(i)))
    }

    #[must_use]
    pub fn active(&self) -> Option<&'static NavItem> {
        self.active.map(|i| &NAV_ITEMS[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_routes() {
        assert_eq!(Route::parse("/"), Route::Viewer);
        assert_eq!(Route::parse(""), Route::Viewer);
        assert_eq!(Route::parse("/debug"), Route::Debug);
        assert_eq!(Route::parse("/debug/"), Route::Debug);
        assert_eq!(Route::parse("/debug?mode=1#top"), Route::Debug);
    }

    #[test]
    fn test_unknown_routes() {
        assert_eq!(Route::parse("/about"), Route::NotFound("/about".to_string()));
        assert_eq!(Route::parse("/Debug"), Route::NotFound("/Debug".to_string()));
        assert!(Route::parse("/debug/extra").is_not_found());
        assert_eq!(Route::parse("//"), Route::NotFound("//".to_string()));
        assert_eq!(Route::parse("///"), Route::NotFound("///".to_string()));
        assert!(Route::parse("/debug//").is_not_found());
    }

    #[test]
    fn test_path_round_trip() {
        for route in [Route::Viewer, Route::Debug] {
            assert_eq!(Route::parse(route.path()), route);
        }
    }

    #[test]
    fn test_nav_bar_active_entry() {
        let bar = NavBar::for_route(&Route::Debug);
        assert_eq!(bar.active().map(|i| i.label), Some("Debug Lab"));

        let flags: Vec<bool> = bar.items().map(|(_, active)| active).collect();
        assert_eq!(flags, vec![false, true]);

        let lost = NavBar::for_route(&Route::parse("/missing"));
        assert!(lost.active().is_none());
        assert_eq!(lost.items().count(), 2);
    }
}
