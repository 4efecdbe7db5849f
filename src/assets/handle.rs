//! Asset Handle System
//!
//! Loaded assets are passed around as explicit [`AssetHandle`] values owned by
//! the caller. There is no process-wide cache: whoever loads an asset decides
//! how long it lives, and a scene keeps what it uses alive only as long as the
//! scene itself exists.
//!
//! - `AssetHandle` keeps the asset alive (`Arc` strong count)
//! - `WeakAssetHandle` does not, and reports whether the asset is gone

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// Strong, cheaply clonable reference to a loaded asset.
pub struct AssetHandle<T> {
    source: Arc<str>,
    asset: Arc<T>,
}

impl<T> AssetHandle<T> {
    /// Wraps a freshly loaded asset. `source` is the path or label it was
    /// loaded from, used in logs.
    pub fn new(source: impl AsRef<str>, asset: T) -> Self {
        Self {
            source: Arc::from(source.as_ref()),
            asset: Arc::new(asset),
        }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of strong handles currently alive.
    #[inline]
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.asset)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakAssetHandle<T> {
        WeakAssetHandle {
            source: Arc::clone(&self.source),
            asset: Arc::downgrade(&self.asset),
        }
    }

    /// True if both handles point at the same loaded asset.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.asset, &other.asset)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            asset: Arc::clone(&self.asset),
        }
    }
}

impl<T> Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.asset
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("source", &self.source)
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

/// Non-owning reference to a loaded asset.
pub struct WeakAssetHandle<T> {
    source: Arc<str>,
    asset: Weak<T>,
}

impl<T> WeakAssetHandle<T> {
    #[must_use]
    pub fn upgrade(&self) -> Option<AssetHandle<T>> {
        self.asset.upgrade().map(|asset| AssetHandle {
            source: Arc::clone(&self.source),
            asset,
        })
    }

    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.asset.strong_count() > 0
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl<T> Clone for WeakAssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            asset: Weak::clone(&self.asset),
        }
    }
}

impl<T> fmt::Debug for WeakAssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakAssetHandle")
            .field("source", &self.source)
            .field("alive", &self.is_alive())
            .finish()
    }
}
