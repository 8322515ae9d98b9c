//! Per-camera renderer pool
//!
//! Renderers are keyed by camera name and created lazily on first capture.
//! A camera never owns its renderer; the pool lives in the simulation and is
//! emptied whenever a new scene is loaded.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Lazily populated map from camera name to renderer
pub struct RendererPool<R> {
    renderers: HashMap<String, R>,
}

impl<R> Default for RendererPool<R> {
    fn default() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }
}

impl<R> RendererPool<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer for `camera`, creating it with `create` on first use
    ///
    /// `create` runs at most once per camera name; a failed creation leaves
    /// the pool unchanged.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        camera: &str,
        create: impl FnOnce() -> Result<R, E>,
    ) -> Result<&mut R, E> {
        match self.renderers.entry(camera.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                log::debug!("Creating renderer for camera '{}'", camera);
                Ok(entry.insert(create()?))
            }
        }
    }

    pub fn get(&self, camera: &str) -> Option<&R> {
        self.renderers.get(camera)
    }

    pub fn contains(&self, camera: &str) -> bool {
        self.renderers.contains_key(camera)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Drop every renderer
    pub fn clear(&mut self) {
        self.renderers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_once_per_camera() {
        let mut pool: RendererPool<u32> = RendererPool::new();
        let mut created = 0;

        for _ in 0..3 {
            let r = pool
                .get_or_try_insert_with("c0", || -> Result<u32, ()> {
                    created += 1;
                    Ok(7)
                })
                .unwrap();
            assert_eq!(*r, 7);
        }
        assert_eq!(created, 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_separate_renderers_per_camera() {
        let mut pool: RendererPool<&str> = RendererPool::new();
        pool.get_or_try_insert_with("a", || Ok::<_, ()>("ra")).unwrap();
        pool.get_or_try_insert_with("b", || Ok::<_, ()>("rb")).unwrap();
        assert_eq!(pool.get("a"), Some(&"ra"));
        assert_eq!(pool.get("b"), Some(&"rb"));
    }

    #[test]
    fn test_failed_creation_not_cached() {
        let mut pool: RendererPool<u32> = RendererPool::new();
        let result = pool.get_or_try_insert_with("c0", || Err("no context"));
        assert_eq!(result, Err("no context"));
        assert!(!pool.contains("c0"));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut pool: RendererPool<u32> = RendererPool::new();
        pool.get_or_try_insert_with("c0", || Ok::<_, ()>(1)).unwrap();
        pool.clear();
        assert!(pool.is_empty());
    }
}
