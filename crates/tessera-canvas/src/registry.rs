use std::collections::HashMap;

use tessera_core::{CanvasObject, NativeHandle, ObjectId};

/// Two-way mapping between scene nodes and the native objects backing them.
///
/// Entries are only ever added; the whole registry is dropped when a canvas
/// gets new content.
#[derive(Default)]
pub(crate) struct Registry {
    native: HashMap<ObjectId, NativeHandle>,
    // native object -> node credited with its input
    objects: HashMap<NativeHandle, CanvasObject>,
}

impl Registry {
    pub fn lookup_native(&self, node: &CanvasObject) -> Option<NativeHandle> {
        self.native.get(&node.id()).copied()
    }

    pub fn lookup_abstract(&self, handle: NativeHandle) -> Option<&CanvasObject> {
        self.objects.get(&handle)
    }

    pub fn contains(&self, node: &CanvasObject) -> bool {
        self.native.contains_key(&node.id())
    }

    /// Records `handle` as the backing of `node`, routing its input to `target`.
    pub fn register(&mut self, node: &CanvasObject, handle: NativeHandle, target: &CanvasObject) {
        self.bind(node, handle);
        self.objects.insert(handle, target.clone());
    }

    /// Records `handle` as the backing of `node` without making it an input
    /// source.
    pub fn bind(&mut self, node: &CanvasObject, handle: NativeHandle) {
        if let Some(prev) = self.native.insert(node.id(), handle) {
            log::warn!("{node:?} rebound from {prev:?} to {handle:?}");
        }
    }

    pub fn clear(&mut self) {
        self.native.clear();
        self.objects.clear();
    }
}
