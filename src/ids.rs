// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Thread and type identifiers referenced by events.
//!
//! Resolution maps a handle to a stable non-zero 64-bit id; 0 means absent.
//! Interning may allocate on first sight of a handle, so resolve outside
//! latency-critical sections when possible.

use std::borrow::Borrow;
use std::hash::Hash;
use std::thread::ThreadId;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadRef(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef(pub u64);

impl ThreadRef {
    pub const NONE: ThreadRef = ThreadRef(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl TypeRef {
    pub const NONE: TypeRef = TypeRef(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

/// Maps a handle to its identifier.
pub trait IdResolver<H: ?Sized> {
    fn resolve(&self, handle: &H) -> u64;
}

/// Thread-safe interning of keys to sequential ids starting at 1.
pub struct InternTable<K> {
    inner: Mutex<Interned<K>>,
}

struct Interned<K> {
    ids: FxHashMap<K, u64>,
    next: u64,
}

impl<K: Hash + Eq> InternTable<K> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Interned {
                ids: FxHashMap::default(),
                next: 1,
            }),
        }
    }

    pub fn intern<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let mut inner = self.inner.lock();
        if let Some(&id) = inner.ids.get(key) {
            return id;
        }
        let id = inner.next;
        inner.next += 1;
        inner.ids.insert(key.to_owned(), id);
        id
    }

    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Hash + Eq> Default for InternTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, Q> IdResolver<Q> for InternTable<K>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
{
    fn resolve(&self, handle: &Q) -> u64 {
        self.intern(handle)
    }
}

pub type ThreadRegistry = InternTable<ThreadId>;

/// Type names interned by their fully qualified name.
pub type TypeRegistry = InternTable<String>;

impl InternTable<ThreadId> {
    pub fn current_thread(&self) -> ThreadRef {
        ThreadRef(self.intern(&std::thread::current().id()))
    }
}

impl InternTable<String> {
    pub fn type_of<T: ?Sized>(&self) -> TypeRef {
        TypeRef(self.intern(std::any::type_name::<T>()))
    }
}
