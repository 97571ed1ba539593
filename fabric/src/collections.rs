use serde::{Deserialize, Serialize};
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

pub struct Shared<T: ?Sized> {
    inner: Rc<RefCell<T>>,
}

impl<T: Debug + ?Sized> Debug for Shared<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self.deref(), f)
    }
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }
}

impl<T: ?Sized> Shared<T> {
    pub fn from_rc(inner: Rc<RefCell<T>>) -> Self {
        Self { inner }
    }

    pub fn to_rc(&self) -> Rc<RefCell<T>> {
        self.inner.clone()
    }

    #[inline]
    pub fn borrow_mut(&mut self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }
}

impl<T: ?Sized> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.inner.as_ptr() }
    }
}

pub struct Dictionary<K, T> {
    keys: HashMap<K, Shared<T>>,
    strings: HashMap<String, Shared<T>>,
}

impl<K, T> Default for Dictionary<K, T> {
    fn default() -> Self {
        Self {
            keys: HashMap::default(),
            strings: HashMap::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum DictionaryError {
    KeyNotFound { key: String },
    NameNotFound { name: String },
}

impl<K, T> Dictionary<K, T>
where
    K: Debug + Hash + Eq,
{
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn insert(&mut self, key: K, name: String, kind: T) {
        let kind = Shared::new(kind);
        self.keys.insert(key, kind.clone());
        self.strings.insert(name, kind);
    }

    pub fn get(&self, key: K) -> Result<Shared<T>, DictionaryError> {
        self.keys
            .get(&key)
            .cloned()
            .ok_or(DictionaryError::KeyNotFound {
                key: format!("{:?}", key),
            })
    }

    pub fn find(&self, name: &str) -> Result<Shared<T>, DictionaryError> {
        self.strings
            .get(name)
            .cloned()
            .ok_or(DictionaryError::NameNotFound {
                name: name.to_string(),
            })
    }

    /// Values in name order. Wiring that iterates a dictionary must see the
    /// same order in every process.
    pub fn values(&self) -> Vec<Shared<T>> {
        let mut names: Vec<&String> = self.strings.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| self.strings[name].clone())
            .collect()
    }
}

#[derive(Default, Clone, Copy, Eq, Hash, PartialEq)]
pub struct Sequence {
    value: usize,
}

impl Sequence {
    pub fn one<C, T>(&mut self, constructor: C) -> T
    where
        C: Fn(usize) -> T,
    {
        self.value += 1;
        constructor(self.value)
    }

    pub fn set(&mut self, value: usize) {
        self.value = value;
    }
}

pub fn trust<T>(value: &mut T) -> TrustedRef<T> {
    TrustedRef::from(value)
}

pub struct TrustedRef<T> {
    ptr: *mut T,
}

impl<T> TrustedRef<T> {
    pub fn from(value: &mut T) -> Self {
        Self {
            ptr: value as *mut _,
        }
    }

    pub fn get_unsafe(&self) -> &T {
        unsafe { &*self.ptr }
    }

    pub fn get_mut_unsafe(&self) -> &mut T {
        unsafe { &mut *self.ptr }
    }
}

impl<T> Deref for TrustedRef<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get_unsafe()
    }
}

impl<T> DerefMut for TrustedRef<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.get_mut_unsafe()
    }
}
