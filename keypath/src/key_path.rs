//! Key-path objects.
//!
//! [`AnyKeyPath`] is the untyped form produced by the compiler. The statically
//! typed views carry the root (and leaf) as type parameters and are obtained
//! from it by checked downcasts.

use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;

use fieldpath_types::{Reflect, TypeHandle, type_of};

use crate::buffer::{Components, KeyPathBuffer};

/// Whether a key path can be used to write through a mutable root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyPathVariant {
    ReadOnly,
    Writable,
}

impl KeyPathVariant {
    pub const fn from_mutability(is_var: bool) -> Self {
        if is_var {
            KeyPathVariant::Writable
        } else {
            KeyPathVariant::ReadOnly
        }
    }
}

/// A key path from a `root` type to a `leaf` type, owning its buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct AnyKeyPath<T> {
    root: T,
    leaf: T,
    variant: KeyPathVariant,
    buffer: KeyPathBuffer,
}

impl<T: Copy> AnyKeyPath<T> {
    pub fn new(root: T, leaf: T, variant: KeyPathVariant, buffer: KeyPathBuffer) -> Self {
        AnyKeyPath {
            root,
            leaf,
            variant,
            buffer,
        }
    }

    pub fn root(&self) -> T {
        self.root
    }

    pub fn leaf(&self) -> T {
        self.leaf
    }

    pub fn variant(&self) -> KeyPathVariant {
        self.variant
    }

    pub fn is_writable(&self) -> bool {
        self.variant == KeyPathVariant::Writable
    }

    pub fn buffer(&self) -> &KeyPathBuffer {
        &self.buffer
    }

    pub fn components(&self) -> Components<'_> {
        self.buffer.components()
    }

    /// Byte offset of the leaf from the root, when the path is a single
    /// resolved stored component.
    pub fn stored_offset(&self) -> Option<u32> {
        let mut components = self.components();
        match (components.next(), components.next()) {
            (Some(Ok(component)), None) => component.stored_offset(),
            _ => None,
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for AnyKeyPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.variant {
            KeyPathVariant::ReadOnly => "KeyPath",
            KeyPathVariant::Writable => "WritableKeyPath",
        };
        write!(f, "{name}<{:?}, {:?}>(", self.root, self.leaf)?;
        for (i, component) in self.components().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            match component {
                Ok(component) => write!(f, "{component}")?,
                Err(error) => write!(f, "<{error}>")?,
            }
        }
        f.write_str(")")
    }
}

/// A key path from `Root` to a leaf whose type is only known at runtime.
pub struct PartialKeyPath<Root> {
    inner: AnyKeyPath<TypeHandle>,
    _root: PhantomData<fn(Root)>,
}

impl<Root: Reflect> PartialKeyPath<Root> {
    /// Returns `None` when `key_path` does not start at `Root`.
    pub fn from_any(key_path: AnyKeyPath<TypeHandle>) -> Option<Self> {
        if key_path.root() != type_of::<Root>() {
            return None;
        }
        Some(PartialKeyPath {
            inner: key_path,
            _root: PhantomData,
        })
    }

    pub fn leaf_type(&self) -> TypeHandle {
        self.inner.leaf()
    }

    pub fn into_any(self) -> AnyKeyPath<TypeHandle> {
        self.inner
    }

    /// Recovers the leaf type. Gives the key path back on mismatch.
    pub fn downcast<Leaf: Reflect>(self) -> Result<KeyPath<Root, Leaf>, Self> {
        if self.inner.leaf() != type_of::<Leaf>() {
            return Err(self);
        }
        Ok(KeyPath {
            inner: self.inner,
            _types: PhantomData,
        })
    }

    /// Like [`downcast`](Self::downcast), but also requires the key path to
    /// be writable.
    pub fn downcast_writable<Leaf: Reflect>(self) -> Result<WritableKeyPath<Root, Leaf>, Self> {
        if self.inner.leaf() != type_of::<Leaf>() || !self.inner.is_writable() {
            return Err(self);
        }
        Ok(WritableKeyPath {
            inner: KeyPath {
                inner: self.inner,
                _types: PhantomData,
            },
        })
    }
}

impl<Root> Deref for PartialKeyPath<Root> {
    type Target = AnyKeyPath<TypeHandle>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Root> Clone for PartialKeyPath<Root> {
    fn clone(&self) -> Self {
        PartialKeyPath {
            inner: self.inner.clone(),
            _root: PhantomData,
        }
    }
}

impl<Root> fmt::Debug for PartialKeyPath<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// A read-only key path from `Root` to `Leaf`.
pub struct KeyPath<Root, Leaf> {
    inner: AnyKeyPath<TypeHandle>,
    _types: PhantomData<fn(Root) -> Leaf>,
}

impl<Root, Leaf> KeyPath<Root, Leaf> {
    pub fn into_any(self) -> AnyKeyPath<TypeHandle> {
        self.inner
    }
}

impl<Root, Leaf> Deref for KeyPath<Root, Leaf> {
    type Target = AnyKeyPath<TypeHandle>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Root, Leaf> Clone for KeyPath<Root, Leaf> {
    fn clone(&self) -> Self {
        KeyPath {
            inner: self.inner.clone(),
            _types: PhantomData,
        }
    }
}

impl<Root, Leaf> fmt::Debug for KeyPath<Root, Leaf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// A key path from `Root` to `Leaf` that also permits writes.
pub struct WritableKeyPath<Root, Leaf> {
    inner: KeyPath<Root, Leaf>,
}

impl<Root, Leaf> WritableKeyPath<Root, Leaf> {
    pub fn into_read_only(self) -> KeyPath<Root, Leaf> {
        self.inner
    }
}

impl<Root, Leaf> Deref for WritableKeyPath<Root, Leaf> {
    type Target = KeyPath<Root, Leaf>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Root, Leaf> Clone for WritableKeyPath<Root, Leaf> {
    fn clone(&self) -> Self {
        WritableKeyPath {
            inner: self.inner.clone(),
        }
    }
}

impl<Root, Leaf> fmt::Debug for WritableKeyPath<Root, Leaf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
