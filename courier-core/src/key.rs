//! Type identity used as the dispatch key.

use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

/// A comparable token identifying a Rust type.
///
/// Equality and hashing use only the [`TypeId`]; the name is kept for
/// diagnostics and is not guaranteed to be unique or stable.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, e.g. `my_app::requests::Greet`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The last path segment of the type name, e.g. `Greet`.
    ///
    /// Tuples, slices, arrays and references have no outer path and keep
    /// their full name.
    pub fn short_name(&self) -> &'static str {
        if self.name.starts_with(['(', '[', '&']) {
            return self.name;
        }
        // Generic arguments may contain `::` too; only strip the outer path.
        let head = self.name.split('<').next().unwrap_or(self.name);
        match head.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }

    /// Returns true if this key identifies `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
