// standard library
use std::any::TypeId;

/// Identity of a quantity in a [Pipeline](crate::Pipeline)
///
/// Two keys are equal exactly when they refer to the same Rust type, so
/// `BeamSize<Sample>` and `BeamSize<Reference>` are different keys.
///
/// ```rust
/// # use nrefl_workflow::Key;
/// struct Tagged<T>(std::marker::PhantomData<T>);
///
/// assert_eq!(Key::of::<Tagged<u8>>(), Key::of::<Tagged<u8>>());
/// assert_ne!(Key::of::<Tagged<u8>>(), Key::of::<Tagged<i8>>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key of the type `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type name, for messages
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
