// standard library
use std::any::{type_name, Any};
use std::sync::Arc;

// internal modules
use crate::error::{Error, Result};
use crate::key::Key;

/// Type-erased value held while a request is evaluated
pub type Value = Arc<dyn Any + Send + Sync>;

/// Function computing one quantity from references to others
///
/// Implemented for every `Fn(&A, &B, ...) -> Result<O, E>` taking up to five
/// arguments, where `E` is any error type. `Args` is the tuple of argument
/// types and only exists to tell the implementations apart, so it never needs
/// to be written out.
///
/// ```rust
/// # use nrefl_workflow::{Key, Provider};
/// fn double(x: &u32) -> Result<u64, std::convert::Infallible> {
///     Ok(*x as u64 * 2)
/// }
///
/// assert_eq!(Provider::inputs(&double), vec![Key::of::<u32>()]);
/// ```
pub trait Provider<Args, O, E>: Send + Sync + 'static {
    /// Keys of the arguments, in order
    fn inputs(&self) -> Vec<Key>;

    /// Call the provider with values matching [Provider::inputs]
    fn invoke(&self, args: &[Value]) -> Result<O>;

    /// Name of the provider, for messages
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Downcast the next argument to its declared type
fn argument<'a, T: Any>(args: &mut std::slice::Iter<'a, Value>) -> Result<&'a T> {
    args.next()
        .and_then(|value| value.downcast_ref::<T>())
        .ok_or(Error::TypeMismatch(type_name::<T>()))
}

macro_rules! impl_provider {
    ($($arg:ident),*) => {
        impl<F, O, E, $($arg,)*> Provider<($($arg,)*), O, E> for F
        where
            F: Fn($(&$arg),*) -> core::result::Result<O, E> + Send + Sync + 'static,
            O: Send + Sync + 'static,
            E: std::error::Error + Send + Sync + 'static,
            $($arg: Send + Sync + 'static,)*
        {
            fn inputs(&self) -> Vec<Key> {
                vec![$(Key::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_variables, unused_mut)]
            fn invoke(&self, args: &[Value]) -> Result<O> {
                let mut args = args.iter();
                $(let $arg = argument::<$arg>(&mut args)?;)*
                (self)($($arg),*).map_err(|e| Error::Provider {
                    provider: type_name::<F>(),
                    output: type_name::<O>(),
                    source: Box::new(e),
                })
            }
        }
    };
}

impl_provider!();
impl_provider!(A);
impl_provider!(A, B);
impl_provider!(A, B, C);
impl_provider!(A, B, C, D);
impl_provider!(A, B, C, D, G);
