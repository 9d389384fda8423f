//! Result and Error types for nrefl-workflow

/// Type alias for Result<T, workflow::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// Boxed error returned by a failing provider
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for the `nrefl-workflow` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("nothing provides the requested {0}")]
    NotProvided(&'static str),

    #[error("nothing provides {missing}, required by {required_by}")]
    Unsatisfied {
        missing: &'static str,
        required_by: &'static str,
    },

    #[error("dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<&'static str>),

    #[error("provider {provider} failed to compute {output}")]
    Provider {
        provider: &'static str,
        output: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("stored value for {0} has an unexpected type")]
    TypeMismatch(&'static str),
}
