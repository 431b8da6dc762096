//! Fragment rendering for mutation responses.
//!
//! Mutations answer with a re-rendered HTML fragment of the affected
//! region rather than a full page. Templates are embedded string
//! constants rendered through `minijinja` against the serializable view
//! types the services already produce.

mod fragments;

pub use fragments::{FragmentRenderer, RenderError};

#[cfg(test)]
mod tests;
