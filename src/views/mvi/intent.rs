//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent user actions on a control (like, follow, pin,
/// purchase). Reducers turn them into the next displayed state.
pub trait Intent: Send + 'static {}
