//! Base trait for view state in MVI architecture.

/// Marker trait for view state objects.
///
/// States are plain values (Clone to produce the next one, PartialEq to
/// detect changes) holding everything a control needs to render.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
