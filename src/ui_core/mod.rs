//! Layout engine and viewport policy, shared by the native renderer and
//! the DOM façade.

pub mod layout;
pub mod policy;

pub use layout::{layout, mobile_spans, Placement};
pub use policy::ViewportClass;
