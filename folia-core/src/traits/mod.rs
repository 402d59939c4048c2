//! Hardware abstraction traits
//!
//! The seam between the application logic and hardware-specific
//! implementations.

pub mod canvas;

pub use canvas::PageCanvas;
