/// Slide descriptors and the built-in Arctic catalog.
pub mod catalog;
