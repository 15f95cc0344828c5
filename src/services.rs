pub mod listing;
mod registry;

pub use registry::ProjectRegistry;
