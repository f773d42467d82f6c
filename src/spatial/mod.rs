pub mod index;

pub use index::RegionIndex;
