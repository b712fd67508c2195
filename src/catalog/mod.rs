mod catalog;
mod track;

pub use catalog::Catalog;
pub use track::Track;
