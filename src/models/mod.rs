pub mod meta;
pub mod product;

pub use meta::CacheMeta;
pub use product::Product;
