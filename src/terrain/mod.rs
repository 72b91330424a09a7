mod field;
pub mod kernels;
mod shared;

pub use field::Terrain;
pub(crate) use shared::SharedField;
