pub mod types;
pub mod error;
pub mod grid;
pub mod bits;
pub mod raster;
pub mod table;
pub mod mif;
pub mod config;
