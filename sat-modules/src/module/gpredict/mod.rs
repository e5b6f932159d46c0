///! Gpredict module files
///!
///! A module is Gpredict's named list of satellites to track, stored as
///! `<name>.mod` in its configuration directory.

mod writer;
pub use writer::{default_module_dir, write_module, GpredictModule, DEFAULT_QTH};
