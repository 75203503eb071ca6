//! Filesystem and naming module.
//!
//! Provides:
//! - Construct paths and unique logical ids
//! - Artifact file names
//! - Directory management

pub mod naming;
pub mod paths;

pub use naming::{
    asset_file_name, make_unique_id, product_template_file_name, sanitize_filename,
    ConstructPath,
};
pub use paths::ensure_dir;
