pub mod fs_ops;
pub mod image_check;
pub mod logging;
pub mod paths;
