//! 基础设施层
//!
//! 持有归档这一资源，只暴露存取与压缩能力。

pub mod archive;

pub use archive::{read_archive, Archive, PACKAGE_LAYOUT};
