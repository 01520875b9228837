pub mod package_flow;

pub use package_flow::{AssembledPackage, PackageAssembler};
