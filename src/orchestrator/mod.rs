//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `exporter` - 单次导出
//! - `export_package`：组装并压缩一个包，返回字节和警告
//! - `download_package`：导出并保存为 `{title}_SCORM.zip`
//!
//! ### `preview` - 无宿主预览
//! - 从导出的 zip 构造播放器，用内存运行时模拟作答
//!
//! ### `batch_processor` - 批量导出
//! - 加载题库目录（`Vec<QuizDocument>`）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<QuizDocument>)
//!     ↓
//! exporter (处理单个题库)
//!     ↓
//! workflow::PackageAssembler (组装单个包)
//!     ↓
//! services (能力层：normalize / manifest / runtime api / player)
//!     ↓
//! infrastructure (基础设施：Archive)
//! ```

pub mod batch_processor;
pub mod exporter;
pub mod preview;

// 重新导出主要类型
pub use batch_processor::{App, ExportStats};
pub use exporter::{download_package, export_package, save_package, ExportedPackage};
pub use preview::{preview_package, preview_package_with};
