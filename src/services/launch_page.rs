//! 启动页与样式表
//!
//! 启动页只有标题一个参数，插入前统一转义。

use crate::services::manifest::xml_escape;

const INDEX_HTML_TEMPLATE: &str = include_str!("../assets/index.html");
const STYLES_CSS: &str = include_str!("../assets/styles.css");
const TITLE_PLACEHOLDER: &str = "__TITLE__";

/// 生成启动页 `index.html`
pub fn launch_page(title: &str) -> String {
    INDEX_HTML_TEMPLATE.replace(TITLE_PLACEHOLDER, &xml_escape(title))
}

/// 获取样式表
pub fn stylesheet() -> &'static str {
    STYLES_CSS
}
