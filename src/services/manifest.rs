//! 清单生成服务 - 业务能力层
//!
//! 生成 SCORM 1.2 的 `imsmanifest.xml`。
//!
//! 清单先构造成结构化的 `XmlElement` 树，再由 `XmlWriter` 统一序列化；
//! 文本和属性值只在 `XmlWriter` 里转义，不存在遗漏转义的拼接点。

use regex::Regex;
use std::sync::OnceLock;

use crate::services::quiz_player::PASSING_SCORE;

/// SCORM 版本
pub const SCORM_VERSION: &str = "1.2";

const ORGANIZATION_ID: &str = "ORG-1";
const ITEM_ID: &str = "ITEM-1";
const RESOURCE_ID: &str = "RES-1";
const LAUNCH_HREF: &str = "index.html";

/// 转义 XML 的五个特殊字符
///
/// XML 1.0 不允许出现的字符（制表、换行、回车以外的 C0 控制字符，
/// U+FFFE、U+FFFF）无法以任何形式表示，直接丢弃。
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_forbidden(c) => {}
            _ => out.push(c),
        }
    }
    out
}

fn is_xml_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

/// XML 节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// XML 元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children
            .extend(children.into_iter().map(XmlNode::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// 只含一段文本的元素
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    /// 按名称查找直接子元素
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }
}

/// XML 序列化器
///
/// 两空格缩进；只含文本的元素写在同一行。
pub struct XmlWriter {
    out: String,
}

impl XmlWriter {
    /// 序列化为完整文档（带 XML 声明）
    pub fn write_document(root: &XmlElement) -> String {
        let mut writer = Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
        };
        writer.write_element(root, 0);
        writer.out
    }

    fn write_element(&mut self, element: &XmlElement, depth: usize) {
        let indent = "  ".repeat(depth);
        self.out.push_str(&indent);
        self.out.push('<');
        self.out.push_str(&element.name);
        for (name, value) in &element.attributes {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&xml_escape(value));
            self.out.push('"');
        }

        if element.children.is_empty() {
            self.out.push_str("/>\n");
            return;
        }
        self.out.push('>');

        let text_only = element
            .children
            .iter()
            .all(|node| matches!(node, XmlNode::Text(_)));
        if text_only {
            for node in &element.children {
                if let XmlNode::Text(text) = node {
                    self.out.push_str(&xml_escape(text));
                }
            }
        } else {
            self.out.push('\n');
            for node in &element.children {
                match node {
                    XmlNode::Element(child) => self.write_element(child, depth + 1),
                    XmlNode::Text(text) => {
                        self.out.push_str(&"  ".repeat(depth + 1));
                        self.out.push_str(&xml_escape(text));
                        self.out.push('\n');
                    }
                }
            }
            self.out.push_str(&indent);
        }

        self.out.push_str("</");
        self.out.push_str(&element.name);
        self.out.push_str(">\n");
    }
}

/// 包清单
///
/// 创建后不可修改；`resource_files` 必须与归档中的文件逐项一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    identifier: String,
    title: String,
    resource_files: Vec<String>,
}

impl PackageManifest {
    pub fn new(title: impl Into<String>, resource_files: Vec<String>) -> Self {
        let title = title.into();
        Self {
            identifier: manifest_identifier(&title),
            title,
            resource_files,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn resource_files(&self) -> &[String] {
        &self.resource_files
    }

    pub fn scorm_version(&self) -> &'static str {
        SCORM_VERSION
    }

    /// 构造清单文档树
    pub fn to_document(&self) -> XmlElement {
        let metadata = XmlElement::new("metadata")
            .child(XmlElement::with_text("schema", "ADL SCORM"))
            .child(XmlElement::with_text("schemaversion", SCORM_VERSION));

        let item = XmlElement::new("item")
            .attr("identifier", ITEM_ID)
            .attr("identifierref", RESOURCE_ID)
            .attr("isvisible", "true")
            .child(XmlElement::with_text("title", &self.title))
            .child(XmlElement::with_text(
                "adlcp:masteryscore",
                PASSING_SCORE.to_string(),
            ));

        let organizations = XmlElement::new("organizations")
            .attr("default", ORGANIZATION_ID)
            .child(
                XmlElement::new("organization")
                    .attr("identifier", ORGANIZATION_ID)
                    .child(XmlElement::with_text("title", &self.title))
                    .child(item),
            );

        let resource = XmlElement::new("resource")
            .attr("identifier", RESOURCE_ID)
            .attr("type", "webcontent")
            .attr("adlcp:scormtype", "sco")
            .attr("href", LAUNCH_HREF)
            .children(
                self.resource_files
                    .iter()
                    .map(|path| XmlElement::new("file").attr("href", path)),
            );

        XmlElement::new("manifest")
            .attr("identifier", &self.identifier)
            .attr("version", "1.0")
            .attr("xmlns", "http://www.imsproject.org/xsd/imscp_rootv1p1p2")
            .attr("xmlns:adlcp", "http://www.adlnet.org/xsd/adlcp_rootv1p2")
            .attr("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance")
            .attr(
                "xsi:schemaLocation",
                "http://www.imsproject.org/xsd/imscp_rootv1p1p2 imscp_rootv1p1p2.xsd \
                 http://www.imsglobal.org/xsd/imsmd_rootv1p2p1 imsmd_rootv1p2p1.xsd \
                 http://www.adlnet.org/xsd/adlcp_rootv1p2 adlcp_rootv1p2.xsd",
            )
            .child(metadata)
            .child(organizations)
            .child(XmlElement::new("resources").child(resource))
    }

    /// 序列化为 XML 文本
    pub fn to_xml(&self) -> String {
        XmlWriter::write_document(&self.to_document())
    }
}

/// 由标题生成清单标识符
///
/// 非 ASCII 字母数字的字符折叠为 `_`；同一标题总是得到同一标识符。
pub fn manifest_identifier(title: &str) -> String {
    static NON_ID: OnceLock<Option<Regex>> = OnceLock::new();
    let slug = NON_ID
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").ok())
        .as_ref()
        .map(|re| re.replace_all(title, "_").into_owned())
        .unwrap_or_default();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "QUIZ_PACKAGE".to_string()
    } else {
        format!("QUIZ_{}", slug)
    }
}
