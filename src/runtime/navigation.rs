//! 页面导航逻辑

use crate::error::{Error, Result};
use crate::event::InstanceId;
use url::Url;

/// 这些 scheme 交给系统浏览器，不进入窗口历史
const EXTERNAL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// 相对地址（`webview?page=42`、`/webview`）的解析基准
const APP_BASE: &str = "app:///";

/// 解析后的组件地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    url: String,
    component: String,
    query: Option<String>,
    pairs: Vec<(String, String)>,
}

impl Route {
    /// 调用方传入的原始 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// 原样转发的查询串
    pub fn raw_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// 第一个名为 `key` 的查询参数
    pub fn query(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// `load` 的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Component(Route),
    External(Url),
}

/// 解析 URL：host 或第一段路径是组件名，查询串原样保留
pub fn parse_url(raw: &str) -> Result<Target> {
    let input = raw.trim();
    let invalid = |reason: String| Error::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(APP_BASE)
            .and_then(|base| base.join(input))
            .map_err(|e| invalid(e.to_string()))?,
        Err(e) => return Err(invalid(e.to_string())),
    };

    if EXTERNAL_SCHEMES.contains(&url.scheme()) {
        return Ok(Target::External(url));
    }

    let component = match url.host_str().filter(|h| !h.is_empty()) {
        Some(host) => host.to_string(),
        None => url
            .path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
            .map(str::to_string)
            .ok_or_else(|| invalid("missing component name".to_string()))?,
    };

    Ok(Target::Component(Route {
        url: input.to_string(),
        component: component.to_lowercase(),
        query: url.query().map(str::to_string),
        pairs: url.query_pairs().into_owned().collect(),
    }))
}

/// 历史记录中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub route: Route,
    pub instance_id: InstanceId,
}
