//! Header格式转换工具
use http::header::HeaderMap;
use log::warn;
use rustc_hash::FxHashMap;

/// 报告中展示的关键响应头（固定顺序）
pub const IMPORTANT_HEADERS: [&str; 6] = [
    "server",
    "x-powered-by",
    "cf-ray",
    "cf-cache-status",
    "content-security-policy",
    "strict-transport-security",
];

/// 单次转换最多处理的 Header 条目
const MAX_HEADER_ITER: usize = 1000;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 将HeaderMap转换为单值FxHashMap<String, String>（键小写，取首个非空值）
    pub fn to_single_value(header_map: &HeaderMap) -> FxHashMap<String, String> {
        let mut single_map = FxHashMap::default();

        for (iter_count, (key, value)) in header_map.iter().enumerate() {
            if iter_count >= MAX_HEADER_ITER {
                warn!("Header iteration exceeded {}, stopping early", MAX_HEADER_ITER);
                break;
            }

            let value_str = match value.to_str() {
                Ok(v) if !v.trim().is_empty() => v.trim(),
                _ => continue,
            };

            single_map
                .entry(key.as_str().to_ascii_lowercase())
                .or_insert_with(|| value_str.to_string());
        }
        single_map
    }

    /// 按 IMPORTANT_HEADERS 顺序挑出存在的关键响应头
    pub fn important_headers(header_map: &HeaderMap) -> Vec<(String, String)> {
        let single_map = Self::to_single_value(header_map);
        Self::important_from_single(&single_map)
    }

    pub fn important_from_single(single_map: &FxHashMap<String, String>) -> Vec<(String, String)> {
        IMPORTANT_HEADERS
            .iter()
            .filter_map(|name| {
                single_map
                    .get(*name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect()
    }
}
