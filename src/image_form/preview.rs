//! # 预览解析模块
//!
//! ## 设计思路
//!
//! 把“当前图片引用 → 可展示的预览来源”收敛到单一实现：
//! - 本地文件：向注册表申请临时预览句柄（等价于浏览器 object URL），
//!   属于每标签页的稀缺资源，必须显式释放，不能依赖垃圾回收。
//! - URL / Base64：字符串本身即预览来源。
//! - 存储路径：与后端基地址拼接为可抓取的绝对地址。
//!
//! ## 实现思路
//!
//! - 释放顺序固定：获取新句柄前先同步释放旧句柄；
//!   组件卸载（Drop）兜底释放；重复释放与释放未创建句柄均为安全 no-op。
//! - 预览加载失败时要区分“未设置图片”与“引用失效”，
//!   仅后者产生用户可见警告，且绝不抛出。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use super::ImageReference;

/// 本地预览句柄注册表。
///
/// 每个标签页持有一份，按句柄号存放待预览的原始字节。
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: Mutex<HashMap<u64, Bytes>>,
    next_id: AtomicU64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一份字节并发放预览地址。
    fn acquire(&self, bytes: Bytes) -> (u64, String) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id, bytes);
        }

        (id, format!("local-preview://{}", id))
    }

    /// 释放句柄。重复释放或释放未创建的句柄均返回 `false`，不报错。
    fn release(&self, id: u64) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => entries.remove(&id).is_some(),
            Err(_) => false,
        }
    }

    /// 当前存活句柄数（测试与泄漏诊断用）。
    pub fn live_handles(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

/// 预览来源。
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewSource {
    /// 本地临时句柄地址（持有期间字节驻留注册表）。
    Local(String),
    /// 直接可用的字符串来源（绝对 URL 或 data URI）。
    Direct(String),
    /// 存储路径拼接后端基地址得到的绝对地址。
    Backend(String),
}

impl PreviewSource {
    /// 预览元素可直接使用的地址字符串。
    pub fn as_str(&self) -> &str {
        match self {
            PreviewSource::Local(url)
            | PreviewSource::Direct(url)
            | PreviewSource::Backend(url) => url,
        }
    }
}

/// 预览加载失败的用户可见警告。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewWarning {
    /// 已设置引用但图片加载失败（链接失效、资源被删等）。
    BrokenReference,
}

/// 单个表单实例的预览解析器。
///
/// 持有最多一个本地预览句柄，保证“先释放旧句柄、再获取新句柄”的顺序。
pub struct PreviewResolver {
    registry: Arc<PreviewRegistry>,
    backend_base_url: String,
    current_local: Option<u64>,
    current_source: Option<PreviewSource>,
}

impl PreviewResolver {
    pub fn new(registry: Arc<PreviewRegistry>, backend_base_url: impl Into<String>) -> Self {
        Self {
            registry,
            backend_base_url: backend_base_url.into(),
            current_local: None,
            current_source: None,
        }
    }

    /// 根据当前引用解析预览来源。
    ///
    /// 未设置图片时返回 `None`，调用方应隐藏预览区域。
    pub fn resolve(&mut self, reference: &ImageReference) -> Option<PreviewSource> {
        // 任何新解析之前先同步释放旧的本地句柄
        self.release_local();

        let source = match reference {
            ImageReference::None => None,
            ImageReference::UploadedFile(file) => {
                let (id, url) = self.registry.acquire(file.bytes.clone());
                self.current_local = Some(id);
                Some(PreviewSource::Local(url))
            }
            ImageReference::RemoteUrl(url) => Some(PreviewSource::Direct(url.clone())),
            ImageReference::InlineData { subtype, payload } => Some(PreviewSource::Direct(
                format!("data:image/{};base64,{}", subtype, payload),
            )),
            ImageReference::StoredPath(path) => Some(PreviewSource::Backend(format!(
                "{}{}",
                self.backend_base_url.trim_end_matches('/'),
                path
            ))),
        };

        self.current_source = source.clone();
        source
    }

    /// 预览图片元素加载失败时调用。
    ///
    /// 仅在确实存在预览来源时产生警告；未设置图片时保持安静。
    pub fn on_load_error(&self) -> Option<PreviewWarning> {
        if self.current_source.is_some() {
            log::warn!("⚠️ 图片预览加载失败，引用可能已失效");
            Some(PreviewWarning::BrokenReference)
        } else {
            None
        }
    }

    /// 释放当前预览（组件卸载时调用）。幂等。
    pub fn clear(&mut self) {
        self.release_local();
        self.current_source = None;
    }

    fn release_local(&mut self) {
        if let Some(id) = self.current_local.take() {
            self.registry.release(id);
        }
    }
}

impl Drop for PreviewResolver {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_form::UploadedFile;

    const PNG_HEADER: [u8; 12] = [137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];

    fn picked_file() -> ImageReference {
        let file = UploadedFile::from_picked(
            "a.png",
            "image/png",
            Bytes::copy_from_slice(&PNG_HEADER),
        )
        .expect("png fixture should pass signature check");
        ImageReference::UploadedFile(file)
    }

    #[test]
    fn uploaded_file_gets_local_handle_and_releases_previous_one() {
        let registry = Arc::new(PreviewRegistry::new());
        let mut resolver = PreviewResolver::new(Arc::clone(&registry), "https://api.example.com");

        let first = resolver.resolve(&picked_file()).expect("preview expected");
        assert!(matches!(first, PreviewSource::Local(_)));
        assert_eq!(registry.live_handles(), 1);

        // 再次解析会先释放旧句柄，存活数维持为 1
        let second = resolver.resolve(&picked_file()).expect("preview expected");
        assert_ne!(first.as_str(), second.as_str());
        assert_eq!(registry.live_handles(), 1);
    }

    #[test]
    fn clear_is_idempotent_and_releasing_nothing_is_safe() {
        let registry = Arc::new(PreviewRegistry::new());
        let mut resolver = PreviewResolver::new(Arc::clone(&registry), "https://api.example.com");

        // 从未创建过句柄时释放是 no-op
        resolver.clear();
        resolver.clear();
        assert_eq!(registry.live_handles(), 0);

        resolver.resolve(&picked_file());
        assert_eq!(registry.live_handles(), 1);

        resolver.clear();
        resolver.clear();
        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn drop_releases_outstanding_handle() {
        let registry = Arc::new(PreviewRegistry::new());

        {
            let mut resolver =
                PreviewResolver::new(Arc::clone(&registry), "https://api.example.com");
            resolver.resolve(&picked_file());
            assert_eq!(registry.live_handles(), 1);
        }

        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn stored_path_is_joined_with_backend_base_url() {
        let registry = Arc::new(PreviewRegistry::new());
        let mut resolver = PreviewResolver::new(registry, "https://api.example.com/");

        let source = resolver
            .resolve(&ImageReference::StoredPath("/CategoryImages/x.png".to_string()))
            .expect("preview expected");

        assert_eq!(
            source,
            PreviewSource::Backend("https://api.example.com/CategoryImages/x.png".to_string())
        );
    }

    #[test]
    fn inline_data_previews_as_rebuilt_data_uri() {
        let registry = Arc::new(PreviewRegistry::new());
        let mut resolver = PreviewResolver::new(registry, "https://api.example.com");

        let source = resolver
            .resolve(&ImageReference::InlineData {
                subtype: "jpeg".to_string(),
                payload: "aGVsbG8=".to_string(),
            })
            .expect("preview expected");

        assert_eq!(source.as_str(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn load_error_warns_only_when_a_reference_is_set() {
        let registry = Arc::new(PreviewRegistry::new());
        let mut resolver = PreviewResolver::new(registry, "https://api.example.com");

        assert_eq!(resolver.on_load_error(), None);

        resolver.resolve(&ImageReference::RemoteUrl(
            "https://example.com/gone.png".to_string(),
        ));
        assert_eq!(resolver.on_load_error(), Some(PreviewWarning::BrokenReference));

        resolver.resolve(&ImageReference::None);
        assert_eq!(resolver.on_load_error(), None);
    }
}
