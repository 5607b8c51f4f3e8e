//! 令牌存储模块
//!
//! 通过 `KeyValueStore` 抽象浏览器持久化存储，前端使用 LocalStorage 实现，
//! 测试使用内存实现。所有读写失败都静默降级，不打断渲染。

use std::cell::RefCell;
use std::collections::HashMap;

pub const ACCESS_TOKEN_KEY: &str = "keeply_access_token";
pub const REFRESH_TOKEN_KEY: &str = "keeply_refresh_token";

/// 键值存储抽象
///
/// 与 LocalStorage 语义一致：读取失败返回 `None`，写入失败返回 `false`。
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 访问令牌与刷新令牌
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// 是否与令牌相关的存储键
    pub fn is_token_key(key: &str) -> bool {
        key == ACCESS_TOKEN_KEY || key == REFRESH_TOKEN_KEY
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// 令牌存取器
pub struct TokenStore<S> {
    store: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 读取两个令牌
    pub fn read(&self) -> TokenPair {
        TokenPair {
            access_token: self.store.get(ACCESS_TOKEN_KEY),
            refresh_token: self.store.get(REFRESH_TOKEN_KEY),
        }
    }

    /// 写入登录返回的令牌，缺失的令牌保持原值
    pub fn save(&self, access_token: Option<&str>, refresh_token: Option<&str>) {
        if let Some(token) = access_token {
            if !self.store.set(ACCESS_TOKEN_KEY, token) {
                tracing::warn!(key = ACCESS_TOKEN_KEY, "storage write failed");
            }
        }
        if let Some(token) = refresh_token {
            if !self.store.set(REFRESH_TOKEN_KEY, token) {
                tracing::warn!(key = REFRESH_TOKEN_KEY, "storage write failed");
            }
        }
    }

    /// 注销：清除两个令牌
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if !self.store.delete(key) {
                tracing::warn!(key, "storage delete failed");
            }
        }
    }
}

/// 内存存储，供测试与无 DOM 环境使用
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.items.borrow_mut().remove(key);
        true
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 模拟存储不可用（隐私模式等）
    struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> bool {
            false
        }

        fn delete(&self, _key: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_save_and_read_tokens() {
        let store = TokenStore::new(MemoryStore::new());
        store.save(Some("access"), Some("refresh"));

        let tokens = store.read();
        assert_eq!(tokens.access_token.as_deref(), Some("access"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn test_save_skips_missing_tokens() {
        let memory = MemoryStore::new();
        memory.set(REFRESH_TOKEN_KEY, "old-refresh");

        let store = TokenStore::new(&memory);
        store.save(Some("new-access"), None);

        let tokens = store.read();
        assert_eq!(tokens.access_token.as_deref(), Some("new-access"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("old-refresh"));
    }

    #[test]
    fn test_logout_clears_both_keys() {
        let store = TokenStore::new(MemoryStore::new());
        store.save(Some("access"), Some("refresh"));

        store.clear();

        assert_eq!(store.read(), TokenPair::default());
    }

    #[test]
    fn test_unavailable_storage_degrades_silently() {
        let store = TokenStore::new(UnavailableStore);
        store.save(Some("access"), Some("refresh"));
        store.clear();

        assert_eq!(store.read(), TokenPair::default());
    }

    #[test]
    fn test_token_key_filter() {
        assert!(TokenPair::is_token_key(ACCESS_TOKEN_KEY));
        assert!(TokenPair::is_token_key(REFRESH_TOKEN_KEY));
        assert!(!TokenPair::is_token_key("keeply_theme"));
    }
}
