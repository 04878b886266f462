//! インメモリ SharedStore 実装
//!
//! HashMap をキーバリューストアとして使用します。テストおよび
//! 単一プロセス構成向けで、プロセスをまたいだタイマー制御はできません。
//! 本番構成では `RedisSharedStore` を使用してください。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{SharedStore, StoreError};

/// インメモリ SharedStore 実装
#[derive(Default)]
pub struct InMemorySharedStore {
    /// キーバリューのエントリ
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemorySharedStore {
    /// 新しい InMemorySharedStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SharedStore for InMemorySharedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}
