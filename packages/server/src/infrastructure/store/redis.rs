//! Redis を使った SharedStore 実装
//!
//! ## 責務
//!
//! - Redis への接続管理（`ConnectionManager` による自動再接続）
//! - タイマーキーの get / set / delete
//!
//! ## 設計ノート
//!
//! タイマー状態を Redis に置くことで、タイマータスクを起動したプロセスとは
//! 別のプロセスからも同じタイマーを観測・一時停止・破棄できます。
//! キーの命名はドメイン層（`timer_id_key` / `timer_status_key`）が持ち、
//! この実装は素のキーバリュー操作のみを行います。

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::domain::{SharedStore, StoreError};

/// Redis を使った SharedStore 実装
pub struct RedisSharedStore {
    /// 共有接続。各操作ではクローンして使う（ConnectionManager は Clone 可能）
    conn: ConnectionManager,
}

impl RedisSharedStore {
    /// Redis に接続して RedisSharedStore を作成
    ///
    /// # Arguments
    ///
    /// * `url` - Redis の接続 URL（例: "redis://127.0.0.1:6379"）
    ///
    /// # Errors
    ///
    /// URL が不正な場合、または接続が確立できない場合はエラーを返す。
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| StoreError::Backend(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SharedStore for RedisSharedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
