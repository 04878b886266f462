//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - グループごとのメンバーシップ（`SessionId` → `GroupMember`）の管理
//! - グループ全メンバーへのイベント配送（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの配送」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: グループメンバーシップの管理、ファンアウト
//!
//! 配送は best-effort です。切断直後のセッションへの送信失敗は警告ログに
//! 残すだけで、他メンバーへの配送は継続します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatEvent, GroupMember, GroupName, MessagePushError, MessagePusher, SessionId,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `groups`: グループ名 → （セッション ID → メンバーハンドル）のマップ
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// グループごとの接続中メンバー
    groups: Arc<Mutex<HashMap<GroupName, HashMap<SessionId, GroupMember>>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn join_group(&self, group: &GroupName, member: GroupMember) {
        let mut groups = self.groups.lock().await;
        let members = groups.entry(group.clone()).or_default();
        members.insert(member.session_id, member);
        tracing::debug!(
            "Session joined group '{}' ({} members)",
            group,
            members.len()
        );
    }

    async fn leave_group(&self, group: &GroupName, session_id: &SessionId) {
        let mut groups = self.groups.lock().await;
        if let Some(members) = groups.get_mut(group) {
            members.remove(session_id);
            tracing::debug!(
                "Session '{}' left group '{}' ({} members remain)",
                session_id,
                group,
                members.len()
            );
            // 最後のメンバーが抜けたグループは破棄する（グループは暗黙の存在）
            if members.is_empty() {
                groups.remove(group);
                tracing::debug!("Group '{}' is empty, removed", group);
            }
        }
    }

    async fn broadcast(
        &self,
        group: &GroupName,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError> {
        let groups = self.groups.lock().await;

        let Some(members) = groups.get(group) else {
            tracing::debug!("No members in group '{}', nothing to broadcast", group);
            return Ok(());
        };

        for (session_id, member) in members.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = member.sender.send(event.text().to_string()) {
                tracing::warn!(
                    "Failed to push message to session '{}' in group '{}': {}",
                    session_id,
                    group,
                    e
                );
            }
        }

        Ok(())
    }

    async fn group_members(&self, group: &GroupName) -> Vec<GroupMember> {
        let groups = self.groups.lock().await;
        groups
            .get(group)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn group_names(&self) -> Vec<GroupName> {
        let groups = self.groups.lock().await;
        groups.keys().cloned().collect()
    }
}
