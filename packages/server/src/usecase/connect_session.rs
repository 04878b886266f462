//! UseCase: セッション接続処理
//!
//! 接続時の処理はブロードキャストグループへの参加のみです。ユーザー名の
//! 重複は許容され（表示名であって識別子ではない）、参加・離脱の通知
//! メッセージも流しません。

use std::sync::Arc;

use irori_shared::time::get_utc_timestamp;

use crate::domain::{GroupMember, MessagePusher, PusherChannel, Session};

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self { pusher }
    }

    /// セッション接続を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 接続するセッション
    /// * `sender` - セッションへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 参加時刻（UTC、ミリ秒）
    pub async fn execute(&self, session: &Session, sender: PusherChannel) -> i64 {
        let joined_at = get_utc_timestamp();
        let member = GroupMember {
            session_id: session.id,
            username: session.username.clone(),
            sender,
            joined_at,
        };
        self.pusher.join_group(&session.group(), member).await;

        tracing::info!(
            "Session '{}' ('{}') joined group '{}'",
            session.id,
            session.username,
            session.group()
        );

        joined_at
    }
}
