//! UseCase: セッション切断処理
//!
//! 切断時の処理はブロードキャストグループからの離脱のみです。接続が完了
//! しないまま切断されたセッションに対しても安全（冪等）である必要が
//! あります。

use std::sync::Arc;

use crate::domain::{MessagePusher, Session};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self { pusher }
    }

    /// セッション切断を実行
    ///
    /// グループに参加していないセッションに対しては no-op です。
    pub async fn execute(&self, session: &Session) {
        self.pusher
            .leave_group(&session.group(), &session.id)
            .await;

        tracing::info!(
            "Session '{}' ('{}') left group '{}'",
            session.id,
            session.username,
            session.group()
        );
    }
}
