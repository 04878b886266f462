//! UseCase: 受信メッセージの処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - エコーのブロードキャスト（無条件・1 回だけ）とタイマーコマンドの振り分け
//!
//! ### なぜこのテストが必要か
//! - 受信テキストは必ず "username: text" としてエコーされる（コマンドでも）
//! - タイマー操作は特権ユーザー（admin / root）の完全一致コマンドに限られる
//! - タイマー操作の失敗がセッションを巻き込まないこと（隔離）を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系: 通常メッセージのエコー、特権ユーザーのコマンド実行
//! - 権限なし: 非特権ユーザーのコマンド風テキスト（エコーのみ、副作用なし）
//! - エッジケース: 特権ユーザーの未知コマンド（エコーのみ）

use std::sync::Arc;

use crate::domain::{ChatEvent, MessagePushError, MessagePusher, Session, TimerCommand};

use super::timer::ControlTimerUseCase;

/// 受信メッセージ処理のユースケース
pub struct SendMessageUseCase {
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
    /// タイマー制御のユースケース（コマンドの委譲先）
    timer: Arc<ControlTimerUseCase>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(pusher: Arc<dyn MessagePusher>, timer: Arc<ControlTimerUseCase>) -> Self {
        Self { pusher, timer }
    }

    /// 受信メッセージを処理する
    ///
    /// まずテキストを無条件にルームへエコーし（コマンドとして解釈される
    /// 場合でも）、その後、送信者が特権ユーザーであればタイマーコマンドを
    /// 実行します。コマンドに一致しないテキストはエコー以外に何もしません。
    ///
    /// # Arguments
    ///
    /// * `session` - 送信元セッション
    /// * `text` - 受信したテキストフレーム
    pub async fn execute(&self, session: &Session, text: &str) -> Result<(), MessagePushError> {
        let group = session.group();

        // 1. エコーのブロードキャスト。コマンドかどうかに関わらず必ず行う
        self.pusher
            .broadcast(&group, &ChatEvent::chat_line(&session.username, text))
            .await?;

        // 2. 特権ユーザーのコマンドだけがタイマーに作用する
        if session.username.is_privileged()
            && let Some(command) = TimerCommand::parse(text)
        {
            // タイマー操作の失敗はこのセッションを落とさない（隔離）
            if let Err(e) = self.timer.dispatch(&group, command).await {
                tracing::error!(
                    "Timer command {:?} from '{}' failed for group '{}': {}",
                    command,
                    session.username,
                    group,
                    e
                );
            }
        }

        Ok(())
    }
}
