//! グループブロードキャストバスの trait 定義
//!
//! ルーム（グループ）単位でセッションを束ね、チャットイベントを全メンバーに
//! ファンアウトするためのインターフェース。具体的な実装は Infrastructure 層が
//! 提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::ChatEvent,
    error::MessagePushError,
    value_object::{GroupName, SessionId, Username},
};

/// セッションへメッセージテキストを送るためのチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// グループに参加している 1 セッション分のハンドル
#[derive(Debug, Clone)]
pub struct GroupMember {
    /// セッション識別子（グループ内で一意）
    pub session_id: SessionId,
    /// 表示名（グループ内で重複可）
    pub username: Username,
    /// セッションへの送信チャンネル
    pub sender: PusherChannel,
    /// 参加時刻（UTC、ミリ秒）
    pub joined_at: i64,
}

/// グループブロードキャストバスの trait
///
/// - `join_group` / `leave_group` はメンバーシップの増減のみを行う
/// - `broadcast` は現在のメンバー全員（送信者を含む）への best-effort 配送
/// - 最後のメンバーが離脱したグループはバス側で破棄される（グループは暗黙の存在）
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// セッションをグループに登録する
    async fn join_group(&self, group: &GroupName, member: GroupMember);

    /// セッションをグループから登録解除する（存在しない場合は no-op）
    async fn leave_group(&self, group: &GroupName, session_id: &SessionId);

    /// グループの全メンバーにイベントを配送する
    async fn broadcast(&self, group: &GroupName, event: &ChatEvent)
    -> Result<(), MessagePushError>;

    /// グループの現在のメンバー一覧を取得する
    async fn group_members(&self, group: &GroupName) -> Vec<GroupMember>;

    /// メンバーが存在する全グループ名を取得する
    async fn group_names(&self) -> Vec<GroupName>;
}
