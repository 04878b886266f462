//! UseCase: アクティブなルーム一覧の取得
//!
//! ルームは暗黙の存在（メンバーがいる間だけバス上にある）なので、
//! 一覧はバスのメンバーシップをそのまま写したものになります。

use std::sync::Arc;

use crate::domain::{GroupMember, MessagePusher};

/// アクティブなルーム 1 件の要約
#[derive(Debug, Clone)]
pub struct RoomSummary {
    /// ルーム名（グループプレフィックスを除いたもの）
    pub name: String,
    /// 現在接続中のメンバー
    pub members: Vec<GroupMember>,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self { pusher }
    }

    /// アクティブなルーム一覧を取得
    ///
    /// # Returns
    ///
    /// ルーム名でソートされた一覧。各ルームのメンバーもユーザー名で
    /// ソートされる（出力の安定性のため）。
    pub async fn execute(&self) -> Vec<RoomSummary> {
        let mut summaries = Vec::new();
        for group in self.pusher.group_names().await {
            let mut members = self.pusher.group_members(&group).await;
            members.sort_by(|a, b| {
                a.username
                    .as_str()
                    .cmp(b.username.as_str())
                    .then(a.joined_at.cmp(&b.joined_at))
            });
            summaries.push(RoomSummary {
                name: group.room_name().to_string(),
                members,
            });
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupName, RoomName, SessionIdFactory, Username};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::sync::mpsc;

    async fn join_member(
        pusher: &WebSocketMessagePusher,
        room: &str,
        username: &str,
        joined_at: i64,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let group = GroupName::for_room(&RoomName::new(room.to_string()).unwrap());
        pusher
            .join_group(
                &group,
                GroupMember {
                    session_id: SessionIdFactory::generate(),
                    username: Username::new(username.to_string()).unwrap(),
                    sender: tx,
                    joined_at,
                },
            )
            .await;
        rx
    }

    #[tokio::test]
    async fn test_no_active_rooms_returns_empty_list() {
        // テスト項目: メンバーのいるルームがなければ空のリストが返される
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = GetRoomsUseCase::new(pusher);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(result.len(), 0);
    }

    #[tokio::test]
    async fn test_rooms_and_members_are_sorted() {
        // テスト項目: ルームはルーム名、メンバーはユーザー名でソートされる
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = GetRoomsUseCase::new(pusher.clone());
        let _rx1 = join_member(&pusher, "zebra", "bob", 2000).await;
        let _rx2 = join_member(&pusher, "lobby", "charlie", 3000).await;
        let _rx3 = join_member(&pusher, "lobby", "alice", 1000).await;

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "lobby");
        assert_eq!(result[0].members.len(), 2);
        assert_eq!(result[0].members[0].username.as_str(), "alice");
        assert_eq!(result[0].members[1].username.as_str(), "charlie");
        assert_eq!(result[1].name, "zebra");
        assert_eq!(result[1].members[0].username.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_room_name_has_no_group_prefix() {
        // テスト項目: ルーム名に内部のグループプレフィックスが漏れない
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = GetRoomsUseCase::new(pusher.clone());
        let _rx = join_member(&pusher, "lobby", "alice", 1000).await;

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(result[0].name, "lobby");
    }
}
