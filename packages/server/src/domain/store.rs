//! 共有状態ストアの trait 定義
//!
//! タイマーの存在・状態に関する唯一の真実の源（source of truth）となる
//! キーバリューストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 依存性の逆転（DIP）
//!
//! - ドメイン層が必要とするインターフェースをドメイン層自身が定義
//! - Infrastructure 層（Redis 実装・インメモリ実装）がこの trait に依存
//! - タイマータスクとセッションはどちらもこの trait のみに依存するため、
//!   どのプロセスからでも同じタイマーを観測・停止できる

use async_trait::async_trait;

use super::{
    error::{StoreError, UnexpectedTimerStatus},
    value_object::GroupName,
};

/// 共有キーバリューストアの trait
///
/// どのサーバープロセスからも到達できる get / set / delete の 3 操作のみを
/// 要求します。ロックやトランザクションは要求しません。check-then-act の
/// 競合は許容される仕様です（タイマー操作側のコメントを参照）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// キーに対応する値を取得（存在しない場合は None）
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// キーに値を設定（既存の値は上書き）
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// キーを削除（存在しない場合は no-op）
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// グループの現行タイマー ID を保持するキー
pub fn timer_id_key(group: &GroupName) -> String {
    format!("chat-timer:{}:id", group.as_str())
}

/// グループのタイマー状態（running / paused）を保持するキー
pub fn timer_status_key(group: &GroupName) -> String {
    format!("chat-timer:{}:status", group.as_str())
}

/// タイマーの実行状態
///
/// ストアには `b"running"` / `b"paused"` のバイト列として保存されます。
/// それ以外の値は不変条件違反であり、観測したタイマータスクにとって致命的です。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running,
    Paused,
}

impl TimerStatus {
    /// ストアに書き込むバイト列表現
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Running => b"running",
            Self::Paused => b"paused",
        }
    }

    /// ストアから読み出した生の値を解釈する
    ///
    /// # Errors
    ///
    /// `running` / `paused` のどちらでもない値（値の欠落を含む）は
    /// [`UnexpectedTimerStatus`] を返す。
    pub fn parse(raw: Option<&[u8]>) -> Result<Self, UnexpectedTimerStatus> {
        match raw {
            Some(bytes) if bytes == Self::Running.as_bytes() => Ok(Self::Running),
            Some(bytes) if bytes == Self::Paused.as_bytes() => Ok(Self::Paused),
            Some(bytes) => Err(UnexpectedTimerStatus(
                String::from_utf8_lossy(bytes).into_owned(),
            )),
            None => Err(UnexpectedTimerStatus("<missing>".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::RoomName;

    fn lobby_group() -> GroupName {
        GroupName::for_room(&RoomName::new("lobby".to_string()).unwrap())
    }

    #[test]
    fn test_timer_key_format() {
        // テスト項目: タイマーキーが "chat-timer:<group>:id" / ":status" 形式になる
        // given (前提条件):
        let group = lobby_group();

        // then (期待する結果):
        assert_eq!(timer_id_key(&group), "chat-timer:chat_lobby:id");
        assert_eq!(timer_status_key(&group), "chat-timer:chat_lobby:status");
    }

    #[test]
    fn test_timer_status_roundtrip() {
        // テスト項目: ストア表現から TimerStatus を復元できる
        // then (期待する結果):
        assert_eq!(
            TimerStatus::parse(Some(b"running")),
            Ok(TimerStatus::Running)
        );
        assert_eq!(TimerStatus::parse(Some(b"paused")), Ok(TimerStatus::Paused));
    }

    #[test]
    fn test_timer_status_unexpected_value_fails() {
        // テスト項目: 未知の状態値は不変条件違反としてエラーになる
        // when (操作):
        let result = TimerStatus::parse(Some(b"borked"));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            UnexpectedTimerStatus("borked".to_string())
        );
    }

    #[test]
    fn test_timer_status_missing_value_fails() {
        // テスト項目: id が存在するのに状態値が欠落している場合もエラーになる
        // when (操作):
        let result = TimerStatus::parse(None);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
