//! UseCase: ルームタイマーの制御とカウントダウンタスク
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - start / pause / resume / stop による共有ストア上のタイマーレコード操作
//! - バックグラウンドのカウントダウンループ（tick 配送、一時停止、supersession、自然満了）
//!
//! ### なぜこのテストが必要か
//! - タイマーの存在・状態は共有ストアが唯一の真実の源であり、
//!   レコード操作の正しさがプロセス間制御の前提になる
//! - 走行中のタスクへの直接の停止手段は存在せず、ストア経由の間接的な
//!   キャンセル（id の書き換え・削除）だけが頼りであるため
//!
//! ### どのような状況を想定しているか
//! - 正常系: start からの自然満了（1 秒ごとの tick、最後は "time left: 1"）
//! - 一時停止: pause 中は tick も残り秒数の減算も行われない
//! - supersession: 二重 start で古いタスクが次の poll で静かに終了する
//! - 異常系: レコードのない pause / resume / stop（no-op）、
//!   ストア障害、想定外の状態値（タスクのみ異常終了）

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::{
    ChatEvent, GroupName, MessagePusher, SharedStore, TimerCommand, TimerId, TimerIdFactory,
    TimerStatus, timer_id_key, timer_status_key,
};

use super::error::TimerError;

/// `timer start` コマンドで起動するタイマーの秒数
pub const START_TIMER_SECONDS: u64 = 60;

/// カウントダウンループの周期
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// ルームタイマー制御のユースケース
///
/// タイマーの状態は共有ストア（`chat-timer:<group>:id` / `:status`）にのみ
/// 存在します。カウントダウンタスクは毎秒ストアを poll して自分が現行
/// タイマーかどうかを確認するため、タスクを起動したプロセスと別の
/// プロセス・セッションからでも pause / resume / stop が効きます。
pub struct ControlTimerUseCase {
    /// 共有ストア（データアクセス層の抽象化）
    store: Arc<dyn SharedStore>,
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
}

impl ControlTimerUseCase {
    /// 新しい ControlTimerUseCase を作成
    pub fn new(store: Arc<dyn SharedStore>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { store, pusher }
    }

    /// 解釈済みのタイマーコマンドを実行
    pub async fn dispatch(
        &self,
        group: &GroupName,
        command: TimerCommand,
    ) -> Result<(), TimerError> {
        match command {
            TimerCommand::Start => {
                // fire-and-forget。ハンドルは待たない
                self.start(group, START_TIMER_SECONDS).await?;
            }
            TimerCommand::Pause => self.pause(group).await?,
            TimerCommand::Resume => self.resume(group).await?,
            TimerCommand::Stop => self.stop(group).await?,
        }
        Ok(())
    }

    /// タイマーを開始する
    ///
    /// 既にこのルームでタイマーが走っていた場合は id を無条件に上書きし、
    /// 古いタスクは次の poll で id 不一致を検出して自律的に終了します
    /// （supersession）。明示的なキャンセル通知は送りません。
    ///
    /// 呼び出し元をブロックしないよう、カウントダウンは detach された
    /// バックグラウンドタスクとして起動します。返される `JoinHandle` は
    /// 観測・テスト用で、await する必要はありません。
    pub async fn start(
        &self,
        group: &GroupName,
        seconds: u64,
    ) -> Result<JoinHandle<()>, TimerError> {
        // 1. 新しいタイマー ID を生成してレコードを作成（既存レコードは上書き）
        let timer_id = TimerIdFactory::generate().expect("generated TimerId should be valid");
        self.store
            .set(&timer_id_key(group), timer_id.as_bytes())
            .await?;

        // 2. 開始直後のタイマーは running 状態にする
        self.resume(group).await?;

        tracing::info!(
            "Timer {} started for group '{}' ({} seconds)",
            timer_id,
            group,
            seconds
        );

        // 3. カウントダウンタスクをバックグラウンドで起動
        let store = Arc::clone(&self.store);
        let pusher = Arc::clone(&self.pusher);
        let group = group.clone();
        Ok(tokio::spawn(async move {
            if let Err(e) = run_countdown(store, pusher, &group, &timer_id, seconds).await {
                // このタスクだけが異常終了する。他のセッション・ルーム・
                // タイマーには影響しない
                tracing::error!("Timer task for group '{}' aborted: {}", group, e);
            }
        }))
    }

    /// タイマーを一時停止する（このルームでタイマーが走っている場合のみ）
    pub async fn pause(&self, group: &GroupName) -> Result<(), TimerError> {
        // 存在確認と更新は別々のストア操作。間に他の操作が割り込む競合は
        // 仕様上許容されている（best-effort）
        if self.store.get(&timer_id_key(group)).await?.is_some() {
            self.store
                .set(&timer_status_key(group), TimerStatus::Paused.as_bytes())
                .await?;
        }
        Ok(())
    }

    /// タイマーの一時停止を解除する（このルームでタイマーが走っている場合のみ）
    pub async fn resume(&self, group: &GroupName) -> Result<(), TimerError> {
        if self.store.get(&timer_id_key(group)).await?.is_some() {
            self.store
                .set(&timer_status_key(group), TimerStatus::Running.as_bytes())
                .await?;
        }
        Ok(())
    }

    /// タイマーを完全に停止してレコードを削除する（走っている場合のみ）
    pub async fn stop(&self, group: &GroupName) -> Result<(), TimerError> {
        if self.store.get(&timer_id_key(group)).await?.is_some() {
            self.store.delete(&timer_id_key(group)).await?;
            self.store.delete(&timer_status_key(group)).await?;
        }
        Ok(())
    }
}

/// カウントダウンループ本体
///
/// `(group, timer_id, remaining)` に束縛された 1 インスタンスが、残り秒数が
/// 0 になるか、自分が現行タイマーでなくなるまで毎秒 1 周します。起動した
/// セッションへの参照は持たず、共有ストアとバスにのみ依存します。
async fn run_countdown(
    store: Arc<dyn SharedStore>,
    pusher: Arc<dyn MessagePusher>,
    group: &GroupName,
    timer_id: &TimerId,
    mut remaining: u64,
) -> Result<(), TimerError> {
    while remaining != 0 {
        // 1. 現行 id の確認。stop で消えたか、新しい start に置き換えられて
        //    いたら、このタスクの役目は終わり（エラーではない）
        let current_id = store.get(&timer_id_key(group)).await?;
        if current_id.as_deref() != Some(timer_id.as_bytes()) {
            tracing::debug!(
                "Timer {} for group '{}' was stopped or superseded",
                timer_id,
                group
            );
            return Ok(());
        }

        // 2. 状態の確認。running なら tick を配送して減算、paused なら何もしない
        let raw_status = store.get(&timer_status_key(group)).await?;
        match TimerStatus::parse(raw_status.as_deref())? {
            TimerStatus::Running => {
                // tick の配送は best-effort。失敗してもカウントダウンは進める
                if let Err(e) = pusher
                    .broadcast(group, &ChatEvent::countdown_tick(remaining))
                    .await
                {
                    tracing::warn!("Failed to broadcast tick for group '{}': {}", group, e);
                }
                remaining -= 1;
            }
            TimerStatus::Paused => {}
        }

        // 3. どちらの分岐でも 1 秒待ってから次の周回へ
        tokio::time::sleep(TICK_INTERVAL).await;
    }

    // 自然満了。直前の sleep 中に新しい start が割り込んでいなければ
    // レコードを片付ける
    let current_id = store.get(&timer_id_key(group)).await?;
    if current_id.as_deref() == Some(timer_id.as_bytes()) {
        store.delete(&timer_id_key(group)).await?;
        store.delete(&timer_status_key(group)).await?;
        tracing::info!("Timer {} for group '{}' expired", timer_id, group);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupMember, RoomName, SessionIdFactory, StoreError, Username};
    use crate::domain::store::MockSharedStore;
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, store::InMemorySharedStore,
    };
    use tokio::sync::mpsc;

    fn lobby_group() -> GroupName {
        GroupName::for_room(&RoomName::new("lobby".to_string()).unwrap())
    }

    fn create_test_usecase() -> (
        ControlTimerUseCase,
        Arc<InMemorySharedStore>,
        Arc<WebSocketMessagePusher>,
    ) {
        let store = Arc::new(InMemorySharedStore::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ControlTimerUseCase::new(store.clone(), pusher.clone());
        (usecase, store, pusher)
    }

    /// グループに聞き役のセッションを 1 つ参加させ、受信チャンネルを返す
    async fn join_listener(
        pusher: &WebSocketMessagePusher,
        group: &GroupName,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        pusher
            .join_group(
                group,
                GroupMember {
                    session_id: SessionIdFactory::generate(),
                    username: Username::new("listener".to_string()).unwrap(),
                    sender: tx,
                    joined_at: 1000,
                },
            )
            .await;
        rx
    }

    /// これまでに受信したメッセージを全て取り出す
    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// 起動済みタスクにスケジューラを譲る（poll を 1 回分進めさせる）
    async fn let_tasks_run() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_creates_running_record() {
        // テスト項目: start がタイマーレコード（id + running 状態）を作成する
        // given (前提条件):
        let (usecase, store, _pusher) = create_test_usecase();
        let group = lobby_group();

        // when (操作):
        let _handle = usecase.start(&group, 60).await.unwrap();

        // then (期待する結果):
        let id = store.get(&timer_id_key(&group)).await.unwrap();
        assert_eq!(id.unwrap().len(), 36); // UUID v4 の標準長
        let status = store.get(&timer_status_key(&group)).await.unwrap();
        assert_eq!(status, Some(b"running".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_then_expires() {
        // テスト項目: 3 秒のタイマーが "time left: 3" "2" "1" を配送して自然満了する
        // given (前提条件):
        let (usecase, store, pusher) = create_test_usecase();
        let group = lobby_group();
        let mut rx = join_listener(&pusher, &group).await;

        // when (操作): タスクの完了まで進める（テストクロックは自動で進む）
        let handle = usecase.start(&group, 3).await.unwrap();
        handle.await.unwrap();

        // then (期待する結果): tick は 3 回だけ。最後は "time left: 1" で "0" はない
        assert_eq!(
            drain(&mut rx),
            vec!["time left: 3", "time left: 2", "time left: 1"]
        );

        // 自然満了でレコードは削除される
        assert_eq!(store.get(&timer_id_key(&group)).await.unwrap(), None);
        assert_eq!(store.get(&timer_status_key(&group)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_tick_prevents_all_broadcasts() {
        // テスト項目: start 直後（最初の poll 前）の stop で tick が 1 つも配送されない
        // given (前提条件):
        let (usecase, store, pusher) = create_test_usecase();
        let group = lobby_group();
        let mut rx = join_listener(&pusher, &group).await;

        // when (操作): 同一ティック内で start → stop
        let handle = usecase.start(&group, 60).await.unwrap();
        usecase.stop(&group).await.unwrap();
        handle.await.unwrap();

        // then (期待する結果): 最初の存在確認で終了し、tick はゼロ
        assert_eq!(drain(&mut rx), Vec::<String>::new());
        assert_eq!(store.get(&timer_id_key(&group)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_supersedes_first_timer() {
        // テスト項目: 二重 start で最初のタスクが次の poll で終了し、
        //             以後は新しいタイマーの tick だけが流れる
        // given (前提条件):
        let (usecase, _store, pusher) = create_test_usecase();
        let group = lobby_group();
        let mut rx = join_listener(&pusher, &group).await;

        // when (操作): タイマー A を起動して最初の tick まで進める
        let handle_a = usecase.start(&group, 3).await.unwrap();
        let_tasks_run().await;
        assert_eq!(drain(&mut rx), vec!["time left: 3"]);

        // タイマー B で上書きする（A への明示的なキャンセルはない）
        let handle_b = usecase.start(&group, 5).await.unwrap();
        let_tasks_run().await;
        assert_eq!(drain(&mut rx), vec!["time left: 5"]);

        // 1 秒進める: A は id 不一致を検出して終了、B は tick を続ける
        tokio::time::advance(Duration::from_secs(1)).await;
        let_tasks_run().await;

        // then (期待する結果):
        assert_eq!(drain(&mut rx), vec!["time left: 4"]);
        handle_a.await.unwrap(); // A は静かに終了している

        // 後始末: B を止める
        usecase.stop(&group).await.unwrap();
        handle_b.await.unwrap();
        assert_eq!(drain(&mut rx), Vec::<String>::new());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_countdown_and_resume_continues() {
        // テスト項目: pause 中は tick も減算も止まり、resume で凍結値から再開する
        // given (前提条件):
        let (usecase, store, pusher) = create_test_usecase();
        let group = lobby_group();
        let mut rx = join_listener(&pusher, &group).await;

        // when (操作): 最初の tick まで進めてから pause
        let handle = usecase.start(&group, 3).await.unwrap();
        let_tasks_run().await;
        assert_eq!(drain(&mut rx), vec!["time left: 3"]);

        usecase.pause(&group).await.unwrap();

        // pause 中に 2 秒経過しても tick は流れない
        tokio::time::advance(Duration::from_secs(1)).await;
        let_tasks_run().await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let_tasks_run().await;
        assert_eq!(drain(&mut rx), Vec::<String>::new());

        // then (期待する結果): resume 後は凍結値（残り 2 秒）から再開して満了する
        usecase.resume(&group).await.unwrap();
        handle.await.unwrap();
        assert_eq!(drain(&mut rx), vec!["time left: 2", "time left: 1"]);
        assert_eq!(store.get(&timer_id_key(&group)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pause_without_timer_is_noop() {
        // テスト項目: タイマーのないルームへの pause は no-op（レコードも作らない）
        // given (前提条件):
        let (usecase, store, _pusher) = create_test_usecase();
        let group = lobby_group();

        // when (操作):
        let result = usecase.pause(&group).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(store.get(&timer_status_key(&group)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resume_without_timer_is_noop() {
        // テスト項目: タイマーのないルームへの resume は no-op
        // given (前提条件):
        let (usecase, store, _pusher) = create_test_usecase();
        let group = lobby_group();

        // when (操作):
        let result = usecase.resume(&group).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(store.get(&timer_status_key(&group)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stop_without_timer_is_noop() {
        // テスト項目: タイマーのないルームへの stop は no-op（エラーにも配送にもならない）
        // given (前提条件):
        let (usecase, _store, pusher) = create_test_usecase();
        let group = lobby_group();
        let mut rx = join_listener(&pusher, &group).await;

        // when (操作):
        let result = usecase.stop(&group).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(drain(&mut rx), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_pause_sets_status_when_record_exists() {
        // テスト項目: レコードがある場合の pause は status を paused にする
        // given (前提条件):
        let (usecase, store, _pusher) = create_test_usecase();
        let group = lobby_group();
        store
            .set(&timer_id_key(&group), b"some-timer-id")
            .await
            .unwrap();
        store
            .set(&timer_status_key(&group), b"running")
            .await
            .unwrap();

        // when (操作):
        usecase.pause(&group).await.unwrap();

        // then (期待する結果): id はそのまま、status だけが変わる
        assert_eq!(
            store.get(&timer_id_key(&group)).await.unwrap(),
            Some(b"some-timer-id".to_vec())
        );
        assert_eq!(
            store.get(&timer_status_key(&group)).await.unwrap(),
            Some(b"paused".to_vec())
        );
    }

    #[tokio::test]
    async fn test_stop_deletes_record() {
        // テスト項目: stop が id と status の両方を削除する
        // given (前提条件):
        let (usecase, store, _pusher) = create_test_usecase();
        let group = lobby_group();
        store
            .set(&timer_id_key(&group), b"some-timer-id")
            .await
            .unwrap();
        store
            .set(&timer_status_key(&group), b"paused")
            .await
            .unwrap();

        // when (操作):
        usecase.stop(&group).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.get(&timer_id_key(&group)).await.unwrap(), None);
        assert_eq!(store.get(&timer_status_key(&group)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_status_aborts_task_only() {
        // テスト項目: 想定外の状態値でタスクだけが異常終了する（他には波及しない）
        // given (前提条件):
        let (usecase, store, pusher) = create_test_usecase();
        let group = lobby_group();
        let mut rx = join_listener(&pusher, &group).await;

        let handle = usecase.start(&group, 5).await.unwrap();
        let_tasks_run().await;
        assert_eq!(drain(&mut rx), vec!["time left: 5"]);

        // when (操作): ストア上の状態値を壊す
        store
            .set(&timer_status_key(&group), b"borked")
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;

        // then (期待する結果): タスクは終了し、以後 tick は流れない
        handle.await.unwrap();
        assert_eq!(drain(&mut rx), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_start_propagates_store_failure() {
        // テスト項目: ストア書き込みの失敗は start のエラーとして伝播する
        // given (前提条件):
        let mut mock_store = MockSharedStore::new();
        mock_store
            .expect_set()
            .returning(|_, _| Err(StoreError::Backend("connection refused".to_string())));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ControlTimerUseCase::new(Arc::new(mock_store), pusher);

        // when (操作):
        let result = usecase.start(&lobby_group(), 60).await;

        // then (期待する結果):
        assert!(matches!(result, Err(TimerError::Store(_))));
    }

    #[tokio::test]
    async fn test_dispatch_routes_commands() {
        // テスト項目: dispatch が各コマンドを対応する操作に振り分ける
        // given (前提条件):
        let (usecase, store, _pusher) = create_test_usecase();
        let group = lobby_group();

        // when (操作): Start → レコード作成
        usecase.dispatch(&group, TimerCommand::Start).await.unwrap();
        assert!(
            store
                .get(&timer_id_key(&group))
                .await
                .unwrap()
                .is_some()
        );

        // Pause → paused
        usecase.dispatch(&group, TimerCommand::Pause).await.unwrap();
        assert_eq!(
            store.get(&timer_status_key(&group)).await.unwrap(),
            Some(b"paused".to_vec())
        );

        // Resume → running
        usecase
            .dispatch(&group, TimerCommand::Resume)
            .await
            .unwrap();
        assert_eq!(
            store.get(&timer_status_key(&group)).await.unwrap(),
            Some(b"running".to_vec())
        );

        // then (期待する結果): Stop → レコード削除
        usecase.dispatch(&group, TimerCommand::Stop).await.unwrap();
        assert_eq!(store.get(&timer_id_key(&group)).await.unwrap(), None);
    }
}
