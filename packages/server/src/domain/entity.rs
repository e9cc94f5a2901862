//! エンティティ（Entity）
//!
//! Room は 1 対局の集約ルート。着手・リスタート・オンライン状態の変更は
//! すべて Room のメソッドを通して行い、不変条件をここで守る。

use super::{
    board::{Evaluation, evaluate},
    error::{MoveRejection, RoomError},
    value_object::{CellId, ConnectionId, PlayerName, PlayerSlot, RoomId, SessionId, Timestamp},
};

/// プレイヤー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// 再接続時に席を特定するためのセッション
    pub session_id: SessionId,
    /// 現在紐付いている接続
    pub connection_id: ConnectionId,
    pub name: PlayerName,
    pub online: bool,
}

impl Player {
    pub fn new(session_id: SessionId, connection_id: ConnectionId, name: PlayerName) -> Self {
        Self {
            session_id,
            connection_id,
            name,
            online: true,
        }
    }
}

/// 着手 1 件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedCell {
    pub cell: CellId,
    pub slot: PlayerSlot,
}

/// ルームの進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// player2 の参加待ち
    Waiting,
    InProgress,
    /// 勝敗または引き分けが確定（`Ongoing` にはならない）
    Finished(Evaluation),
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in-progress",
            Self::Finished(_) => "finished",
        }
    }
}

/// 対局ルーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    player1: Player,
    player2: Option<Player>,
    played_cells: Vec<PlayedCell>,
    status: RoomStatus,
    closed: bool,
}

impl Room {
    /// 作成者を player1 として新しいルームを作成
    pub fn new(id: RoomId, player1: Player, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            player1,
            player2: None,
            played_cells: Vec::new(),
            status: RoomStatus::Waiting,
            closed: false,
        }
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> Option<&Player> {
        self.player2.as_ref()
    }

    pub fn player(&self, slot: PlayerSlot) -> Option<&Player> {
        match slot {
            PlayerSlot::Player1 => Some(&self.player1),
            PlayerSlot::Player2 => self.player2.as_ref(),
        }
    }

    fn player_mut(&mut self, slot: PlayerSlot) -> Option<&mut Player> {
        match slot {
            PlayerSlot::Player1 => Some(&mut self.player1),
            PlayerSlot::Player2 => self.player2.as_mut(),
        }
    }

    pub fn played_cells(&self) -> &[PlayedCell] {
        &self.played_cells
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 接続 ID から席を引く（現在紐付いている接続のみ一致する）
    pub fn slot_of(&self, connection_id: ConnectionId) -> Option<PlayerSlot> {
        [PlayerSlot::Player1, PlayerSlot::Player2]
            .into_iter()
            .find(|&slot| {
                self.player(slot)
                    .is_some_and(|p| p.connection_id == connection_id)
            })
    }

    /// 次に着手する席（着手数が偶数なら player1）
    pub fn current_turn(&self) -> PlayerSlot {
        if self.played_cells.len() % 2 == 0 {
            PlayerSlot::Player1
        } else {
            PlayerSlot::Player2
        }
    }

    /// オンラインのプレイヤーの接続 ID
    pub fn online_connections(&self) -> Vec<ConnectionId> {
        [Some(&self.player1), self.player2.as_ref()]
            .into_iter()
            .flatten()
            .filter(|p| p.online)
            .map(|p| p.connection_id)
            .collect()
    }

    /// 指定した接続以外のオンライン接続
    pub fn online_connections_except(&self, connection_id: ConnectionId) -> Vec<ConnectionId> {
        self.online_connections()
            .into_iter()
            .filter(|id| *id != connection_id)
            .collect()
    }

    /// 着席しているプレイヤーのセッション
    pub fn session_ids(&self) -> Vec<SessionId> {
        [Some(&self.player1), self.player2.as_ref()]
            .into_iter()
            .flatten()
            .map(|p| p.session_id.clone())
            .collect()
    }

    /// 全プレイヤーがオフライン（空席は不在として扱う）
    pub fn is_abandoned(&self) -> bool {
        self.online_connections().is_empty()
    }

    /// player2 を着席させ、対局を開始する
    pub fn attach_player2(&mut self, player: Player) -> Result<(), RoomError> {
        if self.closed {
            return Err(RoomError::Closed);
        }
        if self.player2.is_some() {
            return Err(RoomError::Full);
        }
        self.player2 = Some(player);
        self.status = RoomStatus::InProgress;
        Ok(())
    }

    /// 着手を検証して追加し、評価結果を返す
    ///
    /// 拒否された場合、盤面は変更されない。
    pub fn play(
        &mut self,
        connection_id: ConnectionId,
        cell: CellId,
    ) -> Result<Evaluation, MoveRejection> {
        let slot = self
            .slot_of(connection_id)
            .ok_or(MoveRejection::NotAPlayer)?;

        match self.status {
            RoomStatus::Waiting => return Err(MoveRejection::WaitingForOpponent),
            RoomStatus::Finished(_) => return Err(MoveRejection::GameFinished),
            RoomStatus::InProgress => {}
        }
        if !self.player(slot.opponent()).is_some_and(|p| p.online) {
            return Err(MoveRejection::OpponentOffline);
        }
        if self.current_turn() != slot {
            return Err(MoveRejection::NotYourTurn);
        }
        if self.played_cells.iter().any(|p| p.cell == cell) {
            return Err(MoveRejection::CellOccupied(cell));
        }

        self.played_cells.push(PlayedCell { cell, slot });
        let evaluation = evaluate(&self.played_cells);
        if evaluation.is_finished() {
            self.status = RoomStatus::Finished(evaluation);
        }
        Ok(evaluation)
    }

    /// 盤面をクリアして対局をやり直す（player1 の現在の接続のみ許可）
    pub fn restart(&mut self, connection_id: ConnectionId) -> Result<(), RoomError> {
        if self.closed {
            return Err(RoomError::Closed);
        }
        if self.slot_of(connection_id) != Some(PlayerSlot::Player1) {
            return Err(RoomError::Forbidden);
        }
        self.played_cells.clear();
        self.status = if self.player2.is_some() {
            RoomStatus::InProgress
        } else {
            RoomStatus::Waiting
        };
        Ok(())
    }

    /// セッションに新しい接続を紐付け直し、オンラインにする
    ///
    /// 置き換えた接続 ID を返す（同じ接続での再要求は `None`）。
    pub fn rebind(
        &mut self,
        slot: PlayerSlot,
        session_id: &SessionId,
        connection_id: ConnectionId,
    ) -> Result<Option<ConnectionId>, RoomError> {
        if self.closed {
            return Err(RoomError::Closed);
        }
        let player = self
            .player_mut(slot)
            .filter(|p| &p.session_id == session_id)
            .ok_or(RoomError::SessionMismatch)?;

        if player.connection_id > connection_id {
            return Err(RoomError::Superseded);
        }
        let previous = player.connection_id;
        player.connection_id = connection_id;
        player.online = true;

        Ok((previous != connection_id).then_some(previous))
    }

    /// 接続が切れたプレイヤーをオフラインにする
    ///
    /// 既に別の接続へ引き継がれている場合は何もしない。
    pub fn mark_offline(&mut self, connection_id: ConnectionId) -> Option<PlayerSlot> {
        let slot = self.slot_of(connection_id)?;
        if let Some(player) = self.player_mut(slot) {
            player.online = false;
        }
        Some(slot)
    }

    /// ルームを破棄済みにする（以降の変更操作は失敗する）
    pub fn close(&mut self) {
        self.closed = true;
    }
}
