//! 値オブジェクト（Value Object）
//!
//! 不変で、生成時にバリデーションを行う型を定義します。

use std::{fmt, str::FromStr};

use rand::Rng;
use uuid::Uuid;

use super::error::ValueObjectError;

/// プレイヤー名の最大文字数
pub const PLAYER_NAME_MAX_CHARS: usize = 32;

/// ルームコードの最大文字数（入力値の検証用）
pub const ROOM_ID_MAX_CHARS: usize = 16;

/// ルームコードに使う文字（英大文字 + 数字）
pub const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// ========================================
// ConnectionId
// ========================================

/// 1 本のトランスポート接続を識別する ID
///
/// ゲートウェイが単調増加のカウンタから払い出すため、後から確立した接続ほど大きい値を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("conn-")
            .and_then(|n| n.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| ValueObjectError::InvalidConnectionId(s.to_string()))
    }
}

// ========================================
// SessionId
// ========================================

/// 再接続をまたいでクライアントが保持する不透明なセッション ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 新しいセッション ID を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// サーバが払い出す形式（UUID）かどうか
    pub fn is_issued_format(&self) -> bool {
        Uuid::parse_str(&self.0).is_ok()
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptySessionId);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// RoomId
// ========================================

/// 共有しやすい短いルームコード
///
/// 英大文字と数字のみ。入力は前後の空白を除去し大文字に正規化する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        if normalized.len() > ROOM_ID_MAX_CHARS
            || !normalized.bytes().all(|b| ROOM_ID_ALPHABET.contains(&b))
        {
            return Err(ValueObjectError::InvalidRoomId(value));
        }
        Ok(Self(normalized))
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RoomId を生成するファクトリ
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// 指定した長さのランダムなルームコードを生成
    pub fn generate(length: usize) -> RoomId {
        let mut rng = rand::rng();
        let code = (0..length)
            .map(|_| ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        RoomId(code)
    }

    /// 指定した長さで作れるコードの総数（上限で飽和）
    pub fn code_space(length: usize) -> usize {
        let base = ROOM_ID_ALPHABET.len();
        (0..length).fold(1usize, |acc, _| acc.saturating_mul(base))
    }
}

// ========================================
// PlayerName
// ========================================

/// 表示名（前後の空白を除去した上で 1〜32 文字）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyPlayerName);
        }
        let chars = trimmed.chars().count();
        if chars > PLAYER_NAME_MAX_CHARS {
            return Err(ValueObjectError::PlayerNameTooLong(chars));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// PlayerSlot
// ========================================

/// ルーム内の席（player1 が作成者で、常に先手）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    Player1,
    Player2,
}

impl PlayerSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Player1 => "player1",
            Self::Player2 => "player2",
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerSlot {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player1" => Ok(Self::Player1),
            "player2" => Ok(Self::Player2),
            other => Err(ValueObjectError::InvalidPlayerSlot(other.to_string())),
        }
    }
}

// ========================================
// CellId
// ========================================

/// 盤面の 9 マス（`cellRC`: R = 行, C = 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellId {
    Cell00,
    Cell01,
    Cell02,
    Cell10,
    Cell11,
    Cell12,
    Cell20,
    Cell21,
    Cell22,
}

impl CellId {
    /// 全マス（行優先）
    pub const ALL: [CellId; 9] = [
        CellId::Cell00,
        CellId::Cell01,
        CellId::Cell02,
        CellId::Cell10,
        CellId::Cell11,
        CellId::Cell12,
        CellId::Cell20,
        CellId::Cell21,
        CellId::Cell22,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cell00 => "cell00",
            Self::Cell01 => "cell01",
            Self::Cell02 => "cell02",
            Self::Cell10 => "cell10",
            Self::Cell11 => "cell11",
            Self::Cell12 => "cell12",
            Self::Cell20 => "cell20",
            Self::Cell21 => "cell21",
            Self::Cell22 => "cell22",
        }
    }

    /// 行優先のインデックス（0〜8）
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cell| cell.as_str() == s)
            .ok_or_else(|| ValueObjectError::InvalidCellId(s.to_string()))
    }
}

// ========================================
// Timestamp
// ========================================

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_round_trips_through_display() {
        // テスト項目: ConnectionId の文字列表現から元の値に戻せる
        // given (前提条件):
        let id = ConnectionId::new(42);

        // when (操作):
        let parsed: ConnectionId = id.to_string().parse().unwrap();

        // then (期待する結果):
        assert_eq!(id.to_string(), "conn-42");
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_connection_id_orders_by_sequence() {
        // テスト項目: 後から払い出された接続 ID ほど大きい
        assert!(ConnectionId::new(2) > ConnectionId::new(1));
    }

    #[test]
    fn test_connection_id_rejects_foreign_format() {
        assert!("socket-1".parse::<ConnectionId>().is_err());
        assert!("conn-x".parse::<ConnectionId>().is_err());
    }

    #[test]
    fn test_session_id_issued_format() {
        // テスト項目: 払い出したセッション ID だけが UUID 形式として認識される
        assert!(SessionId::generate().is_issued_format());
        let foreign = SessionId::try_from("made-up-session".to_string()).unwrap();
        assert!(!foreign.is_issued_format());
    }

    #[test]
    fn test_room_id_is_normalized() {
        // テスト項目: ルームコードは空白除去・大文字化される
        // given (前提条件):
        let input = "  ab12 ".to_string();

        // when (操作):
        let room_id = RoomId::try_from(input).unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "AB12");
    }

    #[test]
    fn test_room_id_rejects_empty_and_symbols() {
        // テスト項目: 空文字・記号入りのルームコードは拒否される
        assert_eq!(
            RoomId::try_from("   ".to_string()),
            Err(ValueObjectError::EmptyRoomId)
        );
        assert!(matches!(
            RoomId::try_from("AB-12".to_string()),
            Err(ValueObjectError::InvalidRoomId(_))
        ));
        assert!(matches!(
            RoomId::try_from("A".repeat(ROOM_ID_MAX_CHARS + 1)),
            Err(ValueObjectError::InvalidRoomId(_))
        ));
    }

    #[test]
    fn test_room_id_factory_generates_valid_codes() {
        // テスト項目: 生成されたコードは指定長で、検証を通過する
        // given (前提条件):
        let length = 4;

        // when (操作):
        let generated = RoomIdFactory::generate(length);

        // then (期待する結果):
        assert_eq!(generated.as_str().len(), length);
        assert_eq!(
            RoomId::try_from(generated.as_str().to_string()),
            Ok(generated)
        );
    }

    #[test]
    fn test_room_id_code_space() {
        assert_eq!(RoomIdFactory::code_space(1), 36);
        assert_eq!(RoomIdFactory::code_space(4), 1_679_616);
        assert_eq!(RoomIdFactory::code_space(64), usize::MAX);
    }

    #[test]
    fn test_player_name_validation() {
        // テスト項目: 空白のみの名前は拒否され、通常の名前は trim される
        assert_eq!(
            PlayerName::try_from(" \t ".to_string()),
            Err(ValueObjectError::EmptyPlayerName)
        );
        assert_eq!(
            PlayerName::try_from(" Alice ".to_string()).unwrap().as_str(),
            "Alice"
        );
        assert_eq!(
            PlayerName::try_from("x".repeat(PLAYER_NAME_MAX_CHARS + 1)),
            Err(ValueObjectError::PlayerNameTooLong(PLAYER_NAME_MAX_CHARS + 1))
        );
    }

    #[test]
    fn test_cell_id_parsing() {
        // テスト項目: 9 マスすべてが文字列から復元でき、範囲外は拒否される
        for cell in CellId::ALL {
            assert_eq!(cell.as_str().parse::<CellId>(), Ok(cell));
        }
        assert!("cell33".parse::<CellId>().is_err());
        assert_eq!(CellId::Cell12.index(), 5);
    }

    #[test]
    fn test_player_slot_opponent() {
        assert_eq!(PlayerSlot::Player1.opponent(), PlayerSlot::Player2);
        assert_eq!(PlayerSlot::Player2.opponent(), PlayerSlot::Player1);
        assert_eq!("player2".parse::<PlayerSlot>(), Ok(PlayerSlot::Player2));
    }
}
