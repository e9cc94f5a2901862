//! 盤面評価（Board Evaluator）
//!
//! 着手列から勝敗・引き分け・継続中を判定する純粋関数。
//! 着手の順序には依存しない。

use super::{
    entity::PlayedCell,
    value_object::{CellId, PlayerSlot},
};

use CellId::*;

/// 勝ちラインの一覧（行 3・列 3・対角 2）
pub const WINNING_LINES: [[CellId; 3]; 8] = [
    // Rows
    [Cell00, Cell01, Cell02],
    [Cell10, Cell11, Cell12],
    [Cell20, Cell21, Cell22],
    // Columns
    [Cell00, Cell10, Cell20],
    [Cell01, Cell11, Cell21],
    [Cell02, Cell12, Cell22],
    // Diagonals
    [Cell00, Cell11, Cell22],
    [Cell02, Cell11, Cell20],
];

/// 盤面の評価結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Ongoing,
    Win { slot: PlayerSlot, line: [CellId; 3] },
    Draw,
}

impl Evaluation {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// 着手列を評価する
pub fn evaluate(played_cells: &[PlayedCell]) -> Evaluation {
    let mut board: [Option<PlayerSlot>; 9] = [None; 9];
    for played in played_cells {
        board[played.cell.index()] = Some(played.slot);
    }

    for line in WINNING_LINES {
        let [a, b, c] = line.map(|cell| board[cell.index()]);
        if let Some(slot) = a
            && a == b
            && b == c
        {
            return Evaluation::Win { slot, line };
        }
    }

    if board.iter().all(Option::is_some) {
        Evaluation::Draw
    } else {
        Evaluation::Ongoing
    }
}
