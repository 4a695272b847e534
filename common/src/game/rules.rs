use super::board::Board;
use super::types::{GameOutcome, Mark, WinningLine};

/// All ways to win: 3 rows, 3 columns, 2 diagonals, scanned in that order so
/// evaluation stays deterministic even for boards that could not arise from
/// legal alternating play.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub fn check_win(board: &Board) -> Option<Mark> {
    check_win_with_line(board).map(|(mark, _)| mark)
}

pub fn check_win_with_line(board: &Board) -> Option<(Mark, WinningLine)> {
    let cells = board.cells();
    for line in WIN_LINES {
        let [a, b, c] = line;
        if cells[a] != Mark::Empty && cells[a] == cells[b] && cells[a] == cells[c] {
            return Some((cells[a], WinningLine { cells: line }));
        }
    }
    None
}

pub fn is_draw(board: &Board) -> bool {
    check_win(board).is_none() && board.is_full()
}

pub fn outcome(board: &Board) -> GameOutcome {
    if let Some(winner) = check_win(board) {
        return GameOutcome::Won(winner);
    }
    if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
