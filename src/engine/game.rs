//! Stateful game controller wrapping `Board`.
//!
//! `Game` owns the canonical board and the append-only move record, exposes
//! the single state-changing entry point (`attempt_move`) and recomputes the
//! game status (check, checkmate, stalemate, draws) after every accepted
//! move. It is the primary type a presentation layer talks to.

use tracing::{debug, info};

use crate::engine::attacks;
use crate::engine::board::{Board, PositionKey};
use crate::engine::legal;
use crate::engine::movegen;
use crate::engine::san;
use crate::engine::types::{
    ChessError, Color, GameStatus, Move, MoveError, MoveFlag, Piece, PieceType, Square,
};

// =========================================================================
// GameRecord
// =========================================================================

/// Ordered, append-only list of the moves played in a game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    moves: Vec<Move>,
}

impl GameRecord {
    fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }
}

impl<'a> IntoIterator for &'a GameRecord {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

// =========================================================================
// Game
// =========================================================================

/// A chess game: canonical position, history and status.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    record: GameRecord,
    /// SAN of each recorded move, with `+`/`#` suffixes.
    san_history: Vec<String>,
    /// Repetition keys of every position reached, including the initial one.
    position_keys: Vec<PositionKey>,
    status: GameStatus,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::starting())
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    fn from_board(board: Board) -> Self {
        let key = repetition_key(&board);
        let mut game = Self {
            board,
            record: GameRecord::default(),
            san_history: Vec::new(),
            position_keys: vec![key],
            status: GameStatus::Ongoing,
        };
        game.status = game.compute_status();
        game
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Piece on a square of the current position.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> &GameRecord {
        &self.record
    }

    /// SAN of the moves played so far, oldest first.
    pub fn san_history(&self) -> &[String] {
        &self.san_history
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        legal::legal_moves(&self.board, self.board.side_to_move)
    }

    /// Legal moves of the piece on `sq`. Empty if the square is empty, holds
    /// a piece of the side not to move, or the game is over.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        legal::legal_moves_from(&self.board, sq)
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Fullmove number.
    pub fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number
    }

    /// Halfmove clock (for 50-move rule).
    pub fn halfmove_clock(&self) -> u16 {
        self.board.halfmove_clock
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Try to play `from -> to`, promoting to `promotion` if the move reaches
    /// the last rank. Returns the resulting status.
    ///
    /// A rejected attempt leaves the game exactly as it was.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<GameStatus, MoveError> {
        match self.resolve(from, to, promotion) {
            Ok(mv) => Ok(self.commit(mv)),
            Err(err) => {
                debug!(%from, %to, error = %err, "move rejected");
                Err(err)
            }
        }
    }

    /// Find the legal move matching the request, or say why there is none.
    fn resolve(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<Move, MoveError> {
        if self.status.is_game_over() {
            return Err(MoveError::GameOver(self.status));
        }

        let piece = self
            .board
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtSource(from))?;
        let to_move = self.board.side_to_move;
        if piece.color != to_move {
            return Err(MoveError::WrongTurn {
                from,
                to_move,
                found: piece.color,
            });
        }

        let illegal = MoveError::IllegalForPiece {
            from,
            to,
            piece: piece.kind,
        };
        let candidates: Vec<Move> = movegen::pseudo_legal_moves_from(&self.board, from)
            .into_iter()
            .filter(|m| m.to == to)
            .collect();
        let first = *candidates.first().ok_or(illegal)?;

        let mv = match (first.promotion(), promotion) {
            (Some(_), None) => return Err(MoveError::PromotionRequired { from, to }),
            (None, Some(_)) => return Err(MoveError::PromotionNotApplicable { from, to }),
            (Some(_), Some(choice)) => candidates
                .into_iter()
                .find(|m| m.flag == MoveFlag::PromoteTo(choice))
                .ok_or(illegal)?,
            (None, None) => first,
        };

        if legal::leaves_king_in_check(&self.board, mv) {
            return Err(MoveError::LeavesKingInCheck { from, to });
        }
        Ok(mv)
    }

    /// Apply an already validated move and reclassify the position.
    fn commit(&mut self, mv: Move) -> GameStatus {
        let legal = legal::legal_moves(&self.board, self.board.side_to_move);
        let mut san = san::move_to_san(&self.board, mv, &legal);

        self.board.make_move(mv);
        self.record.push(mv);
        self.position_keys.push(repetition_key(&self.board));

        let status = self.compute_status();
        self.status = status;

        if matches!(status, GameStatus::Checkmate { .. }) {
            san.push('#');
        } else if attacks::is_in_check(&self.board, self.board.side_to_move) {
            san.push('+');
        }
        debug!(mv = %mv, san = %san, status = %status, "move played");
        self.san_history.push(san);

        if status.is_game_over() {
            info!(
                status = %status,
                plies = self.record.len(),
                "game over"
            );
        }
        status
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        let us = self.board.side_to_move;
        let in_check = attacks::is_in_check(&self.board, us);

        if !legal::has_legal_move(&self.board, us) {
            return if in_check {
                GameStatus::Checkmate { winner: !us }
            } else {
                GameStatus::Stalemate
            };
        }

        // Draws, in precedence order.
        if self.board.halfmove_clock >= 100 {
            return GameStatus::DrawByFiftyMoves;
        }

        if self.is_threefold_repetition() {
            return GameStatus::DrawByRepetition;
        }

        if is_insufficient_material(&self.board) {
            return GameStatus::DrawByInsufficientMaterial;
        }

        if in_check {
            GameStatus::InCheck(us)
        } else {
            GameStatus::Ongoing
        }
    }

    /// Threefold repetition: the current position has appeared 3+ times.
    fn is_threefold_repetition(&self) -> bool {
        let Some(current) = self.position_keys.last() else {
            return false;
        };
        self.position_keys.iter().filter(|&k| k == current).count() >= 3
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Repetition key of a position. The en-passant target only counts when an
/// en-passant capture is actually legal.
fn repetition_key(board: &Board) -> PositionKey {
    let us = board.side_to_move;
    let en_passant = board.en_passant.filter(|&ep| {
        attacks::tables()
            .pawn_attacks(!us, ep)
            .iter()
            .filter(|&from| board.piece_at(from) == Some(Piece::new(PieceType::Pawn, us)))
            .any(|from| {
                legal::legal_moves_from(board, from)
                    .iter()
                    .any(|m| m.flag == MoveFlag::EnPassantCapture)
            })
    });
    board.position_key(en_passant)
}

/// Insufficient material detection.
///
/// Draws: K vs K, K+B vs K, K+N vs K, K+B vs K+B (same color bishops).
fn is_insufficient_material(board: &Board) -> bool {
    let mut minors: [Vec<(Square, PieceType)>; 2] = [Vec::new(), Vec::new()];
    for (sq, piece) in board.pieces() {
        match piece.kind {
            PieceType::King => {}
            PieceType::Knight | PieceType::Bishop => {
                minors[piece.color.index()].push((sq, piece.kind));
            }
            // Any pawn, rook or queen is enough to mate.
            PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
        }
    }

    match (minors[0].as_slice(), minors[1].as_slice()) {
        // K vs K, K+minor vs K
        ([], []) | ([_], []) | ([], [_]) => true,
        // K+B vs K+B with bishops on same color squares
        ([(w_sq, PieceType::Bishop)], [(b_sq, PieceType::Bishop)]) => {
            w_sq.is_light() == b_sq.is_light()
        }
        _ => false,
    }
}

// =========================================================================
// Tests
// =========================================================================
