//! Game state: board, hand, drag state machine, score, combo, game over.

use crate::board::{Board, LineSet};
use crate::highscores::ScoreStore;
use crate::shapes::{Catalog, Shape};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pieces offered at once.
pub const HAND_SIZE: usize = 3;

/// Number of block colours; pieces get an index in `0..BLOCK_COLORS`.
pub const BLOCK_COLORS: u8 = 6;

/// Points per cleared row or column.
const LINE_POINTS: u32 = 10;
/// Points per combo step on a clearing placement.
const COMBO_POINTS: u32 = 10;
/// Points for a placement that clears nothing.
const PLACE_POINTS: u32 = 10;

/// Shape plus colour, sitting in a hand slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub color: u8,
}

impl Piece {
    pub fn new(shape: Shape, color: u8) -> Self {
        Self { shape, color }
    }
}

/// Piece being dragged and where it would land.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub slot: usize,
    pub piece: Piece,
    /// Last cursor position in grid-cell units (shape centre), if a pointer drove the drag.
    pub cursor: Option<(f32, f32)>,
    /// Candidate top-left offset on the board.
    pub candidate: Option<(i32, i32)>,
    /// Whether `candidate` passes `Board::can_place`.
    pub valid: bool,
}

/// What a committed placement did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Points awarded by this placement.
    pub points: u32,
    pub score: u32,
    pub best: u32,
    pub combo: u32,
    pub cleared: LineSet,
    /// The hand was empty and got three new pieces.
    pub refilled: bool,
    /// Score went above the stored best.
    pub new_best: bool,
}

/// Result of [`GameState::end_drag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active.
    NoDrag,
    /// Candidate missing or invalid; nothing changed.
    Rejected,
    Placed(Placement),
    /// Placement left no legal move; the session has already been reset.
    GameOver {
        placement: Placement,
        final_score: u32,
    },
}

/// Top-left offset for a shape whose centre sits at (col, row) in grid-cell units.
pub fn cursor_to_offset(col: f32, row: f32, shape: &Shape) -> (i32, i32) {
    // Halves round up, toward the bottom-right.
    let left = col - shape.width() as f32 / 2.0 + 0.5;
    let top = row - shape.height() as f32 / 2.0 + 0.5;
    (left.floor() as i32, top.floor() as i32)
}

/// Game state: board, hand, score, best score, combo and the active drag.
#[derive(Debug)]
pub struct GameState<S> {
    board: Board,
    hand: [Option<Piece>; HAND_SIZE],
    catalog: Catalog,
    rng: StdRng,
    store: S,
    drag: Option<DragState>,
    score: u32,
    best: u32,
    combo: u32,
    games_played: u32,
}

impl<S: ScoreStore> GameState<S> {
    /// New session on a `grid_size` board. The best score is read from `store` once, here.
    pub fn new(grid_size: usize, catalog: Catalog, mut store: S, rng: StdRng) -> Self {
        let best = store.load().unwrap_or_else(|e| {
            log::warn!("could not read best score, starting from 0: {e}");
            0
        });
        let mut state = Self {
            board: Board::new(grid_size),
            hand: Default::default(),
            catalog,
            rng,
            store,
            drag: None,
            score: 0,
            best,
            combo: 0,
            games_played: 0,
        };
        state.refill_hand();
        log::info!("session started: grid {grid_size}x{grid_size}, best {best}");
        state
    }

    /// Same as [`GameState::new`] with a reproducible random source.
    pub fn with_seed(grid_size: usize, catalog: Catalog, store: S, seed: u64) -> Self {
        Self::new(grid_size, catalog, store, StdRng::seed_from_u64(seed))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board, for scripted puzzles. Does not re-run line or game-over checks.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn hand(&self) -> &[Option<Piece>; HAND_SIZE] {
        &self.hand
    }

    /// Replace the hand, for scripted puzzles. Cancels any drag.
    pub fn set_hand(&mut self, hand: [Option<Piece>; HAND_SIZE]) {
        self.drag = None;
        self.hand = hand;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Sessions ended by game over since startup.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    fn random_piece(&mut self) -> Piece {
        let shape = self.catalog.random_shape(&mut self.rng).clone();
        let color = self.rng.random_range(0..BLOCK_COLORS);
        Piece::new(shape, color)
    }

    fn refill_hand(&mut self) {
        for i in 0..HAND_SIZE {
            self.hand[i] = Some(self.random_piece());
        }
    }

    fn hand_is_empty(&self) -> bool {
        self.hand.iter().all(Option::is_none)
    }

    /// True if some piece in the hand fits somewhere on the board.
    pub fn has_legal_move(&self) -> bool {
        self.hand
            .iter()
            .flatten()
            .any(|piece| self.board.fits_anywhere(&piece.shape))
    }

    /// Start dragging the piece in `slot`. Empty or unknown slots, and a drag already
    /// in progress, leave the state untouched and return false.
    pub fn begin_drag(&mut self, slot: usize) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(Some(piece)) = self.hand.get(slot) else {
            return false;
        };
        self.drag = Some(DragState {
            slot,
            piece: piece.clone(),
            cursor: None,
            candidate: None,
            valid: false,
        });
        true
    }

    /// Move the candidate to top-left offset (x, y) and re-validate it.
    pub fn drag_to(&mut self, x: i32, y: i32) {
        if let Some(ref mut drag) = self.drag {
            drag.candidate = Some((x, y));
            drag.valid = self.board.can_place(x, y, &drag.piece.shape);
        }
    }

    /// Cursor at (col, row) in grid-cell units, taken as the shape's centre.
    pub fn drag_cursor(&mut self, col: f32, row: f32) {
        let Some(ref mut drag) = self.drag else {
            return;
        };
        drag.cursor = Some((col, row));
        let (x, y) = cursor_to_offset(col, row, &drag.piece.shape);
        self.drag_to(x, y);
    }

    /// Shift the candidate by (dx, dy); starts from the board centre when there is none yet.
    pub fn nudge_drag(&mut self, dx: i32, dy: i32) {
        let Some(ref drag) = self.drag else {
            return;
        };
        let (x, y) = drag
            .candidate
            .unwrap_or_else(|| self.centre_offset(&drag.piece.shape));
        self.drag_to(x.saturating_add(dx), y.saturating_add(dy));
    }

    /// Offset that centres `shape` on the board.
    pub fn centre_offset(&self, shape: &Shape) -> (i32, i32) {
        let n = self.board.size() as i32;
        (
            (n - shape.width() as i32) / 2,
            (n - shape.height() as i32) / 2,
        )
    }

    /// Drop the drag without placing anything.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Release the dragged piece: place it if the candidate is valid, then score,
    /// refill and check for game over.
    pub fn end_drag(&mut self) -> DropOutcome {
        let Some(drag) = self.drag.take() else {
            return DropOutcome::NoDrag;
        };
        let (x, y) = match drag.candidate {
            Some(offset) if drag.valid => offset,
            _ => {
                log::debug!("drop rejected: slot {} at {:?}", drag.slot, drag.candidate);
                return DropOutcome::Rejected;
            }
        };
        let placement = self.commit(drag.slot, x, y, &drag.piece);
        if !self.hand_is_empty() && !self.has_legal_move() {
            let final_score = self.score;
            log::info!(
                "game over: score {final_score}, best {}, board {} cells filled",
                self.best,
                self.board.filled_count()
            );
            self.games_played += 1;
            self.reset_board();
            return DropOutcome::GameOver {
                placement,
                final_score,
            };
        }
        DropOutcome::Placed(placement)
    }

    fn commit(&mut self, slot: usize, x: i32, y: i32, piece: &Piece) -> Placement {
        self.board.place(x, y, &piece.shape, piece.color);
        self.hand[slot] = None;

        let cleared = self.board.check_lines();
        let points = if cleared.is_empty() {
            self.combo = 0;
            PLACE_POINTS
        } else {
            self.combo += 1;
            self.board.clear_lines(&cleared);
            log::debug!(
                "cleared rows {:?} cols {:?}, combo {}",
                cleared.rows,
                cleared.cols,
                self.combo
            );
            cleared.len() as u32 * LINE_POINTS + self.combo * COMBO_POINTS
        };
        let new_best = self.add_score(points);

        let refilled = self.hand_is_empty();
        if refilled {
            self.refill_hand();
        }
        log::debug!(
            "placed {} at ({x}, {y}): +{points}, score {}",
            piece.shape.name(),
            self.score
        );
        Placement {
            points,
            score: self.score,
            best: self.best,
            combo: self.combo,
            cleared,
            refilled,
            new_best,
        }
    }

    /// Returns true when the best score moved.
    fn add_score(&mut self, points: u32) -> bool {
        self.score += points;
        if self.score <= self.best {
            return false;
        }
        self.best = self.score;
        if let Err(e) = self.store.save(self.best) {
            log::warn!("could not save best score {}: {e}", self.best);
        }
        true
    }

    /// Empty board, zero score and combo, fresh hand. Best score is kept.
    pub fn new_game(&mut self) {
        self.reset_board();
        self.combo = 0;
    }

    /// Empty board, zero score, fresh hand. The combo streak carries over.
    fn reset_board(&mut self) {
        self.board = Board::new(self.board.size());
        self.score = 0;
        self.drag = None;
        self.refill_hand();
    }
}
