//! Session rules: scoring, combo, refill, game over and best-score persistence.

use blockblast::board::Board;
use blockblast::game::{DropOutcome, GameState, HAND_SIZE, Piece, Placement};
use blockblast::highscores::{FileScoreStore, MemoryScoreStore, ScoreStore};
use blockblast::shapes::{Catalog, Shape};

/// Every row and column has two isolated 1x1 holes; no two holes touch.
const SCATTERED_HOLES: [&str; 8] = [
    ".###.###", "#.###.##", "##.###.#", "###.###.", ".###.###", "#.###.##", "##.###.#",
    "###.###.",
];

fn piece(pattern: &str) -> Piece {
    Piece::new(Shape::parse("test", pattern).unwrap(), 3)
}

fn singles() -> [Option<Piece>; HAND_SIZE] {
    [Some(piece("#")), Some(piece("#")), Some(piece("#"))]
}

fn session() -> GameState<MemoryScoreStore> {
    GameState::with_seed(8, Catalog::standard(), MemoryScoreStore::default(), 11)
}

fn drop_at<S: ScoreStore>(state: &mut GameState<S>, slot: usize, x: i32, y: i32) -> DropOutcome {
    assert!(state.begin_drag(slot), "slot {slot} should hold a piece");
    state.drag_to(x, y);
    state.end_drag()
}

fn placed(outcome: DropOutcome) -> Placement {
    match outcome {
        DropOutcome::Placed(p) => p,
        other => panic!("expected a placement, got {other:?}"),
    }
}

#[test]
fn test_completing_row_scores_line_plus_combo() {
    let mut state = session();
    // Missing rows are empty.
    *state.board_mut() = Board::from_pattern(&["#######."]);
    assert_eq!(state.board().size(), 8);
    state.set_hand(singles());

    let p = placed(drop_at(&mut state, 0, 7, 0));
    assert_eq!(p.cleared.rows, vec![0]);
    assert!(p.cleared.cols.is_empty());
    assert_eq!(p.combo, 1);
    assert_eq!(p.points, 20);
    assert_eq!(state.score(), 20);
    assert!(state.board().is_empty());
}

#[test]
fn test_five_bar_then_three_bar_clears_top_row() {
    let mut state = session();
    state.set_hand([Some(piece("#####")), Some(piece("###")), Some(piece("#"))]);

    let first = placed(drop_at(&mut state, 0, 0, 0));
    assert_eq!((first.points, first.combo), (10, 0));
    assert!(first.cleared.is_empty());

    let second = placed(drop_at(&mut state, 1, 5, 0));
    assert_eq!(second.cleared.rows, vec![0]);
    assert_eq!((second.points, second.combo), (20, 1));
    assert_eq!(state.score(), 30);
    assert!(state.board().is_empty());
}

#[test]
fn test_combo_builds_then_resets() {
    let mut state = session();
    *state.board_mut() = Board::from_pattern(&[
        "#######.", "#######.", "........", "........", "........", "........", "........",
        "........",
    ]);
    state.set_hand(singles());

    let first = placed(drop_at(&mut state, 0, 7, 0));
    assert_eq!((first.points, first.combo), (20, 1));

    let second = placed(drop_at(&mut state, 1, 7, 1));
    assert_eq!((second.points, second.combo), (30, 2));

    let third = placed(drop_at(&mut state, 2, 3, 5));
    assert_eq!((third.points, third.combo), (10, 0));
    assert_eq!(state.score(), 60);
    assert_eq!(state.combo(), 0);
}

#[test]
fn test_row_and_column_cleared_together() {
    let mut state = session();
    *state.board_mut() = Board::from_pattern(&[
        ".#######", "#.......", "#.......", "#.......", "#.......", "#.......", "#.......",
        "#.......",
    ]);
    state.set_hand(singles());

    let p = placed(drop_at(&mut state, 0, 0, 0));
    assert_eq!(p.cleared.rows, vec![0]);
    assert_eq!(p.cleared.cols, vec![0]);
    assert_eq!(p.cleared.len(), 2);
    assert_eq!(p.points, 2 * 10 + 10);
    assert!(state.board().is_empty());
}

#[test]
fn test_hand_refills_only_when_empty() {
    let mut state = session();
    state.set_hand(singles());

    let p = placed(drop_at(&mut state, 1, 0, 0));
    assert!(!p.refilled);
    assert!(state.hand()[1].is_none());
    assert!(state.hand()[0].is_some() && state.hand()[2].is_some());

    let p = placed(drop_at(&mut state, 0, 2, 0));
    assert!(!p.refilled);

    let p = placed(drop_at(&mut state, 2, 4, 0));
    assert!(p.refilled);
    assert!(state.hand().iter().all(Option::is_some));
}

#[test]
fn test_empty_slot_cannot_be_dragged() {
    let mut state = session();
    state.set_hand([None, Some(piece("#")), None]);
    assert!(!state.begin_drag(0));
    assert_eq!(state.end_drag(), DropOutcome::NoDrag);
}

#[test]
fn test_rejected_drop_changes_nothing() {
    let mut state = session();
    state.set_hand([Some(piece("##/##")), Some(piece("#")), None]);
    let before = state.board().clone();
    assert_eq!(drop_at(&mut state, 0, 7, 7), DropOutcome::Rejected);
    assert_eq!(state.board(), &before);
    assert_eq!(state.score(), 0);
    assert!(state.hand()[0].is_some());
}

#[test]
fn test_game_over_when_no_piece_fits_anywhere() {
    let mut state = session();
    *state.board_mut() = Board::from_pattern(&SCATTERED_HOLES);
    state.set_hand([Some(piece("#")), Some(piece("##")), Some(piece("#/#"))]);
    assert!(state.has_legal_move());

    let (placement, final_score) = match drop_at(&mut state, 0, 0, 0) {
        DropOutcome::GameOver {
            placement,
            final_score,
        } => (placement, final_score),
        other => panic!("expected game over, got {other:?}"),
    };
    assert_eq!(placement.points, 10);
    assert_eq!(final_score, 10);

    // Session already reset; best and combo kept.
    assert_eq!(state.score(), 0);
    assert_eq!(state.combo(), placement.combo);
    assert_eq!(state.best(), 10);
    assert_eq!(state.games_played(), 1);
    assert!(state.board().is_empty());
    assert!(state.hand().iter().all(Option::is_some));
    assert!(state.drag().is_none());
}

#[test]
fn test_combo_streak_carries_into_next_board() {
    let mut state = session();
    let mut rows = vec!["#######."];
    rows.extend_from_slice(&SCATTERED_HOLES[1..]);
    *state.board_mut() = Board::from_pattern(&rows);
    state.set_hand([
        Some(piece("#")),
        Some(piece("#/#/#/#/#")),
        Some(piece("###/###/###")),
    ]);

    let (placement, final_score) = match drop_at(&mut state, 0, 7, 0) {
        DropOutcome::GameOver {
            placement,
            final_score,
        } => (placement, final_score),
        other => panic!("expected game over, got {other:?}"),
    };
    assert_eq!(placement.cleared.rows, vec![0]);
    assert_eq!((placement.points, placement.combo), (20, 1));
    assert_eq!(final_score, 20);
    assert_eq!(state.combo(), 1);
    assert_eq!(state.score(), 0);

    // First clear on the fresh board continues the streak.
    *state.board_mut() = Board::from_pattern(&["#######."]);
    state.set_hand(singles());
    let p = placed(drop_at(&mut state, 0, 7, 0));
    assert_eq!((p.points, p.combo), (30, 2));
}

#[test]
fn test_new_game_resets_combo() {
    let mut state = session();
    *state.board_mut() = Board::from_pattern(&["#######."]);
    state.set_hand(singles());
    placed(drop_at(&mut state, 0, 7, 0));
    assert_eq!(state.combo(), 1);
    state.new_game();
    assert_eq!(state.combo(), 0);
    assert_eq!(state.score(), 0);
}

#[test]
fn test_isolated_holes_do_not_count_as_moves() {
    let mut state = session();
    *state.board_mut() = Board::from_pattern(&SCATTERED_HOLES);
    state.set_hand([Some(piece("##")), Some(piece("#/#")), Some(piece("##/##"))]);
    assert!(!state.has_legal_move());
    state.set_hand([None, Some(piece("#")), None]);
    assert!(state.has_legal_move());
}

#[test]
fn test_best_score_saved_only_when_beaten() {
    let store = MemoryScoreStore::with_best(15);
    let mut state = GameState::with_seed(8, Catalog::standard(), store, 2);
    assert_eq!(state.best(), 15);
    state.set_hand(singles());

    let p = placed(drop_at(&mut state, 0, 0, 0));
    assert!(!p.new_best);
    assert!(state.store().saves().is_empty());

    let p = placed(drop_at(&mut state, 1, 2, 0));
    assert!(p.new_best);
    assert_eq!(p.best, 20);
    assert_eq!(state.store().saves(), &[20]);
    assert_eq!(state.store().best(), 20);
}

#[test]
fn test_best_score_survives_restart_via_file() {
    let path = std::env::temp_dir().join(format!("blockblast-engine-best-{}", std::process::id()));
    std::fs::remove_file(&path).ok();

    let mut state = GameState::with_seed(8, Catalog::standard(), FileScoreStore::new(&path), 4);
    assert_eq!(state.best(), 0);
    state.set_hand(singles());
    placed(drop_at(&mut state, 0, 0, 0));
    placed(drop_at(&mut state, 1, 2, 0));
    drop(state);

    let state = GameState::with_seed(8, Catalog::standard(), FileScoreStore::new(&path), 4);
    std::fs::remove_file(&path).ok();
    assert_eq!(state.best(), 20);
}

#[test]
fn test_seeded_sessions_deal_the_same_pieces() {
    let a = GameState::with_seed(8, Catalog::standard(), MemoryScoreStore::default(), 99);
    let b = GameState::with_seed(8, Catalog::standard(), MemoryScoreStore::default(), 99);
    assert_eq!(a.hand(), b.hand());
    for p in a.hand().iter().flatten() {
        assert!(Catalog::standard().get(p.shape.name()).is_some());
    }
}
