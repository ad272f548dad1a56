//! App: terminal init, main loop, key and mouse handling.

use crate::GameConfig;
use crate::game::{DropOutcome, GameState};
use crate::highscores::ScoreStore;
use crate::input::{Action, key_to_action};
use crate::shapes::Catalog;
use crate::theme::Theme;
use crate::ui::{self, ViewLayout};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    Help,
    /// Notice over the fresh board that replaced the finished one.
    GameOver,
}

/// Summary of the game that just ended, shown until the next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverNotice {
    pub final_score: u32,
    pub best: u32,
    /// Final score beat the best from before that game.
    pub new_best: bool,
}

pub struct App<S> {
    config: GameConfig,
    theme: Theme,
    state: GameState<S>,
    screen: Screen,
    notice: Option<GameOverNotice>,
    /// Best score when the current game started.
    best_at_start: u32,
    /// Regions from the last draw; mouse events are hit-tested against these.
    view: ViewLayout,
}

impl<S: ScoreStore> App<S> {
    pub fn new(config: GameConfig, theme: Theme, catalog: Catalog, store: S) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let state = GameState::new(config.grid_size, catalog, store, rng);
        Self {
            best_at_start: state.best(),
            config,
            theme,
            state,
            screen: Screen::Playing,
            notice: None,
            view: ViewLayout::default(),
        }
    }

    pub fn state(&self) -> &GameState<S> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState<S> {
        &mut self.state
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn notice(&self) -> Option<&GameOverNotice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> &ViewLayout {
        &self.view
    }

    /// Recompute screen regions for a terminal of `area`.
    pub fn resize(&mut self, area: Rect) {
        self.view = ui::layout(area, self.state.board().size());
    }

    fn start_drag(&mut self, slot: usize) -> bool {
        if self.state.drag().is_some_and(|d| d.slot == slot) {
            return true;
        }
        self.state.cancel_drag();
        self.state.begin_drag(slot)
    }

    fn drop_piece(&mut self) {
        match self.state.end_drag() {
            DropOutcome::GameOver { final_score, .. } => {
                self.notice = Some(GameOverNotice {
                    final_score,
                    best: self.state.best(),
                    new_best: final_score > self.best_at_start,
                });
                self.best_at_start = self.state.best();
                self.screen = Screen::GameOver;
            }
            DropOutcome::Placed(_) | DropOutcome::Rejected | DropOutcome::NoDrag => {}
        }
    }

    fn new_game(&mut self) {
        self.state.new_game();
        self.best_at_start = self.state.best();
        log::info!("new game requested");
    }

    /// Handle a key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        let action = key_to_action(key);
        match self.screen {
            Screen::Help | Screen::GameOver => {
                if action == Action::Quit {
                    return true;
                }
                self.screen = Screen::Playing;
                self.notice = None;
                false
            }
            Screen::Playing => self.apply_action(action),
        }
    }

    fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Select(slot) => {
                if self.start_drag(slot) && self.state.drag().is_some_and(|d| d.candidate.is_none()) {
                    self.state.nudge_drag(0, 0);
                }
            }
            Action::MoveLeft => self.state.nudge_drag(-1, 0),
            Action::MoveRight => self.state.nudge_drag(1, 0),
            Action::MoveUp => self.state.nudge_drag(0, -1),
            Action::MoveDown => self.state.nudge_drag(0, 1),
            Action::Drop => self.drop_piece(),
            Action::Cancel => {
                if self.state.drag().is_none() {
                    return true;
                }
                self.state.cancel_drag();
            }
            Action::Help => {
                self.state.cancel_drag();
                self.screen = Screen::Help;
            }
            Action::NewGame => self.new_game(),
            Action::Quit => return true,
            Action::None => {}
        }
        false
    }

    /// Press on a tray piece picks it up, motion moves it, release drops it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.config.mouse || self.screen != Screen::Playing {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(slot) = ui::slot_at(&self.view, column, row) {
                    self.state.cancel_drag();
                    if self.state.begin_drag(slot) {
                        let (col, row) = ui::screen_to_grid(&self.view, column, row);
                        self.state.drag_cursor(col, row);
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if self.state.drag().is_some_and(|d| d.cursor.is_some()) {
                    let (col, row) = ui::screen_to_grid(&self.view, column, row);
                    self.state.drag_cursor(col, row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.state.drag().is_some_and(|d| d.cursor.is_some()) {
                    let (col, row) = ui::screen_to_grid(&self.view, column, row);
                    self.state.drag_cursor(col, row);
                    self.drop_piece();
                }
            }
            _ => {}
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if self.config.mouse {
            execute!(stdout, EnableMouseCapture)?;
        }

        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        let result = self.run_loop(&mut terminal);

        // Restore
        if self.config.mouse {
            let _ = execute!(std::io::stdout(), DisableMouseCapture);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| {
                self.resize(f.area());
                ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    self.screen,
                    self.notice.as_ref(),
                    &self.view,
                );
            })?;

            match event::read()? {
                Event::Key(key) => {
                    if self.handle_key(key) {
                        log::info!("quit: score {}, best {}", self.state.score(), self.state.best());
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::game::Piece;
    use crate::highscores::MemoryScoreStore;
    use crate::shapes::Shape;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App<MemoryScoreStore> {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        };
        let mut app = App::new(config, Theme::default(), Catalog::standard(), MemoryScoreStore::default());
        app.resize(Rect::new(0, 0, 80, 30));
        app
    }

    fn piece(pattern: &str) -> Piece {
        Piece::new(Shape::parse("test", pattern).unwrap(), 1)
    }

    fn press(app: &mut App<MemoryScoreStore>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(app: &mut App<MemoryScoreStore>, kind: MouseEventKind, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_keyboard_pick_move_drop() {
        let mut app = app();
        app.state_mut()
            .set_hand([Some(piece("#")), Some(piece("#")), None]);
        assert!(!press(&mut app, KeyCode::Char('1')));
        assert_eq!(app.state().drag().unwrap().candidate, Some((3, 3)));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.state().drag().unwrap().candidate, Some((2, 2)));
        press(&mut app, KeyCode::Enter);
        assert!(app.state().drag().is_none());
        assert!(app.state().board().get(2, 2).unwrap().is_filled());
        assert_eq!(app.state().score(), 10);
    }

    #[test]
    fn test_escape_puts_back_then_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert!(app.state().drag().is_some());
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(app.state().drag().is_none());
        assert!(app.state().hand()[1].is_some());
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_switching_slots_moves_drag() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.state().drag().unwrap().slot, 2);
    }

    #[test]
    fn test_help_screen_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.screen(), Screen::Help);
        assert!(!press(&mut app, KeyCode::Char('x')));
        assert_eq!(app.screen(), Screen::Playing);
        press(&mut app, KeyCode::Char('?'));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(!app.handle_key(key));
    }

    #[test]
    fn test_mouse_drag_and_drop() {
        let mut app = app();
        app.state_mut()
            .set_hand([Some(piece("#")), Some(piece("#")), None]);
        let slot = app.view().slots[0];
        let board = app.view().board;
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), slot.x + 2, slot.y + 2);
        assert_eq!(app.state().drag().unwrap().slot, 0);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), board.x + 1, board.y);
        assert_eq!(app.state().drag().unwrap().candidate, Some((0, 0)));
        assert!(app.state().drag().unwrap().valid);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), board.x + 1, board.y);
        assert!(app.state().drag().is_none());
        assert!(app.state().board().get(0, 0).unwrap().is_filled());
        assert!(app.state().hand()[0].is_none());
    }

    #[test]
    fn test_mouse_release_off_board_returns_piece() {
        let mut app = app();
        let slot = app.view().slots[1];
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), slot.x + 2, slot.y + 2);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 0, 0);
        assert!(app.state().drag().is_none());
        assert!(app.state().hand()[1].is_some());
        assert!(app.state().board().is_empty());
    }

    #[test]
    fn test_game_over_shows_notice_over_new_board() {
        let mut app = app();
        *app.state_mut().board_mut() = Board::from_pattern(&[
            ".###.###", "#.###.##", "##.###.#", "###.###.", ".###.###", "#.###.##", "##.###.#",
            "###.###.",
        ]);
        app.state_mut()
            .set_hand([Some(piece("#")), Some(piece("##")), Some(piece("#/#"))]);
        app.state_mut().begin_drag(0);
        app.state_mut().drag_to(0, 0);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::GameOver);
        let notice = *app.notice().unwrap();
        assert_eq!(notice.final_score, 10);
        assert!(notice.new_best);
        assert_eq!(app.state().score(), 0);
        assert!(app.state().board().is_empty());
        assert_eq!(app.state().games_played(), 1);

        // Mouse is ignored while the notice is up.
        let slot = app.view().slots[0];
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), slot.x + 2, slot.y + 2);
        assert!(app.state().drag().is_none());

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.screen(), Screen::Playing);
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_new_game_key_resets_score() {
        let mut app = app();
        app.state_mut()
            .set_hand([Some(piece("#")), Some(piece("#")), None]);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().score(), 10);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state().score(), 0);
        assert_eq!(app.state().best(), 10);
        assert!(app.state().board().is_empty());
    }
}
