//! Layout and drawing: board, drag shadow, tray, sidebar, help and game-over popups.

use crate::app::{GameOverNotice, Screen};
use crate::board::Cell;
use crate::game::{DragState, GameState, HAND_SIZE};
use crate::highscores::ScoreStore;
use crate::shapes::Shape;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Margin, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Terminal cells per board cell. The last column of each is left blank as a gap.
pub const CELL_WIDTH: u16 = 4;
pub const CELL_HEIGHT: u16 = 2;
/// Tray pieces are drawn at half size.
const MINI_CELL_WIDTH: u16 = 2;
const MINI_CELL_HEIGHT: u16 = 1;
const SLOT_MIN_WIDTH: u16 = 12;
/// Border + five rows for the tallest piece + label row.
const TRAY_HEIGHT: u16 = 8;
const SIDEBAR_WIDTH: u16 = 24;

/// Screen regions for one frame. Mouse hit-testing uses the same rects as drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewLayout {
    /// Board with border.
    pub board_outer: Rect,
    /// Board cells only.
    pub board: Rect,
    pub tray: Rect,
    pub slots: [Rect; HAND_SIZE],
    pub sidebar: Rect,
}

/// Centre board + tray + sidebar in `area` for a `grid_size` board. Rects are clipped to `area`.
pub fn layout(area: Rect, grid_size: usize) -> ViewLayout {
    let n = grid_size as u16;
    let board_w = n * CELL_WIDTH + 2;
    let board_h = n * CELL_HEIGHT + 2;
    let left_w = board_w.max(SLOT_MIN_WIDTH * HAND_SIZE as u16 + 2);
    let total_w = left_w + SIDEBAR_WIDTH;
    let total_h = board_h + TRAY_HEIGHT;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(total_h) / 2;

    let board_outer = Rect {
        x: x + (left_w - board_w) / 2,
        y,
        width: board_w,
        height: board_h,
    };
    let tray = Rect {
        x,
        y: y + board_h,
        width: left_w,
        height: TRAY_HEIGHT,
    };
    let tray_inner = tray.inner(Margin::new(1, 1));
    let slot_w = tray_inner.width / HAND_SIZE as u16;
    let slots = std::array::from_fn(|i| {
        Rect {
            x: tray_inner.x + i as u16 * slot_w,
            y: tray_inner.y,
            width: slot_w,
            height: tray_inner.height,
        }
        .intersection(area)
    });
    ViewLayout {
        board_outer: board_outer.intersection(area),
        board: board_outer.inner(Margin::new(1, 1)).intersection(area),
        tray: tray.intersection(area),
        slots,
        sidebar: Rect {
            x: x + left_w,
            y,
            width: SIDEBAR_WIDTH,
            height: total_h,
        }
        .intersection(area),
    }
}

/// Tray slot under the terminal position, if any.
pub fn slot_at(layout: &ViewLayout, column: u16, row: u16) -> Option<usize> {
    let pos = Position::new(column, row);
    layout.slots.iter().position(|r| r.contains(pos))
}

/// Terminal position → board coordinates in cell units (centre of the terminal cell).
/// Positions off the board give values outside `0..grid_size`.
pub fn screen_to_grid(layout: &ViewLayout, column: u16, row: u16) -> (f32, f32) {
    let col = (f32::from(column) - f32::from(layout.board.x) + 0.5) / f32::from(CELL_WIDTH);
    let row = (f32::from(row) - f32::from(layout.board.y) + 0.5) / f32::from(CELL_HEIGHT);
    (col, row)
}

/// Draw the current screen: the game, with the help or game-over popup on top when active.
pub fn draw<S: ScoreStore>(
    frame: &mut Frame,
    state: &GameState<S>,
    theme: &Theme,
    screen: Screen,
    notice: Option<&GameOverNotice>,
    layout: &ViewLayout,
) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    draw_board(frame.buffer_mut(), state, theme, layout);
    draw_tray(frame.buffer_mut(), state, theme, layout);
    draw_sidebar(frame.buffer_mut(), state, theme, layout.sidebar);

    match screen {
        Screen::Playing => {}
        Screen::Help => draw_help(frame.buffer_mut(), theme, area),
        Screen::GameOver => {
            if let Some(notice) = notice {
                draw_game_over(frame.buffer_mut(), theme, notice, area);
            }
        }
    }
}

fn border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.div_line).bg(theme.bg)
}

fn paint(buf: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

/// Fill one board cell at grid (gx, gy), keeping the right-hand gap column.
fn paint_cell(buf: &mut Buffer, board: Rect, gx: usize, gy: usize, symbol: &str, color: Color, bg: Color) {
    let x0 = board.x + gx as u16 * CELL_WIDTH;
    let y0 = board.y + gy as u16 * CELL_HEIGHT;
    for dy in 0..CELL_HEIGHT {
        for dx in 0..CELL_WIDTH {
            let (x, y) = (x0 + dx, y0 + dy);
            if x >= board.right() || y >= board.bottom() {
                continue;
            }
            if dx == CELL_WIDTH - 1 {
                paint(buf, x, y, " ", Style::default().bg(bg));
            } else {
                paint(buf, x, y, symbol, Style::default().fg(color).bg(bg));
            }
        }
    }
}

fn draw_board<S: ScoreStore>(buf: &mut Buffer, state: &GameState<S>, theme: &Theme, layout: &ViewLayout) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(theme))
        .title(Span::styled(" Blockblast ", Style::default().fg(theme.title)))
        .render(layout.board_outer, buf);

    for (gy, row) in state.board().rows().enumerate() {
        for (gx, cell) in row.iter().enumerate() {
            let color = match *cell {
                Cell::Filled(c) => theme.block_color(c),
                Cell::Empty => theme.empty,
            };
            paint_cell(buf, layout.board, gx, gy, "█", color, theme.bg);
        }
    }

    if let Some(drag) = state.drag() {
        draw_shadow(buf, drag, state.board().size(), theme, layout.board);
    }
}

/// Candidate position of the dragged piece: its colour when it fits, the invalid colour when not.
fn draw_shadow(buf: &mut Buffer, drag: &DragState, size: usize, theme: &Theme, board: Rect) {
    let Some((x, y)) = drag.candidate else {
        return;
    };
    let (symbol, color) = if drag.valid {
        ("▓", theme.block_color(drag.piece.color))
    } else {
        ("░", theme.invalid)
    };
    let n = size as i32;
    for (dx, dy) in drag.piece.shape.cells() {
        let (gx, gy) = (x.saturating_add(dx as i32), y.saturating_add(dy as i32));
        if (0..n).contains(&gx) && (0..n).contains(&gy) {
            paint_cell(buf, board, gx as usize, gy as usize, symbol, color, theme.bg);
        }
    }
}

fn draw_tray<S: ScoreStore>(buf: &mut Buffer, state: &GameState<S>, theme: &Theme, layout: &ViewLayout) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(theme))
        .title(Span::styled(" Pieces ", Style::default().fg(theme.title)))
        .render(layout.tray, buf);

    let dragged = state.drag().map(|d| d.slot);
    let label_style = Style::default().fg(theme.inactive_fg).bg(theme.bg);
    for (i, (slot, piece)) in layout.slots.iter().zip(state.hand()).enumerate() {
        if slot.is_empty() {
            continue;
        }
        paint(buf, slot.x, slot.y, &(i + 1).to_string(), label_style);
        match piece {
            Some(piece) if dragged != Some(i) => {
                draw_mini_shape(buf, &piece.shape, theme.block_color(piece.color), theme.bg, *slot);
            }
            _ => {}
        }
    }
}

/// Piece preview centred in `area` (below the label row).
fn draw_mini_shape(buf: &mut Buffer, shape: &Shape, color: Color, bg: Color, area: Rect) {
    let w = shape.width() as u16 * MINI_CELL_WIDTH;
    let h = shape.height() as u16 * MINI_CELL_HEIGHT;
    let inner_y = area.y + 1;
    let inner_h = area.height.saturating_sub(1);
    let off_x = area.x + area.width.saturating_sub(w) / 2;
    let off_y = inner_y + inner_h.saturating_sub(h) / 2;
    let style = Style::default().fg(color).bg(bg);
    for (dx, dy) in shape.cells() {
        let x = off_x + dx as u16 * MINI_CELL_WIDTH;
        let y = off_y + dy as u16 * MINI_CELL_HEIGHT;
        for i in 0..MINI_CELL_WIDTH {
            if x + i < area.right() && y < area.bottom() {
                paint(buf, x + i, y, "█", style);
            }
        }
    }
}

fn draw_sidebar<S: ScoreStore>(buf: &mut Buffer, state: &GameState<S>, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let hint_style = Style::default().fg(theme.inactive_fg);
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };

    let combo = if state.combo() > 0 {
        format!("x{}", state.combo())
    } else {
        "-".to_string()
    };
    let mut lines = vec![
        stat("Score: ", state.score().to_string()),
        stat("Best:  ", state.best().to_string()),
        stat("Combo: ", combo),
        stat("Games: ", state.games_played().to_string()),
        Line::from(""),
    ];
    match state.drag() {
        Some(drag) => {
            let status = if drag.candidate.is_none() {
                Span::styled("move onto the board", hint_style)
            } else if drag.valid {
                Span::styled("fits here", Style::default().fg(Color::Green))
            } else {
                Span::styled("blocked", Style::default().fg(theme.invalid))
            };
            lines.push(stat("Holding: ", drag.piece.shape.name().to_string()));
            lines.push(Line::from(status));
        }
        None => {
            lines.push(Line::from(Span::styled("Pick a piece", hint_style)));
            lines.push(Line::from(""));
        }
    }
    lines.push(Line::from(""));
    for hint in [
        "1 2 3   pick piece",
        "arrows  move",
        "Enter   drop",
        "Esc     put back",
        "?       help",
        "n       new game",
        "q       quit",
    ] {
        lines.push(Line::from(Span::styled(hint, hint_style)));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(theme))
                .title(Span::styled(" Stats ", title_style)),
        )
        .render(area, buf);
}

/// Rect of `width` x `height` centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn popup_block(theme: &Theme, title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title).bg(theme.bg))
        .style(Style::default().bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)))
}

fn draw_help(buf: &mut Buffer, theme: &Theme, area: Rect) {
    let popup = centered(area, 56, 16);
    let fg = Style::default().fg(theme.main_fg);
    let text = [
        "Drag pieces from the tray onto the board.",
        "",
        "Fill a whole row or column to clear it:",
        "  10 points per line, plus 10 x combo.",
        "Clearing on consecutive drops raises the combo;",
        "a drop that clears nothing resets it and scores 10.",
        "",
        "New pieces arrive once all three are used.",
        "The game ends when no piece fits anywhere.",
        "",
        "Keys: 1-3 pick, arrows move, Enter drop, Esc back.",
        "Mouse: press a piece, drag, release to drop.",
    ];
    let lines: Vec<Line> = text.iter().map(|t| Line::from(Span::styled(*t, fg))).collect();
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(popup_block(theme, " How to play "))
        .render(popup, buf);
}

fn draw_game_over(buf: &mut Buffer, theme: &Theme, notice: &GameOverNotice, area: Rect) {
    let popup = centered(area, 32, 9);
    let fg = Style::default().fg(theme.main_fg);
    let mut lines = vec![
        Line::from(Span::styled(
            " No moves left ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!("Score: {}", notice.final_score), fg)),
        Line::from(Span::styled(format!("Best: {}", notice.best), fg)),
    ];
    if notice.new_best {
        lines.push(Line::from(Span::styled(
            "New record!",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "any key: next board",
        Style::default().fg(theme.inactive_fg),
    )));
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(popup_block(theme, " Game over "))
        .render(popup, buf);
}
