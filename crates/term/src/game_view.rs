//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::backdrop::Backdrop;
use crate::core::{piece_from_cell, GameSnapshot, Mask};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, SessionStatus, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Things drawn around the game that do not come from the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewExtras<'a> {
    /// Best first
    pub high_scores: &'a [u32],
    /// Drawn behind everything else
    pub backdrop: Option<&'a Backdrop>,
}

/// Standard colour for a piece kind
pub fn kind_rgb(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(0x00, 0xf0, 0xf0),
        PieceKind::J => Rgb::new(0x00, 0x00, 0xf0),
        PieceKind::L => Rgb::new(0xf0, 0xa0, 0x00),
        PieceKind::O => Rgb::new(0xf0, 0xf0, 0x00),
        PieceKind::S => Rgb::new(0x00, 0xf0, 0x00),
        PieceKind::T => Rgb::new(0xa0, 0x00, 0xf0),
        PieceKind::Z => Rgb::new(0xf0, 0x00, 0x00),
    }
}

const PLAY_BG: Rgb = Rgb::new(20, 20, 30);

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Top-left corner of the playfield frame for a viewport
    pub fn frame_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size();
        (
            viewport.width.saturating_sub(frame_w) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    /// Frame size including the border
    pub fn frame_size(&self) -> (u16, u16) {
        (
            (BOARD_WIDTH as u16) * self.cell_w + 2,
            (BOARD_HEIGHT as u16) * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer.
    ///
    /// Allocation-free: callers reuse the framebuffer across frames.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with(snap, ViewExtras::default(), viewport, fb);
    }

    pub fn render_into_with(
        &self,
        snap: &GameSnapshot,
        extras: ViewExtras<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        if let Some(backdrop) = extras.backdrop {
            backdrop.draw(fb);
        }

        let (frame_w, frame_h) = self.frame_size();
        let (start_x, start_y) = self.frame_origin(viewport);

        let bg = CellStyle {
            fg: Rgb::new(70, 70, 85),
            bg: PLAY_BG,
            bold: false,
            dim: true,
        };
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            bg,
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Locked cells.
        for y in 0..BOARD_HEIGHT as u16 {
            for x in 0..BOARD_WIDTH as u16 {
                match piece_from_cell(snap.board[y as usize][x as usize]) {
                    Some(kind) => self.draw_board_cell(fb, start_x, start_y, x, y, kind),
                    None => self.fill_cell_rect(fb, start_x, start_y, x, y, '·', bg),
                }
            }
        }

        // Nothing moves while paused, so the piece is hidden with the rest of play.
        if snap.status == SessionStatus::Active {
            if let Some(active) = snap.active {
                if let Some(ghost_y) = snap.ghost_y.filter(|&gy| gy != active.y) {
                    let ghost = CellStyle {
                        fg: kind_rgb(active.kind).mix(PLAY_BG, 0.5),
                        bg: PLAY_BG,
                        bold: false,
                        dim: true,
                    };
                    self.for_each_board_cell(&active.mask, active.x, ghost_y, |x, y| {
                        self.fill_cell_rect(fb, start_x, start_y, x, y, '░', ghost);
                    });
                }

                self.for_each_board_cell(&active.mask, active.x, active.y, |x, y| {
                    self.draw_board_cell(fb, start_x, start_y, x, y, active.kind);
                });
            }
        }

        self.draw_side_panel(fb, snap, extras.high_scores, viewport, start_x, start_y, frame_w);

        match snap.status {
            SessionStatus::Idle => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "PRESS ENTER")
            }
            SessionStatus::Paused => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "PAUSED")
            }
            SessionStatus::Over => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "GAME OVER");
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 2, "ENTER TO RETRY");
            }
            SessionStatus::Active => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with(
        &self,
        snap: &GameSnapshot,
        extras: ViewExtras<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with(snap, extras, viewport, &mut fb);
        fb
    }

    /// Visit the on-board cells covered by `mask` placed at (x, y)
    fn for_each_board_cell(&self, mask: &Mask, x: i8, y: i8, mut f: impl FnMut(u16, u16)) {
        for (r, c) in mask.filled() {
            let bx = x as i16 + c as i16;
            let by = y as i16 + r as i16;
            if (0..BOARD_WIDTH as i16).contains(&bx) && (0..BOARD_HEIGHT as i16).contains(&by) {
                f(bx as u16, by as u16);
            }
        }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let style = CellStyle {
            fg: kind_rgb(kind),
            bg: PLAY_BG,
            bold: true,
            dim: false,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        high_scores: &[u32],
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        let mut y = start_y;
        for (name, v) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = snap.next {
            let preview = next.mask.trimmed();
            let style = CellStyle {
                fg: kind_rgb(next.kind),
                bg: Rgb::new(0, 0, 0),
                bold: true,
                dim: false,
            };
            for (r, c) in preview.filled() {
                let px = panel_x + c as u16 * self.cell_w;
                let py = y + r as u16 * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
            }
            y = y.saturating_add(preview.height() as u16 * self.cell_h);
        } else {
            fb.put_str(panel_x, y, "-", value);
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "HIGH SCORES", label);
        y = y.saturating_add(1);
        if high_scores.is_empty() {
            fb.put_str(panel_x, y, "-", value);
        }
        for (i, &score) in high_scores.iter().enumerate() {
            if y >= viewport.height {
                break;
            }
            let cx = fb.put_u32(panel_x, y, i as u32 + 1, value);
            let cx = fb.put_str(cx, y, ". ", value);
            fb.put_u32(cx, y, score, value);
            y = y.saturating_add(1);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        row_offset: u16,
        text: &str,
    ) {
        let y = start_y
            .saturating_add(frame_h / 2)
            .saturating_add(row_offset);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, y, text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Session;

    fn find_text(fb: &FrameBuffer, text: &str) -> Option<(u16, u16)> {
        (0..fb.height()).find_map(|y| {
            fb.row_text(y)
                .find(text)
                .map(|byte| (fb.row_text(y)[..byte].chars().count() as u16, y))
        })
    }

    #[test]
    fn idle_shows_press_enter() {
        let snap = Session::new(1).snapshot();
        let fb = GameView::default().render(&snap, Viewport::new(60, 24));
        assert!(find_text(&fb, "PRESS ENTER").is_some());
        assert!(find_text(&fb, "SCORE").is_some());
    }

    #[test]
    fn active_piece_is_drawn_in_its_colour() {
        let mut session = Session::new(1);
        session.start();
        let snap = session.snapshot();
        let active = snap.active.unwrap();

        let view = GameView::default();
        let viewport = Viewport::new(60, 24);
        let fb = view.render(&snap, viewport);
        let (sx, sy) = view.frame_origin(viewport);

        for (r, c) in active.mask.filled() {
            let x = (active.x as i16 + c as i16) as u16;
            let y = (active.y as i16 + r as i16) as u16;
            let cell = fb.get(sx + 1 + x * 2, sy + 1 + y).unwrap();
            assert_eq!(cell.ch, '█');
            assert_eq!(cell.style.fg, kind_rgb(active.kind));
        }
        assert!(find_text(&fb, "PRESS ENTER").is_none());
    }

    #[test]
    fn paused_hides_piece_and_shows_overlay() {
        let mut session = Session::new(1);
        session.start();
        session.toggle_pause();
        let fb = GameView::default().render(&session.snapshot(), Viewport::new(60, 24));

        assert!(find_text(&fb, "PAUSED").is_some());
        assert!(!fb.cells().iter().any(|c| c.ch == '█' && c.style.bg == PLAY_BG));
    }

    #[test]
    fn high_scores_are_listed() {
        let snap = Session::new(1).snapshot();
        let extras = ViewExtras {
            high_scores: &[1200, 340],
            backdrop: None,
        };
        let fb = GameView::default().render_with(&snap, extras, Viewport::new(60, 30));
        assert!(find_text(&fb, "1. 1200").is_some());
        assert!(find_text(&fb, "2. 340").is_some());
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let mut session = Session::new(1);
        session.start();
        let fb = GameView::default().render(&session.snapshot(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
