//! GameView rendering tests

use blockfall::core::{GameSnapshot, Session};
use blockfall::term::{kind_rgb, Backdrop, BackdropConfig, GameView, ViewExtras, Viewport};
use blockfall::types::{PieceKind, SessionStatus};

fn screen_text(fb: &blockfall::term::FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

#[test]
fn term_view_renders_border_corners() {
    let snap = Session::new(1).snapshot();
    let view = GameView::default();

    // 10x20 cells at 2x1 plus border => 22x22
    let fb = view.render(&snap, Viewport::new(22, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_locked_cell_two_chars_wide_in_kind_colour() {
    let mut snap = GameSnapshot::default();
    snap.board[19][0] = PieceKind::L.index() as u8 + 1;
    snap.status = SessionStatus::Active;

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    let (x0, y0) = (1, 1 + 19);
    for x in [x0, x0 + 1] {
        let cell = fb.get(x, y0).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, kind_rgb(PieceKind::L));
    }
    assert_eq!(fb.get(x0 + 2, y0).unwrap().ch, '·');
}

#[test]
fn term_view_draws_ghost_below_active_piece() {
    let mut session = Session::new(3);
    session.start();
    let snap = session.snapshot();
    let active = snap.active.unwrap();
    let ghost_y = snap.ghost_y.unwrap();
    assert_ne!(ghost_y, active.y);

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));
    let (r, c) = active.mask.filled().last().unwrap();
    let x = 1 + (active.x as u16 + c as u16) * 2;
    let y = 1 + ghost_y as u16 + r as u16;
    assert_eq!(fb.get(x, y).unwrap().ch, '░');
}

#[test]
fn term_view_side_panel_shows_counters_next_and_scores() {
    let mut session = Session::new(1);
    session.start();
    let mut snap = session.snapshot();
    snap.score = 1234;
    snap.level = 2;
    snap.lines = 10;

    let extras = ViewExtras {
        high_scores: &[5000, 1234],
        backdrop: None,
    };
    let fb = GameView::default().render_with(&snap, extras, Viewport::new(60, 30));
    let text = screen_text(&fb);

    for needle in ["SCORE", "1234", "LEVEL", "LINES", "NEXT", "HIGH SCORES", "1. 5000", "2. 1234"] {
        assert!(text.contains(needle), "missing {}", needle);
    }
}

#[test]
fn term_view_overlays_follow_status() {
    let view = GameView::default();
    let vp = Viewport::new(40, 24);
    let mut snap = GameSnapshot::default();

    assert!(screen_text(&view.render(&snap, vp)).contains("PRESS ENTER"));

    snap.status = SessionStatus::Paused;
    assert!(screen_text(&view.render(&snap, vp)).contains("PAUSED"));

    snap.status = SessionStatus::Over;
    assert!(screen_text(&view.render(&snap, vp)).contains("GAME OVER"));

    snap.status = SessionStatus::Active;
    let text = screen_text(&view.render(&snap, vp));
    assert!(!text.contains("PAUSED") && !text.contains("GAME OVER") && !text.contains("PRESS ENTER"));
}

#[test]
fn term_view_keeps_backdrop_out_of_the_playfield() {
    let mut backdrop = Backdrop::new(5, BackdropConfig::default());
    for _ in 0..40 {
        backdrop.update(100, 80);
    }
    assert!(!backdrop.shapes().is_empty());

    let view = GameView::default();
    let vp = Viewport::new(80, 24);
    let extras = ViewExtras {
        high_scores: &[],
        backdrop: Some(&backdrop),
    };
    let fb = view.render_with(&GameSnapshot::default(), extras, vp);

    let (sx, sy) = view.frame_origin(vp);
    let (fw, fh) = view.frame_size();
    for y in sy..sy + fh {
        for x in sx..sx + fw {
            assert_ne!(fb.get(x, y).unwrap().ch, '▓');
        }
    }
}
