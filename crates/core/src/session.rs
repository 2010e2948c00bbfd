//! Session module - the game state machine
//!
//! A [`Session`] owns the board, the current and next pieces, the score counters and
//! the gravity timer. Every mutation goes through one of its commands; every command
//! either changes state and returns `true`, or is a silent no-op returning `false`.
//!
//! Time only enters through [`Session::update`]: it advances the session clock (used
//! for the manual-move debounce) and runs one [`Session::tick`] per due gravity firing.

use tracing::{debug, info};

use crate::board::Board;
use crate::pieces::Piece;
use crate::rng::PieceGenerator;
use crate::scoring::ScoreState;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
use crate::timer::{GravityTimer, TickRequest};
use crate::types::{Command, SessionStatus, BOARD_HEIGHT, KICK_OFFSETS, MOVE_DELAY_MS};

/// What the most recent lock (or failed start) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastEvent {
    /// A piece was merged into the board
    pub locked: bool,
    pub lines_cleared: u32,
    pub points: u32,
    /// Level after the event
    pub level: u32,
    /// The session ended; `score` is final
    pub game_over: bool,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    generator: PieceGenerator,
    scores: ScoreState,
    status: SessionStatus,
    timer: GravityTimer,
    /// Session clock, advanced by `update`
    clock_ms: u64,
    /// Clock value of the last accepted manual move
    last_move_ms: Option<u64>,
    last_event: Option<LastEvent>,
}

impl Session {
    /// Create an idle session with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            generator: PieceGenerator::new(seed),
            scores: ScoreState::new(),
            status: SessionStatus::Idle,
            timer: GravityTimer::new(),
            clock_ms: 0,
            last_move_ms: None,
            last_event: None,
        }
    }

    /// Start a game on an empty board. Only from Idle or Over.
    pub fn start(&mut self) -> bool {
        self.start_with_board(Board::new())
    }

    /// Start a game on a prepared board (practice setups, tests).
    ///
    /// Ends immediately in `Over` if the first piece cannot spawn.
    pub fn start_with_board(&mut self, board: Board) -> bool {
        if self.status.is_live() {
            debug!(status = self.status.as_str(), "start ignored");
            return false;
        }

        self.clear_state();
        self.board = board;
        self.status = SessionStatus::Active;
        self.next = Some(Piece::new(self.generator.next_kind()));
        info!(seed = self.generator.seed(), "session started");

        if self.spawn_next() {
            self.timer.arm(self.scores.tick_interval_ms());
        } else {
            self.last_event = Some(LastEvent {
                locked: false,
                lines_cleared: 0,
                points: 0,
                level: self.scores.level(),
                game_over: true,
                score: self.scores.score(),
            });
        }
        true
    }

    /// Active <-> Paused. Pausing stops gravity; resuming re-arms it once.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            SessionStatus::Active => {
                self.status = SessionStatus::Paused;
                self.timer.cancel();
                debug!("paused");
                true
            }
            SessionStatus::Paused => {
                self.status = SessionStatus::Active;
                self.timer.arm(self.scores.tick_interval_ms());
                debug!("resumed");
                true
            }
            _ => false,
        }
    }

    /// Discard everything and return to Idle
    pub fn reset(&mut self) -> bool {
        self.clear_state();
        self.status = SessionStatus::Idle;
        info!("session reset");
        true
    }

    /// Advance the session clock and run any gravity ticks that fell due.
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, elapsed_ms: u32) -> u32 {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms as u64);
        self.timer.advance(elapsed_ms);

        let mut ticks = 0;
        while self.timer.poll_due() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// One gravity step: move down, or lock if blocked.
    ///
    /// Not subject to the move debounce. Returns whether the piece moved down.
    pub fn tick(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        self.shift(0, 1)
    }

    /// Manual move by (dx, dy).
    ///
    /// Rejected while not Active, or within `MOVE_DELAY_MS` of the previous accepted
    /// move. A blocked downward move locks the piece.
    pub fn attempt_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        if let Some(last) = self.last_move_ms {
            if self.clock_ms.saturating_sub(last) < MOVE_DELAY_MS as u64 {
                debug!(dx, dy, "move debounced");
                return false;
            }
        }

        let moved = self.shift(dx, dy);
        if moved {
            self.last_move_ms = Some(self.clock_ms);
        }
        moved
    }

    /// Rotate clockwise, trying each horizontal kick offset in turn
    pub fn rotate(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        let Some(mut piece) = self.current else {
            return false;
        };

        let candidate = piece.rotated_mask();
        for &kick in KICK_OFFSETS.iter() {
            let x = piece.x().saturating_add(kick);
            if !self.board.collides(&candidate, x, piece.y()) {
                piece.apply_rotation(candidate, x);
                self.current = Some(piece);
                debug!(kick, "rotated");
                return true;
            }
        }

        debug!("rotation blocked");
        false
    }

    /// Drop to the resting row and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        let Some(mut piece) = self.current else {
            return false;
        };

        let distance = self.drop_distance(&piece);
        piece.set_position(piece.x(), piece.y() + distance);
        self.current = Some(piece);
        self.last_move_ms = Some(self.clock_ms);
        debug!(distance, "hard drop");

        self.lock_current();
        true
    }

    /// Dispatch an input command to the matching operation
    pub fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.attempt_move(-1, 0),
            Command::MoveRight => self.attempt_move(1, 0),
            Command::SoftDrop => self.attempt_move(0, 1),
            Command::HardDrop => self.hard_drop(),
            Command::Rotate => self.rotate(),
            Command::Pause => self.toggle_pause(),
            Command::Start => self.start(),
            Command::Reset => self.reset(),
        }
    }

    /// Row the current piece would rest on if hard-dropped now
    pub fn ghost_y(&self) -> Option<i8> {
        if !self.status.is_live() {
            return None;
        }
        let piece = self.current?;
        Some(piece.y() + self.drop_distance(&piece))
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LastEvent> {
        self.last_event.take()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn level(&self) -> u32 {
        self.scores.level()
    }

    pub fn lines(&self) -> u32 {
        self.scores.lines()
    }

    /// Gravity interval for the current level
    pub fn tick_interval_ms(&self) -> u32 {
        self.scores.tick_interval_ms()
    }

    /// What an external scheduler should be doing right now, if anything
    pub fn tick_request(&self) -> Option<TickRequest> {
        self.timer.request()
    }

    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn seed(&self) -> u32 {
        self.generator.seed()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.current.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next.map(NextSnapshot::from);
        out.status = self.status;
        out.seed = self.generator.seed();
        out.score = self.scores.score();
        out.level = self.scores.level();
        out.lines = self.scores.lines();
        out.tick_interval_ms = self.scores.tick_interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Move the current piece if the target is free; lock it if a downward move is blocked
    fn shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(mut piece) = self.current else {
            return false;
        };

        let x = piece.x().saturating_add(dx);
        let y = piece.y().saturating_add(dy);
        if !self.board.collides(piece.mask(), x, y) {
            piece.set_position(x, y);
            self.current = Some(piece);
            return true;
        }

        if dy > 0 {
            self.lock_current();
        }
        false
    }

    /// Rows the piece can fall before colliding
    fn drop_distance(&self, piece: &Piece) -> i8 {
        // Past this every filled cell is below the floor.
        let limit = BOARD_HEIGHT as i8 + crate::pieces::MAX_MASK_DIM as i8;
        let mut distance = 0;
        while distance < limit
            && !self
                .board
                .collides(piece.mask(), piece.x(), piece.y().saturating_add(distance + 1))
        {
            distance += 1;
        }
        distance
    }

    /// Merge the current piece, clear lines, score, and bring in the next piece
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        self.board
            .merge(piece.mask(), piece.x(), piece.y(), piece.kind());
        let cleared = self.board.clear_full_lines();
        let result = self.scores.apply_clear(cleared);

        if result.level_changed {
            info!(level = result.level, "level up");
            self.timer.arm(self.scores.tick_interval_ms());
        }
        if cleared > 0 {
            debug!(cleared, points = result.points, "lines cleared");
        }

        let spawned = self.spawn_next();
        self.last_event = Some(LastEvent {
            locked: true,
            lines_cleared: cleared,
            points: result.points,
            level: result.level,
            game_over: !spawned,
            score: self.scores.score(),
        });
    }

    /// Promote the lookahead piece and draw a new one. Ends the session if blocked.
    fn spawn_next(&mut self) -> bool {
        let mut piece = match self.next.take() {
            Some(piece) => piece,
            None => Piece::new(self.generator.next_kind()),
        };
        piece.reset_to_spawn();
        self.next = Some(Piece::new(self.generator.next_kind()));

        if self.board.collides(piece.mask(), piece.x(), piece.y()) {
            self.finish();
            return false;
        }

        self.current = Some(piece);
        true
    }

    fn finish(&mut self) {
        self.status = SessionStatus::Over;
        self.current = None;
        self.timer.cancel();
        info!(
            score = self.scores.score(),
            lines = self.scores.lines(),
            level = self.scores.level(),
            "session over"
        );
    }

    fn clear_state(&mut self) {
        self.board.clear();
        self.current = None;
        self.next = None;
        self.scores = ScoreState::new();
        self.timer.cancel();
        self.last_move_ms = None;
        self.last_event = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Piece;
    use crate::types::{PieceKind, BOARD_WIDTH};

    fn fill_row(board: &mut Board, y: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(PieceKind::Z));
        }
    }

    #[test]
    fn ten_single_line_clears_reach_level_two() {
        let mut session = Session::new(7);
        session.start();
        assert_eq!(session.tick_interval_ms(), 1000);

        for i in 0..10 {
            session.board.clear();
            fill_row(&mut session.board, 19);
            assert!(session.hard_drop());

            let event = session.take_last_event().unwrap();
            assert_eq!(event.lines_cleared, 1, "drop {}", i);
            assert!(!event.game_over);
        }

        assert_eq!(session.lines(), 10);
        assert_eq!(session.level(), 2);
        assert_eq!(session.score(), 400);
        assert_eq!(session.tick_interval_ms(), 900);
        assert_eq!(session.timer().interval_ms(), 900);
    }

    #[test]
    fn level_up_rearms_timer_and_discards_old_progress() {
        let mut session = Session::new(3);
        session.start();
        session.scores = ScoreState::new();
        for _ in 0..9 {
            session.scores.apply_clear(1);
        }

        session.update(500);
        let generation = session.timer().generation();

        session.board.clear();
        fill_row(&mut session.board, 19);
        session.hard_drop();

        assert_eq!(session.level(), 2);
        assert_ne!(session.timer().generation(), generation);
        assert_eq!(session.timer().accumulated_ms(), 0);
    }

    #[test]
    fn rotation_kicks_off_the_left_wall() {
        let mut session = Session::new(1);
        session.start();

        // J turned once has an empty left column, so it can sit at x = -1.
        let mut piece = Piece::new(PieceKind::J);
        let turned = piece.rotated_mask();
        piece.apply_rotation(turned, -1);
        piece.set_position(-1, 5);
        session.current = Some(piece);

        assert!(session.rotate());
        let rotated = session.current().unwrap();
        assert_eq!(rotated.x(), 0);
        assert_eq!(rotated.mask().width(), 3);
    }

    /// T at (4, 10) turns into cells (x+1, 10), (x+1, 11), (x+2, 11), (x+1, 12).
    fn session_with_t_at_row_ten(blocked: &[(i8, i8)]) -> Session {
        let mut session = Session::new(1);
        session.start();
        session.board.clear();
        for &(x, y) in blocked {
            session.board.set(x, y, Some(PieceKind::O));
        }
        let mut piece = Piece::new(PieceKind::T);
        piece.set_position(4, 10);
        session.current = Some(piece);
        session
    }

    #[test]
    fn rotation_prefers_left_kick_over_right() {
        // Unkicked collides; -1 and +1 both fit.
        let mut session = session_with_t_at_row_ten(&[(5, 12)]);
        assert!(session.rotate());
        assert_eq!(session.current().unwrap().x(), 3);
    }

    #[test]
    fn rotation_falls_through_to_two_column_kicks() {
        // 0, -1 and +1 all collide; -2 fits first.
        let mut session = session_with_t_at_row_ten(&[(4, 12), (5, 12), (6, 12)]);
        assert!(session.rotate());
        assert_eq!(session.current().unwrap().x(), 2);

        // With -2 blocked as well only +2 is left.
        let mut session = session_with_t_at_row_ten(&[(3, 12), (4, 12), (5, 12), (6, 12)]);
        assert!(session.rotate());
        let piece = session.current().unwrap();
        assert_eq!(piece.x(), 6);
        assert_eq!(piece.y(), 10);
    }

    #[test]
    fn rotation_rejected_when_every_kick_collides() {
        let mut session = Session::new(1);
        session.start();

        // Vertical I in a one-column well: lying flat fits nowhere within +/-2.
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 4 {
                    session.board.set(x, y, Some(PieceKind::O));
                }
            }
        }
        let mut piece = Piece::new(PieceKind::I);
        let vertical = piece.rotated_mask();
        piece.apply_rotation(vertical, 4);
        piece.set_position(4, 10);
        session.current = Some(piece);

        let before = session.current;
        assert!(!session.rotate());
        assert_eq!(session.current, before);
    }

    #[test]
    fn soft_drop_locks_on_floor() {
        let mut session = Session::new(5);
        session.start();
        let mut piece = Piece::new(PieceKind::O);
        piece.set_position(0, 18);
        session.current = Some(piece);

        assert!(!session.attempt_move(0, 1));
        assert_eq!(session.board.get(0, 19), Some(Some(PieceKind::O)));
        assert!(session.take_last_event().unwrap().locked);
        assert_eq!(session.current().unwrap().y(), 0);
    }

    #[test]
    fn blocked_sideways_move_does_not_lock() {
        let mut session = Session::new(5);
        session.start();
        let mut piece = Piece::new(PieceKind::O);
        piece.set_position(0, 10);
        session.current = Some(piece);

        assert!(!session.attempt_move(-1, 0));
        assert_eq!(session.board().occupied_count(), 0);
        assert_eq!(session.take_last_event(), None);
    }

    #[test]
    fn spawn_blocked_after_lock_ends_session() {
        let mut session = Session::new(11);
        session.start();

        // Rows 0..=1 blocked everywhere except where nothing can fit.
        for x in 0..BOARD_WIDTH as i8 {
            if x != 0 {
                session.board.set(x, 0, Some(PieceKind::S));
                session.board.set(x, 1, Some(PieceKind::S));
            }
        }
        let mut piece = Piece::new(PieceKind::O);
        piece.set_position(8, 17);
        session.current = Some(piece);
        let occupied = session.board.occupied_count();

        assert!(session.hard_drop());
        assert_eq!(session.status(), SessionStatus::Over);
        assert!(session.current().is_none());
        // Only the dropped O was added.
        assert_eq!(session.board.occupied_count(), occupied + 4);
        assert!(!session.timer().is_armed());
        assert!(session.take_last_event().unwrap().game_over);
    }
}
