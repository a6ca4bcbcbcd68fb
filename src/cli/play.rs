//! Play command implementation - interactive TUI.
//!
//! The canvas fills the terminal. Hand input comes from a JSON-lines
//! detector stream or file, or from the mouse driving a synthetic hand.

use super::{CliError, SessionArgs};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use handswarm::game::{Bounds, Vec2};
use handswarm::input::{
    read_landmark_file, spawn_json_lines, synthesize, ChannelSource, HandPose, LandmarkSender,
    RecordingSource, ScriptedSource,
};
use handswarm::render::{
    HAND_COLOR, HAND_POINT_RADIUS, HEALTH_BAR_BACKGROUND, HEALTH_BAR_HEIGHT, Rgb,
};
use handswarm::session::RealtimeScheduler;
use handswarm::{run, LandmarkSource, Recording, RenderSnapshot, ResizeEvent, Simulation};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
        Paragraph,
    },
    Frame, Terminal,
};
use std::fs::{self, File};
use std::io::{self, stdout, BufReader, Stdout};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Canvas pixels per terminal column.
const PIXELS_PER_COL: f64 = 8.0;
/// Canvas pixels per terminal row.
const PIXELS_PER_ROW: f64 = 16.0;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config, landmark stream or terminal cannot be used.
pub(crate) fn execute(
    session: &SessionArgs,
    landmarks: Option<PathBuf>,
    record: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut config = session.resolve()?;

    let (input, hand): (Box<dyn LandmarkSource>, _) = match landmarks {
        Some(path) => (open_landmarks(&path)?, None),
        None => {
            let (tx, source) = ChannelSource::new();
            (Box::new(source), Some(MouseHand::new(tx)))
        }
    };

    let mut terminal = TerminalGuard::enter()?;
    let size = terminal.size()?;
    let layout = split(Rect::new(0, 0, size.width, size.height));
    let bounds = canvas_bounds(layout.canvas);
    config.canvas_width = bounds.width;
    config.canvas_height = bounds.height;

    let mut app = App {
        sim_layout: layout,
        hand,
        paused: false,
        resizes: Vec::new(),
        error: None,
    };
    let mut source = RecordingSource::new(input);
    let mut sim = Simulation::new(&config);
    let mut scheduler = RealtimeScheduler::new(config.target_fps);

    let frames = run(&mut sim, &mut source, &mut scheduler, |sim, _| {
        app.frame(&mut terminal, sim)
    });
    drop(terminal);

    if let Some(err) = app.error {
        return Err(err);
    }
    log::info!("played {frames} frames, final score {}", sim.state().score());

    if let Some(path) = record {
        Recording::new(config, source.into_frames())
            .with_resizes(app.resizes)
            .save(&path)?;
        println!("Recording saved to: {}", path.display());
    }
    println!(
        "Score: {}  Wave: {}  Combo: {}",
        sim.state().score(),
        sim.state().wave(),
        sim.state().combo()
    );
    Ok(())
}

/// Open a landmark stream.
///
/// Regular files play back one line per frame. Stdin (`-`) and pipes are
/// sampled live from a reader thread.
fn open_landmarks(path: &Path) -> Result<Box<dyn LandmarkSource>, CliError> {
    if path.as_os_str() == "-" {
        let (source, _reader) = spawn_json_lines(BufReader::new(io::stdin()));
        return Ok(Box::new(source));
    }
    let open_error = |e: io::Error| CliError::new(format!("Failed to open {}: {e}", path.display()));
    if fs::metadata(path).map_err(open_error)?.is_file() {
        return Ok(Box::new(ScriptedSource::new(read_landmark_file(path)?)));
    }
    let file = File::open(path).map_err(open_error)?;
    let (source, _reader) = spawn_json_lines(BufReader::new(file));
    Ok(Box::new(source))
}

/// Restores the terminal on drop, including on error paths.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn size(&self) -> Result<ratatui::layout::Size, CliError> {
        Ok(self.terminal.size()?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
    }
}

/// Screen regions.
#[derive(Debug, Clone, Copy)]
struct ScreenLayout {
    hud: Rect,
    canvas: Rect,
    footer: Rect,
}

fn split(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(1),    // Canvas
            Constraint::Length(1), // Footer
        ])
        .split(area);
    ScreenLayout {
        hud: chunks[0],
        canvas: chunks[1],
        footer: chunks[2],
    }
}

fn canvas_bounds(area: Rect) -> Bounds {
    Bounds::new(
        f64::from(area.width.max(1)) * PIXELS_PER_COL,
        f64::from(area.height.max(1)) * PIXELS_PER_ROW,
    )
}

/// Mouse-driven synthetic hand.
struct MouseHand {
    tx: LandmarkSender,
    pose: Option<HandPose>,
    anchor: Option<Vec2>,
}

impl MouseHand {
    fn new(tx: LandmarkSender) -> Self {
        Self {
            tx,
            pose: Some(HandPose::Relaxed),
            anchor: None,
        }
    }

    fn set_pose(&mut self, pose: Option<HandPose>, bounds: Bounds) {
        self.pose = pose;
        self.publish(bounds);
    }

    fn move_to(&mut self, anchor: Vec2, bounds: Bounds) {
        self.anchor = Some(anchor);
        self.publish(bounds);
    }

    fn publish(&self, bounds: Bounds) {
        let frame = match (self.pose, self.anchor) {
            (Some(pose), Some(anchor)) => Some(synthesize(pose, anchor, bounds)),
            _ => None,
        };
        // The source only disappears when the loop is shutting down.
        let _ = self.tx.send(frame);
    }

    fn label(&self) -> &'static str {
        match self.pose {
            Some(HandPose::Pinch) => "pinch",
            Some(HandPose::Open) => "open",
            Some(HandPose::Relaxed) => "relaxed",
            None => "hidden",
        }
    }
}

/// App state for the TUI.
struct App {
    sim_layout: ScreenLayout,
    hand: Option<MouseHand>,
    paused: bool,
    resizes: Vec<ResizeEvent>,
    error: Option<CliError>,
}

impl App {
    /// Draw, then handle pending input. Blocks while paused.
    fn frame(&mut self, terminal: &mut TerminalGuard, sim: &mut Simulation) -> ControlFlow<()> {
        loop {
            if let Err(e) = self.draw(terminal, sim) {
                self.error = Some(e);
                return ControlFlow::Break(());
            }
            let wait = if self.paused {
                Duration::from_millis(50)
            } else {
                Duration::ZERO
            };
            match self.handle_events(sim, wait) {
                Ok(ControlFlow::Break(())) => return ControlFlow::Break(()),
                Ok(ControlFlow::Continue(())) => {}
                Err(e) => {
                    self.error = Some(e);
                    return ControlFlow::Break(());
                }
            }
            if !self.paused {
                return ControlFlow::Continue(());
            }
        }
    }

    fn draw(&self, terminal: &mut TerminalGuard, sim: &Simulation) -> Result<(), CliError> {
        let snapshot = sim.snapshot();
        terminal
            .terminal
            .draw(|f| self.ui(f, &snapshot))
            .map(|_| ())
            .map_err(CliError::from)
    }

    fn handle_events(
        &mut self,
        sim: &mut Simulation,
        wait: Duration,
    ) -> Result<ControlFlow<()>, CliError> {
        let mut timeout = wait;
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let bounds = sim.bounds();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(ControlFlow::Break(())),
                    KeyCode::Char(' ') => self.paused = !self.paused,
                    KeyCode::Char(c) => {
                        if let Some(hand) = &mut self.hand {
                            match c {
                                'g' => hand.set_pose(Some(HandPose::Pinch), bounds),
                                's' => hand.set_pose(Some(HandPose::Open), bounds),
                                'f' => hand.set_pose(Some(HandPose::Relaxed), bounds),
                                'n' => hand.set_pose(None, bounds),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => self.on_mouse(mouse, bounds),
                Event::Resize(width, height) => {
                    self.sim_layout = split(Rect::new(0, 0, width, height));
                    let bounds = canvas_bounds(self.sim_layout.canvas);
                    sim.resize(bounds);
                    if sim.bounds() == bounds {
                        self.resizes.push(ResizeEvent::new(sim.frame(), bounds));
                    }
                }
                _ => {}
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn on_mouse(&mut self, mouse: MouseEvent, bounds: Bounds) {
        let Some(hand) = &mut self.hand else {
            return;
        };
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
        ) {
            return;
        }
        let area = self.sim_layout.canvas;
        let col = mouse.column.saturating_sub(area.x).min(area.width.saturating_sub(1));
        let row = mouse.row.saturating_sub(area.y).min(area.height.saturating_sub(1));
        let anchor = Vec2::new(
            (f64::from(col) + 0.5) * PIXELS_PER_COL,
            (f64::from(row) + 0.5) * PIXELS_PER_ROW,
        );
        hand.move_to(anchor, bounds);
    }

    fn ui(&self, f: &mut Frame, snapshot: &RenderSnapshot) {
        let layout = split(f.area());
        render_hud(f, layout.hud, snapshot, self.paused);
        render_canvas(f, layout.canvas, snapshot);
        render_footer(f, layout.footer, self.hand.as_ref());
    }
}

fn render_hud(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot, paused: bool) {
    let hud = &snapshot.hud;
    let bold = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled(" handswarm ", bold),
        Span::raw(format!(
            "| Score: {} | Wave: {} | Combo: {} | FPS: {} | Mode: {} ",
            hud.score, hud.wave, hud.combo, hud.fps, hud.mode
        )),
    ];
    if paused {
        spans.push(Span::styled(
            "| PAUSED ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

const fn color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

fn render_canvas(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot) {
    let bounds = snapshot.bounds;
    // Canvas y grows upward; the simulation's grows downward.
    let flip = |p: Vec2| (p.x, bounds.height - p.y);

    let canvas = Canvas::default()
        .background_color(Color::Black)
        .marker(Marker::Braille)
        .x_bounds([0.0, bounds.width])
        .y_bounds([0.0, bounds.height])
        .paint(|ctx| {
            paint_swarm(ctx, snapshot, &flip);
            ctx.layer();
            paint_monsters(ctx, snapshot, &flip);
            ctx.layer();
            paint_hand(ctx, snapshot, &flip);
        });

    f.render_widget(canvas, area);
}

fn paint_swarm(ctx: &mut Context<'_>, snapshot: &RenderSnapshot, flip: &dyn Fn(Vec2) -> (f64, f64)) {
    let mut followers = Vec::with_capacity(snapshot.particles.len());
    for p in &snapshot.particles {
        if p.leader {
            let (x, y) = flip(p.position);
            ctx.draw(&Circle {
                x,
                y,
                radius: p.radius,
                color: color(p.color),
            });
        } else {
            followers.push(flip(p.position));
        }
    }
    if let Some(follower) = snapshot.particles.iter().find(|p| !p.leader) {
        ctx.draw(&Points {
            coords: &followers,
            color: color(follower.color),
        });
    }
}

fn paint_monsters(
    ctx: &mut Context<'_>,
    snapshot: &RenderSnapshot,
    flip: &dyn Fn(Vec2) -> (f64, f64),
) {
    for m in &snapshot.monsters {
        let (x, y) = flip(m.position);
        ctx.draw(&Circle {
            x,
            y,
            radius: m.radius,
            color: color(m.color),
        });

        let origin = m.health_bar_origin();
        let bar_y = origin.y + HEALTH_BAR_HEIGHT / 2.0;
        let (x1, y1) = flip(Vec2::new(origin.x, bar_y));
        ctx.draw(&CanvasLine::new(
            x1,
            y1,
            x1 + m.radius * 2.0,
            y1,
            color(HEALTH_BAR_BACKGROUND),
        ));
        if m.health_bar_fill() > 0.0 {
            ctx.draw(&CanvasLine::new(
                x1,
                y1,
                x1 + m.health_bar_fill(),
                y1,
                color(m.tier.color()),
            ));
        }
    }
}

fn paint_hand(ctx: &mut Context<'_>, snapshot: &RenderSnapshot, flip: &dyn Fn(Vec2) -> (f64, f64)) {
    let Some(hand) = &snapshot.hand else {
        return;
    };
    for (a, b) in hand.segments() {
        let (x1, y1) = flip(a);
        let (x2, y2) = flip(b);
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color(HAND_COLOR)));
    }
    for &p in &hand.points {
        let (x, y) = flip(p);
        ctx.draw(&Circle {
            x,
            y,
            radius: HAND_POINT_RADIUS,
            color: color(HAND_COLOR),
        });
    }
}

fn render_footer(f: &mut Frame, area: Rect, hand: Option<&MouseHand>) {
    let controls = match hand {
        Some(hand) => format!(
            " [mouse] Move hand  [g] Pinch  [s] Open  [f] Relaxed  [n] Hide  [Space] Pause  [q] Quit | hand: {} ",
            hand.label()
        ),
        None => " [Space] Pause  [q] Quit | hand: detector stream ".to_string(),
    };
    let footer = Paragraph::new(controls).style(Style::default().fg(Color::Gray));
    f.render_widget(footer, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn hand_line() -> String {
        let points = vec!["[0.5, 0.5]"; handswarm::game::LANDMARK_COUNT].join(", ");
        format!("{{\"landmarks\": [{points}]}}")
    }

    #[test]
    fn test_landmark_file_plays_one_line_per_frame() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", hand_line()).unwrap();
        writeln!(file, "{{\"landmarks\": null}}").unwrap();
        writeln!(file, "{}", hand_line()).unwrap();
        file.flush().unwrap();

        let mut source = open_landmarks(file.path()).unwrap();
        assert!(source.latest().is_some());
        assert!(source.latest().is_none());
        assert!(source.latest().is_some());
        assert!(source.latest().is_none());
    }

    #[test]
    fn test_missing_landmark_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_landmarks(&dir.path().join("absent.jsonl")).err().unwrap();
        assert!(err.to_string().contains("Failed to open"), "{err}");
    }
}
