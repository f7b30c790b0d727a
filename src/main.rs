use arboard::Clipboard;
use fogwalk::config::ViewerConfig;
use fogwalk::loader::load_scenario;
use fogwalk::grid::WALL;
use fogwalk::{Cell, Config, Event, EventLog, FogOfWar, Grid, Navigator, Objective, Position, RunOutcome};
use macroquad::prelude::*;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MARGIN: f32 = 10.0;
const INFO_HEIGHT: f32 = 90.0;

/// Replays a finished run event by event over a copy of the starting grid
struct Replay {
    initial: Grid,
    grid: Grid,
    fog: FogOfWar,
    origin: Position,
    initial_sweep: bool,
    objectives: Vec<Objective>,
    log: EventLog,
    outcome: RunOutcome,
    cursor: usize,
    position: Position,
    trail: Vec<Position>,
    playing: bool,
    elapsed: f32,
    viewer: ViewerConfig,
    /// Fill colour per cell, rebuilt when the grid revision moves
    cell_colors: Vec<Color>,
    painted_revision: Option<u64>,
}

fn cell_color(cell: &Cell) -> Color {
    if cell.kind == WALL {
        Color::from_rgba(70, 70, 70, 255)
    } else if cell.is_lurking() && !cell.passable {
        RED // Revealed obstacle
    } else if cell.is_lurking() {
        Color::from_rgba(150, 120, 200, 255) // Unseen obstacle
    } else {
        Color::from_rgba(200, 200, 200, 255)
    }
}

impl Replay {
    fn load(land: &Path, edges: &Path, objectives: &Path, config: &Config) -> fogwalk::Result<Self> {
        let scenario = load_scenario(land, edges, objectives)?;
        let mut log = EventLog::new();
        let report = Navigator::new(scenario.clone(), &config.simulation).run(&mut log);
        info!("{}", log.summary());

        let mut replay = Replay {
            initial: scenario.grid.clone(),
            grid: scenario.grid,
            fog: FogOfWar::new(scenario.radius),
            origin: scenario.start,
            initial_sweep: config.simulation.initial_sweep,
            objectives: scenario.objectives,
            log,
            outcome: report.outcome,
            cursor: 0,
            position: scenario.start,
            trail: Vec::new(),
            playing: true,
            elapsed: 0.0,
            viewer: config.viewer.clone(),
            cell_colors: Vec::new(),
            painted_revision: None,
        };
        replay.restart();
        Ok(replay)
    }

    fn restart(&mut self) {
        self.grid = self.initial.clone();
        self.position = self.origin;
        self.trail = vec![self.origin];
        self.cursor = 0;
        self.elapsed = 0.0;
        self.painted_revision = None;
        if self.initial_sweep {
            self.fog.reveal_around(&mut self.grid, self.origin);
        }
    }

    fn repaint(&mut self) {
        let revision = self.grid.revision();
        if self.painted_revision == Some(revision) {
            return;
        }
        self.cell_colors = self.grid.iter().map(|(_, cell)| cell_color(cell)).collect();
        self.painted_revision = Some(revision);
    }

    /// Apply the next event. Returns false once the log is exhausted.
    fn step(&mut self) -> bool {
        let Some(logged) = self.log.get_events().get(self.cursor) else {
            return false;
        };
        match logged.event {
            Event::Moved { to } => {
                self.position = to;
                self.trail.push(to);
                self.fog.reveal_around(&mut self.grid, to);
            }
            Event::AlternativeChosen { alternative, .. } => {
                self.grid.convert_type_to_passable(alternative);
            }
            _ => {}
        }
        self.cursor += 1;
        true
    }

    fn update(&mut self, delta_time: f32) {
        if !self.playing {
            return;
        }
        self.elapsed += delta_time;
        while self.elapsed >= self.viewer.step_interval {
            self.elapsed -= self.viewer.step_interval;
            if !self.step() {
                self.playing = false;
                break;
            }
        }
    }

    fn copy_to_clipboard(&self) {
        let transcript = self.log.transcript();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&transcript) {
                    error!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Transcript copied to clipboard!");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                error!("Failed to access clipboard: {}", e);
            }
        }
    }

    /// Screen rectangle of a cell; `y` grows upwards on screen
    fn cell_origin(&self, pos: Position) -> (f32, f32) {
        let size = self.viewer.cell_size;
        let px = MARGIN + pos.x as f32 * size;
        let py = MARGIN + (self.grid.height - 1 - pos.y) as f32 * size;
        (px, py)
    }

    fn draw(&self) {
        let v = &self.viewer;
        clear_background(Color::from_rgba(v.background_r, v.background_g, v.background_b, 255));
        let size = v.cell_size;

        for ((pos, cell), &color) in self.grid.iter().zip(&self.cell_colors) {
            let (px, py) = self.cell_origin(pos);
            draw_rectangle(px, py, size - 1.0, size - 1.0, color);
            if cell.is_lurking() {
                draw_text(&cell.kind.to_string(), px + 3.0, py + size - 4.0, size * 0.4, BLACK);
            }
        }

        for pos in &self.trail {
            let (px, py) = self.cell_origin(*pos);
            draw_circle(px + size / 2.0, py + size / 2.0, size * 0.12, DARKGREEN);
        }

        for (i, objective) in self.objectives.iter().enumerate() {
            let (px, py) = self.cell_origin(objective.target);
            draw_rectangle_lines(px + 1.0, py + 1.0, size - 3.0, size - 3.0, 3.0, GOLD);
            draw_text(&(i + 1).to_string(), px + size * 0.6, py + size * 0.4, size * 0.4, BLACK);
        }

        let (px, py) = self.cell_origin(self.position);
        draw_rectangle(px + size * 0.25, py + size * 0.25, size * 0.5, size * 0.5, BLUE);

        let last = match self.cursor.checked_sub(1) {
            Some(i) => self.log.get_events()[i].event.to_string(),
            None => "(start)".to_string(),
        };
        let outcome = match self.outcome {
            RunOutcome::Completed { objectives } => format!("completed, {} objectives", objectives),
            RunOutcome::Aborted { objective } => format!("aborted at objective {}", objective),
        };
        let info = format!(
            "Event {}/{}: {}   Run {}\nSpace: play/pause  Right: step  R: restart  C: copy transcript  Esc: close",
            self.cursor,
            self.log.len(),
            last,
            outcome
        );
        let top = MARGIN * 3.0 + self.grid.height as f32 * size;
        for (i, line) in info.lines().enumerate() {
            draw_text(line, MARGIN, top + i as f32 * 22.0, 20.0, WHITE);
        }
    }
}

fn window_conf() -> Conf {
    let config = Config::load();
    Conf {
        window_title: config.viewer.window_title.clone(),
        window_width: 1024,
        window_height: 768,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fogwalk=info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <land> <edges> <objectives>", args[0]);
        eprintln!("Replays a navigation run over its grid");
        return;
    }

    let config = Config::load();
    let mut replay = match Replay::load(Path::new(&args[1]), Path::new(&args[2]), Path::new(&args[3]), &config) {
        Ok(replay) => replay,
        Err(e) => {
            error!("Failed to load scenario: {}", e);
            return;
        }
    };

    let needed_height = MARGIN * 3.0 + replay.grid.height as f32 * config.viewer.cell_size + INFO_HEIGHT;
    if needed_height > screen_height() {
        info!("Grid is taller than the window; lower viewer.cell_size to fit");
    }

    loop {
        if is_key_pressed(KeyCode::Space) {
            replay.playing = !replay.playing;
        }
        if is_key_pressed(KeyCode::Right) {
            replay.playing = false;
            replay.step();
        }
        if is_key_pressed(KeyCode::R) {
            replay.restart();
            replay.playing = true;
        }

        // Copy transcript to clipboard on C key
        if is_key_pressed(KeyCode::C) {
            replay.copy_to_clipboard();
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        replay.update(get_frame_time());
        replay.repaint();
        replay.draw();

        next_frame().await
    }
}
