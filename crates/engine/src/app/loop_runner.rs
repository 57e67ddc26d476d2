use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::{Dir, InputState, ANSWER_COUNT, DIR_COUNT};
use super::rendering::{Compositor, FramePresenter, TextureRegistry};
use super::{EngineCtx, Game, GameCommand};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub logical_width: u32,
    pub logical_height: u32,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Tile Quest".to_string(),
            window_width: 960,
            window_height: 720,
            logical_width: 320,
            logical_height: 240,
            max_frame_delta: Duration::from_millis(250),
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize framebuffer presenter: {0}")]
    CreatePresenter(#[source] PixelsError),
    #[error("game failed to load: {0}")]
    GameLoad(String),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut game: Box<dyn Game>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window: &'static winit::window::Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    ));
    let mut presenter =
        FramePresenter::new(window, config.logical_width, config.logical_height)
            .map_err(AppError::CreatePresenter)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);

    let mut textures = TextureRegistry::new();
    let mut compositor = Compositor::new(config.logical_width, config.logical_height);
    {
        let mut ctx = EngineCtx {
            textures: &mut textures,
            compositor: &mut compositor,
        };
        game.load(&mut ctx).map_err(AppError::GameLoad)?;
    }
    info!(
        logical_width = config.logical_width,
        logical_height = config.logical_height,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics = FrameMetrics::new(metrics_log_interval);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = presenter.resize_surface(new_size.width, new_size.height) {
                        warn!(error = %error, "presenter_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = presenter.resize_surface(size.width, size.height) {
                        warn!(error = %error, "presenter_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    let delta_ms = clamped_frame_dt.as_millis() as u64;

                    let input = input_collector.snapshot_for_tick();
                    let command = {
                        let mut ctx = EngineCtx {
                            textures: &mut textures,
                            compositor: &mut compositor,
                        };
                        game.tick(delta_ms, &input, &mut ctx)
                    };
                    if command == GameCommand::Quit {
                        info!(reason = "game_request", "shutdown_requested");
                        window_target.exit();
                    }

                    // Single authoritative FPS cap sleep point.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let logical = compositor.logical_size();
                    if logical != presenter.logical_size() {
                        if let Err(error) = presenter.set_logical_size(logical.0, logical.1) {
                            warn!(error = %error, "presenter_rescale_failed");
                            window_target.exit();
                        }
                    }
                    presenter.clear();
                    compositor.flush(&mut presenter);
                    if let Err(error) = presenter.present() {
                        warn!(error = %error, "presenter_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    textures.cleanup();

                    metrics.record_frame(raw_frame_dt);
                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            texture_entries = textures.entry_count(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    wasd_dirs: [bool; DIR_COUNT],
    arrow_dirs: [bool; DIR_COUNT],
    pause_is_down: bool,
    pause_pressed_edge: bool,
    confirm_is_down: bool,
    confirm_pressed_edge: bool,
    answer_is_down: [bool; ANSWER_COUNT],
    answer_pressed_edge: [bool; ANSWER_COUNT],
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        match key_event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW) => self.wasd_dirs[Dir::Up.index()] = is_pressed,
            PhysicalKey::Code(KeyCode::KeyA) => self.wasd_dirs[Dir::Left.index()] = is_pressed,
            PhysicalKey::Code(KeyCode::KeyS) => self.wasd_dirs[Dir::Down.index()] = is_pressed,
            PhysicalKey::Code(KeyCode::KeyD) => self.wasd_dirs[Dir::Right.index()] = is_pressed,
            PhysicalKey::Code(KeyCode::ArrowUp) => self.arrow_dirs[Dir::Up.index()] = is_pressed,
            PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.arrow_dirs[Dir::Left.index()] = is_pressed;
            }
            PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.arrow_dirs[Dir::Down.index()] = is_pressed;
            }
            PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.arrow_dirs[Dir::Right.index()] = is_pressed;
            }
            PhysicalKey::Code(KeyCode::KeyP) | PhysicalKey::Code(KeyCode::Escape) => {
                self.handle_pause_key_state(key_event.state);
            }
            PhysicalKey::Code(KeyCode::Enter) | PhysicalKey::Code(KeyCode::NumpadEnter) => {
                self.handle_confirm_key_state(key_event.state);
            }
            PhysicalKey::Code(KeyCode::Digit1) => self.handle_answer_key_state(0, key_event.state),
            PhysicalKey::Code(KeyCode::Digit2) => self.handle_answer_key_state(1, key_event.state),
            PhysicalKey::Code(KeyCode::Digit3) => self.handle_answer_key_state(2, key_event.state),
            _ => {}
        }
    }

    fn handle_pause_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.pause_is_down {
                    self.pause_pressed_edge = true;
                }
                self.pause_is_down = true;
            }
            ElementState::Released => self.pause_is_down = false,
        }
    }

    fn handle_confirm_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.confirm_is_down {
                    self.confirm_pressed_edge = true;
                }
                self.confirm_is_down = true;
            }
            ElementState::Released => self.confirm_is_down = false,
        }
    }

    fn handle_answer_key_state(&mut self, index: usize, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.answer_is_down[index] {
                    self.answer_pressed_edge[index] = true;
                }
                self.answer_is_down[index] = true;
            }
            ElementState::Released => self.answer_is_down[index] = false,
        }
    }

    /// Builds the tick's input view. The arrow keys drive the second
    /// player and also fall through to the first, so a single keyboard can
    /// steer either. Press edges are consumed here.
    fn snapshot_for_tick(&mut self) -> InputState {
        let mut state = InputState::empty();
        for index in 0..DIR_COUNT {
            let dir = dir_from_index(index);
            state.set_player_dir(dir, self.wasd_dirs[index] || self.arrow_dirs[index]);
            state.set_player2_dir(dir, self.arrow_dirs[index]);
        }
        state.set_edges(
            self.pause_pressed_edge,
            self.confirm_pressed_edge,
            self.answer_pressed_edge,
        );
        self.pause_pressed_edge = false;
        self.confirm_pressed_edge = false;
        self.answer_pressed_edge = [false; ANSWER_COUNT];
        state
    }
}

fn dir_from_index(index: usize) -> Dir {
    match index {
        0 => Dir::Up,
        1 => Dir::Left,
        2 => Dir::Down,
        _ => Dir::Right,
    }
}

#[derive(Debug)]
struct FrameMetrics {
    interval: Duration,
    frame_count: u32,
    frame_time_total: Duration,
    last_snapshot: Instant,
}

#[derive(Debug, Clone, Copy)]
struct FrameMetricsSnapshot {
    fps: f32,
    frame_time_ms: f32,
}

impl FrameMetrics {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            frame_count: 0,
            frame_time_total: Duration::ZERO,
            last_snapshot: Instant::now(),
        }
    }

    fn record_frame(&mut self, frame_dt: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
    }

    fn maybe_snapshot(&mut self, now: Instant) -> Option<FrameMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.last_snapshot);
        if elapsed < self.interval || self.frame_count == 0 {
            return None;
        }
        let snapshot = FrameMetricsSnapshot {
            fps: self.frame_count as f32 / elapsed.as_secs_f32().max(f32::EPSILON),
            frame_time_ms: self.frame_time_total.as_secs_f32() * 1000.0
                / self.frame_count as f32,
        };
        self.frame_count = 0;
        self.frame_time_total = Duration::ZERO;
        self.last_snapshot = now;
        Some(snapshot)
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn pause_press_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::default();
        input.handle_pause_key_state(ElementState::Pressed);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.pause_pressed());
        assert!(!second.pause_pressed());
    }

    #[test]
    fn held_pause_does_not_spam_press_edges() {
        let mut input = InputCollector::default();

        input.handle_pause_key_state(ElementState::Pressed);
        let first = input.snapshot_for_tick();

        input.handle_pause_key_state(ElementState::Pressed);
        let second = input.snapshot_for_tick();

        input.handle_pause_key_state(ElementState::Released);
        input.handle_pause_key_state(ElementState::Pressed);
        let third = input.snapshot_for_tick();

        assert!(first.pause_pressed());
        assert!(!second.pause_pressed());
        assert!(third.pause_pressed());
    }

    #[test]
    fn wasd_drives_only_the_first_player() {
        let mut input = InputCollector::default();
        input.wasd_dirs[Dir::Up.index()] = true;

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.player_dir_down(Dir::Up));
        assert!(!snapshot.player2_dir_down(Dir::Up));
    }

    #[test]
    fn arrows_drive_both_players() {
        let mut input = InputCollector::default();
        input.arrow_dirs[Dir::Left.index()] = true;

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.player_dir_down(Dir::Left));
        assert!(snapshot.player2_dir_down(Dir::Left));
    }

    #[test]
    fn direction_state_is_level_based_across_ticks() {
        let mut input = InputCollector::default();
        input.wasd_dirs[Dir::Right.index()] = true;

        assert!(input.snapshot_for_tick().player_dir_down(Dir::Right));
        assert!(input.snapshot_for_tick().player_dir_down(Dir::Right));

        input.wasd_dirs[Dir::Right.index()] = false;
        assert!(!input.snapshot_for_tick().player_dir_down(Dir::Right));
    }

    #[test]
    fn answer_keys_are_edge_triggered_per_slot() {
        let mut input = InputCollector::default();
        input.handle_answer_key_state(1, ElementState::Pressed);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.answer_pressed(1));
        assert!(!first.answer_pressed(0));
        assert!(!second.answer_pressed(1));
    }

    #[test]
    fn confirm_edge_requires_release_to_retrigger() {
        let mut input = InputCollector::default();

        input.handle_confirm_key_state(ElementState::Pressed);
        assert!(input.snapshot_for_tick().confirm_pressed());

        input.handle_confirm_key_state(ElementState::Pressed);
        assert!(!input.snapshot_for_tick().confirm_pressed());

        input.handle_confirm_key_state(ElementState::Released);
        input.handle_confirm_key_state(ElementState::Pressed);
        assert!(input.snapshot_for_tick().confirm_pressed());
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_positive_when_under_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(5), target_frame_duration(Some(60)));
        assert!(sleep > Duration::ZERO);
    }

    #[test]
    fn normalize_render_fps_cap_disables_zero() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(60)), Some(60));
    }

    #[test]
    fn metrics_snapshot_averages_recorded_frames() {
        let mut metrics = FrameMetrics::new(Duration::ZERO);
        metrics.record_frame(Duration::from_millis(10));
        metrics.record_frame(Duration::from_millis(20));

        let snapshot = metrics
            .maybe_snapshot(metrics.last_snapshot + Duration::from_secs(1))
            .expect("snapshot");
        assert!((snapshot.frame_time_ms - 15.0).abs() < 0.001);
        assert!((snapshot.fps - 2.0).abs() < 0.1);
    }
}
