//! # Meadow Frame Loop
//!
//! One tick, start to finish:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. UPDATE                                                           │
//! │    ├─ Pointer lock transition                                       │
//! │    └─ Camera::step from the input snapshot                          │
//! │                                                                     │
//! │ 2. GENERATE                                                         │
//! │    ├─ Player cell = floor(position / cell_size)                     │
//! │    └─ ensure_around(player cell, render_radius)                     │
//! │                                                                     │
//! │ 3. RENDER                                                           │
//! │    ├─ Ground tile for every cached cell                             │
//! │    └─ Every cached object within the draw distance                  │
//! │                                                                     │
//! │ 4. END FRAME                                                        │
//! │    └─ Record timing, warn on overrun                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing blocks: generation cost per tick is bounded by the render
//! radius and the attempt budget.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use meadow_procedural::{CellCoord, WorldCache};

use crate::camera::{Camera, CameraConfig, InputSnapshot};
use crate::config::{AppConfig, AppResult};
use crate::render::Renderer;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Configuration for the frame loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    /// Enable frame timing logs.
    pub enable_timing_logs: bool,
    /// Target frames per second.
    pub target_fps: u32,
    /// Where the player starts, world X.
    pub spawn_x: f64,
    /// Where the player starts, world Z.
    pub spawn_z: f64,
}

impl FrameLoopConfig {
    /// Frame time budget derived from `target_fps`.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        if self.target_fps == 0 {
            return TARGET_FRAME_TIME;
        }
        Duration::from_secs(1) / self.target_fps
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            enable_timing_logs: false,
            target_fps: 60,
            spawn_x: 0.0,
            spawn_z: 0.0,
        }
    }
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Camera update time in microseconds.
    pub update_us: u64,
    /// Cell generation time in microseconds.
    pub generate_us: u64,
    /// Draw submission time in microseconds.
    pub render_us: u64,
    /// Frame number.
    pub frame: u64,
    /// Cells generated this frame.
    pub cells_generated: u32,
    /// Ground tiles drawn this frame.
    pub cells_drawn: u32,
    /// Objects drawn this frame.
    pub objects_drawn: u32,
}

/// The main frame orchestrator.
///
/// Owns the world cache and the camera.
pub struct FrameLoop {
    /// Generated cells.
    world: WorldCache,
    /// Player camera.
    camera: Camera,
    /// Camera tuning.
    camera_config: CameraConfig,
    /// Configuration.
    config: FrameLoopConfig,
    /// Euclidean draw cutoff, world units.
    draw_distance: f64,
    /// Frame counter.
    frame_count: u64,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl FrameLoop {
    /// Creates a frame loop around an existing cache.
    #[must_use]
    pub fn new(world: WorldCache, camera_config: CameraConfig, config: FrameLoopConfig) -> Self {
        let camera = Camera::new(config.spawn_x, config.spawn_z, &camera_config);
        let stats_accumulator = FrameStatsAccumulator::with_budget(config.frame_budget());
        let draw_distance = world.config().draw_distance();

        Self {
            world,
            camera,
            camera_config,
            config,
            draw_distance,
            frame_count: 0,
            stats_accumulator,
        }
    }

    /// Builds the cache and loop from a validated application config.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of `app` is invalid.
    pub fn from_config(app: AppConfig) -> AppResult<Self> {
        app.validate()?;
        let world = WorldCache::new(app.world)?;
        Ok(Self::new(world, app.camera, app.frame))
    }

    /// Runs one frame and submits its draw calls to `renderer`.
    pub fn tick<R: Renderer>(&mut self, input: &InputSnapshot, renderer: &mut R) -> FrameStats {
        let start = Instant::now();

        // 1. Update
        self.camera = self.camera.step(input, &self.camera_config);
        let updated = Instant::now();

        // 2. Generate
        let (cell_size, radius) = {
            let config = self.world.config();
            (config.cell_size, config.render_radius)
        };
        let player_cell = CellCoord::from_world(self.camera.x, self.camera.z, cell_size);
        let cells_generated = self.world.ensure_around(player_cell, radius);
        let generated = Instant::now();

        // 3. Render
        let mut cells_drawn = 0u32;
        for cell in self.world.cells() {
            renderer.draw_ground(cell.coord, cell.coord.center(cell_size));
            cells_drawn += 1;
        }
        let mut objects_drawn = 0u32;
        for visible in self.world.visible(self.camera.x, self.camera.z, self.draw_distance) {
            renderer.draw((visible.x, visible.z), visible.object);
            objects_drawn += 1;
        }
        let rendered = Instant::now();

        let stats = FrameStats {
            total_us: micros(rendered - start),
            update_us: micros(updated - start),
            generate_us: micros(generated - updated),
            render_us: micros(rendered - generated),
            frame: self.frame_count,
            cells_generated: cells_generated as u32,
            cells_drawn,
            objects_drawn,
        };
        self.end_frame(stats);
        stats
    }

    /// Records timing and prepares for next frame.
    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        // Log frames that blew twice the budget
        let budget_us = self.stats_accumulator.budget_us;
        if self.config.enable_timing_logs && stats.total_us > budget_us * 2 {
            tracing::warn!(
                "Frame {} exceeded budget: {:.2}ms (target: {:.2}ms, {} cells generated)",
                self.frame_count,
                stats.total_us as f64 / 1000.0,
                budget_us as f64 / 1000.0,
                stats.cells_generated
            );
        }
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the world cache.
    #[must_use]
    pub fn world(&self) -> &WorldCache {
        &self.world
    }

    /// Returns the draw cutoff in world units.
    #[must_use]
    pub fn draw_distance(&self) -> f64 {
        self.draw_distance
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of camera update times.
    pub update_us_sum: u64,
    /// Sum of generation times.
    pub generate_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Cells generated across all frames.
    pub cells_generated: u64,
    /// Objects drawn across all frames.
    pub objects_drawn: u64,
    /// Per-frame budget, microseconds.
    pub budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator with the 60 FPS budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_budget(TARGET_FRAME_TIME)
    }

    /// Creates a new accumulator with a custom frame budget.
    #[must_use]
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            update_us_sum: 0,
            generate_us_sum: 0,
            render_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            cells_generated: 0,
            objects_drawn: 0,
            budget_us: micros(budget),
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.update_us_sum += stats.update_us;
        self.generate_us_sum += stats.generate_us;
        self.render_us_sum += stats.render_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.cells_generated += u64::from(stats.cells_generated);
        self.objects_drawn += u64::from(stats.objects_drawn);

        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        self.avg_ms(self.total_us_sum)
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    fn avg_ms(&self, sum_us: u64) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (sum_us as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Prints a summary of the statistics.
    pub fn print_summary(&self) {
        let min_ms = if self.frames_recorded == 0 {
            0.0
        } else {
            self.min_frame_us as f64 / 1000.0
        };

        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ───────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Average Frame:      {:.3} ms ({:.1} FPS)", self.avg_frame_ms(), self.avg_fps());
        println!("│ Min Frame:          {min_ms:.3} ms");
        println!("│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0);
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ BUDGET ───────────────────────────────────────────────────────┐");
        println!("│ Target:             {:.3} ms", self.budget_us as f64 / 1000.0);
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");

        if self.frames_recorded > 0 {
            println!();
            println!("┌─ BREAKDOWN ─────────────────────────────────────────────────────┐");
            println!("│ Update:             {:.3} ms", self.avg_ms(self.update_us_sum));
            println!("│ Generate:           {:.3} ms", self.avg_ms(self.generate_us_sum));
            println!("│ Render:             {:.3} ms", self.avg_ms(self.render_us_sum));
            println!("│ Cells Generated:    {}", self.cells_generated);
            println!("│ Objects Drawn:      {}", self.objects_drawn);
            println!("└──────────────────────────────────────────────────────────────────┘");
        }
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawTally;
    use meadow_procedural::WorldConfig;

    fn frame_loop() -> FrameLoop {
        let world = WorldCache::new(WorldConfig::woodland()).unwrap();
        FrameLoop::new(world, CameraConfig::default(), FrameLoopConfig::default())
    }

    #[test]
    fn test_frame_loop_creation() {
        let frame_loop = frame_loop();
        assert_eq!(frame_loop.frame_count(), 0);
        assert!(frame_loop.world().is_empty());
        assert!((frame_loop.draw_distance() - 1320.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_tick_fills_render_window() {
        let mut frame_loop = frame_loop();
        let mut tally = DrawTally::new();

        let stats = frame_loop.tick(&InputSnapshot::default(), &mut tally);

        assert_eq!(stats.frame, 0);
        assert_eq!(stats.cells_generated, 49);
        assert_eq!(stats.cells_drawn, 49);
        assert_eq!(tally.ground, 49);
        assert_eq!(u64::from(stats.objects_drawn), tally.objects());
        assert!(tally.objects() > 0);
        assert_eq!(frame_loop.frame_count(), 1);
    }

    #[test]
    fn test_standing_still_generates_nothing_new() {
        let mut frame_loop = frame_loop();
        let mut tally = DrawTally::new();
        frame_loop.tick(&InputSnapshot::default(), &mut tally);

        let first = tally;
        tally.reset();
        let stats = frame_loop.tick(&InputSnapshot::default(), &mut tally);
        assert_eq!(stats.cells_generated, 0);
        assert_eq!(tally, first);
    }

    #[test]
    fn test_walking_uncovers_new_column() {
        let mut frame_loop = frame_loop();
        let mut tally = DrawTally::new();
        let walk = InputSnapshot {
            forward: true,
            sprint: true,
            ..InputSnapshot::default()
        };

        // 25 sprint ticks = 400 units east: exactly one cell.
        let mut generated = 0;
        for _ in 0..25 {
            generated += frame_loop.tick(&walk, &mut tally).cells_generated;
        }
        assert_eq!(generated, 49 + 7);
        assert!((frame_loop.camera().x - 400.0).abs() < 1e-9);
        // Cells left behind stay cached and keep their ground tile.
        assert_eq!(frame_loop.world().len(), 56);
        assert_eq!(frame_loop.stats().frames_recorded, 25);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();

        for i in 0..100 {
            acc.record(FrameStats {
                total_us: 10_000 + (i * 100),
                update_us: 100,
                generate_us: 5000,
                render_us: 4000,
                frame: i,
                cells_generated: 1,
                cells_drawn: 49,
                objects_drawn: 700,
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert_eq!(acc.cells_generated, 100);
        assert_eq!(acc.objects_drawn, 70_000);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
        assert_eq!(acc.min_frame_us, 10_000);
        assert_eq!(acc.frames_over_budget, 33);
    }

    #[test]
    fn test_budget_follows_target_fps() {
        let config = FrameLoopConfig {
            target_fps: 30,
            ..FrameLoopConfig::default()
        };
        assert_eq!(config.frame_budget(), Duration::from_micros(33_333) + Duration::from_nanos(333));

        let mut acc = FrameStatsAccumulator::with_budget(config.frame_budget());
        acc.record(FrameStats {
            total_us: 20_000,
            ..FrameStats::default()
        });
        assert_eq!(acc.frames_over_budget, 0);
        assert_eq!(FrameLoopConfig::default().frame_budget().as_micros(), 16_666);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = FrameStatsAccumulator::default();
        assert!(acc.avg_frame_ms().abs() < f64::EPSILON);
        assert!(acc.avg_fps().abs() < f64::EPSILON);
        assert!(acc.over_budget_ratio().abs() < f64::EPSILON);
    }
}
