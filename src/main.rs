use anyhow::Result;
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::Instant;
use tiny_skia::Pixmap;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

mod config;
mod export;
mod game;
mod renderer;
mod target;
mod timer;

use config::GameConfig;
use game::GameController;
use rand::rngs::ThreadRng;
use renderer::GameRenderer;
use timer::{FrameTimes, MonotonicClock};

pub struct ReactionBox {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    game: GameController<MonotonicClock, ThreadRng>,
    renderer: Option<GameRenderer>,
    frame_times: FrameTimes,
    cursor: PhysicalPosition<f64>,
    current_size: Option<PhysicalSize<u32>>,
    scale_factor: f64,
    refresh_rate: Option<f64>,
}

impl ReactionBox {
    fn new(config: GameConfig) -> Self {
        Self {
            window: None,
            pixels: None,
            game: GameController::new(config, MonotonicClock::new(), rand::rng()),
            renderer: None,
            frame_times: FrameTimes::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            current_size: None,
            scale_factor: 1.0,
            refresh_rate: None,
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow::anyhow!("No monitor available"))?;

        self.refresh_rate = primary_monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let window_attributes = Window::default_attributes()
            .with_title("Reaction Box")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor.clone()))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        let scale_factor = window.scale_factor();

        self.current_size = Some(physical_size);
        self.scale_factor = scale_factor;

        println!("Display Configuration:");
        println!(
            "  Physical size: {}×{}",
            physical_size.width, physical_size.height
        );
        println!("  Scale factor: {:.2}", scale_factor);
        if let Some(refresh_rate) = self.refresh_rate {
            println!("  Refresh rate: {:.1} Hz", refresh_rate);
        }

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());

        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);

        self.renderer = Some(GameRenderer::new(physical_size.width, physical_size.height));
        self.game
            .set_viewport(physical_size.width, physical_size.height);

        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let Some(current_size) = self.current_size else {
            return Ok(());
        };
        if let (Some(pixels), Some(renderer)) = (&mut self.pixels, &mut self.renderer) {
            let start_time = Instant::now();

            let mut pixmap = Pixmap::new(current_size.width, current_size.height)
                .ok_or_else(|| anyhow::anyhow!("Failed to create pixmap"))?;

            renderer.render_frame(
                &mut pixmap,
                self.game.is_running(),
                self.game.target(),
                self.game.trials().len(),
            )?;

            let frame = pixels.frame_mut();
            frame.copy_from_slice(pixmap.data());

            pixels.render()?;

            self.frame_times.record(start_time.elapsed());
        }
        Ok(())
    }

    fn handle_key(&mut self, key: winit::keyboard::PhysicalKey, event_loop: &ActiveEventLoop) {
        use winit::keyboard::{KeyCode, PhysicalKey};
        if let PhysicalKey::Code(keycode) = key {
            match keycode {
                KeyCode::Enter => self.game.start(),
                KeyCode::Escape => {
                    if self.game.is_running() {
                        self.game.stop();
                    } else {
                        self.cleanup_and_exit(event_loop);
                    }
                }
                _ => {}
            }
        }
    }

    fn handle_click(&mut self) {
        let x = self.cursor.x.max(0.0) as u32;
        let y = self.cursor.y.max(0.0) as u32;
        self.game.handle_click(x, y);
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                eprintln!("Failed to resize surface: {}", e);
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                eprintln!("Failed to resize buffer: {}", e);
            }
        }
        if let Some(renderer) = &mut self.renderer {
            *renderer = GameRenderer::new(new_size.width, new_size.height);
        }
        self.game.set_viewport(new_size.width, new_size.height);
        println!("Display resized to: {}×{}", new_size.width, new_size.height);
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        // A session still in flight exports its results on the way out.
        if self.game.is_running() {
            self.game.stop();
        }

        let stats = self.frame_times.stats();
        println!("\nGoodbye.");
        println!(
            "Frame times over {} samples: mean {:.3} ms, jitter {:.3} ms",
            stats.samples, stats.mean_ms, stats.jitter_ms
        );

        event_loop.exit();
    }
}

impl ApplicationHandler for ReactionBox {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                eprintln!("Failed to create window and surface: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.cleanup_and_exit(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    eprintln!("Render error: {}", e);
                }
                self.game.poll();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    self.handle_key(event.physical_key, event_loop);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if state == ElementState::Pressed && button == MouseButton::Left {
                    self.handle_click();
                }
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let config = GameConfig::load();

    let event_loop = EventLoop::new()?;
    let mut app = ReactionBox::new(config);

    println!("=== REACTION BOX ===");
    println!("Platform: {}", std::env::consts::OS);
    println!("Architecture: {}", std::env::consts::ARCH);
    println!("Press ENTER to start, click the box, ESC to stop.\n");

    event_loop.run_app(&mut app)?;

    Ok(())
}
