use crate::target::Target;
use anyhow::Result;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Software renderer for the game frames.
///
/// The background is a light gray so every palette color, black
/// included, stays visible.
pub struct GameRenderer {
    center_x: f32,
    center_y: f32,
}

fn background() -> Color {
    Color::from_rgba8(230, 230, 230, 255)
}

impl GameRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            center_x: width as f32 / 2.0,
            center_y: height as f32 / 2.0,
        }
    }

    /// Renders one frame from the current game state: the idle marker
    /// between sessions, the target box while one is visible, and a
    /// blank field during the inter-round delay.
    pub fn render_frame(
        &mut self,
        pixmap: &mut Pixmap,
        running: bool,
        target: Option<&Target>,
        trials_recorded: usize,
    ) -> Result<()> {
        pixmap.fill(background());

        if !running {
            self.render_idle_marker(pixmap)?;
            return Ok(());
        }

        if let Some(target) = target {
            self.render_target(pixmap, target)?;
        }
        self.render_trial_ticks(pixmap, trials_recorded)?;

        Ok(())
    }

    /// Hollow square in the center of the screen while no session is
    /// running (key bindings are printed to the console at startup).
    fn render_idle_marker(&self, pixmap: &mut Pixmap) -> Result<()> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(80, 80, 80, 255);
        paint.anti_alias = true;

        let half = 30.0;
        let rect = Rect::from_ltrb(
            self.center_x - half,
            self.center_y - half,
            self.center_x + half,
            self.center_y + half,
        )
        .ok_or_else(|| anyhow::anyhow!("Invalid idle marker rect"))?;
        let path = PathBuilder::from_rect(rect);

        let stroke = Stroke {
            width: 3.0,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

        Ok(())
    }

    fn render_target(&self, pixmap: &mut Pixmap, target: &Target) -> Result<()> {
        let [r, g, b, a] = target.color.rgba();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);

        let rect = Rect::from_xywh(
            target.x as f32,
            target.y as f32,
            target.width as f32,
            target.height as f32,
        )
        .ok_or_else(|| anyhow::anyhow!("Invalid target rect"))?;

        pixmap.fill_rect(rect, &paint, Transform::identity(), None);

        Ok(())
    }

    /// One small notch along the top edge per recorded trial.
    fn render_trial_ticks(&self, pixmap: &mut Pixmap, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let mut paint = Paint::default();
        paint.set_color_rgba8(80, 80, 80, 255);

        for i in 0..count.min(64) {
            let x = 8.0 + i as f32 * 10.0;
            if let Some(rect) = Rect::from_xywh(x, 8.0, 6.0, 6.0) {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }

        Ok(())
    }
}
