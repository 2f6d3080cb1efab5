use crate::core::fixed_step::LoopHooks;
use crate::core::framebuffer::Framebuffer;
use crate::traits::surface::{PresentError, PresentationSurface};

/// Demo simulation: counts ticks and repaints the framebuffer with a
/// gradient that scrolls one step per tick.
pub struct DemoGame<S: PresentationSurface> {
    framebuffer: Framebuffer,
    surface: S,
    tick_count: u64,
}

impl<S: PresentationSurface> DemoGame<S> {
    pub fn new(framebuffer: Framebuffer, surface: S) -> Self {
        Self {
            framebuffer,
            surface,
            tick_count: 0,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}

/// Packed 0x00RRGGBB sample of the scrolling gradient at one pixel.
fn gradient(x: u32, y: u32, t: u32) -> u32 {
    let r = x.wrapping_add(t) & 0xFF;
    let g = y.wrapping_add(t / 2) & 0xFF;
    let b = (x ^ y) & 0xFF;
    (r << 16) | (g << 8) | b
}

impl<S: PresentationSurface> LoopHooks for DemoGame<S> {
    fn tick(&mut self) {
        self.tick_count += 1;
    }

    fn render(&mut self) {
        let t = self.tick_count as u32;
        self.framebuffer.fill_with(|x, y| gradient(x, y, t));

        match self.surface.present(&self.framebuffer) {
            Ok(()) => {}
            // Surface not up yet; the next iteration retries.
            Err(PresentError::NotReady) => {}
            Err(e) => log::warn!("present failed: {e}"),
        }
    }

    fn report_fps(&mut self, frames: u32) {
        log::info!("{frames} fps");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records presents; optionally refuses them.
    struct RecordingSurface {
        presented: Vec<Vec<u32>>,
        ready: bool,
    }

    impl RecordingSurface {
        fn new(ready: bool) -> Self {
            Self {
                presented: Vec::new(),
                ready,
            }
        }
    }

    impl PresentationSurface for RecordingSurface {
        fn present(&mut self, frame: &Framebuffer) -> Result<(), PresentError> {
            if !self.ready {
                return Err(PresentError::NotReady);
            }
            self.presented.push(frame.as_slice().to_vec());
            Ok(())
        }
    }

    fn demo(ready: bool) -> DemoGame<RecordingSurface> {
        DemoGame::new(
            Framebuffer::new(8, 8).unwrap(),
            RecordingSurface::new(ready),
        )
    }

    #[test]
    fn tick_increments_count_by_exactly_one() {
        let mut game = demo(true);

        game.tick();
        game.tick();
        game.tick();

        assert_eq!(game.tick_count(), 3);
    }

    #[test]
    fn render_presents_a_snapshot_of_the_buffer() {
        let mut game = demo(true);

        game.render();

        assert_eq!(game.surface.presented.len(), 1);
        assert_eq!(game.surface.presented[0], game.framebuffer().as_slice());
    }

    #[test]
    fn render_output_is_deterministic_per_tick() {
        let mut first = demo(true);
        let mut second = demo(true);
        for _ in 0..5 {
            first.tick();
            second.tick();
        }

        first.render();
        second.render();

        assert_eq!(first.framebuffer(), second.framebuffer());
    }

    #[test]
    fn render_changes_with_tick_count() {
        let mut game = demo(true);

        game.render();
        let before = game.framebuffer().clone();
        game.tick();
        game.render();

        assert_ne!(game.framebuffer(), &before);
    }

    #[test]
    fn not_ready_surface_is_tolerated() {
        let mut game = demo(false);

        // Must not panic; the frame is simply skipped.
        game.render();
        game.render();

        assert!(game.surface.presented.is_empty());
    }
}
