//! Intro overlay
//!
//! A full-window title shown over a blurred scene. Clicking the title (or
//! pressing Enter) hides it and clears the blur at once; the overlay itself is
//! removed once the removal delay has passed. Blur radius and title opacity
//! ease out over the same delay for display.

use std::time::{Duration, Instant};

use imgui::{Condition, Key, WindowFlags};

use crate::config::IntroConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleState {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Blurred,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Shown,
    Removed,
}

pub struct IntroOverlay {
    title: String,
    removal_delay: Duration,
    max_blur_radius: f32,
    title_state: TitleState,
    surface_state: SurfaceState,
    overlay_state: OverlayState,
    activated_at: Option<Instant>,
}

impl IntroOverlay {
    pub fn new(config: &IntroConfig) -> Self {
        Self {
            title: config.title.clone(),
            removal_delay: Duration::from_millis(config.removal_delay_ms),
            max_blur_radius: config.blur_radius,
            title_state: TitleState::Visible,
            surface_state: SurfaceState::Blurred,
            overlay_state: OverlayState::Shown,
            activated_at: None,
        }
    }

    /// Hides the title, clears the surface and schedules removal.
    ///
    /// Only the first call has any effect; returns whether this one did.
    pub fn activate(&mut self, now: Instant) -> bool {
        if self.activated_at.is_some() {
            return false;
        }

        log::debug!("Intro activated");
        self.activated_at = Some(now);
        self.title_state = TitleState::Hidden;
        self.surface_state = SurfaceState::Clear;
        true
    }

    /// Removes the overlay once the removal delay has elapsed.
    pub fn update(&mut self, now: Instant) {
        if self.overlay_state == OverlayState::Removed {
            return;
        }
        if let Some(activated_at) = self.activated_at {
            if now.saturating_duration_since(activated_at) >= self.removal_delay {
                log::debug!("Intro overlay removed");
                self.overlay_state = OverlayState::Removed;
            }
        }
    }

    pub fn title_state(&self) -> TitleState {
        self.title_state
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.surface_state
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay_state
    }

    /// The overlay sits above the scene and swallows pointer input while shown.
    pub fn captures_input(&self) -> bool {
        self.overlay_state == OverlayState::Shown
    }

    /// 0 before activation, 1 once the removal delay has passed.
    fn progress(&self, now: Instant) -> f32 {
        match self.activated_at {
            None => 0.0,
            Some(_) if self.removal_delay.is_zero() => 1.0,
            Some(activated_at) => {
                let elapsed = now.saturating_duration_since(activated_at);
                (elapsed.as_secs_f32() / self.removal_delay.as_secs_f32()).min(1.0)
            }
        }
    }

    /// Blur radius to draw the scene with, in logical pixels.
    pub fn blur_radius(&self, now: Instant) -> f32 {
        self.max_blur_radius * (1.0 - ease_in_out(self.progress(now)))
    }

    pub fn title_alpha(&self, now: Instant) -> f32 {
        1.0 - ease_in_out(self.progress(now))
    }

    /// Draws the overlay and handles its trigger. Nothing is drawn once removed.
    pub fn draw(&mut self, ui: &imgui::Ui, now: Instant) {
        if self.overlay_state == OverlayState::Removed {
            return;
        }

        let display_size = ui.io().display_size;
        let alpha = self.title_alpha(now);
        let mut clicked = false;

        ui.window("##intro")
            .position([0.0, 0.0], Condition::Always)
            .size(display_size, Condition::Always)
            .flags(
                WindowFlags::NO_DECORATION
                    | WindowFlags::NO_MOVE
                    | WindowFlags::NO_SAVED_SETTINGS
                    | WindowFlags::NO_BACKGROUND
                    | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS,
            )
            .build(|| {
                ui.set_window_font_scale(3.0);
                let size = ui.calc_text_size(&self.title);
                let pos = [
                    (display_size[0] - size[0]) * 0.5,
                    (display_size[1] - size[1]) * 0.5,
                ];

                ui.set_cursor_pos(pos);
                clicked = ui.invisible_button("##intro-title", size);
                ui.set_cursor_pos(pos);
                ui.text_colored([1.0, 1.0, 1.0, alpha], &self.title);

                clicked |= ui.is_key_pressed(Key::Enter);
            });

        if clicked {
            self.activate(now);
        }
    }
}

fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> IntroOverlay {
        IntroOverlay::new(&IntroConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let intro = overlay();
        let now = Instant::now();
        assert_eq!(intro.title_state(), TitleState::Visible);
        assert_eq!(intro.surface_state(), SurfaceState::Blurred);
        assert_eq!(intro.overlay_state(), OverlayState::Shown);
        assert!(intro.captures_input());
        assert_eq!(intro.blur_radius(now), 8.0);
        assert_eq!(intro.title_alpha(now), 1.0);
    }

    #[test]
    fn test_activation_swaps_immediately() {
        let mut intro = overlay();
        let start = Instant::now();
        assert!(intro.activate(start));

        assert_eq!(intro.title_state(), TitleState::Hidden);
        assert_eq!(intro.surface_state(), SurfaceState::Clear);
        assert_eq!(intro.overlay_state(), OverlayState::Shown);
    }

    #[test]
    fn test_overlay_removed_after_delay_not_before() {
        let mut intro = overlay();
        let start = Instant::now();
        intro.activate(start);

        intro.update(start + Duration::from_millis(1199));
        assert_eq!(intro.overlay_state(), OverlayState::Shown);
        assert!(intro.captures_input());

        intro.update(start + Duration::from_millis(1200));
        assert_eq!(intro.overlay_state(), OverlayState::Removed);
        assert!(!intro.captures_input());
    }

    #[test]
    fn test_update_before_activation_keeps_overlay() {
        let mut intro = overlay();
        intro.update(Instant::now() + Duration::from_secs(60));
        assert_eq!(intro.overlay_state(), OverlayState::Shown);
    }

    #[test]
    fn test_second_activation_ignored() {
        let mut intro = overlay();
        let start = Instant::now();
        intro.activate(start);
        assert!(!intro.activate(start + Duration::from_millis(1000)));

        // Removal stays scheduled from the first activation
        intro.update(start + Duration::from_millis(1200));
        assert_eq!(intro.overlay_state(), OverlayState::Removed);
    }

    #[test]
    fn test_blur_and_alpha_ease_out() {
        let mut intro = overlay();
        let start = Instant::now();
        intro.activate(start);

        let halfway = start + Duration::from_millis(600);
        assert!((intro.blur_radius(halfway) - 4.0).abs() < 1e-4);
        assert!((intro.title_alpha(halfway) - 0.5).abs() < 1e-4);

        let done = start + Duration::from_millis(1500);
        assert_eq!(intro.blur_radius(done), 0.0);
        assert_eq!(intro.title_alpha(done), 0.0);
    }
}
