//! Viewport size tracking

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

/// Logical size of the render surface, kept current through resize messages.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportSize {
    /// Planet label font size, proportional to the viewport height.
    pub fn label_font_size(&self) -> f32 {
        (self.height * 0.06).clamp(18.0, 72.0)
    }
}

pub fn seed_viewport_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportSize>,
) {
    if let Ok(window) = windows.single() {
        viewport.width = window.width();
        viewport.height = window.height();
    }
}

pub fn track_viewport_size(
    mut resized: MessageReader<WindowResized>,
    windows: Query<(), With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportSize>,
) {
    for event in resized.read() {
        if !windows.contains(event.window) {
            continue;
        }
        let next = ViewportSize {
            width: event.width,
            height: event.height,
        };
        if *viewport != next {
            *viewport = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_size_scales_and_clamps() {
        let small = ViewportSize {
            width: 200.0,
            height: 100.0,
        };
        let normal = ViewportSize {
            width: 1600.0,
            height: 900.0,
        };
        let huge = ViewportSize {
            width: 8000.0,
            height: 4000.0,
        };

        assert_eq!(small.label_font_size(), 18.0);
        assert!((normal.label_font_size() - 54.0).abs() < 1e-4);
        assert_eq!(huge.label_font_size(), 72.0);
    }

    #[test]
    fn resize_of_primary_window_updates_size() {
        let mut app = App::new();
        app.add_message::<WindowResized>()
            .init_resource::<ViewportSize>()
            .add_systems(Update, track_viewport_size);
        let window = app.world_mut().spawn((Window::default(), PrimaryWindow)).id();
        let other = app.world_mut().spawn(Window::default()).id();

        app.world_mut().write_message(WindowResized {
            window: other,
            width: 10.0,
            height: 10.0,
        });
        app.world_mut().write_message(WindowResized {
            window,
            width: 1920.0,
            height: 1080.0,
        });
        app.update();

        assert_eq!(
            *app.world().resource::<ViewportSize>(),
            ViewportSize {
                width: 1920.0,
                height: 1080.0
            }
        );
    }
}
