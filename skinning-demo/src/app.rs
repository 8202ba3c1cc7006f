//! winit application: window lifecycle, input and redraw scheduling
//!
//! Frames are drawn on demand only. Pointer motion, key presses and resizes
//! request a redraw; otherwise the loop sleeps in `ControlFlow::Wait`.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::debug_draw::{DebugLines, DebugOptions};
use crate::graphics::{FrameStatus, Graphics};
use crate::scene::Scene;

/// Keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    CycleLeft,
    CycleRight,
    ToggleBones,
    ToggleWireframe,
    Quit,
}

impl ViewerAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyL => Some(Self::CycleLeft),
            KeyCode::KeyR => Some(Self::CycleRight),
            KeyCode::KeyB => Some(Self::ToggleBones),
            KeyCode::KeyW => Some(Self::ToggleWireframe),
            KeyCode::Escape => Some(Self::Quit),
            _ => None,
        }
    }
}

pub struct ViewerApp {
    config: ViewerConfig,
    scene: Scene,
    options: DebugOptions,
    lines: DebugLines,
    skinning_shader: String,
    debug_line_shader: &'static str,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    /// Fatal error raised inside the event loop, reported after it exits
    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(
        config: ViewerConfig,
        scene: Scene,
        skinning_shader: String,
        debug_line_shader: &'static str,
    ) -> Self {
        let options = DebugOptions {
            bones: config.debug.draw_bones,
            wireframe: config.debug.draw_wireframe,
        };
        Self {
            config,
            scene,
            options,
            lines: DebugLines::new(),
            skinning_shader,
            debug_line_shader,
            window: None,
            graphics: None,
            fatal: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let mut graphics = Graphics::new(
            window.clone(),
            self.config.window.vsync,
            &self.skinning_shader,
            self.debug_line_shader,
        )?;
        graphics.upload_mesh(self.scene.mesh());
        self.scene.resize(graphics.width(), graphics.height());

        self.graphics = Some(graphics);
        self.window = Some(window);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Apply a keyboard command. Returns true if the frame changed.
    pub fn apply(&mut self, action: ViewerAction, event_loop: &ActiveEventLoop) -> bool {
        match action {
            ViewerAction::Quit => {
                tracing::info!("Escape pressed, exiting");
                event_loop.exit();
                false
            }
            other => self.apply_view_action(other),
        }
    }

    /// Commands that only affect what is drawn.
    fn apply_view_action(&mut self, action: ViewerAction) -> bool {
        match action {
            ViewerAction::CycleLeft => self.scene.cycle_left(),
            ViewerAction::CycleRight => self.scene.cycle_right(),
            ViewerAction::ToggleBones => {
                self.options.bones = !self.options.bones;
                tracing::debug!("Bones overlay: {}", self.options.bones);
            }
            ViewerAction::ToggleWireframe => {
                self.options.wireframe = !self.options.wireframe;
                tracing::debug!("Wireframe overlay: {}", self.options.wireframe);
            }
            ViewerAction::Quit => return false,
        }
        true
    }

    fn on_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(action) = ViewerAction::from_key(code) else {
            return;
        };
        if self.apply(action, event_loop) {
            self.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        let scene = &self.scene;
        self.lines.rebuild(
            self.options,
            scene.current_pose(),
            scene.palette(),
            scene.mesh(),
            || scene.skinned_vertices(),
        );

        match graphics.render(scene.uniforms(), &self.lines, self.config.render.clear_color) {
            FrameStatus::Presented | FrameStatus::Skipped => {}
            FrameStatus::Reconfigured => self.request_redraw(),
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn into_result(self) -> Result<()> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            tracing::error!("Failed to initialize window: {:#}", e);
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }
        tracing::info!("Blending {}", self.scene.describe());
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(size.width, size.height);
                    self.scene.resize(graphics.width(), graphics.height());
                }
                self.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(graphics) = &self.graphics else {
                    return;
                };
                if self.scene.pointer_moved(position.x, graphics.width() as f64) {
                    tracing::debug!("Blending {}", self.scene.describe());
                    self.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(&event, event_loop),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}

/// Run the viewer until the window closes.
pub fn run(mut app: ViewerApp) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with an error")?;
    app.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlendConfig;
    use skinning_core::reference;

    fn app() -> ViewerApp {
        let scene = Scene::new(
            reference::skeleton().unwrap(),
            reference::mesh().unwrap(),
            &BlendConfig::default(),
        )
        .unwrap();
        ViewerApp::new(
            ViewerConfig::default(),
            scene,
            skinning_core::skinning_shader(),
            skinning_core::debug_line_shader(),
        )
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(ViewerAction::from_key(KeyCode::KeyL), Some(ViewerAction::CycleLeft));
        assert_eq!(ViewerAction::from_key(KeyCode::KeyR), Some(ViewerAction::CycleRight));
        assert_eq!(ViewerAction::from_key(KeyCode::KeyB), Some(ViewerAction::ToggleBones));
        assert_eq!(ViewerAction::from_key(KeyCode::KeyW), Some(ViewerAction::ToggleWireframe));
        assert_eq!(ViewerAction::from_key(KeyCode::Escape), Some(ViewerAction::Quit));
        assert_eq!(ViewerAction::from_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_options_follow_config() {
        let app = app();
        assert!(app.options.bones);
        assert!(!app.options.wireframe);
    }

    #[test]
    fn test_toggles() {
        let mut app = app();
        assert!(app.apply_view_action(ViewerAction::ToggleWireframe));
        assert!(app.options.wireframe);
        assert!(app.apply_view_action(ViewerAction::ToggleBones));
        assert!(!app.options.bones);
    }

    #[test]
    fn test_cycle_left_changes_scene() {
        let mut app = app();
        let before = app.scene.driver().left();
        assert!(app.apply_view_action(ViewerAction::CycleLeft));
        assert_ne!(app.scene.driver().left(), before);
    }

    #[test]
    fn test_no_fatal_error_by_default() {
        assert!(app().into_result().is_ok());
    }
}
