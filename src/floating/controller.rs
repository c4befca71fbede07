//! Floating window controller: detach, z-order, and the drag protocol.

use super::drag::DragSession;
use super::window::{FloatingWindow, FloatingWindowId, bounded_max_size, clamp_position};
use super::{ContainerSource, CursorStyle, FloatingSettings, HostContainers};
use crate::geometry::{Point, Size};
use crate::tab::TabId;

/// Owns every floating window of one panel.
///
/// Window order in `windows` is the z-order: the last window is on top.
/// At most one drag session is open at a time.
#[derive(Debug)]
pub struct FloatingWindowController {
    settings: FloatingSettings,
    /// Last container report from the host
    containers: HostContainers,
    container_bounds: Size,
    container_source: ContainerSource,
    windows: Vec<FloatingWindow>,
    next_window_id: FloatingWindowId,
    drag: Option<DragSession>,
    /// Full-viewport overlay shielding other widgets during a drag
    overlay_active: bool,
    cursor: CursorStyle,
}

impl FloatingWindowController {
    pub fn new(settings: FloatingSettings, containers: HostContainers) -> Self {
        let (container_bounds, container_source) = containers.resolve(settings.default_container);
        Self {
            settings,
            containers,
            container_bounds,
            container_source,
            windows: Vec::new(),
            next_window_id: 1,
            drag: None,
            overlay_active: false,
            cursor: CursorStyle::Default,
        }
    }

    pub fn settings(&self) -> &FloatingSettings {
        &self.settings
    }

    pub fn container_bounds(&self) -> Size {
        self.container_bounds
    }

    pub fn container_source(&self) -> ContainerSource {
        self.container_source
    }

    /// Windows in z-order, bottom first
    pub fn windows(&self) -> &[FloatingWindow] {
        &self.windows
    }

    pub fn window(&self, id: FloatingWindowId) -> Option<&FloatingWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_for_tab(&self, tab: TabId) -> Option<&FloatingWindow> {
        self.windows.iter().find(|w| w.tab == tab)
    }

    pub fn top_window(&self) -> Option<&FloatingWindow> {
        self.windows.last()
    }

    /// Position of a window in the z-order (0 = bottom)
    pub fn z_index(&self, id: FloatingWindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_overlay_active(&self) -> bool {
        self.overlay_active
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Re-read container bounds after the host resized or re-laid out.
    ///
    /// Windows that no longer fit are pulled back inside and every window's
    /// max size is recomputed for the new bounds.
    pub fn update_containers(&mut self, containers: HostContainers) {
        self.containers = containers;
        self.refresh_container();

        let container = self.container_bounds;
        let gap = self.settings.gap;
        for window in &mut self.windows {
            window.position = clamp_position(window.position, window.rendered_size(), container, gap);
            window.max_size = bounded_max_size(window.position, container, gap);
        }
    }

    fn refresh_container(&mut self) {
        let (bounds, source) = self.containers.resolve(self.settings.default_container);
        self.container_bounds = bounds;
        self.container_source = source;
    }

    /// Detach a tab's content into a floating window.
    ///
    /// The window is placed next to `origin` (the panel's on-screen position),
    /// staggered by the number of windows already open, and its max size is
    /// bounded so it cannot initially extend past the container. A tab that
    /// already has a window gets that window raised instead.
    pub fn detach(
        &mut self,
        tab: TabId,
        title: impl Into<String>,
        origin: Point,
        requested_size: Size,
    ) -> FloatingWindowId {
        if let Some(existing) = self.window_for_tab(tab).map(|w| w.id) {
            log::debug!("Tab {} already detached, raising window {}", tab, existing);
            self.raise(existing);
            return existing;
        }

        self.refresh_container();

        let open = self.windows.len() as f64;
        let position = Point::new(
            origin.x + self.settings.origin_inset + open * self.settings.stagger,
            self.settings.initial_top + open * self.settings.stagger,
        );
        let max_size = bounded_max_size(position, self.container_bounds, self.settings.gap);

        let id = self.next_window_id;
        self.next_window_id += 1;
        self.windows.push(FloatingWindow {
            id,
            tab,
            title: title.into(),
            position,
            requested_size,
            max_size,
        });

        log::info!(
            "Detached tab {} into floating window {} at ({}, {})",
            tab,
            id,
            position.x,
            position.y
        );
        id
    }

    /// Move a window to the top of the z-order
    pub fn raise(&mut self, id: FloatingWindowId) -> bool {
        let Some(idx) = self.z_index(id) else {
            return false;
        };
        let window = self.windows.remove(idx);
        self.windows.push(window);
        true
    }

    /// Set the size the window's content asks for
    pub fn resize_window(&mut self, id: FloatingWindowId, requested_size: Size) -> bool {
        match self.windows.iter_mut().find(|w| w.id == id) {
            Some(window) => {
                window.requested_size = requested_size;
                true
            }
            None => false,
        }
    }

    /// Keep a window's header in sync with its tab label
    pub fn set_title(&mut self, tab: TabId, title: &str) {
        if let Some(window) = self.windows.iter_mut().find(|w| w.tab == tab) {
            window.title = title.to_string();
        }
    }

    /// Pointer-down on a window header: raise it and open a drag session
    pub fn pointer_down(&mut self, id: FloatingWindowId, pointer: Point) -> bool {
        if self.drag.is_some() {
            self.end_drag();
        }
        if !self.raise(id) {
            log::debug!("pointer_down on unknown floating window {}", id);
            return false;
        }
        let Some(start) = self.window(id).map(|w| w.position) else {
            return false;
        };

        self.drag = Some(DragSession::new(id, pointer, start));
        self.overlay_active = true;
        self.cursor = CursorStyle::Move;
        log::trace!("Drag started on window {} at ({}, {})", id, pointer.x, pointer.y);
        true
    }

    /// Pointer-move anywhere in the viewport.
    ///
    /// Returns the window's new position, or `None` when no drag is open.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let session = self.drag.as_mut()?;
        let delta = session.advance(pointer);
        let id = session.window;

        let container = self.container_bounds;
        let gap = self.settings.gap;
        let Some(idx) = self.z_index(id) else {
            self.end_drag();
            return None;
        };
        let window = &mut self.windows[idx];

        // Clamp against what is on screen: a window already narrowed by its
        // max size must not jump when the drag starts.
        let size = window.rendered_size();
        let unclamped = window.position.offset_by(delta);
        let position = clamp_position(unclamped, size, container, gap);
        window.position = position;

        // Resizing must not cross the container edge either, except when the
        // window already sits on it.
        let max_x = container.width - size.width - gap;
        let max_y = container.height - size.height - gap;
        let bounds = bounded_max_size(position, container, gap);
        if position.x != max_x {
            window.max_size.width = bounds.width;
        }
        if position.y != max_y {
            window.max_size.height = bounds.height;
        }

        Some(position)
    }

    /// Pointer-up, wherever it lands
    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    pub fn pointer_cancel(&mut self) {
        self.end_drag();
    }

    /// The host window lost focus mid-drag
    pub fn focus_lost(&mut self) {
        self.end_drag();
    }

    /// Drop the overlay, restore the cursor, and close the drag session.
    /// Safe to call when no drag is open.
    pub fn end_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            log::trace!("Drag ended on window {}", session.window);
        }
        self.overlay_active = false;
        self.cursor = CursorStyle::Default;
    }

    /// Close a window
    pub fn close_window(&mut self, id: FloatingWindowId) -> Option<FloatingWindow> {
        let idx = self.z_index(id)?;
        if self.drag.is_some_and(|d| d.window == id) {
            self.end_drag();
        }
        let window = self.windows.remove(idx);
        log::info!("Closed floating window {} (tab {})", id, window.tab);
        Some(window)
    }

    /// Close the window showing a tab, if any
    pub fn close_for_tab(&mut self, tab: TabId) -> bool {
        match self.window_for_tab(tab).map(|w| w.id) {
            Some(id) => self.close_window(id).is_some(),
            None => false,
        }
    }
}
