//! The editing session: image, captions, style and drag state.
//!
//! A [`MemeSession`] is created when the editor starts, cleared with
//! [`MemeSession::reset`], and dropped when the editor goes away. Every
//! mutation that changes what is visible redraws the surface before returning.

use crate::config::{EditorConfig, StyleConfig};
use crate::drag::{Cursor, DragController, DragState};
use crate::error::{MemeError, Result};
use crate::export;
use crate::geometry::{to_surface_coords, DisplayRect, Point};
use crate::hit_test::hit_test_text;
use crate::layer::{LayerId, TextLayer};
use crate::render::{render, Scene};
use crate::surface::{ImageSource, Surface};
use std::path::Path;
use tracing::{debug, info, warn};

/// Proof that an image load was started. Redeemed once by
/// [`MemeSession::complete_load`] or [`MemeSession::load_failed`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A pointer event as delivered by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Viewport position in CSS pixels.
    pub client: Point,
    /// The surface's on-screen box at the time of the event.
    pub display: DisplayRect,
}

impl PointerEvent {
    pub fn new(client: Point, display: DisplayRect) -> Self {
        Self { client, display }
    }
}

/// What the caller should reflect after a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerOutcome {
    /// New affordance, or `None` to leave it as is.
    pub cursor: Option<Cursor>,
    /// Whether the surface was redrawn.
    pub redrawn: bool,
}

impl PointerOutcome {
    fn cursor(cursor: Cursor) -> Self {
        Self {
            cursor: Some(cursor),
            redrawn: false,
        }
    }
}

/// Single-writer editor state.
pub struct MemeSession<I> {
    config: EditorConfig,
    image: Option<I>,
    top: TextLayer,
    bottom: TextLayer,
    style: StyleConfig,
    drag: DragController,
    load_generation: u64,
    pending_load: Option<u64>,
}

impl<I: ImageSource> Default for MemeSession<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ImageSource> MemeSession<I> {
    /// Create a session with default settings.
    pub fn new() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }

    /// Create a session with the given configuration.
    pub fn with_config(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        let style = config.default_style.clone();
        Self {
            config,
            image: None,
            top: TextLayer::default(),
            bottom: TextLayer::default(),
            style,
            drag: DragController::new(),
            load_generation: 0,
            pending_load: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn layer(&self, id: LayerId) -> &TextLayer {
        match id {
            LayerId::Top => &self.top,
            LayerId::Bottom => &self.bottom,
        }
    }

    fn layer_mut(&mut self, id: LayerId) -> &mut TextLayer {
        match id {
            LayerId::Top => &mut self.top,
            LayerId::Bottom => &mut self.bottom,
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Borrowed view for the renderer.
    pub fn scene(&self) -> Scene<'_, I> {
        Scene {
            image: self.image.as_ref(),
            top: &self.top,
            bottom: &self.bottom,
            style: &self.style,
            margin_divisor: self.config.edge_margin_divisor,
        }
    }

    /// Where a caption is drawn right now. `None` without an image.
    pub fn resolved_position(&self, id: LayerId) -> Option<Point> {
        self.scene().resolved_position(id)
    }

    /// Redraw the surface from the current state.
    pub fn render<S: Surface<Image = I>>(&self, surface: &mut S) -> Result<()> {
        render(surface, &self.scene())
    }

    // ----- Image loading -----

    /// Start loading a new image.
    ///
    /// The current image is dropped right away, so rendering is a clear until
    /// the returned ticket completes. Tickets from earlier calls go stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.pending_load = Some(self.load_generation);
        self.image = None;
        self.top.position = None;
        self.bottom.position = None;
        self.drag.end();
        debug!("Image load {} started", self.load_generation);
        LoadTicket(self.load_generation)
    }

    /// Install a decoded image if `ticket` is the latest load.
    ///
    /// Both captions move to their default positions for the new image and
    /// the surface is redrawn. Returns `false` for a stale ticket.
    pub fn complete_load<S: Surface<Image = I>>(
        &mut self,
        surface: &mut S,
        ticket: LoadTicket,
        image: I,
    ) -> Result<bool> {
        if self.pending_load != Some(ticket.0) {
            debug!(
                "Ignoring stale image load {} (pending: {:?})",
                ticket.0, self.pending_load
            );
            return Ok(false);
        }
        self.pending_load = None;

        let (width, height) = (image.width(), image.height());
        let divisor = self.config.edge_margin_divisor;
        self.top.position = Some(LayerId::Top.default_position(width, height, divisor));
        self.bottom.position = Some(LayerId::Bottom.default_position(width, height, divisor));
        self.image = Some(image);
        self.drag.end();

        self.render(surface)?;
        info!("Image loaded. Surface size: {}x{}", width, height);
        debug!(
            "Initial caption positions: top={:?} bottom={:?}",
            self.top.position, self.bottom.position
        );
        Ok(true)
    }

    /// Record that the load behind `ticket` failed. The session stays without an image.
    pub fn load_failed(&mut self, ticket: LoadTicket, reason: &str) -> bool {
        if self.pending_load != Some(ticket.0) {
            debug!("Ignoring failure of stale image load {}", ticket.0);
            return false;
        }
        self.pending_load = None;
        warn!("Image load {} failed: {}", ticket.0, reason);
        true
    }

    /// Install an already decoded image.
    pub fn load_image<S: Surface<Image = I>>(&mut self, surface: &mut S, image: I) -> Result<()> {
        let ticket = self.begin_load();
        self.complete_load(surface, ticket, image)?;
        Ok(())
    }

    // ----- Text and style edits -----

    /// Replace a caption's text and redraw.
    pub fn set_text<S: Surface<Image = I>>(
        &mut self,
        surface: &mut S,
        id: LayerId,
        text: impl Into<String>,
    ) -> Result<()> {
        self.layer_mut(id).content = text.into();
        self.render(surface)
    }

    /// Replace the style and redraw. Invalid styles are rejected untouched.
    pub fn set_style<S: Surface<Image = I>>(
        &mut self,
        surface: &mut S,
        style: StyleConfig,
    ) -> Result<()> {
        style.validate()?;
        self.style = style;
        self.render(surface)
    }

    /// Derive a new style from the current one and apply it.
    pub fn update_style<S, F>(&mut self, surface: &mut S, update: F) -> Result<()>
    where
        S: Surface<Image = I>,
        F: FnOnce(StyleConfig) -> StyleConfig,
    {
        let style = update(self.style.clone());
        self.set_style(surface, style)
    }

    // ----- Pointer interaction -----

    /// The caption under `pointer` (surface coordinates), top first.
    pub fn layer_at<S: Surface<Image = I>>(
        &self,
        surface: &S,
        pointer: Point,
    ) -> Result<Option<LayerId>> {
        if self.image.is_none() {
            return Ok(None);
        }
        let font = self.style.font();
        for id in LayerId::ALL {
            let Some(at) = self.resolved_position(id) else {
                continue;
            };
            let hit = hit_test_text(
                surface,
                pointer,
                &self.layer(id).content,
                at,
                &font,
                id.anchor(),
                self.config.hit_padding,
            )?;
            if hit {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn surface_point<S: Surface<Image = I>>(&self, surface: &S, event: &PointerEvent) -> Point {
        to_surface_coords(event.client, event.display, surface.width(), surface.height())
    }

    /// Start dragging the caption under the pointer, if any.
    pub fn pointer_down<S: Surface<Image = I>>(
        &mut self,
        surface: &mut S,
        event: PointerEvent,
    ) -> Result<PointerOutcome> {
        if self.image.is_none() {
            return Ok(PointerOutcome::default());
        }
        let pointer = self.surface_point(surface, &event);
        debug!("Pointer down at ({:.2}, {:.2})", pointer.x, pointer.y);

        let hit = self.layer_at(surface, pointer)?;
        let cursor = match hit.and_then(|id| Some((id, self.resolved_position(id)?))) {
            Some((id, at)) => {
                debug!("Dragging {} text started", id);
                self.drag.begin(id, pointer, at)
            }
            None => {
                debug!("No text clicked");
                self.drag.miss()
            }
        };
        Ok(PointerOutcome::cursor(cursor))
    }

    /// Move the dragged caption, or update the hover affordance when idle.
    pub fn pointer_move<S: Surface<Image = I>>(
        &mut self,
        surface: &mut S,
        event: PointerEvent,
    ) -> Result<PointerOutcome> {
        if self.image.is_none() {
            return Ok(PointerOutcome::default());
        }
        let pointer = self.surface_point(surface, &event);

        if let Some((id, position)) = self.drag.drag_to(pointer) {
            self.layer_mut(id).position = Some(position);
            self.render(surface)?;
            return Ok(PointerOutcome {
                cursor: None,
                redrawn: true,
            });
        }

        let cursor = if self.layer_at(surface, pointer)?.is_some() {
            Cursor::Grab
        } else {
            Cursor::Default
        };
        Ok(PointerOutcome::cursor(cursor))
    }

    /// Finish any drag.
    pub fn pointer_up(&mut self) -> PointerOutcome {
        if let Some(id) = self.drag.end() {
            debug!("Dragging {} text stopped", id);
        }
        PointerOutcome::cursor(Cursor::Default)
    }

    /// The pointer left the surface; abandon any drag where it stands.
    pub fn pointer_leave(&mut self) -> PointerOutcome {
        if let Some(id) = self.drag.end() {
            debug!("Pointer left surface while dragging {} text. Dragging stopped", id);
        }
        PointerOutcome::cursor(Cursor::Default)
    }

    // ----- Lifecycle -----

    /// Return to a blank session: no image, empty captions, default style,
    /// unset positions, no drag, 0x0 surface. In-flight loads go stale.
    pub fn reset<S: Surface<Image = I>>(&mut self, surface: &mut S) -> Result<()> {
        self.image = None;
        self.top.clear();
        self.bottom.clear();
        self.style = self.config.default_style.clone();
        self.drag.end();
        self.load_generation += 1;
        self.pending_load = None;

        surface.resize(0, 0)?;
        surface.clear()?;
        info!("Meme reset.");
        Ok(())
    }

    /// Encode the surface as PNG at the configured compression.
    /// Fails with [`MemeError::NoImage`] before an image loads.
    pub fn export_png<S: Surface<Image = I>>(&self, surface: &S) -> Result<Vec<u8>> {
        if self.image.is_none() {
            return Err(MemeError::NoImage);
        }
        export::export_png(surface, self.config.export.png_compression)
    }

    /// Export and write to `path`.
    pub fn save_png<S: Surface<Image = I>>(
        &self,
        surface: &S,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        if self.image.is_none() {
            return Err(MemeError::NoImage);
        }
        export::save_png(surface, path, self.config.export.png_compression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ImageAsset;
    use crate::surface::{DrawCommand, RecordingSurface};

    type Session = MemeSession<ImageAsset>;

    fn display_1x() -> DisplayRect {
        DisplayRect::new(0.0, 0.0, 400.0, 500.0)
    }

    fn at(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(Point::new(x, y), display_1x())
    }

    fn loaded() -> (Session, RecordingSurface) {
        let mut session = Session::new();
        let mut surface = RecordingSurface::new();
        session
            .load_image(&mut surface, ImageAsset::blank(400, 500))
            .unwrap();
        (session, surface)
    }

    #[test]
    fn test_positions_unset_until_load() {
        let session = Session::new();
        assert_eq!(session.layer(LayerId::Top).position, None);
        assert_eq!(session.resolved_position(LayerId::Top), None);
    }

    #[test]
    fn test_load_sets_defaults_and_renders() {
        let (session, surface) = loaded();
        assert_eq!(session.layer(LayerId::Top).position, Some(Point::new(200.0, 20.0)));
        assert_eq!(
            session.layer(LayerId::Bottom).position,
            Some(Point::new(200.0, 480.0))
        );
        assert_eq!(
            surface.commands()[0],
            DrawCommand::Resize {
                width: 400,
                height: 500
            }
        );
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut session = Session::new();
        let mut surface = RecordingSurface::new();
        let first = session.begin_load();
        let second = session.begin_load();

        let applied = session
            .complete_load(&mut surface, first, ImageAsset::blank(10, 10))
            .unwrap();
        assert!(!applied);
        assert!(!session.has_image());

        let applied = session
            .complete_load(&mut surface, second, ImageAsset::blank(20, 30))
            .unwrap();
        assert!(applied);
        assert_eq!(session.image().map(|i| i.width()), Some(20));
    }

    #[test]
    fn test_reset_invalidates_pending_load() {
        let mut session = Session::new();
        let mut surface = RecordingSurface::new();
        let ticket = session.begin_load();
        session.reset(&mut surface).unwrap();
        let applied = session
            .complete_load(&mut surface, ticket, ImageAsset::blank(10, 10))
            .unwrap();
        assert!(!applied);
    }

    #[test]
    fn test_load_failure_keeps_no_image() {
        let mut session = Session::new();
        let ticket = session.begin_load();
        assert!(session.load_failed(ticket, "corrupt data"));
        assert!(!session.has_image());
    }

    #[test]
    fn test_begin_load_drops_current_image() {
        let (mut session, mut surface) = loaded();
        let _ticket = session.begin_load();
        assert!(!session.has_image());
        session.render(&mut surface).unwrap();
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_pointer_down_without_image_is_noop() {
        let mut session = Session::new();
        let mut surface = RecordingSurface::new();
        let outcome = session.pointer_down(&mut surface, at(0.0, 0.0)).unwrap();
        assert_eq!(outcome, PointerOutcome::default());
        assert!(!session.drag_state().is_dragging());
    }

    #[test]
    fn test_drag_top_caption() {
        let (mut session, mut surface) = loaded();
        session.set_text(&mut surface, LayerId::Top, "A").unwrap();

        // "A" at 40px: 24 wide centered on 200, 40 tall hanging from y=20.
        let down = session.pointer_down(&mut surface, at(200.0, 30.0)).unwrap();
        assert_eq!(down.cursor, Some(Cursor::Grabbing));
        assert_eq!(session.drag_state().layer(), Some(LayerId::Top));

        let moved = session.pointer_move(&mut surface, at(250.0, 130.0)).unwrap();
        assert!(moved.redrawn);
        assert_eq!(moved.cursor, None);
        assert_eq!(
            session.layer(LayerId::Top).position,
            Some(Point::new(250.0, 120.0))
        );

        let up = session.pointer_up();
        assert_eq!(up.cursor, Some(Cursor::Default));
        assert!(!session.drag_state().is_dragging());
    }

    #[test]
    fn test_hover_sets_grab_without_moving() {
        let (mut session, mut surface) = loaded();
        session.set_text(&mut surface, LayerId::Bottom, "B").unwrap();

        let over = session.pointer_move(&mut surface, at(200.0, 470.0)).unwrap();
        assert_eq!(over.cursor, Some(Cursor::Grab));
        assert!(!over.redrawn);

        let away = session.pointer_move(&mut surface, at(20.0, 250.0)).unwrap();
        assert_eq!(away.cursor, Some(Cursor::Default));
        assert_eq!(
            session.layer(LayerId::Bottom).position,
            Some(Point::new(200.0, 480.0))
        );
    }

    #[test]
    fn test_miss_resets_cursor_and_drag() {
        let (mut session, mut surface) = loaded();
        session.set_text(&mut surface, LayerId::Top, "A").unwrap();
        session.pointer_down(&mut surface, at(200.0, 30.0)).unwrap();
        let miss = session.pointer_down(&mut surface, at(10.0, 250.0)).unwrap();
        assert_eq!(miss.cursor, Some(Cursor::Default));
        assert!(!session.drag_state().is_dragging());
    }

    #[test]
    fn test_leave_ends_drag_at_last_position() {
        let (mut session, mut surface) = loaded();
        session.set_text(&mut surface, LayerId::Top, "A").unwrap();
        session.pointer_down(&mut surface, at(200.0, 30.0)).unwrap();
        session.pointer_move(&mut surface, at(210.0, 40.0)).unwrap();
        let left = session.pointer_leave();
        assert_eq!(left.cursor, Some(Cursor::Default));

        // Further moves only hover.
        let after = session.pointer_move(&mut surface, at(300.0, 300.0)).unwrap();
        assert!(!after.redrawn);
        assert_eq!(
            session.layer(LayerId::Top).position,
            Some(Point::new(210.0, 30.0))
        );
    }

    #[test]
    fn test_invalid_style_rejected() {
        let (mut session, mut surface) = loaded();
        let result = session.update_style(&mut surface, |s| s.font_size(0));
        assert!(matches!(result, Err(MemeError::InvalidConfig(_))));
        assert_eq!(session.style().font_size, 40);
    }

    #[test]
    fn test_export_requires_image() {
        let session = Session::new();
        let surface = RecordingSurface::new();
        assert!(matches!(session.export_png(&surface), Err(MemeError::NoImage)));
    }

    #[test]
    fn test_with_config_validates() {
        assert!(Session::with_config(EditorConfig::default().hit_padding(-3.0)).is_err());
        let session = Session::with_config(EditorConfig::default().hit_padding(0.0)).unwrap();
        assert_eq!(session.config().hit_padding, 0.0);
    }
}
