//! Editing session: the single owner of the composition state.
//!
//! Every mutation is a discrete event; the presentation layer calls
//! [`EditorSession::preview`] after each one to re-render.
//!
//! [`EditorSession::begin_export`] snapshots the state and returns an owned
//! future that borrows nothing from the session. Edits keep flowing while a
//! save is in flight and never affect the bitmap being written; a second
//! export may start before the first one has answered.
//!
//! The "exporting" flag is cosmetic. It is raised when an export starts and
//! drops on its own after `export.indicator_seconds`, whether or not the
//! library has answered. Each library answer is queued for the alert
//! presenter, which takes every one exactly once via
//! [`EditorSession::take_result`].

use crate::background::find_background;
use crate::composition::{
    CompositionState, CornerStyle, LayoutError, clamp_corner_radius, clamp_image_scale,
};
use crate::config::StudioConfig;
use crate::export::{ExportError, ExportResult, export_and_save};
use crate::imaging::Renderer;
use crate::library::PhotoLibrary;
use crate::source::{ImageSource, decode_source};
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Unknown background: {0}")]
    UnknownBackground(String),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

pub struct EditorSession {
    config: StudioConfig,
    renderer: Renderer,
    state: CompositionState,
    export_started: Option<Instant>,
    results: Arc<Mutex<VecDeque<ExportResult>>>,
}

impl EditorSession {
    pub fn new(config: StudioConfig) -> Self {
        let renderer = Renderer::from_config(&config);
        let state = CompositionState::new(&config.composition);
        Self {
            config,
            renderer,
            state,
            export_started: None,
            results: Arc::default(),
        }
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn select_background(&mut self, key: &str) -> Result<(), SessionError> {
        let spec =
            find_background(key).ok_or_else(|| SessionError::UnknownBackground(key.to_string()))?;
        self.state.background = spec;
        Ok(())
    }

    pub fn set_corner_radius(&mut self, value: f64) {
        self.state.corner_radius = clamp_corner_radius(value, &self.config.composition);
    }

    pub fn set_image_scale(&mut self, value: f64) {
        self.state.image_scale = clamp_image_scale(value, &self.config.composition);
    }

    pub fn set_corner_style(&mut self, style: CornerStyle) {
        self.state.corner_style = style;
    }

    pub fn toggle_corner_style(&mut self) {
        self.state.corner_style = self.state.corner_style.toggled();
    }

    /// Replace the source image with decoded picker bytes.
    ///
    /// Returns `false` (state untouched) when the bytes are not an image.
    pub fn ingest_picked(&mut self, bytes: &[u8]) -> bool {
        match decode_source(bytes) {
            Some(img) => {
                log::debug!("source image {}x{}", img.width(), img.height());
                self.state.source_image = Some(Arc::new(img));
                true
            }
            None => false,
        }
    }

    /// Ask `source` for an image and ingest it. A cancelled pick is a no-op.
    pub async fn pick_from<S: ImageSource>(&mut self, source: &S) -> bool {
        match source.pick_image().await {
            Some(bytes) => self.ingest_picked(&bytes),
            None => false,
        }
    }

    /// Render the current state at the preview size.
    pub fn preview(&self) -> Result<RgbImage, LayoutError> {
        self.renderer
            .render(self.config.preview.canvas_size, &self.state)
    }

    /// Whether the export control should be enabled.
    pub fn can_export(&self) -> bool {
        self.state.has_source_image()
    }

    /// The cosmetic exporting indicator.
    pub fn is_exporting(&self) -> bool {
        let window = Duration::try_from_secs_f64(self.config.export.indicator_seconds)
            .unwrap_or(Duration::ZERO);
        self.export_started
            .is_some_and(|started| started.elapsed() < window)
    }

    /// Start exporting the current state to `library`.
    ///
    /// The precondition is checked and the state snapshotted immediately;
    /// the returned future renders, saves, and queues the outcome for
    /// [`take_result`](Self::take_result). It holds no borrow of the
    /// session, so it can be spawned or awaited alongside further edits.
    pub fn begin_export<L>(
        &mut self,
        library: Arc<L>,
    ) -> Result<
        impl Future<Output = Result<ExportResult, ExportError>> + Send + use<L>,
        SessionError,
    >
    where
        L: PhotoLibrary + Send + Sync + 'static,
    {
        if !self.can_export() {
            return Err(ExportError::MissingSourceImage.into());
        }
        self.export_started = Some(Instant::now());
        let snapshot = self.state.clone();
        let config = self.config.clone();
        let results = Arc::clone(&self.results);
        Ok(async move {
            let result = export_and_save(&snapshot, &config, library.as_ref()).await?;
            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(result);
            Ok(result)
        })
    }

    /// Hand the oldest unpresented export outcome to the alert presenter.
    pub fn take_result(&mut self) -> Option<ExportResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Slider label for the corner radius, e.g. `Corner Radius: 20`.
    pub fn corner_radius_label(&self) -> String {
        format!("Corner Radius: {}", self.state.corner_radius.trunc() as i64)
    }

    /// Slider label for the image scale, e.g. `Image Size: 80%`.
    pub fn image_scale_label(&self) -> String {
        format!(
            "Image Size: {}%",
            (self.state.image_scale * 100.0).trunc() as i64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::tests::MockLibrary;
    use crate::source::tests::MockSource;
    use crate::test_helpers::png_bytes;

    fn small_config() -> StudioConfig {
        let mut config = StudioConfig::default();
        config.preview.canvas_size = 64;
        config.export.canvas_size = 96;
        config
    }

    #[test]
    fn new_session_defaults() {
        let session = EditorSession::new(StudioConfig::default());
        assert_eq!(session.state().background.id, "gradient1");
        assert!(!session.can_export());
        assert!(!session.is_exporting());
        assert_eq!(session.corner_radius_label(), "Corner Radius: 0");
        assert_eq!(session.image_scale_label(), "Image Size: 80%");
    }

    #[test]
    fn setters_clamp_to_profile() {
        let mut session = EditorSession::new(StudioConfig::default());
        session.set_corner_radius(250.0);
        session.set_image_scale(0.05);
        assert_eq!(session.state().corner_radius, 100.0);
        assert_eq!(session.state().image_scale, 0.3);
        session.set_corner_radius(-1.0);
        session.set_image_scale(4.0);
        assert_eq!(session.state().corner_radius, 0.0);
        assert_eq!(session.state().image_scale, 1.0);
    }

    #[test]
    fn select_background_by_id() {
        let mut session = EditorSession::new(StudioConfig::default());
        session.select_background("solid4").unwrap();
        assert_eq!(session.state().background.name, "White");
        assert_eq!(
            session.select_background("tartan"),
            Err(SessionError::UnknownBackground("tartan".into()))
        );
        assert_eq!(session.state().background.name, "White");
    }

    #[test]
    fn toggle_style() {
        let mut session = EditorSession::new(StudioConfig::default());
        session.toggle_corner_style();
        assert_eq!(session.state().corner_style, CornerStyle::Smooth);
        session.toggle_corner_style();
        assert_eq!(session.state().corner_style, CornerStyle::Standard);
    }

    #[test]
    fn ingest_valid_bytes_sets_image() {
        let mut session = EditorSession::new(small_config());
        assert!(session.ingest_picked(&png_bytes(10, 20)));
        assert!(session.can_export());
    }

    #[test]
    fn ingest_garbage_keeps_previous_image() {
        let mut session = EditorSession::new(small_config());
        session.ingest_picked(&png_bytes(10, 20));
        assert!(!session.ingest_picked(b"garbage"));
        let img = session.state().source_image.as_ref().unwrap();
        assert_eq!((img.width(), img.height()), (10, 20));
    }

    #[tokio::test]
    async fn pick_cancelled_is_noop() {
        let mut session = EditorSession::new(small_config());
        let source = MockSource::returning(None);
        assert!(!session.pick_from(&source).await);
        assert!(!session.can_export());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn pick_success_sets_image() {
        let mut session = EditorSession::new(small_config());
        let source = MockSource::returning(Some(png_bytes(4, 4)));
        assert!(session.pick_from(&source).await);
        assert!(session.can_export());
    }

    #[test]
    fn preview_uses_preview_size() {
        let session = EditorSession::new(small_config());
        assert_eq!(session.preview().unwrap().dimensions(), (64, 64));
    }

    #[test]
    fn preview_rejects_oversized_canvas() {
        let mut config = small_config();
        config.preview.canvas_size = 4_000_000_000;
        let session = EditorSession::new(config);
        assert!(matches!(
            session.preview(),
            Err(LayoutError::InvalidArgument(_))
        ));
    }

    #[test]
    fn image_scale_label_truncates() {
        let mut session = EditorSession::new(StudioConfig::default());
        session.set_image_scale(0.555);
        assert_eq!(session.image_scale_label(), "Image Size: 55%");
        session.set_image_scale(0.999);
        assert_eq!(session.image_scale_label(), "Image Size: 99%");
    }

    #[tokio::test]
    async fn export_without_image_is_precondition_error() {
        let mut session = EditorSession::new(small_config());
        let library = Arc::new(MockLibrary::succeeding());
        let result = session.begin_export(Arc::clone(&library));
        assert!(matches!(
            result,
            Err(SessionError::Export(ExportError::MissingSourceImage))
        ));
        assert!(!session.is_exporting());
        assert!(library.saved().is_empty());
        assert!(session.take_result().is_none());
    }

    #[tokio::test]
    async fn export_records_result_once() {
        let mut session = EditorSession::new(small_config());
        session.ingest_picked(&png_bytes(10, 10));
        let library = Arc::new(MockLibrary::failing());

        let result = session
            .begin_export(Arc::clone(&library))
            .unwrap()
            .await
            .unwrap();
        assert!(!result.succeeded);
        assert_eq!(session.take_result(), Some(ExportResult { succeeded: false }));
        assert_eq!(session.take_result(), None);
        assert_eq!(library.saved()[0].width, 96);
    }

    #[tokio::test]
    async fn export_does_not_mutate_state() {
        let mut session = EditorSession::new(small_config());
        session.ingest_picked(&png_bytes(10, 10));
        session.set_corner_radius(12.0);
        let before = session.preview().unwrap();
        let library = Arc::new(MockLibrary::succeeding());
        session.begin_export(library).unwrap().await.unwrap();
        assert_eq!(session.preview().unwrap().as_raw(), before.as_raw());
        assert_eq!(session.state().corner_radius, 12.0);
    }

    #[tokio::test]
    async fn exporting_flag_is_time_based() {
        let library = Arc::new(MockLibrary::succeeding());

        let mut config = small_config();
        config.export.indicator_seconds = 60.0;
        let mut session = EditorSession::new(config);
        session.ingest_picked(&png_bytes(10, 10));
        let pending = session.begin_export(Arc::clone(&library)).unwrap();
        assert!(session.is_exporting());
        pending.await.unwrap();
        // still raised although the save already completed
        assert!(session.is_exporting());

        let mut config = small_config();
        config.export.indicator_seconds = 0.0;
        let mut session = EditorSession::new(config);
        session.ingest_picked(&png_bytes(10, 10));
        session.begin_export(library).unwrap().await.unwrap();
        assert!(!session.is_exporting());
    }

    /// Library whose saves wait until the test opens the gate.
    struct GatedLibrary {
        inner: MockLibrary,
        gate: tokio::sync::Semaphore,
    }

    impl GatedLibrary {
        fn closed() -> Self {
            Self {
                inner: MockLibrary::succeeding(),
                gate: tokio::sync::Semaphore::new(0),
            }
        }
    }

    impl PhotoLibrary for GatedLibrary {
        fn save(&self, bitmap: RgbImage) -> impl Future<Output = bool> + Send {
            async move {
                let _permit = self.gate.acquire().await;
                self.inner.save(bitmap).await
            }
        }
    }

    #[tokio::test]
    async fn edits_and_second_export_while_save_pending() {
        let mut session = EditorSession::new(small_config());
        session.ingest_picked(&png_bytes(10, 10));
        let library = Arc::new(GatedLibrary::closed());

        let first = tokio::spawn(session.begin_export(Arc::clone(&library)).unwrap());
        tokio::task::yield_now().await;
        assert!(!first.is_finished());
        assert!(library.inner.saved().is_empty());

        session.set_corner_radius(40.0);
        session.select_background("solid3").unwrap();
        session.toggle_corner_style();
        assert!(session.take_result().is_none());
        let second = tokio::spawn(session.begin_export(Arc::clone(&library)).unwrap());

        library.gate.add_permits(2);
        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert!(first.succeeded && second.succeeded);

        assert_eq!(session.take_result(), Some(ExportResult { succeeded: true }));
        assert_eq!(session.take_result(), Some(ExportResult { succeeded: true }));
        assert_eq!(session.take_result(), None);

        let saved = library.inner.saved();
        assert_eq!(saved.len(), 2);
        // each export rendered its own snapshot
        assert_ne!(saved[0].fingerprint, saved[1].fingerprint);
        assert_eq!(session.state().corner_radius, 40.0);
    }
}
