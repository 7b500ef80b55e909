use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use qr_engine::{AppliedOptions, EngineError, QrRenderer, RenderConfig};
use qr_engine::config::{DotStyle, QrSize};
use rewrite_client::RewriteClient;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;

/// Fixed delay before each render so the page gets a visible busy state.
const FEEDBACK_DELAY: Duration = Duration::from_millis(400);

/// Application shared state accessible from all request handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    app_config: AppConfig,
    /// Editable render configuration
    config: RwLock<RenderConfig>,
    /// Renderer singleton, created lazily by the first generate.
    /// The lock also serializes overlapping generate calls.
    renderer: Mutex<Option<QrRenderer>>,
    /// Number of in-flight generate calls
    generating: AtomicU32,
    /// Rewrite client, absent when no API key is configured
    rewriter: Option<RewriteClient>,
    /// Unix timestamp of the last completed generate
    last_generated_at: RwLock<Option<i64>>,
}

/// Partial configuration update from the page. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigPatch {
    pub content: Option<String>,
    pub size: Option<QrSize>,
    pub dot_color: Option<String>,
    pub dot_style: Option<DotStyle>,
    pub logo: Option<String>,
}

/// Result of a completed generate call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub width: u32,
    pub height: u32,
    pub generated_at: i64,
}

impl SharedState {
    pub fn new(app_config: AppConfig) -> Self {
        let rewriter = match RewriteClient::new(app_config.api_key.clone()) {
            Ok(client) => Some(client.with_model(app_config.rewrite_model.clone())),
            Err(e) => {
                tracing::warn!("Rewrite client unavailable: {e}");
                None
            }
        };

        Self {
            inner: Arc::new(SharedStateInner {
                app_config,
                config: RwLock::new(RenderConfig::default()),
                renderer: Mutex::new(None),
                generating: AtomicU32::new(0),
                rewriter,
                last_generated_at: RwLock::new(None),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.app_config.server_port
    }

    pub fn is_generating(&self) -> bool {
        self.inner.generating.load(Ordering::SeqCst) > 0
    }

    pub fn rewriter(&self) -> Option<&RewriteClient> {
        self.inner.rewriter.as_ref()
    }

    /// Get a read lock on the editable configuration.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, RenderConfig> {
        self.inner.config.read().await
    }

    /// Apply a partial configuration update. Has no effect on the current output.
    pub async fn apply_config(&self, patch: ConfigPatch) {
        let mut config = self.inner.config.write().await;
        if let Some(content) = patch.content {
            config.content = content;
        }
        if let Some(size) = patch.size {
            config.size = size;
        }
        if let Some(color) = patch.dot_color {
            config.dot_color = color;
        }
        if let Some(style) = patch.dot_style {
            config.dot_style = style;
        }
        if let Some(logo) = patch.logo {
            config.logo = Some(logo);
        }
    }

    /// Clear the logo.
    pub async fn clear_logo(&self) {
        self.inner.config.write().await.logo = None;
    }

    /// Run a generate from the current configuration.
    ///
    /// Returns `Ok(None)` without touching the renderer when the content is
    /// empty or whitespace. Overlapping calls serialize on the renderer lock;
    /// each one applies the configuration current at its render time.
    pub async fn generate(&self) -> Result<Option<GenerateOutcome>, EngineError> {
        let config = self.inner.config.read().await.clone();
        if config.content.trim().is_empty() {
            return Ok(None);
        }

        self.inner.generating.fetch_add(1, Ordering::SeqCst);
        let result = self.render(&config).await;
        self.inner.generating.fetch_sub(1, Ordering::SeqCst);
        result.map(Some)
    }

    async fn render(&self, config: &RenderConfig) -> Result<GenerateOutcome, EngineError> {
        tokio::time::sleep(FEEDBACK_DELAY).await;

        let mut guard = self.inner.renderer.lock().await;
        let renderer = guard.get_or_insert_with(QrRenderer::new);
        renderer.update(config)?;

        let generated_at = chrono::Utc::now().timestamp();
        *self.inner.last_generated_at.write().await = Some(generated_at);

        let size = config.size.pixels();
        tracing::info!(size, "QR render complete");
        Ok(GenerateOutcome {
            width: size,
            height: size,
            generated_at,
        })
    }

    /// PNG bytes of the current render. `None` before the first generate.
    pub async fn render_png(&self) -> Option<Result<Vec<u8>, EngineError>> {
        let guard = self.inner.renderer.lock().await;
        let renderer = guard.as_ref()?;
        renderer.output()?;
        Some(renderer.to_png())
    }

    /// Options applied by the last completed render.
    pub async fn last_applied(&self) -> Option<AppliedOptions> {
        self.inner
            .renderer
            .lock()
            .await
            .as_ref()
            .and_then(|r| r.last_applied().cloned())
    }

    pub async fn last_generated_at(&self) -> Option<i64> {
        *self.inner.last_generated_at.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_engine::config::CornerStyle;

    fn state() -> SharedState {
        SharedState::new(AppConfig::default())
    }

    fn patch(content: &str) -> ConfigPatch {
        ConfigPatch {
            content: Some(content.into()),
            ..ConfigPatch::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn generate_applies_trimmed_content() {
        let state = state();
        state.apply_config(patch("  https://example.com  ")).await;

        let outcome = state.generate().await.unwrap();
        assert!(outcome.is_some());
        assert_eq!(
            state.last_applied().await.unwrap().data,
            "https://example.com"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn generate_with_empty_content_is_a_noop() {
        let state = state();
        state.apply_config(patch("   \n\t ")).await;

        let outcome = state.generate().await.unwrap();
        assert!(outcome.is_none());
        assert!(!state.is_generating());
        assert!(state.last_applied().await.is_none());
        assert!(state.render_png().await.is_none());
        assert!(state.last_generated_at().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn size_change_applies_to_the_next_generate() {
        let state = state();
        state
            .apply_config(ConfigPatch {
                content: Some("https://example.com".into()),
                size: Some(QrSize::Medium),
                ..ConfigPatch::default()
            })
            .await;
        state.generate().await.unwrap();
        assert_eq!(state.last_applied().await.unwrap().width, 300);

        state
            .apply_config(ConfigPatch {
                size: Some(QrSize::Small),
                ..ConfigPatch::default()
            })
            .await;
        state.generate().await.unwrap();

        let applied = state.last_applied().await.unwrap();
        assert_eq!(applied.width, 200);
        assert_eq!(applied.height, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn rewritten_handle_flows_through_to_the_render() {
        let state = state();
        state.apply_config(patch("@username")).await;

        // The page replaces the content with the rewrite result, then generates.
        state.apply_config(patch("https://x.com/username")).await;
        state.generate().await.unwrap();

        assert_eq!(
            state.last_applied().await.unwrap().data,
            "https://x.com/username"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn logo_is_applied_then_cleared() {
        use base64::Engine as _;

        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([10, 200, 10, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );

        let state = state();
        state
            .apply_config(ConfigPatch {
                content: Some("https://example.com".into()),
                logo: Some(uri.clone()),
                ..ConfigPatch::default()
            })
            .await;
        state.generate().await.unwrap();
        assert_eq!(state.last_applied().await.unwrap().image.as_deref(), Some(uri.as_str()));

        state.clear_logo().await;
        state.generate().await.unwrap();
        assert!(state.last_applied().await.unwrap().image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_clears_the_busy_flag_and_keeps_the_output() {
        let state = state();
        state.apply_config(patch("https://example.com")).await;
        state.generate().await.unwrap();

        state
            .apply_config(ConfigPatch {
                dot_color: Some("not-a-color".into()),
                ..ConfigPatch::default()
            })
            .await;
        assert!(state.generate().await.is_err());
        assert!(!state.is_generating());
        assert_eq!(
            state.last_applied().await.unwrap().data,
            "https://example.com"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn corner_coupling_is_visible_from_the_applied_options() {
        let state = state();
        state
            .apply_config(ConfigPatch {
                content: Some("test".into()),
                dot_style: Some(DotStyle::Square),
                ..ConfigPatch::default()
            })
            .await;
        state.generate().await.unwrap();
        assert_eq!(
            state.last_applied().await.unwrap().corners_square_type,
            CornerStyle::Square
        );
    }

    #[tokio::test(start_paused = true)]
    async fn patch_leaves_unmentioned_fields_intact() {
        let state = state();
        state
            .apply_config(ConfigPatch {
                content: Some("hello".into()),
                dot_color: Some("#10b981".into()),
                ..ConfigPatch::default()
            })
            .await;
        state
            .apply_config(ConfigPatch {
                size: Some(QrSize::Large),
                ..ConfigPatch::default()
            })
            .await;

        let config = state.config().await;
        assert_eq!(config.content, "hello");
        assert_eq!(config.dot_color, "#10b981");
        assert_eq!(config.size, QrSize::Large);
    }

    #[test]
    fn missing_api_key_disables_the_rewriter() {
        let state = SharedState::new(AppConfig::default());
        assert!(state.rewriter().is_none());

        let with_key = SharedState::new(AppConfig {
            api_key: "key".into(),
            ..AppConfig::default()
        });
        assert!(with_key.rewriter().is_some());
    }
}
