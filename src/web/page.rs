//! Server-side HTML rendering.

use crate::catalog;
use crate::constants::{accuracy, page};
use crate::error::{Error, Result};
use crate::web::view::{Notice, NoticeLevel, PageState, ResultView};
use minijinja::Environment;
use serde::Serialize;

const TEMPLATE_NAME: &str = "index.html";
const TEMPLATE: &str = include_str!("../../templates/index.html");

#[derive(Debug, Serialize)]
struct PageContext {
    title: &'static str,
    subtitle: &'static str,
    about: &'static str,
    show_confidence_label: &'static str,
    show_confidence: bool,
    species: Vec<&'static str>,
    accepted_types: &'static str,
    idle_prompt: &'static str,
    disclaimer: &'static str,
    notice: Option<NoticeContext>,
    result: Option<ResultContext>,
}

#[derive(Debug, Serialize)]
struct NoticeContext {
    level: &'static str,
    message: &'static str,
}

impl From<&Notice> for NoticeContext {
    fn from(notice: &Notice) -> Self {
        Self {
            level: match notice.level {
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            },
            message: notice.message,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResultContext {
    image_uri: String,
    preview_width: u32,
    species: &'static str,
    confidence: Option<BarContext>,
    description: &'static str,
    chart: String,
}

#[derive(Debug, Serialize)]
struct BarContext {
    label: String,
    width: String,
}

impl ResultContext {
    fn new(view: &ResultView) -> Result<Self> {
        let labels: Vec<&str> = catalog::names().collect();
        Ok(Self {
            image_uri: view.image.data_uri(),
            preview_width: page::PREVIEW_WIDTH_PX,
            species: view.species,
            confidence: view.confidence.map(|bar| BarContext {
                label: bar.label(),
                width: bar.label(),
            }),
            description: view.description,
            chart: view.accuracy.render_svg(&labels)?,
        })
    }
}

/// Render the full page for a state.
///
/// `show_confidence` sets the initial state of the sidebar checkbox.
pub fn render(state: &PageState, show_confidence: bool) -> Result<String> {
    let (notice, result) = match state {
        PageState::Idle { notice } => (notice.as_ref().map(NoticeContext::from), None),
        PageState::Result(view) => (None, Some(ResultContext::new(view)?)),
    };
    let context = PageContext {
        title: page::TITLE,
        subtitle: page::SUBTITLE,
        about: page::ABOUT,
        show_confidence_label: page::SHOW_CONFIDENCE_LABEL,
        show_confidence,
        species: catalog::names().collect(),
        accepted_types: page::ACCEPTED_TYPES,
        idle_prompt: page::IDLE_PROMPT,
        disclaimer: accuracy::DISCLAIMER,
        notice,
        result,
    };

    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| template_error(&e))?;
    env.get_template(TEMPLATE_NAME)
        .and_then(|template| template.render(&context))
        .map_err(|e| template_error(&e))
}

fn template_error(e: &minijinja::Error) -> Error {
    Error::Render {
        what: "page",
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::PredictionResult;
    use crate::web::view::ImagePreview;
    use image::ImageFormat;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn result_state(class_index: usize, confidence: f32, show: bool) -> PageState {
        let mut rng = StdRng::seed_from_u64(11);
        let prediction = PredictionResult {
            class_index,
            confidence,
        };
        let image = ImagePreview::new(b"png-bytes", ImageFormat::Png);
        PageState::Result(Box::new(ResultView::new(
            image,
            &prediction,
            show,
            &mut rng,
        )))
    }

    #[test]
    fn test_idle_page_prompts_for_upload() {
        let html = render(&PageState::idle(), true).expect("render");
        assert!(html.contains(page::IDLE_PROMPT));
        assert!(!html.contains("Resultado del análisis"));
        assert!(!html.contains("<svg"));
        assert!(html.contains("name=\"image\""));
        assert!(html.contains(" checked"));
    }

    #[test]
    fn test_sidebar_lists_every_species() {
        let html = render(&PageState::idle(), false).expect("render");
        for name in catalog::names() {
            assert!(html.contains(&format!("<li>{name}</li>")));
        }
        assert!(html.contains("las siguientes 10 especies"));
        assert!(!html.contains(" checked"));
    }

    #[test]
    fn test_sidebar_has_about_text_and_toggle_label() {
        let html = render(&PageState::idle(), true).expect("render");
        assert!(html.contains("<h2>Acerca de</h2>"));
        assert!(html.contains("clasificar imágenes de aves en 10 categorías diferentes"));
        assert!(html.contains("Mostrar barra de confianza"));
    }

    #[test]
    fn test_rejected_upload_shows_notice_and_prompt() {
        let state = PageState::rejected(Notice::unsupported_image());
        let html = render(&state, true).expect("render");
        assert!(html.contains("notice warning"));
        assert!(html.contains(page::UNSUPPORTED_IMAGE));
        assert!(html.contains(page::IDLE_PROMPT));
    }

    #[test]
    fn test_result_page_with_confidence() {
        let html = render(&result_state(9, 0.88, true), true).expect("render");
        assert!(html.contains("PAVITO MIGRATORIO"));
        assert!(html.contains("<strong>88.00%</strong>"));
        assert!(html.contains("style=\"width: 88.00%\""));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("width=\"350\""));
        assert!(html.contains("Precisión estimada por clase"));
        assert!(html.contains(accuracy::DISCLAIMER));
        assert!(!html.contains(page::IDLE_PROMPT));
    }

    #[test]
    fn test_result_page_without_confidence() {
        let html = render(&result_state(0, 0.5, false), false).expect("render");
        assert!(html.contains("CHIPE CELESTE"));
        assert!(!html.contains("Nivel de confianza"));
        assert!(!html.contains("confidence-bar\" style"));
    }

    #[test]
    fn test_template_escapes_text() {
        let notice = Notice {
            level: NoticeLevel::Error,
            message: "<script>alert(1)</script>",
        };
        let html = render(&PageState::rejected(notice), true).expect("render");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
