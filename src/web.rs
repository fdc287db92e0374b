//! Browser binding: canvas surfaces, `<img>` loading, and canvas text metrics.
//!
//! This is the only module that touches `web_sys`. Canvas calls that can
//! throw are logged at `warn` and skipped so one bad call never aborts a
//! frame.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement};

use crate::error::ResourceError;
use crate::geom::{Point, Rect};
use crate::resource::{FontSpec, ImageFuture, ImageHandle, ImageLoader, TextMeasure, TextSize};
use crate::surface::{FillStyle, Shadow, Surface};

fn check(op: &'static str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!(op, error = ?e, "canvas call failed");
    }
}

fn trace_path(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    ctx.begin_path();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        ctx.move_to(first.x, first.y);
    }
    for p in iter {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
}

impl Surface for CanvasRenderingContext2d {
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) {
        check("translate", CanvasRenderingContext2d::translate(self, x, y));
    }

    fn rotate(&mut self, radians: f64) {
        check("rotate", CanvasRenderingContext2d::rotate(self, radians));
    }

    fn scale(&mut self, x: f64, y: f64) {
        check("scale", CanvasRenderingContext2d::scale(self, x, y));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        CanvasRenderingContext2d::set_global_alpha(self, alpha);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dst: Rect) {
        let Some(element) = image.source::<HtmlImageElement>() else {
            tracing::warn!("image handle does not wrap an HtmlImageElement");
            return;
        };
        check(
            "draw_image",
            self.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                element, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            ),
        );
    }

    fn set_fill_style(&mut self, style: &FillStyle) {
        match style {
            FillStyle::Color(color) => self.set_fill_style_str(color),
            FillStyle::LinearGradient { start, end, stops } => {
                let gradient = self.create_linear_gradient(start.x, start.y, end.x, end.y);
                for stop in stops {
                    #[allow(clippy::cast_possible_truncation)]
                    let offset = stop.percent as f32;
                    check("add_color_stop", gradient.add_color_stop(offset, &stop.color));
                }
                self.set_fill_style_canvas_gradient(&gradient);
            }
        }
    }

    fn set_stroke_style(&mut self, color: &str, line_width: f64) {
        self.set_stroke_style_str(color);
        self.set_line_width(line_width);
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
        self.set_text_align("left");
        self.set_text_baseline("top");
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.set_shadow_color(&shadow.color);
        self.set_shadow_offset_x(shadow.offset_x);
        self.set_shadow_offset_y(shadow.offset_y);
        self.set_shadow_blur(shadow.blur);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        check("fill_text", CanvasRenderingContext2d::fill_text(self, text, x, y));
    }

    fn fill_path(&mut self, points: &[Point]) {
        trace_path(self, points);
        self.fill();
    }

    fn stroke_path(&mut self, points: &[Point]) {
        trace_path(self, points);
        self.stroke();
    }
}

/// Create a layer canvas inside `container`, stacked above earlier layers,
/// and return its 2D context. Suitable as a [`crate::stage::Stage::try_new`]
/// factory.
///
/// # Errors
///
/// Returns `Err` if the canvas cannot be created, styled, or attached, or if
/// it has no 2D context.
pub fn create_layer_context(
    document: &Document,
    container: &Element,
    width: f64,
    height: f64,
    index: usize,
) -> Result<CanvasRenderingContext2d, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }
    canvas.set_attribute("style", &format!("position:absolute;left:0;top:0;z-index:{index}"))?;
    container.append_child(&canvas)?;
    context_2d(&canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

// =============================================================
// Image loading
// =============================================================

/// Loads images through `HtmlImageElement`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlImageLoader;

impl ImageLoader for HtmlImageLoader {
    fn load(&self, src: &str) -> ImageFuture {
        load_image(src.to_owned()).boxed_local()
    }
}

type SettleTx = Rc<RefCell<Option<oneshot::Sender<bool>>>>;

/// An `<img>` with its load handlers attached. Dropping it detaches the
/// handlers, so a superseded load can never call into freed closures.
struct PendingImage {
    element: HtmlImageElement,
    on_load: Closure<dyn FnMut()>,
    on_error: Closure<dyn FnMut()>,
}

impl Drop for PendingImage {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}

fn settle_with(tx: SettleTx, loaded: bool) -> Closure<dyn FnMut()> {
    Closure::new(move || {
        if let Some(tx) = tx.borrow_mut().take()
            && tx.send(loaded).is_err()
        {
            tracing::debug!("image load abandoned before it settled");
        }
    })
}

async fn load_image(src: String) -> Result<ImageHandle, ResourceError> {
    let element = HtmlImageElement::new().map_err(|e| ResourceError::new(src.as_str(), format!("{e:?}")))?;
    let (tx, rx) = oneshot::channel();
    let tx: SettleTx = Rc::new(RefCell::new(Some(tx)));
    let pending = PendingImage {
        on_load: settle_with(Rc::clone(&tx), true),
        on_error: settle_with(tx, false),
        element,
    };
    pending.element.set_onload(Some(pending.on_load.as_ref().unchecked_ref()));
    pending.element.set_onerror(Some(pending.on_error.as_ref().unchecked_ref()));
    pending.element.set_src(&src);

    if !rx.await.unwrap_or(false) {
        return Err(ResourceError::new(src, "image failed to load"));
    }
    let element = pending.element.clone();
    Ok(ImageHandle::new(f64::from(element.natural_width()), f64::from(element.natural_height()), element))
}

// =============================================================
// Text metrics
// =============================================================

/// Measures text with a 2D context's `measureText`.
#[derive(Debug, Clone)]
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasure {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Measure with a detached canvas created in `document`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas or its 2D context cannot be created.
    pub fn detached(document: &Document) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        Ok(Self::new(context_2d(&canvas)?))
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> TextSize {
        self.ctx.save();
        self.ctx.set_font(&font.css());
        let size = match self.ctx.measure_text(text) {
            Ok(metrics) => TextSize {
                width: metrics.width(),
                height: metrics.font_bounding_box_ascent() + metrics.font_bounding_box_descent(),
            },
            Err(e) => {
                tracing::warn!(error = ?e, "measureText failed");
                TextSize::default()
            }
        };
        self.ctx.restore();
        size
    }
}
