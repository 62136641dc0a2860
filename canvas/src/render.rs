//! Rendering: draws a planned [`Scene`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only scene and camera and produces pixels; it does not
//! mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::Camera;
use crate::consts::{POINTER_DOT_COLOR, SELECTION_RECT_COLOR, SHADOW_BLUR, SHADOW_COLOR, STUB_LABEL_FONT};
use crate::geometry::{Arrow, Rect};
use crate::scene::{Glyph, Scene};

/// Draw one frame.
///
/// Resizing the backing store to the element's layout size also resets the
/// context transform, so the camera transform is applied fresh every frame.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    image: Option<&HtmlImageElement>,
    camera: &Camera,
    scene: &Scene,
) -> Result<(), JsValue> {
    let width = u32::try_from(canvas.client_width()).unwrap_or(0);
    let height = u32::try_from(canvas.client_height()).unwrap_or(0);
    canvas.set_width(width);
    canvas.set_height(height);

    ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    if let Some(image) = image {
        ctx.draw_image_with_html_image_element(image, 0.0, 0.0)?;
    }

    if let Some(dot) = scene.pointer_dot {
        ctx.set_fill_style_str(POINTER_DOT_COLOR);
        ctx.fill_rect(dot.x, dot.y, 1.0, 1.0);
    }

    if let Some(rect) = scene.selection_rect {
        ctx.set_stroke_style_str(SELECTION_RECT_COLOR);
        stroke_rect(ctx, &rect);
    }

    for edge in &scene.edges {
        draw_arrow(ctx, &edge.arrow, edge.color());
    }

    for stub in &scene.stubs {
        draw_arrow(ctx, &stub.arrow, stub.color());
        ctx.set_font(STUB_LABEL_FONT);
        ctx.set_text_align("right");
        ctx.set_text_baseline("bottom");
        ctx.fill_text(&stub.label, stub.arrow.from.x, stub.arrow.from.y)?;
    }

    for glyph in &scene.glyphs {
        draw_glyph(ctx, glyph);
    }

    Ok(())
}

fn stroke_rect(ctx: &CanvasRenderingContext2d, rect: &Rect) {
    ctx.stroke_rect(rect.min.x, rect.min.y, rect.width(), rect.height());
}

/// Shaft and filled head in one color.
fn draw_arrow(ctx: &CanvasRenderingContext2d, arrow: &Arrow, color: &str) {
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);

    ctx.begin_path();
    ctx.move_to(arrow.from.x, arrow.from.y);
    ctx.line_to(arrow.end.x, arrow.end.y);
    ctx.stroke();

    let [tip, left, right] = arrow.head;
    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(left.x, left.y);
    ctx.line_to(right.x, right.y);
    ctx.close_path();
    ctx.fill();
}

/// Filled square with a drop shadow, then an unshadowed outline.
fn draw_glyph(ctx: &CanvasRenderingContext2d, glyph: &Glyph) {
    let b = glyph.bounds;
    ctx.set_shadow_color(SHADOW_COLOR);
    ctx.set_shadow_blur(SHADOW_BLUR);
    ctx.set_fill_style_str(glyph.state.fill());
    ctx.fill_rect(b.min.x, b.min.y, b.width(), b.height());

    ctx.set_shadow_blur(0.0);
    ctx.set_stroke_style_str(glyph.outline());
    stroke_rect(ctx, &b);
}
