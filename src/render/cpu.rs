use crate::foundation::core::{Affine, BezPath, Point, Rect, Viewport};
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::math::StableHasher;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::display_list::{DisplayList, DrawCmd, Paint};
use crate::theme::color::Color;
use kurbo::Shape;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

const DEFAULT_GRADIENT_CACHE: usize = 16;
const STROKE_TOLERANCE: f64 = 0.25;

/// Options for the CPU backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuBackendOpts {
    /// Gradient images kept between frames.
    pub gradient_cache_capacity: usize,
    /// If set, the surface is cleared to this colour before drawing.
    pub clear: Option<Color>,
}

impl Default for CpuBackendOpts {
    fn default() -> Self {
        Self {
            gradient_cache_capacity: DEFAULT_GRADIENT_CACHE,
            clear: None,
        }
    }
}

/// Raster backend powered by `vello_cpu`.
///
/// Gradients are rasterized into pixmaps over the device-space bounds of the shape that uses
/// them and painted as images. Strokes are expanded into fills with `kurbo::stroke`.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    ctx: Option<vello_cpu::RenderContext>,
    gradient_cache: HashMap<u64, vello_cpu::Image>,
    gradient_lru: VecDeque<u64>,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendOpts::default())
    }
}

impl CpuBackend {
    /// Create a backend.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self {
            opts,
            ctx: None,
            gradient_cache: HashMap::new(),
            gradient_lru: VecDeque::new(),
        }
    }

    /// Gradient images currently cached.
    pub fn cached_gradients(&self) -> usize {
        self.gradient_cache.len()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> SceneResult<R>,
    ) -> SceneResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn draw_cmd(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        cmd: &DrawCmd,
        scale: Affine,
        surface: Rect,
        layers: &mut u32,
    ) -> SceneResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match cmd {
            DrawCmd::Clear(color) => {
                ctx.set_paint(solid(*color));
                ctx.fill_rect(&rect_to_cpu(surface));
            }
            DrawCmd::FillRect { rect, paint } => {
                let device = scale.transform_rect_bbox(*rect);
                if self.apply_paint(ctx, paint, scale, device, surface)? {
                    ctx.fill_rect(&rect_to_cpu(device));
                }
            }
            DrawCmd::FillPath { path, paint } => {
                let mut device = path.clone();
                device.apply_affine(scale);
                if self.apply_paint(ctx, paint, scale, device.bounding_box(), surface)? {
                    ctx.fill_path(&bezpath_to_cpu(&device));
                }
            }
            DrawCmd::StrokePath { path, width, paint } => {
                let mut device = path.clone();
                device.apply_affine(scale);
                let style = kurbo::Stroke::new(width * scale_factor(scale))
                    .with_caps(kurbo::Cap::Round)
                    .with_join(kurbo::Join::Round);
                let outline = kurbo::stroke(
                    device.iter(),
                    &style,
                    &kurbo::StrokeOpts::default(),
                    STROKE_TOLERANCE,
                );
                if outline.elements().is_empty() {
                    return Ok(());
                }
                if self.apply_paint(ctx, paint, scale, outline.bounding_box(), surface)? {
                    ctx.fill_path(&bezpath_to_cpu(&outline));
                }
            }
            DrawCmd::PushOpacity(opacity) => {
                ctx.push_opacity_layer(*opacity);
                *layers += 1;
            }
            DrawCmd::PopLayer => {
                if *layers > 0 {
                    ctx.pop_layer();
                    *layers -= 1;
                }
            }
        }
        Ok(())
    }

    /// Set the context paint. Returns `false` when the shape is entirely off-surface.
    fn apply_paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        paint: &Paint,
        scale: Affine,
        bbox: Rect,
        surface: Rect,
    ) -> SceneResult<bool> {
        let visible = bbox.intersect(surface);
        if visible.width() <= 0.0 || visible.height() <= 0.0 {
            return Ok(false);
        }
        if let Paint::Solid(color) = paint {
            ctx.set_paint(solid(*color));
            return Ok(true);
        }

        let x0 = visible.x0.floor();
        let y0 = visible.y0.floor();
        let w = (visible.x1.ceil() - x0).max(1.0) as u32;
        let h = (visible.y1.ceil() - y0).max(1.0) as u32;
        let image = self.gradient_paint(paint, scale, Point::new(x0, y0), w, h)?;
        ctx.set_paint(image);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::translate((x0, y0)));
        Ok(true)
    }

    fn gradient_paint(
        &mut self,
        paint: &Paint,
        scale: Affine,
        origin: Point,
        w: u32,
        h: u32,
    ) -> SceneResult<vello_cpu::Image> {
        let key = gradient_key(paint, scale, origin, w, h);
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            self.touch(key);
            return Ok(img);
        }

        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        match paint {
            Paint::Solid(_) => {}
            Paint::Linear { start, end, .. } => {
                let s = scale * *start;
                let e = scale * *end;
                let d = e - s;
                let len2 = d.hypot2();
                for y in 0..h {
                    for x in 0..w {
                        let p = Point::new(
                            origin.x + f64::from(x) + 0.5,
                            origin.y + f64::from(y) + 0.5,
                        );
                        let t = if len2 <= f64::EPSILON {
                            0.0
                        } else {
                            (p - s).dot(d) / len2
                        };
                        write_px(&mut bytes, w, x, y, paint.sample(t));
                    }
                }
            }
            Paint::Radial { center, radius, .. } => {
                let c = scale * *center;
                let r = radius * scale_factor(scale);
                for y in 0..h {
                    for x in 0..w {
                        let p = Point::new(
                            origin.x + f64::from(x) + 0.5,
                            origin.y + f64::from(y) + 0.5,
                        );
                        let t = if r <= f64::EPSILON { 1.0 } else { (p - c).hypot() / r };
                        write_px(&mut bytes, w, x, y, paint.sample(t));
                    }
                }
            }
        }

        let pixmap = pixmap_from_premul_bytes(&bytes, w, h)?;
        let img = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        if self.opts.gradient_cache_capacity > 0 {
            self.gradient_cache.insert(key, img.clone());
            self.touch(key);
            while self.gradient_lru.len() > self.opts.gradient_cache_capacity {
                if let Some(old) = self.gradient_lru.pop_front() {
                    self.gradient_cache.remove(&old);
                }
            }
        }
        Ok(img)
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.gradient_lru.iter().position(|k| *k == key) {
            self.gradient_lru.remove(pos);
        }
        self.gradient_lru.push_back(key);
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip(self, list), fields(cmds = list.len()), level = "trace")]
    fn render(&mut self, list: &DisplayList, viewport: &Viewport) -> SceneResult<FrameRGBA> {
        let (width, height) = viewport.pixel_size()?;
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| SceneError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| SceneError::render("surface height exceeds u16"))?;

        let scale = Affine::scale(viewport.device_pixel_ratio);
        let surface = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        let clear = self.opts.clear;

        self.with_ctx_mut(width_u16, height_u16, |this, ctx| {
            let mut layers = 0u32;
            if let Some(color) = clear {
                this.draw_cmd(ctx, &DrawCmd::Clear(color), scale, surface, &mut layers)?;
            }
            for cmd in list.commands() {
                this.draw_cmd(ctx, cmd, scale, surface, &mut layers)?;
            }
            while layers > 0 {
                ctx.pop_layer();
                layers -= 1;
            }

            let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(FrameRGBA {
                width,
                height,
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            })
        })
    }

    fn release_surface(&mut self) {
        self.ctx = None;
        self.gradient_cache.clear();
        self.gradient_lru.clear();
    }
}

fn solid(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn scale_factor(a: Affine) -> f64 {
    let [sx, _, _, sy, _, _] = a.as_coeffs();
    (sx.abs() * sy.abs()).sqrt()
}

fn write_px(bytes: &mut [u8], w: u32, x: u32, y: u32, c: Color) {
    let p = c.to_premul();
    let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
    if let Some(px) = bytes.get_mut(idx..idx + 4) {
        px.copy_from_slice(&[p.r, p.g, p.b, p.a]);
    }
}

fn gradient_key(paint: &Paint, scale: Affine, origin: Point, w: u32, h: u32) -> u64 {
    let mut hasher = StableHasher::new();
    for v in scale.as_coeffs() {
        hasher.write_f64(v);
    }
    hasher.write_f64(origin.x);
    hasher.write_f64(origin.y);
    hasher.write_u32(w);
    hasher.write_u32(h);
    let stops = match paint {
        Paint::Solid(_) => return hasher.finish_u64(),
        Paint::Linear { start, end, stops } => {
            hasher.write_u8(1);
            for v in [start.x, start.y, end.x, end.y] {
                hasher.write_f64(v);
            }
            stops
        }
        Paint::Radial {
            center,
            radius,
            stops,
        } => {
            hasher.write_u8(2);
            for v in [center.x, center.y, *radius] {
                hasher.write_f64(v);
            }
            stops
        }
    };
    for s in stops {
        hasher.write_f64(s.offset);
        hasher.write_bytes(&[s.color.r, s.color.g, s.color.b, s.color.a]);
    }
    hasher.finish_u64()
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SceneResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SceneError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SceneError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SceneError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
