/// ASCII rasterizer implementing the GPU layer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use orbview_core::{GpuBackend, GpuError, Mesh, Transform, Uniforms, ViewRect, Vertex};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Pixel rows per terminal row. Cells are about twice as tall as they are
/// wide, so rendering at double vertical resolution keeps shapes square.
pub const CELL_ASPECT: usize = 2;

/// Software GPU over a character buffer.
///
/// Pixel rows count from the top. orbview viewports always span the full
/// canvas height, so this matches the bottom-up GL convention.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    viewport: ViewRect,
    scissor: Option<ViewRect>,
    depth_test: bool,
}

impl AsciiRenderer {
    /// Renderer for a terminal of `columns` x `rows` cells
    pub fn new(columns: usize, rows: usize) -> Self {
        let width = columns.max(1);
        let height = rows.max(1) * CELL_ASPECT;
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![1.0; size],
            char_buffer: vec![' '; size],
            viewport: ViewRect::new(0, 0, width as u32, height as u32),
            scissor: None,
            depth_test: false,
        }
    }

    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// Rectangle writes are confined to: viewport, scissor, and buffer bounds
    fn write_bounds(&self, rect: ViewRect) -> (usize, usize, usize, usize) {
        let mut x0 = rect.x as usize;
        let mut y0 = rect.y as usize;
        let mut x1 = (rect.x + rect.width) as usize;
        let mut y1 = (rect.y + rect.height) as usize;
        if let Some(scissor) = self.scissor {
            x0 = x0.max(scissor.x as usize);
            y0 = y0.max(scissor.y as usize);
            x1 = x1.min((scissor.x + scissor.width) as usize);
            y1 = y1.min((scissor.y + scissor.height) as usize);
        }
        (x0, y0, x1.min(self.width), y1.min(self.height))
    }

    /// Project to pixel coordinates plus depth in [0, 1]
    fn project(&self, mvp: &Matrix4<f32>, point: &Point3<f32>) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let vp = self.viewport;
        let x = vp.x as f32 + (ndc.x + 1.0) * 0.5 * vp.width as f32;
        let y = vp.y as f32 + (1.0 - ndc.y) * 0.5 * vp.height as f32;
        Some((x, y, (ndc.z + 1.0) * 0.5))
    }

    fn render_triangle(&mut self, triangle: [&Vertex; 3], mvp: &Matrix4<f32>, uniforms: &Uniforms) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(triangle) {
            match self.project(mvp, &vertex.position) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        // Lambert shading against the material light, in world space
        let material = &uniforms.material;
        let world = uniforms.model.transform_point(&triangle[0].position);
        let normal = uniforms.model.transform_vector(&triangle[0].normal).normalize();
        let light_dir = (material.light_position - world).normalize();
        let ambient = material.ambient.iter().sum::<f32>() / 3.0;
        let brightness = (ambient + normal.dot(&light_dir).max(0.0)).min(1.0);

        // Map brightness to character, never the blank used for clears
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        self.rasterize_triangle(&screen_coords, LUMINOSITY_RAMP[char_index]);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);
        let (clip_x0, clip_y0, clip_x1, clip_y1) = self.write_bounds(self.viewport);

        // Bounding box, clipped to the writable region
        let min_x = (v0.0.min(v1.0).min(v2.0).floor().max(0.0) as usize).max(clip_x0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil().max(0.0) as usize).min(clip_x1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor().max(0.0) as usize).max(clip_y0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil().max(0.0) as usize).min(clip_y1);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates, accepting either winding
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                    || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if !inside {
                    continue;
                }

                // Interpolate depth
                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y * self.width + x;
                if !self.depth_test || depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    /// Write the buffer to the terminal, one text row per `CELL_ASPECT` pixel rows
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height / CELL_ASPECT {
            writer.queue(MoveTo(0, row as u16))?;
            for x in 0..self.width {
                // Keep the densest of the pixels folded into this cell
                let c = (0..CELL_ASPECT)
                    .map(|sub| self.char_at(x, row * CELL_ASPECT + sub))
                    .max_by_key(|c| ramp_index(*c))
                    .unwrap_or(' ');

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl GpuBackend for AsciiRenderer {
    type Buffers = Mesh;

    fn upload(&mut self, mesh: &Mesh) -> Result<Mesh, GpuError> {
        Ok(mesh.clone())
    }

    fn release(&mut self, _buffers: Mesh) {}

    fn set_viewport(&mut self, rect: ViewRect) {
        self.viewport = rect;
    }

    fn enable_scissor(&mut self, rect: ViewRect) {
        self.scissor = Some(rect);
    }

    fn disable_scissor(&mut self) {
        self.scissor = None;
    }

    fn clear(&mut self, _color: [f32; 4], depth: f32) {
        let full = ViewRect::new(0, 0, self.width as u32, self.height as u32);
        let (x0, y0, x1, y1) = self.write_bounds(full);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = y * self.width + x;
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = ' ';
            }
        }
    }

    fn enable_depth_test(&mut self) {
        self.depth_test = true;
    }

    fn draw(&mut self, mesh: &Mesh, uniforms: &Uniforms) {
        let mvp = Transform::mvp_matrix(&uniforms.model, &uniforms.view, &uniforms.projection);
        for triangle in mesh.triangles() {
            self.render_triangle(triangle, &mvp, uniforms);
        }
    }
}

fn ramp_index(c: char) -> usize {
    LUMINOSITY_RAMP.iter().position(|&r| r == c).unwrap_or(0)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbview_core::{projection, ViewId, ViewLayout, ViewerConfig};

    fn filled(renderer: &AsciiRenderer, x0: usize, x1: usize) -> usize {
        let (_, height) = renderer.pixel_size();
        (0..height as usize)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != ' ')
            .count()
    }

    fn draw_cube(renderer: &mut AsciiRenderer, layout: &ViewLayout, view: ViewId) {
        let config = ViewerConfig::default();
        let rect = layout.rect(view);
        let uniforms = Uniforms {
            projection: layout.projection(view).matrix,
            view: projection::eye_view(0.0, &config),
            model: Transform::translation_matrix(0.0, 0.0, -4.0),
            ..Uniforms::new(config.material, Matrix4::identity())
        };
        renderer.set_viewport(rect);
        renderer.enable_scissor(rect);
        renderer.clear([0.0; 4], 1.0);
        renderer.enable_depth_test();
        renderer.draw(&Mesh::cube(2.0), &uniforms);
        renderer.disable_scissor();
    }

    #[test]
    fn test_cube_draws_inside_its_half_only() {
        let mut renderer = AsciiRenderer::new(80, 20);
        let (width, height) = renderer.pixel_size();
        let layout = ViewLayout::compute(width, height, &ViewerConfig::default());

        draw_cube(&mut renderer, &layout, ViewId::Left);
        assert!(filled(&renderer, 0, 40) > 0);
        assert_eq!(filled(&renderer, 40, 80), 0);
    }

    #[test]
    fn test_scissored_clear_keeps_other_half() {
        let mut renderer = AsciiRenderer::new(80, 20);
        let (width, height) = renderer.pixel_size();
        let layout = ViewLayout::compute(width, height, &ViewerConfig::default());

        draw_cube(&mut renderer, &layout, ViewId::Left);
        let left = filled(&renderer, 0, 40);
        draw_cube(&mut renderer, &layout, ViewId::Right);
        assert_eq!(filled(&renderer, 0, 40), left);
        assert!(filled(&renderer, 40, 80) > 0);
    }

    #[test]
    fn test_unscissored_clear_wipes_everything() {
        let mut renderer = AsciiRenderer::new(40, 10);
        let (width, height) = renderer.pixel_size();
        let layout = ViewLayout::compute(width, height, &ViewerConfig::default());
        draw_cube(&mut renderer, &layout, ViewId::Normal);
        assert!(filled(&renderer, 0, 40) > 0);

        renderer.clear([0.0; 4], 1.0);
        assert_eq!(filled(&renderer, 0, 40), 0);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_pixel_size_doubles_rows() {
        assert_eq!(AsciiRenderer::new(80, 24).pixel_size(), (80, 48));
    }
}
