/// ASCII line rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use pinhole_core::{Color, Frame};
use std::io::Write;

/// Character luminosity ramp for line coverage (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Coverage that would land on the blank end of the ramp
const MIN_COVERAGE: f32 = 0.5 / (LUMINOSITY_RAMP.len() - 1) as f32;

/// Renderer that rasterizes anti-aliased lines into terminal cells
///
/// Cells keep the layer of the shape that last wrote them. A higher layer
/// always wins a cell; within one layer the stronger coverage wins.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    background: Color,
    coverage: Vec<f32>,
    colors: Vec<Color>,
    layers: Vec<usize>,
    glyphs: Vec<Option<(char, Color)>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            background,
            coverage: vec![0.0; size],
            colors: vec![background; size],
            layers: vec![0; size],
            glyphs: vec![None; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.background);
    }

    pub fn clear(&mut self) {
        self.coverage.fill(0.0);
        self.colors.fill(self.background);
        self.layers.fill(0);
        self.glyphs.fill(None);
    }

    /// Coverage and colour of a cell, if any line touched it
    pub fn cell(&self, x: usize, y: usize) -> Option<(f32, Color)> {
        let idx = y * self.width + x;
        (self.layers[idx] > 0).then(|| (self.coverage[idx], self.colors[idx]))
    }

    /// Draw every segment of `frame`, mapping a `screen_width` x `screen_height`
    /// pixel screen onto the cell grid
    pub fn render_frame(&mut self, frame: &Frame, screen_width: f64, screen_height: f64) {
        let (cols, rows) = (self.width as f64, self.height as f64);
        // cell centres sit at integer coordinates
        let to_cell = |p: &Point2<f64>| {
            Point2::new(p.x * cols / screen_width - 0.5, p.y * rows / screen_height - 0.5)
        };

        for segment in &frame.segments {
            self.draw_line(
                to_cell(&segment.from),
                to_cell(&segment.to),
                segment.color,
                segment.layer,
            );
        }
    }

    /// Xiaolin Wu's anti-aliased line between two points in cell coordinates
    pub fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Color, layer: usize) {
        // Clip to screen bounds
        let Some((from, to)) = self.clip_to_grid(from, to) else {
            return;
        };
        let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, to.x, to.y);

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let gradient = if dx == 0.0 { 1.0 } else { (y1 - y0) / dx };

        let mut plot = |x: f64, y: f64, c: f64| {
            let (px, py) = if steep { (y, x) } else { (x, y) };
            self.plot(px, py, c as f32, color, layer);
        };

        // first endpoint
        let xend = x0.round();
        let yend = y0 + gradient * (xend - x0);
        let xgap = rfpart(x0 + 0.5);
        let xpxl1 = xend;
        plot(xpxl1, yend.floor(), rfpart(yend) * xgap);
        plot(xpxl1, yend.floor() + 1.0, fpart(yend) * xgap);
        let mut intery = yend + gradient;

        // second endpoint
        let xend = x1.round();
        let yend = y1 + gradient * (xend - x1);
        let xgap = fpart(x1 + 0.5);
        let xpxl2 = xend;
        plot(xpxl2, yend.floor(), rfpart(yend) * xgap);
        plot(xpxl2, yend.floor() + 1.0, fpart(yend) * xgap);

        let mut x = xpxl1 + 1.0;
        while x < xpxl2 {
            plot(x, intery.floor(), rfpart(intery));
            plot(x, intery.floor() + 1.0, fpart(intery));
            intery += gradient;
            x += 1.0;
        }
    }

    /// Liang-Barsky clip of a segment to the cell grid plus a one-cell margin
    ///
    /// The margin keeps the anti-aliased fringe of lines that run along the
    /// border. Returns `None` when nothing of the segment is left.
    fn clip_to_grid(&self, from: Point2<f64>, to: Point2<f64>) -> Option<(Point2<f64>, Point2<f64>)> {
        let d = to - from;
        if !(from.x.is_finite() && from.y.is_finite() && d.x.is_finite() && d.y.is_finite()) {
            return None;
        }

        let (min_x, min_y) = (-1.0, -1.0);
        let (max_x, max_y) = (self.width as f64, self.height as f64);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for (p, q) in [
            (-d.x, from.x - min_x),
            (d.x, max_x - from.x),
            (-d.y, from.y - min_y),
            (d.y, max_y - from.y),
        ] {
            if p == 0.0 {
                // parallel to this edge and outside it
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((from + d * t0, from + d * t1))
    }

    fn plot(&mut self, x: f64, y: f64, coverage: f32, color: Color, layer: usize) {
        if coverage < MIN_COVERAGE
            || x < 0.0
            || y < 0.0
            || x >= self.width as f64
            || y >= self.height as f64
        {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        let rank = layer + 1;
        if rank > self.layers[idx] || (rank == self.layers[idx] && coverage > self.coverage[idx]) {
            self.layers[idx] = rank;
            self.coverage[idx] = coverage.min(1.0);
            self.colors[idx] = color;
        }
    }

    /// Overlay a crosshair of `size` pixels at the screen centre
    pub fn draw_crosshair(&mut self, size: f64, screen_width: f64, screen_height: f64, color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let cx = self.width / 2;
        let cy = self.height / 2;
        let half_x = ((size / 2.0) * self.width as f64 / screen_width).round().max(1.0) as usize;
        let half_y = ((size / 2.0) * self.height as f64 / screen_height).round() as usize;

        for x in cx.saturating_sub(half_x)..=(cx + half_x).min(self.width - 1) {
            self.glyphs[cy * self.width + x] = Some(('-', color));
        }
        for y in cy.saturating_sub(half_y)..=(cy + half_y).min(self.height - 1) {
            self.glyphs[y * self.width + cx] = Some(('|', color));
        }
        self.glyphs[cy * self.width + cx] = Some(('+', color));
    }

    /// Character and colour a cell is printed with
    pub fn glyph(&self, x: usize, y: usize) -> (char, Color) {
        let idx = y * self.width + x;
        if let Some(glyph) = self.glyphs[idx] {
            return glyph;
        }
        if self.layers[idx] == 0 {
            return (' ', self.background);
        }

        let c = self.coverage[idx];
        let char_index = (c * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        (LUMINOSITY_RAMP[char_index], blend(self.background, self.colors[idx], c))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_term(self.background)))?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let (c, color) = self.glyph(x, y);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(to_term(color)))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

pub fn to_term(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Mix `fg` over `bg` by `t` in [0, 1]
fn blend(bg: Color, fg: Color, t: f32) -> Color {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::rgb(mix(bg.r, fg.r), mix(bg.g, fg.g), mix(bg.b, fg.b))
}

fn fpart(x: f64) -> f64 {
    x - x.floor()
}

fn rfpart(x: f64) -> f64 {
    1.0 - fpart(x)
}
