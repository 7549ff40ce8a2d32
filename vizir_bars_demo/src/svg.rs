// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump utilities for `vizir_bars_demo`.

use kurbo::{Point, Rect, Shape};
use peniko::Color;
use vizir_bars::{BarShape, LabelPainter, LabelStyle, TextAlign, TextBaseline};

/// One painted text run.
#[derive(Clone, Debug)]
struct TextItem {
    text: String,
    pos: Point,
    font_size: f64,
    align: TextAlign,
    baseline: TextBaseline,
    fill: Color,
}

#[derive(Debug)]
enum Item {
    Rect { rect: Rect, fill: Color },
    Bar {
        path: String,
        fill: Color,
        stroke: Option<Color>,
    },
    Text(TextItem),
}

/// Collects bars, overlays and text in paint order and serializes them.
#[derive(Debug)]
pub(crate) struct SvgScene {
    items: Vec<Item>,
    view_box: Rect,
    label_fill: Color,
}

impl SvgScene {
    pub(crate) fn new(view_box: Rect, label_fill: Color) -> Self {
        Self {
            items: Vec::new(),
            view_box,
            label_fill,
        }
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, fill: Color) {
        self.items.push(Item::Rect { rect, fill });
    }

    /// Adds a bar; per-datapoint overrides win over `series_fill`.
    pub(crate) fn bar(&mut self, bar: &BarShape, series_fill: Color) {
        self.items.push(Item::Bar {
            path: bar.shape.to_path(0.1).to_svg(),
            fill: bar.fill.unwrap_or(series_fill),
            stroke: bar.stroke,
        });
    }

    pub(crate) fn text(&mut self, text: &str, pos: Point, font_size: f64, align: TextAlign) {
        self.items.push(Item::Text(TextItem {
            text: text.to_string(),
            pos,
            font_size,
            align,
            baseline: TextBaseline::Top,
            fill: self.label_fill,
        }));
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let vb = self.view_box;
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            vb.x0,
            vb.y0,
            vb.width(),
            vb.height(),
            vb.width(),
            vb.height()
        ));
        out.push('\n');

        for item in &self.items {
            match item {
                Item::Rect { rect, fill } => {
                    out.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        rect.x0,
                        rect.y0,
                        rect.width(),
                        rect.height(),
                    ));
                    write_paint_attr(&mut out, "fill", *fill);
                    out.push_str("/>\n");
                }
                Item::Bar { path, fill, stroke } => {
                    out.push_str(&format!(r#"<path d="{path}""#));
                    write_paint_attr(&mut out, "fill", *fill);
                    if let Some(stroke) = stroke {
                        write_paint_attr(&mut out, "stroke", *stroke);
                        out.push_str(r#" stroke-width="1""#);
                    }
                    out.push_str("/>\n");
                }
                Item::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Top => "hanging",
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Middle => "middle",
                    };
                    let anchor = match t.align {
                        TextAlign::Left => "start",
                        TextAlign::Center => "middle",
                        TextAlign::Right => "end",
                    };
                    out.push_str(&format!(
                        r#"<text x="{}" y="{}" font-size="{}""#,
                        t.pos.x, t.pos.y, t.font_size
                    ));
                    out.push_str(&format!(r#" dominant-baseline="{baseline}""#));
                    out.push_str(&format!(r#" text-anchor="{anchor}""#));
                    write_paint_attr(&mut out, "fill", t.fill);
                    out.push('>');
                    out.push_str(&escape_xml(&t.text));
                    out.push_str("</text>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

impl LabelPainter for SvgScene {
    fn fill_text(&mut self, text: &str, at: Point, style: LabelStyle) {
        self.items.push(Item::Text(TextItem {
            text: text.to_string(),
            pos: at,
            font_size: style.font_size,
            align: style.align,
            baseline: style.baseline,
            fill: self.label_fill,
        }));
    }
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (fill, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_escaped_and_translucent_fills_carry_opacity() {
        let mut scene = SvgScene::new(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
        let translucent_red = Color::from_rgba8(255, 0, 0, 128);
        scene.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), translucent_red);
        scene.fill_text(
            "a<b",
            Point::new(1.0, 2.0),
            LabelStyle {
                font_size: 12.0,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
        );
        let svg = scene.to_svg_string();
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="##), "{svg}");
        assert!(svg.contains("a&lt;b"), "{svg}");
        assert!(svg.contains(r#"text-anchor="middle""#), "{svg}");
    }
}
