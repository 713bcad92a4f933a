use std::{fmt::Write as _, io, path};

use crate::{MeshObserver, Point, Subdivision, WalkControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SvgOutputLevel {
    None,
    ResultOnly,
    MajorSteps,
    AllSteps,
}

/// A [MeshObserver] that saves a numbered SVG snapshot of the live mesh at
/// each observed step: site insertions and constraint events at
/// `MajorSteps`, individual edge flips at `AllSteps`. Snapshot failures are
/// swallowed — debugging output never fails the triangulation.
pub struct SvgObserver {
    output_path: path::PathBuf,
    output_level: SvgOutputLevel,
    current_step: u32,
}

impl SvgObserver {
    pub fn new(output_path: impl Into<path::PathBuf>, output_level: SvgOutputLevel) -> Self {
        Self {
            output_path: output_path.into(),
            output_level,
            current_step: 0,
        }
    }

    fn snapshot(&mut self, subdivision: &Subdivision, highlight: Option<[Point; 2]>) {
        let _ = self.try_snapshot(subdivision, highlight);
        self.current_step += 1;
    }

    fn try_snapshot(
        &self,
        subdivision: &Subdivision,
        highlight: Option<[Point; 2]>,
    ) -> io::Result<()> {
        use svg_fmt::*;

        let frame = subdivision.frame();
        let mut x_min = f32::MAX;
        let mut x_max = f32::MIN;
        let mut y_min = f32::MAX;
        let mut y_max = f32::MIN;
        for p in &frame {
            x_min = x_min.min(p.x() as f32);
            x_max = x_max.max(p.x() as f32);
            y_min = y_min.min(p.y() as f32);
            y_max = y_max.max(p.y() as f32);
        }
        let margin_scale = 0.1;
        let w = x_max - x_min;
        let h = y_max - y_min;
        x_min -= w * margin_scale;
        x_max += w * margin_scale;
        y_min -= h * margin_scale;
        y_max += h * margin_scale;

        let stroke = (w.min(h) * 0.002).max(0.01);
        let mut content = String::new();
        subdivision.walk_all_edges(|a, b| {
            let _ = writeln!(
                content,
                "{}",
                line_segment(a.x() as f32, a.y() as f32, b.x() as f32, b.y() as f32)
                    .color(rgb(40, 40, 40))
                    .width(stroke)
            );
            let _ = writeln!(
                content,
                "{}",
                circle(a.x() as f32, a.y() as f32, stroke * 2.0).fill(Fill::Color(green()))
            );
            WalkControl::Continue
        });
        if let Some([a, b]) = highlight {
            let _ = writeln!(
                content,
                "{}",
                line_segment(a.x() as f32, a.y() as f32, b.x() as f32, b.y() as f32)
                    .color(rgb(255, 126, 0))
                    .width(stroke * 2.0)
            );
        }

        let file_path = self.output_path.join(format!("{:04}.svg", self.current_step));
        let body = format!(
            "<svg viewBox=\"{}, {}, {}, {}\" xmlns=\"http://www.w3.org/2000/svg\">\n{}</svg>\n",
            x_min,
            y_min,
            x_max - x_min,
            y_max - y_min,
            content
        );
        std::fs::write(file_path, body)
    }
}

impl MeshObserver for SvgObserver {
    fn site_inserted(&mut self, subdivision: &Subdivision, _site: Point) {
        if self.output_level >= SvgOutputLevel::MajorSteps {
            self.snapshot(subdivision, None);
        }
    }

    fn edge_flipped(&mut self, subdivision: &Subdivision, _old: [Point; 2], new: [Point; 2]) {
        if self.output_level >= SvgOutputLevel::AllSteps {
            self.snapshot(subdivision, Some(new));
        }
    }

    fn constraint_inserted(&mut self, subdivision: &Subdivision, start: Point, end: Point) {
        if self.output_level >= SvgOutputLevel::MajorSteps {
            self.snapshot(subdivision, Some([start, end]));
        }
    }

    fn constraint_edge_dropped(&mut self, subdivision: &Subdivision, start: Point, end: Point) {
        if self.output_level >= SvgOutputLevel::MajorSteps {
            self.snapshot(subdivision, Some([start, end]));
        }
    }
}

// svg_fmt is missing a function for Circle
pub(crate) fn circle(x: f32, y: f32, r: f32) -> svg_fmt::Circle {
    svg_fmt::Circle {
        x,
        y,
        radius: r,
        style: svg_fmt::Style::default(),
    }
}
