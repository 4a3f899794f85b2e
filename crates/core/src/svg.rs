//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use gantt_scene_protocol::{HAlign, LoadLevel, RenderCommand, Style, VAlign};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));

    let bg = if dark { "#1a1a2e" } else { "#ffffff" };
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::BeginLayer { index } => {
                svg.push_str(&format!(r#"<g class="layer-{index}">"#));
            }
            RenderCommand::EndLayer => svg.push_str("</g>"),
            RenderCommand::DrawRect { rect, style, .. } => {
                let fill = resolve_color(*style, dark);
                let rx = match style {
                    Style::Load { caps, .. } if caps.first || caps.last => 3.0,
                    _ => 0.0,
                };
                svg.push_str(&format!(
                    r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="{rx}"/>"#,
                    escape_xml(&style.to_string()),
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                ));
            }
            RenderCommand::DrawLine { from, to, style } => {
                let stroke = resolve_color(*style, dark);
                svg.push_str(&format!(
                    r#"<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="1"/>"#,
                    escape_xml(&style.to_string()),
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                ));
            }
            RenderCommand::DrawText {
                position,
                text,
                style,
                h_align,
                v_align,
            } => {
                let fill = resolve_color(*style, dark);
                let anchor = match h_align {
                    HAlign::Left => "start",
                    HAlign::Center => "middle",
                    HAlign::Right => "end",
                };
                let baseline = match v_align {
                    VAlign::Top => "hanging",
                    VAlign::Center => "central",
                    VAlign::Bottom => "alphabetic",
                };
                svg.push_str(&format!(
                    r#"<text class="{}" x="{}" y="{}" fill="{fill}" text-anchor="{anchor}" dominant-baseline="{baseline}">{}</text>"#,
                    escape_xml(&style.to_string()),
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(style: Style, dark: bool) -> &'static str {
    if dark {
        match style {
            Style::TimelineArea => "#23233a",
            Style::TimelineBorderBottom | Style::RowBorder | Style::ResourceSeparator => "#3a3a55",
            Style::Row => "#1a1a2e",
            Style::OddRow => "#20203a",
            Style::HeaderText | Style::CellText => "#ececec",
            Style::LoadText => "#101018",
            Style::DayOff => "#4a4a5e",
            Style::Load { level, .. } => match level {
                LoadLevel::Underload => "#42a5f5",
                LoadLevel::Normal => "#66bb6a",
                LoadLevel::Overload => "#f44336",
            },
        }
    } else {
        match style {
            Style::TimelineArea => "#f1f3f5",
            Style::TimelineBorderBottom | Style::RowBorder | Style::ResourceSeparator => "#adb5bd",
            Style::Row => "#ffffff",
            Style::OddRow => "#f8f9fa",
            Style::HeaderText | Style::CellText => "#1a1a2e",
            Style::LoadText => "#ffffff",
            Style::DayOff => "#ced4da",
            Style::Load { level, .. } => match level {
                LoadLevel::Underload => "#457b9d",
                LoadLevel::Normal => "#27ae60",
                LoadLevel::Overload => "#e63946",
            },
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantt_scene_protocol::{Point, Rect, SegmentCaps};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::BeginLayer { index: 0 },
            RenderCommand::DrawRect {
                rect: Rect::new(10.0, 20.0, 100.0, 18.0),
                style: Style::load(150.0, SegmentCaps::BOTH),
                model: None,
            },
            RenderCommand::EndLayer,
        ];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<g class="layer-0">"#));
        assert!(svg.contains(r#"class="load.overload.first.last""#));
        assert!(svg.contains("#f44336"));
        assert!(svg.contains(r#"rx="3""#));
    }

    #[test]
    fn inner_segments_are_square() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            style: Style::load(50.0, SegmentCaps::default()),
            model: None,
        }];
        let svg = render_svg(&commands, 10.0, 10.0, false);
        assert!(svg.contains(r#"rx="0""#));
        assert!(svg.contains("#457b9d"));
    }

    #[test]
    fn text_alignment_maps_to_anchor() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(5.0, 6.0),
            text: "42%".into(),
            style: Style::LoadText,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
        }];
        let svg = render_svg(&commands, 100.0, 100.0, false);
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"dominant-baseline="central""#));
        assert!(svg.contains(">42%</text>"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::default(),
            text: "R&D <core>".into(),
            style: Style::CellText,
            h_align: HAlign::Left,
            v_align: VAlign::Center,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("R&amp;D &lt;core&gt;"));
    }
}
