//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use chronotope_protocol::{RenderCommand, TextAlign};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the viewBox. Commands are drawn in order;
/// `BeginGroup`/`EndGroup` map to nested `<g>` elements.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;overflow:visible">"#,
    ));

    let mut open_groups = 0usize;
    for cmd in commands {
        match cmd {
            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                node_id,
            } => {
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}""#,
                    center.x,
                    center.y,
                    color.to_css(),
                ));
                if let Some(id) = node_id {
                    svg.push_str(&format!(r#" data-node-id="{}""#, escape_xml(id)));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    color.to_css(),
                ));
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}px" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    color.to_css(),
                    escape_xml(text),
                ));
            }
            RenderCommand::BeginGroup { id, label } => {
                svg.push_str(&format!(r#"<g id="{}""#, escape_xml(id)));
                if let Some(label) = label {
                    svg.push_str(&format!(r#" aria-label="{}""#, escape_xml(label)));
                }
                svg.push('>');
                open_groups += 1;
            }
            RenderCommand::EndGroup => {
                // Ignore an end without a matching begin.
                if open_groups > 0 {
                    svg.push_str("</g>");
                    open_groups -= 1;
                }
            }
        }
    }

    for _ in 0..open_groups {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
