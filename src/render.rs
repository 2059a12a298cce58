use crate::config::{FlowConfig, RenderConfig};
use crate::layout::{EdgeView, FlowView, NodeBox, Point, Rect};
use crate::theme::Theme;
use crate::viewport::Transform;
use anyhow::Result;
use std::path::Path;

/// Render the whole flow graph, fitted to its bounds plus the margin.
pub fn render_svg(
    view: &FlowView,
    theme: &Theme,
    config: &FlowConfig,
    render_cfg: &RenderConfig,
) -> String {
    let margin = render_cfg.margin;
    let width = (view.bounds.width + margin * 2.0).max(200.0);
    let height = (view.bounds.height + margin * 2.0).max(200.0);
    let transform = Transform::new(
        Point::new(margin - view.bounds.x, margin - view.bounds.y),
        1.0,
    );
    render_svg_with_transform(view, theme, config, &transform, width, height)
}

/// Render through an explicit view transform onto a fixed-size surface,
/// as the interactive editor shows it.
pub fn render_svg_with_transform(
    view: &FlowView,
    theme: &Theme,
    config: &FlowConfig,
    transform: &Transform,
    width: f64,
    height: f64,
) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" markerWidth=\"10\" markerHeight=\"10\" refX=\"10\" refY=\"5\" orient=\"auto\" markerUnits=\"strokeWidth\"><path d=\"M0,0 L10,5 L0,10 z\" fill=\"{}\"/></marker>",
        theme.arrow_color
    ));
    svg.push_str("</defs>");

    svg.push_str(&format!("<g transform=\"{}\">", transform.to_svg()));
    for edge in &view.edges {
        svg.push_str(&edge_svg(edge, theme, config));
    }
    for node in &view.nodes {
        svg.push_str(&node_svg(node, &view.chapters, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn edge_svg(edge: &EdgeView, theme: &Theme, config: &FlowConfig) -> String {
    let mut out = format!(
        "<g class=\"edge edge-{}\" data-edge-id=\"{}\">",
        edge.kind.as_str(),
        escape_xml(&edge.edge_id)
    );
    out.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\" opacity=\"0.9\" marker-end=\"url(#arrow)\"/>",
        edge.from.x,
        edge.from.y,
        edge.to.x,
        edge.to.y,
        theme.edge_color(edge.kind)
    ));

    if let Some(label) = &edge.label {
        let rect = Rect::centered(edge.label_anchor, config.label_width, config.label_height);
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"0.8\"/>",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            theme.edge_label_background,
            theme.edge_label_border
        ));
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            edge.label_anchor.x,
            edge.label_anchor.y,
            escape_xml(&theme.font_family),
            theme.font_size - 1.0,
            theme.muted_text_color,
            escape_xml(label)
        ));
    }

    out.push_str("</g>");
    out
}

fn node_svg(node: &NodeBox, chapters: &[String], theme: &Theme) -> String {
    let rect = node.rect;
    let chapter_color = node
        .chapter
        .as_deref()
        .and_then(|chapter| theme.chapter_color(chapters, chapter));
    let center_x = rect.width / 2.0;

    let mut out = format!(
        "<g class=\"node\" data-scene-id=\"{}\" transform=\"translate({:.2},{:.2})\">",
        escape_xml(&node.scene_id),
        rect.x,
        rect.y
    );
    out.push_str(&format!(
        "<rect width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.6\"/>",
        rect.width,
        rect.height,
        theme.node_fill,
        chapter_color.unwrap_or(&theme.node_border)
    ));

    let (title_y, type_y) = match &node.chapter {
        Some(chapter) => {
            out.push_str(&text_svg(
                center_x,
                16.0,
                chapter,
                theme,
                theme.font_size - 2.0,
                chapter_color.unwrap_or(&theme.muted_text_color),
            ));
            (30.0, 48.0)
        }
        None => (24.0, 44.0),
    };
    out.push_str(&text_svg(
        center_x,
        title_y,
        &node.title,
        theme,
        theme.font_size,
        &theme.title_color,
    ));
    out.push_str(&text_svg(
        center_x,
        type_y,
        node.kind.as_str(),
        theme,
        theme.font_size - 2.0,
        &theme.muted_text_color,
    ));
    out.push_str("</g>");
    out
}

fn text_svg(x: f64, y: f64, text: &str, theme: &Theme, size: f32, fill: &str) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{size}\" fill=\"{fill}\">{}</text>",
        escape_xml(&theme.font_family),
        escape_xml(text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
