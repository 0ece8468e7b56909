//! HTML preview backend.
//!
//! A slide becomes a container sized by `aspect-ratio` with
//! `container-type: size`; each element is an absolutely positioned node in
//! percent units and font sizes are expressed in `cqh`, so the preview scales
//! with its container the same way the exported slide scales with the page.
//! Connectors go into one SVG overlay with a unit viewBox.

use std::fmt::Write;

use quick_xml::escape::escape;

use super::theme::{self, Align, ElementStyle, Shape, VAlign};
use crate::error::PreviewError;
use crate::layout::{
    assemble_deck, placeholder_slide, Element, ElementKind, LayoutOptions, Segment, Slide,
    SlideDimensions,
};
use crate::models::{ProposalData, Section};

const PT_PER_INCH: f64 = 72.0;
const CONNECTOR_STROKE_PX: f64 = 1.5;

/// Render slide `slide_index` (0-based) of the proposal's deck.
pub fn render_preview(
    proposal: &ProposalData,
    slide_index: usize,
    options: &LayoutOptions,
) -> Result<String, PreviewError> {
    let deck = assemble_deck(proposal, options);
    let slide = deck.get(slide_index).ok_or(PreviewError::SlideOutOfRange {
        index: slide_index,
        count: deck.len(),
    })?;
    Ok(render_slide(slide, &deck.dimensions))
}

/// Render the first slide of `section`, or its placeholder when the section
/// currently produces no slides.
pub fn preview_section(proposal: &ProposalData, section: Section, options: &LayoutOptions) -> String {
    let deck = assemble_deck(proposal, options);
    let html = match deck.slides_for(section).next() {
        Some(slide) => render_slide(slide, &deck.dimensions),
        None => render_slide(&placeholder_slide(section, options), &options.slide),
    };
    html
}

/// Standalone HTML page with every slide of the deck stacked vertically.
pub fn render_preview_document(proposal: &ProposalData, options: &LayoutOptions) -> String {
    let deck = assemble_deck(proposal, options);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(deck.title.as_str()));
    let _ = writeln!(
        html,
        "<style>body{{margin:0;padding:24px;background:#{};font-family:{},sans-serif}}\
         .deck-slide{{max-width:1100px;margin:0 auto 24px;box-shadow:0 2px 8px rgba(0,0,0,.15)}}</style>",
        theme::palette::LIGHT_GRAY,
        theme::FONT_FACE
    );
    html.push_str("</head>\n<body>\n");
    for slide in &deck.slides {
        html.push_str(&render_slide(slide, &deck.dimensions));
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// HTML fragment for one slide.
pub fn render_slide(slide: &Slide, dims: &SlideDimensions) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<div class=\"deck-slide\" data-section=\"{}\" data-slide=\"{}\" \
         style=\"position:relative;overflow:hidden;container-type:size;\
         aspect-ratio:{} / {};background:#{};font-family:{},sans-serif\">",
        slide.section.as_str(),
        slide.number,
        dims.width,
        dims.height,
        theme::background_color(slide.background),
        theme::FONT_FACE,
    );

    let connectors: Vec<&Segment> = slide
        .elements
        .iter()
        .filter_map(|e| match &e.kind {
            ElementKind::Connector { segment } => Some(segment),
            _ => None,
        })
        .collect();
    if !connectors.is_empty() {
        render_connectors(&mut html, &connectors);
    }

    for element in &slide.elements {
        if matches!(element.kind, ElementKind::Connector { .. }) {
            continue;
        }
        render_element(&mut html, element, dims);
    }

    if let Some(hint) = &slide.empty_hint {
        let _ = write!(
            html,
            "<div class=\"empty-hint\" style=\"position:absolute;left:0;top:0;width:100%;\
             height:100%;display:flex;align-items:center;justify-content:center;\
             color:#{};font-size:{:.3}cqh\">{}</div>",
            theme::palette::MID_GRAY,
            font_size_cqh(14.0, dims),
            escape(hint.as_str()),
        );
    }

    html.push_str("</div>");
    html
}

fn render_connectors(html: &mut String, segments: &[&Segment]) {
    html.push_str(
        "<svg class=\"connectors\" viewBox=\"0 0 1 1\" preserveAspectRatio=\"none\" \
         style=\"position:absolute;left:0;top:0;width:100%;height:100%;overflow:visible\">",
    );
    for s in segments {
        let _ = write!(
            html,
            "<line x1=\"{:.5}\" y1=\"{:.5}\" x2=\"{:.5}\" y2=\"{:.5}\" stroke=\"#{}\" \
             stroke-width=\"{}\" vector-effect=\"non-scaling-stroke\"/>",
            s.x1,
            s.y1,
            s.x2,
            s.y2,
            theme::palette::MID_GRAY,
            CONNECTOR_STROKE_PX,
        );
    }
    html.push_str("</svg>");
}

fn render_element(html: &mut String, element: &Element, dims: &SlideDimensions) {
    let style = theme::style_for(&element.kind);
    let r = &element.rect;
    let position = format!(
        "position:absolute;left:{:.4}%;top:{:.4}%;width:{:.4}%;height:{:.4}%",
        r.left * 100.0,
        r.top * 100.0,
        r.width * 100.0,
        r.height * 100.0,
    );

    if let ElementKind::ClientLogo { data_uri } = &element.kind {
        let _ = write!(
            html,
            "<img class=\"el el-{}\" src=\"{}\" alt=\"\" style=\"{};object-fit:contain\">",
            element.kind.name(),
            escape(image_src(data_uri).as_str()),
            position,
        );
        return;
    }

    let _ = write!(
        html,
        "<div class=\"el el-{}\" style=\"{};{}\">",
        element.kind.name(),
        position,
        css_for(&style, dims),
    );
    if let Some(label) = &element.label {
        html.push_str(&escape(label.as_str()));
    }
    html.push_str("</div>");
}

fn css_for(style: &ElementStyle, dims: &SlideDimensions) -> String {
    let mut css = String::from("display:flex;box-sizing:border-box;white-space:pre-wrap;overflow:hidden");
    if let Some(fill) = &style.fill {
        let _ = write!(css, ";background:#{}", fill);
    }
    if let Some(stroke) = style.stroke {
        let _ = write!(css, ";border:1px solid #{}", stroke);
    }
    match style.shape {
        Shape::RoundRect => css.push_str(";border-radius:8px"),
        Shape::Ellipse => css.push_str(";border-radius:50%"),
        Shape::Rect | Shape::Line | Shape::Picture => {}
    }
    let _ = write!(
        css,
        ";color:#{};font-size:{:.3}cqh",
        style.color,
        font_size_cqh(style.size_pt, dims)
    );
    if style.bold {
        css.push_str(";font-weight:700");
    }
    if style.italic {
        css.push_str(";font-style:italic");
    }
    css.push_str(match style.align {
        Align::Left => ";justify-content:flex-start;text-align:left",
        Align::Center => ";justify-content:center;text-align:center",
    });
    css.push_str(match style.valign {
        VAlign::Top => ";align-items:flex-start",
        VAlign::Middle => ";align-items:center",
    });
    css
}

/// Point size as a percentage of the container height.
fn font_size_cqh(size_pt: f64, dims: &SlideDimensions) -> f64 {
    size_pt / (dims.height * PT_PER_INCH) * 100.0
}

/// Bare base64 payloads are treated as PNG.
fn image_src(data: &str) -> String {
    if data.starts_with("data:") {
        data.to_string()
    } else {
        format!("data:image/png;base64,{}", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    #[test]
    fn out_of_range_slide_is_an_error() {
        let err = render_preview(&ProposalData::default(), 42, &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, PreviewError::SlideOutOfRange { index: 42, count: 6 }));
    }

    #[test]
    fn labels_are_escaped() {
        let mut proposal = ProposalData::default();
        proposal.cover.title = "<script>alert(1)</script> & co".to_string();
        let html = render_preview(&proposal, 0, &LayoutOptions::default()).unwrap();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn positions_use_percentages() {
        let html = render_preview(&ProposalData::default(), 1, &LayoutOptions::default()).unwrap();
        // 0.6in margin on a 13.33in slide.
        assert!(html.contains("left:4.5011%"));
        assert!(html.contains("container-type:size"));
    }

    #[test]
    fn empty_scope_section_shows_placeholder() {
        let html = preview_section(&ProposalData::default(), Section::Scope, &LayoutOptions::default());
        assert!(html.contains("data-section=\"scope\""));
        assert!(html.contains("Add features to see preview"));
    }

    #[test]
    fn populated_section_shows_its_first_slide() {
        let html = preview_section(&ProposalData::sample(), Section::Scope, &LayoutOptions::default());
        assert!(html.contains("data-slide=\"4\""));
        assert!(html.contains("Scope &amp; Features (1/2)"));
        assert!(!html.contains("Add features to see preview"));
    }

    #[test]
    fn connectors_share_one_overlay() {
        let html = preview_section(&ProposalData::sample(), Section::Risk, &LayoutOptions::default());
        assert_eq!(html.matches("<svg").count(), 1);
        assert_eq!(html.matches("<line ").count(), 3);
        assert!(html.contains("vector-effect=\"non-scaling-stroke\""));
    }

    #[test]
    fn bare_logo_payload_becomes_png_data_uri() {
        assert_eq!(image_src("AAAA"), "data:image/png;base64,AAAA");
        assert_eq!(image_src("data:image/jpeg;base64,AAAA"), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn document_contains_every_slide() {
        let proposal = ProposalData::sample();
        let html = render_preview_document(&proposal, &LayoutOptions::default());
        let expected = assemble_deck(&proposal, &LayoutOptions::default()).len();
        assert_eq!(html.matches("class=\"deck-slide\"").count(), expected);
        assert!(html.contains("<title>Customer Portal Modernization - Northwind</title>"));
    }
}
