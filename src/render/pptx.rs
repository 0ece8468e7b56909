//! PPTX export backend.
//!
//! Maps the deck's fractional rectangles to EMUs of the configured slide size
//! and writes one DrawingML shape per element. The package is assembled in
//! memory; any failure aborts the whole export.

use std::fmt::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{NaiveDateTime, Utc};

use super::package::PackageWriter;
use super::parts::{self, rel, xml_text, Relationship};
use super::theme::{self, Align, ElementStyle, VAlign};
use crate::error::ExportError;
use crate::layout::{assemble_deck, Deck, Element, ElementKind, LayoutOptions, Rect, Segment, Slide, SlideDimensions};
use crate::models::{OutputFormat, ProposalData};

pub const EMU_PER_INCH: f64 = 914_400.0;
const CONNECTOR_WIDTH_EMU: i64 = 19_050;
const OUTLINE_WIDTH_EMU: i64 = 12_700;
const TEXT_INSET_X: i64 = 45_720;
const TEXT_INSET_Y: i64 = 22_860;

/// Build the export artifact for `proposal`.
pub fn export(
    proposal: &ProposalData,
    options: &LayoutOptions,
    format: OutputFormat,
) -> Result<Vec<u8>, ExportError> {
    match format {
        OutputFormat::Pptx => {
            let deck = assemble_deck(proposal, options);
            write_pptx(&deck, &options.brand_name, Utc::now().naive_utc())
        }
        OutputFormat::Pdf => Err(ExportError::UnsupportedFormat(format)),
    }
}

/// Serialize `deck` as a PresentationML package stamped with `modified`.
pub fn write_pptx(deck: &Deck, creator: &str, modified: NaiveDateTime) -> Result<Vec<u8>, ExportError> {
    let emu = EmuFrame::new(deck.dimensions);
    let mut media = MediaParts::default();

    let mut slides = Vec::with_capacity(deck.len());
    for slide in &deck.slides {
        slides.push(write_slide(slide, &emu, &mut media)?);
    }

    let n = slides.len();
    let mut package = PackageWriter::new(modified);
    package.add("[Content_Types].xml", parts::content_types(n, &media.extensions()).as_bytes())?;
    package.add("_rels/.rels", parts::root_relationships().as_bytes())?;

    let timestamp = modified.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    package.add(
        "docProps/core.xml",
        parts::core_properties(&deck.title, creator, &timestamp).as_bytes(),
    )?;
    package.add("docProps/app.xml", parts::app_properties(n).as_bytes())?;

    package.add(
        "ppt/presentation.xml",
        parts::presentation(n, emu.width, emu.height).as_bytes(),
    )?;
    package.add(
        "ppt/_rels/presentation.xml.rels",
        parts::presentation_relationships(n).as_bytes(),
    )?;
    package.add("ppt/slideMasters/slideMaster1.xml", parts::slide_master().as_bytes())?;
    package.add(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        parts::slide_master_relationships().as_bytes(),
    )?;
    package.add("ppt/slideLayouts/slideLayout1.xml", parts::slide_layout().as_bytes())?;
    package.add(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        parts::slide_layout_relationships().as_bytes(),
    )?;
    package.add("ppt/theme/theme1.xml", parts::theme().as_bytes())?;
    package.add("ppt/presProps.xml", parts::pres_props().as_bytes())?;
    package.add("ppt/viewProps.xml", parts::view_props().as_bytes())?;
    package.add("ppt/tableStyles.xml", parts::table_styles().as_bytes())?;

    for (i, part) in slides.iter().enumerate() {
        let number = i + 1;
        package.add(&format!("ppt/slides/slide{}.xml", number), part.xml.as_bytes())?;
        package.add(
            &format!("ppt/slides/_rels/slide{}.xml.rels", number),
            parts::relationships(&part.relationships).as_bytes(),
        )?;
    }
    for image in &media.images {
        package.add(&format!("ppt/media/{}", image.file_name), &image.bytes)?;
    }

    let entries = package.len();
    let bytes = package.finish()?;
    tracing::info!(slides = n, entries, bytes = bytes.len(), "exported pptx");
    Ok(bytes)
}

/// Slide-space fractions to EMUs.
struct EmuFrame {
    width: i64,
    height: i64,
}

impl EmuFrame {
    fn new(dims: SlideDimensions) -> Self {
        Self {
            width: (dims.width * EMU_PER_INCH).round() as i64,
            height: (dims.height * EMU_PER_INCH).round() as i64,
        }
    }

    fn x(&self, fraction: f64) -> i64 {
        (fraction * self.width as f64).round() as i64
    }

    fn y(&self, fraction: f64) -> i64 {
        (fraction * self.height as f64).round() as i64
    }

    /// `(x, y, cx, cy)`; negative extents clamp to zero.
    fn rect(&self, r: &Rect) -> (i64, i64, i64, i64) {
        (
            self.x(r.left),
            self.y(r.top),
            self.x(r.width).max(0),
            self.y(r.height).max(0),
        )
    }
}

struct MediaImage {
    file_name: String,
    extension: &'static str,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct MediaParts {
    images: Vec<MediaImage>,
}

impl MediaParts {
    fn add(&mut self, extension: &'static str, bytes: Vec<u8>) -> String {
        let file_name = format!("image{}.{}", self.images.len() + 1, extension);
        self.images.push(MediaImage {
            file_name: file_name.clone(),
            extension,
            bytes,
        });
        file_name
    }

    fn extensions(&self) -> Vec<&'static str> {
        let mut exts: Vec<&'static str> = self.images.iter().map(|i| i.extension).collect();
        exts.sort_unstable();
        exts.dedup();
        exts
    }
}

struct SlidePart {
    xml: String,
    relationships: Vec<Relationship>,
}

fn write_slide(slide: &Slide, emu: &EmuFrame, media: &mut MediaParts) -> Result<SlidePart, ExportError> {
    let mut relationships = vec![Relationship::new(
        "rId1",
        rel::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )];

    let mut xml = String::from(parts::xml_decl());
    let _ = write!(
        xml,
        "<p:sld {}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>\
         <a:effectLst/></p:bgPr></p:bg><p:spTree>{}",
        parts::pml_namespaces(),
        theme::background_color(slide.background),
        parts::SP_TREE_HEADER,
    );

    // Id 1 is the group itself.
    for (i, element) in slide.elements.iter().enumerate() {
        let id = i + 2;
        match &element.kind {
            ElementKind::Connector { segment } => write_connector(&mut xml, id, segment, emu),
            ElementKind::ClientLogo { data_uri } => {
                let (extension, bytes) = decode_image(data_uri).map_err(|reason| ExportError::Slide {
                    slide: slide.number,
                    section: slide.section,
                    reason,
                })?;
                let file_name = media.add(extension, bytes);
                let rel_id = format!("rId{}", relationships.len() + 1);
                relationships.push(Relationship::new(
                    rel_id.clone(),
                    rel::IMAGE,
                    format!("../media/{}", file_name),
                ));
                write_picture(&mut xml, id, element, &rel_id, emu);
            }
            _ => write_shape(&mut xml, id, element, emu),
        }
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(SlidePart { xml, relationships })
}

fn write_xfrm(xml: &mut String, r: &Rect, emu: &EmuFrame, flip_h: bool) {
    let (x, y, cx, cy) = emu.rect(r);
    let flip = if flip_h { " flipH=\"1\"" } else { "" };
    let _ = write!(
        xml,
        "<a:xfrm{}><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        flip, x, y, cx, cy
    );
}

fn solid_fill(color: &str) -> String {
    format!("<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>", color)
}

fn write_shape(xml: &mut String, id: usize, element: &Element, emu: &EmuFrame) {
    let style = theme::style_for(&element.kind);
    let _ = write!(
        xml,
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{}\" name=\"{} {}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>",
        id,
        element.kind.name(),
        id
    );
    write_xfrm(xml, &element.rect, emu, false);
    let _ = write!(xml, "<a:prstGeom prst=\"{}\"><a:avLst/></a:prstGeom>", style.shape.preset());
    match &style.fill {
        Some(fill) => xml.push_str(&solid_fill(fill)),
        None => xml.push_str("<a:noFill/>"),
    }
    match style.stroke {
        Some(stroke) => {
            let _ = write!(xml, "<a:ln w=\"{}\">{}</a:ln>", OUTLINE_WIDTH_EMU, solid_fill(stroke));
        }
        None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }
    xml.push_str("</p:spPr>");

    if let Some(label) = &element.label {
        write_text_body(xml, label, &style);
    }
    xml.push_str("</p:sp>");
}

fn write_text_body(xml: &mut String, label: &str, style: &ElementStyle) {
    let anchor = match style.valign {
        VAlign::Top => "t",
        VAlign::Middle => "ctr",
    };
    let align = match style.align {
        Align::Left => "l",
        Align::Center => "ctr",
    };
    let _ = write!(
        xml,
        "<p:txBody><a:bodyPr wrap=\"square\" lIns=\"{x}\" tIns=\"{y}\" rIns=\"{x}\" bIns=\"{y}\" anchor=\"{}\">\
         <a:normAutofit/></a:bodyPr><a:lstStyle/>",
        anchor,
        x = TEXT_INSET_X,
        y = TEXT_INSET_Y,
    );

    let size = (style.size_pt * 100.0).round() as u32;
    for line in label.split('\n') {
        let _ = write!(xml, "<a:p><a:pPr algn=\"{}\"/>", align);
        if !line.is_empty() {
            let _ = write!(
                xml,
                "<a:r><a:rPr lang=\"en-US\" sz=\"{}\" b=\"{}\" i=\"{}\" dirty=\"0\">{}\
                 <a:latin typeface=\"{}\"/><a:cs typeface=\"{}\"/></a:rPr><a:t>{}</a:t></a:r>",
                size,
                u8::from(style.bold),
                u8::from(style.italic),
                solid_fill(style.color),
                theme::FONT_FACE,
                theme::FONT_FACE,
                xml_text(line),
            );
        }
        let _ = write!(xml, "<a:endParaRPr lang=\"en-US\" sz=\"{}\" dirty=\"0\"/></a:p>", size);
    }
    xml.push_str("</p:txBody>");
}

fn write_connector(xml: &mut String, id: usize, segment: &Segment, emu: &EmuFrame) {
    // A line runs top-left to bottom-right of its box unless flipped.
    let rising = (segment.x2 - segment.x1) * (segment.y2 - segment.y1) < 0.0;
    let _ = write!(
        xml,
        "<p:cxnSp><p:nvCxnSpPr><p:cNvPr id=\"{}\" name=\"connector {}\"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr>",
        id, id
    );
    write_xfrm(xml, &segment.bounds(), emu, rising);
    let _ = write!(
        xml,
        "<a:prstGeom prst=\"line\"><a:avLst/></a:prstGeom><a:ln w=\"{}\">{}</a:ln></p:spPr></p:cxnSp>",
        CONNECTOR_WIDTH_EMU,
        solid_fill(theme::palette::MID_GRAY),
    );
}

fn write_picture(xml: &mut String, id: usize, element: &Element, rel_id: &str, emu: &EmuFrame) {
    let _ = write!(
        xml,
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{}\" name=\"{} {}\"/><p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"{}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>",
        id,
        element.kind.name(),
        id,
        rel_id
    );
    write_xfrm(xml, &element.rect, emu, false);
    xml.push_str("<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>");
}

/// Decode a `data:image/...;base64,` URI or a bare base64 PNG payload.
fn decode_image(data: &str) -> Result<(&'static str, Vec<u8>), String> {
    let (mime, payload) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| "client logo is not a valid data URI".to_string())?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| "client logo data URI is not base64 encoded".to_string())?;
            (mime, payload)
        }
        None => ("image/png", data),
    };

    let extension = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpeg",
        "image/gif" => "gif",
        other => return Err(format!("unsupported client logo type {}", other)),
    };

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| format!("client logo is not valid base64: {}", e))?;
    Ok((extension, bytes))
}
