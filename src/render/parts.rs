//! Fixed and near-fixed parts of a PresentationML package.

use std::fmt::Write;

use quick_xml::escape::escape;

use super::theme::{palette, FONT_FACE};

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// Empty group properties every `p:spTree` starts with.
pub const SP_TREE_HEADER: &str = "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>";

/// Escape text content and drop characters XML 1.0 cannot carry.
pub fn xml_text(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect();
    escape(cleaned.as_str()).into_owned()
}

pub fn xml_decl() -> &'static str {
    XML_DECL
}

/// Open-tag namespace attributes shared by PresentationML parts.
pub fn pml_namespaces() -> String {
    format!("xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\"", NS_A, NS_R, NS_P)
}

/// A single relationship inside a `.rels` part.
pub struct Relationship {
    pub id: String,
    pub kind: &'static str,
    pub target: String,
}

impl Relationship {
    pub fn new(id: impl Into<String>, kind: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
        }
    }
}

/// Relationship type URIs.
pub mod rel {
    macro_rules! office {
        ($name:literal) => {
            concat!("http://schemas.openxmlformats.org/officeDocument/2006/relationships/", $name)
        };
    }

    pub const OFFICE_DOCUMENT: &str = office!("officeDocument");
    pub const SLIDE: &str = office!("slide");
    pub const SLIDE_MASTER: &str = office!("slideMaster");
    pub const SLIDE_LAYOUT: &str = office!("slideLayout");
    pub const THEME: &str = office!("theme");
    pub const PRES_PROPS: &str = office!("presProps");
    pub const VIEW_PROPS: &str = office!("viewProps");
    pub const TABLE_STYLES: &str = office!("tableStyles");
    pub const IMAGE: &str = office!("image");
    pub const EXTENDED_PROPERTIES: &str = office!("extended-properties");
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
}

pub fn relationships(rels: &[Relationship]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for r in rels {
        let _ = write!(
            xml,
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
            r.id,
            r.kind,
            escape(r.target.as_str())
        );
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn root_relationships() -> String {
    relationships(&[
        Relationship::new("rId1", rel::OFFICE_DOCUMENT, "ppt/presentation.xml"),
        Relationship::new("rId2", rel::CORE_PROPERTIES, "docProps/core.xml"),
        Relationship::new("rId3", rel::EXTENDED_PROPERTIES, "docProps/app.xml"),
    ])
}

pub fn content_types(slide_count: usize, image_extensions: &[&str]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">");
    xml.push_str(
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    );
    for ext in image_extensions {
        let _ = write!(
            xml,
            "<Default Extension=\"{}\" ContentType=\"image/{}\"/>",
            ext, ext
        );
    }

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), "presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), "presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), "presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml".to_string(), "theme+xml"),
        ("/ppt/presProps.xml".to_string(), "presentationml.presProps+xml"),
        ("/ppt/viewProps.xml".to_string(), "presentationml.viewProps+xml"),
        ("/ppt/tableStyles.xml".to_string(), "presentationml.tableStyles+xml"),
        ("/docProps/app.xml".to_string(), "extended-properties+xml"),
    ];
    for n in 1..=slide_count {
        overrides.push((format!("/ppt/slides/slide{}.xml", n), "presentationml.slide+xml"));
    }
    for (part, kind) in overrides {
        let _ = write!(
            xml,
            "<Override PartName=\"{}\" ContentType=\"{}.{}\"/>",
            part, CT_BASE, kind
        );
    }
    xml.push_str(
        "<Override PartName=\"/docProps/core.xml\" \
         ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>",
    );
    xml.push_str("</Types>");
    xml
}

pub fn core_properties(title: &str, creator: &str, timestamp: &str) -> String {
    format!(
        "{}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{}</dc:title><dc:creator>{}</dc:creator>\
         <dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>\
         <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>\
         </cp:coreProperties>",
        XML_DECL,
        xml_text(title),
        xml_text(creator),
        timestamp,
        timestamp
    )
}

pub fn app_properties(slide_count: usize) -> String {
    format!(
        "{}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
         <Application>{}</Application><Slides>{}</Slides><PresentationFormat>Custom</PresentationFormat>\
         </Properties>",
        XML_DECL,
        env!("CARGO_PKG_NAME"),
        slide_count
    )
}

pub fn presentation(slide_count: usize, cx: i64, cy: i64) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(
        xml,
        "<p:presentation {} saveSubsetFonts=\"1\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>",
        pml_namespaces()
    );
    for i in 0..slide_count {
        let _ = write!(xml, "<p:sldId id=\"{}\" r:id=\"rId{}\"/>", 256 + i, i + 2);
    }
    let _ = write!(
        xml,
        "</p:sldIdLst><p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>",
        cx, cy
    );
    xml
}

pub fn presentation_relationships(slide_count: usize) -> String {
    let mut rels = vec![Relationship::new(
        "rId1",
        rel::SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    )];
    for n in 1..=slide_count {
        rels.push(Relationship::new(
            format!("rId{}", n + 1),
            rel::SLIDE,
            format!("slides/slide{}.xml", n),
        ));
    }
    let next = slide_count + 2;
    rels.push(Relationship::new(format!("rId{}", next), rel::PRES_PROPS, "presProps.xml"));
    rels.push(Relationship::new(format!("rId{}", next + 1), rel::VIEW_PROPS, "viewProps.xml"));
    rels.push(Relationship::new(format!("rId{}", next + 2), rel::THEME, "theme/theme1.xml"));
    rels.push(Relationship::new(
        format!("rId{}", next + 3),
        rel::TABLE_STYLES,
        "tableStyles.xml",
    ));
    relationships(&rels)
}

pub fn slide_master() -> String {
    format!(
        "{}<p:sldMaster {}><p:cSld><p:spTree>{}</p:spTree></p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
         accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" \
         folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         </p:sldMaster>",
        XML_DECL,
        pml_namespaces(),
        SP_TREE_HEADER
    )
}

pub fn slide_master_relationships() -> String {
    relationships(&[
        Relationship::new("rId1", rel::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Relationship::new("rId2", rel::THEME, "../theme/theme1.xml"),
    ])
}

pub fn slide_layout() -> String {
    format!(
        "{}<p:sldLayout {} type=\"blank\" preserve=\"1\"><p:cSld name=\"Blank\"><p:spTree>{}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        XML_DECL,
        pml_namespaces(),
        SP_TREE_HEADER
    )
}

pub fn slide_layout_relationships() -> String {
    relationships(&[Relationship::new(
        "rId1",
        rel::SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

pub fn theme() -> String {
    use palette::*;

    let scheme = |color: &str| format!("<a:solidFill><a:schemeClr val=\"{}\"/></a:solidFill>", color);
    let line = |w: u32| format!("<a:ln w=\"{}\">{}</a:ln>", w, scheme("phClr"));
    let fonts = format!(
        "<a:latin typeface=\"{}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/>",
        FONT_FACE
    );

    format!(
        "{decl}<a:theme xmlns:a=\"{ns}\" name=\"Proposal\"><a:themeElements>\
         <a:clrScheme name=\"Proposal\">\
         <a:dk1>{dk1}</a:dk1><a:lt1>{lt1}</a:lt1><a:dk2>{dk2}</a:dk2><a:lt2>{lt2}</a:lt2>\
         <a:accent1>{a1}</a:accent1><a:accent2>{a2}</a:accent2><a:accent3>{a3}</a:accent3>\
         <a:accent4>{a4}</a:accent4><a:accent5>{a5}</a:accent5><a:accent6>{a6}</a:accent6>\
         <a:hlink>{a2}</a:hlink><a:folHlink>{a4}</a:folHlink></a:clrScheme>\
         <a:fontScheme name=\"Proposal\"><a:majorFont>{fonts}</a:majorFont><a:minorFont>{fonts}</a:minorFont></a:fontScheme>\
         <a:fmtScheme name=\"Proposal\">\
         <a:fillStyleLst>{f}{f}{f}</a:fillStyleLst>\
         <a:lnStyleLst>{l1}{l2}{l3}</a:lnStyleLst>\
         <a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle>\
         <a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>\
         <a:bgFillStyleLst>{f}{f}{f}</a:bgFillStyleLst>\
         </a:fmtScheme></a:themeElements></a:theme>",
        decl = XML_DECL,
        ns = NS_A,
        dk1 = format!("<a:srgbClr val=\"{}\"/>", TEXT_DARK),
        lt1 = format!("<a:srgbClr val=\"{}\"/>", WHITE),
        dk2 = format!("<a:srgbClr val=\"{}\"/>", NAVY),
        lt2 = format!("<a:srgbClr val=\"{}\"/>", LIGHT_GRAY),
        a1 = format!("<a:srgbClr val=\"{}\"/>", TEAL),
        a2 = format!("<a:srgbClr val=\"{}\"/>", ACCENT),
        a3 = format!("<a:srgbClr val=\"{}\"/>", DARK_NAVY),
        a4 = format!("<a:srgbClr val=\"{}\"/>", MID_GRAY),
        a5 = format!("<a:srgbClr val=\"{}\"/>", TEXT_LIGHT),
        a6 = format!("<a:srgbClr val=\"{}\"/>", NAVY),
        fonts = fonts,
        f = scheme("phClr"),
        l1 = line(6350),
        l2 = line(12700),
        l3 = line(19050),
    )
}

pub fn pres_props() -> String {
    format!("{}<p:presentationPr {}/>", XML_DECL, pml_namespaces())
}

pub fn view_props() -> String {
    format!("{}<p:viewPr {}/>", XML_DECL, pml_namespaces())
}

pub fn table_styles() -> String {
    format!(
        "{}<a:tblStyleLst xmlns:a=\"{}\" def=\"{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}\"/>",
        XML_DECL, NS_A
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_strips_control_characters() {
        assert_eq!(xml_text("a\u{1}b <c>"), "ab &lt;c&gt;");
        assert_eq!(xml_text("tab\there\u{FFFF}"), "tab\there");
    }

    #[test]
    fn core_properties_drop_vertical_tabs() {
        let xml = core_properties("Line\u{b}Break", "Brand\u{b}", "2025-01-02T03:04:06Z");
        assert!(xml.contains("<dc:title>LineBreak</dc:title>"));
        assert!(xml.contains("<dc:creator>Brand</dc:creator>"));
        assert!(!xml.contains('\u{b}'));
    }

    #[test]
    fn presentation_lists_slides_in_order() {
        let xml = presentation(3, 100, 50);
        assert!(xml.contains("<p:sldId id=\"256\" r:id=\"rId2\"/>"));
        assert!(xml.contains("<p:sldId id=\"258\" r:id=\"rId4\"/>"));
        assert!(xml.contains("<p:sldSz cx=\"100\" cy=\"50\"/>"));
    }

    #[test]
    fn presentation_rels_follow_slides() {
        let xml = presentation_relationships(2);
        assert!(xml.contains("Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide2.xml\""));
        assert!(xml.contains("Id=\"rId4\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps\""));
    }

    #[test]
    fn content_types_cover_slides_and_images() {
        let xml = content_types(2, &["png"]);
        assert!(xml.contains("PartName=\"/ppt/slides/slide2.xml\""));
        assert!(!xml.contains("slide3.xml"));
        assert!(xml.contains("<Default Extension=\"png\" ContentType=\"image/png\"/>"));
    }

    #[test]
    fn root_rels_reference_core_properties() {
        let xml = root_relationships();
        assert!(xml.contains("metadata/core-properties\" Target=\"docProps/core.xml\""));
        assert!(xml.ends_with("</Relationships>"));
    }
}
