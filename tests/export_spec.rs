use std::collections::BTreeMap;

use chrono::NaiveDate;
use proposal_deck::layout::{assemble_deck, LayoutOptions};
use proposal_deck::models::*;
use proposal_deck::render::{export, render_preview, write_pptx, EMU_PER_INCH};
use speculate2::speculate;

/// Read every entry of a zip archive by walking its central directory.
fn unzip(bytes: &[u8]) -> BTreeMap<String, String> {
    let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]) as usize;
    let u32_at = |at: usize| {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
    };

    let eocd = bytes.len() - 22;
    assert_eq!(u32_at(eocd), 0x0605_4b50, "missing end of central directory");
    let count = u16_at(eocd + 10);
    let mut cursor = u32_at(eocd + 16);

    let mut entries = BTreeMap::new();
    for _ in 0..count {
        assert_eq!(u32_at(cursor), 0x0201_4b50);
        let compressed_len = u32_at(cursor + 20);
        let name_len = u16_at(cursor + 28);
        let local = u32_at(cursor + 42);
        let name = String::from_utf8(bytes[cursor + 46..cursor + 46 + name_len].to_vec()).unwrap();

        let data_start = local + 30 + u16_at(local + 26) + u16_at(local + 28);
        let raw = miniz_oxide::inflate::decompress_to_vec(&bytes[data_start..data_start + compressed_len])
            .expect("entry should inflate");
        assert_eq!(crc32fast::hash(&raw) as usize, u32_at(cursor + 16), "crc of {}", name);
        entries.insert(name, String::from_utf8_lossy(&raw).into_owned());

        cursor += 46 + name_len + u16_at(cursor + 30) + u16_at(cursor + 32);
    }
    entries
}

fn slide_parts(entries: &BTreeMap<String, String>) -> Vec<&String> {
    let mut slides: Vec<(usize, &String)> = entries
        .iter()
        .filter_map(|(name, xml)| {
            name.strip_prefix("ppt/slides/slide")
                .and_then(|rest| rest.strip_suffix(".xml"))
                .and_then(|n| n.parse().ok())
                .map(|n| (n, xml))
        })
        .collect();
    slides.sort_by_key(|(n, _)| *n);
    slides.into_iter().map(|(_, xml)| xml).collect()
}

speculate! {
    before {
        let options = LayoutOptions::default();
    }

    describe "export" {
        it "writes a complete presentation package" {
            let bytes = export(&ProposalData::sample(), &options, OutputFormat::Pptx).unwrap();
            let entries = unzip(&bytes);

            for part in [
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "docProps/app.xml",
                "ppt/presentation.xml",
                "ppt/_rels/presentation.xml.rels",
                "ppt/slideMasters/slideMaster1.xml",
                "ppt/slideLayouts/slideLayout1.xml",
                "ppt/theme/theme1.xml",
            ] {
                assert!(entries.contains_key(part), "missing {}", part);
            }
            assert!(entries["docProps/core.xml"].contains("<dc:title>Customer Portal Modernization - Northwind</dc:title>"));
        }

        it "emits one slide part per deck slide" {
            let proposal = ProposalData::sample();
            let deck = assemble_deck(&proposal, &options);
            let entries = unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap());

            assert_eq!(slide_parts(&entries).len(), deck.len());
            let sld_ids = entries["ppt/presentation.xml"].matches("<p:sldId ").count();
            assert_eq!(sld_ids, deck.len());
        }

        it "exports nine features as three scope slides in order" {
            let mut proposal = ProposalData::default();
            proposal.scope.features = (0..9)
                .map(|i| ScopeFeature::new(format!("Feature {}", i), ""))
                .collect();
            let entries = unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap());
            let slides = slide_parts(&entries);

            let scope: Vec<&&String> = slides
                .iter()
                .filter(|xml| xml.contains("Scope &amp; Features ("))
                .collect();
            assert_eq!(scope.len(), 3);
            assert!(scope[0].contains("Scope &amp; Features (1/3)"));
            let first = scope[0].find("Feature 0").unwrap();
            let fourth = scope[0].find("Feature 3").unwrap();
            assert!(first < fourth);
            assert!(!scope[0].contains("Feature 4"));
            assert!(scope[2].contains("Feature 8"));
        }

        it "sizes the presentation from the slide dimensions" {
            let bytes = export(&ProposalData::default(), &options, OutputFormat::Pptx).unwrap();
            let entries = unzip(&bytes);
            let cx = (options.slide.width * EMU_PER_INCH).round() as i64;
            let cy = (options.slide.height * EMU_PER_INCH).round() as i64;
            assert!(entries["ppt/presentation.xml"].contains(&format!("<p:sldSz cx=\"{}\" cy=\"{}\"/>", cx, cy)));
        }

        it "embeds the client logo as a media part" {
            let mut proposal = ProposalData::sample();
            proposal.cover.client_logo_base64 = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
            let entries = unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap());

            assert!(entries.contains_key("ppt/media/image1.png"));
            assert!(entries["ppt/slides/_rels/slide1.xml.rels"].contains("Target=\"../media/image1.png\""));
            assert!(entries["[Content_Types].xml"].contains("Extension=\"png\""));
            assert!(entries["ppt/slides/slide1.xml"].contains("<p:pic>"));
        }

        it "draws connectors for the escalation chart" {
            let proposal = ProposalData::sample();
            let entries = unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap());
            let slides = slide_parts(&entries);
            let risk = slides.last().unwrap();
            assert_eq!(risk.matches("<p:cxnSp>").count(), proposal.risk.links.len());
        }

        it "keeps document properties valid when the title has control characters" {
            let mut proposal = ProposalData::sample();
            proposal.cover.title = "Line\u{b}Break".to_string();
            let entries = unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap());

            let core = &entries["docProps/core.xml"];
            assert!(!core.contains('\u{b}'));
            assert!(core.contains("<dc:title>LineBreak - Northwind</dc:title>"));
            assert!(!entries["ppt/slides/slide1.xml"].contains('\u{b}'));
        }

        it "rejects pdf" {
            assert!(export(&ProposalData::sample(), &options, OutputFormat::Pdf).is_err());
        }
    }

    describe "write_pptx" {
        it "is deterministic for a fixed timestamp" {
            let deck = assemble_deck(&ProposalData::sample(), &options);
            let at = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap().and_hms_opt(3, 4, 6).unwrap();
            let a = write_pptx(&deck, "AgileEngine", at).unwrap();
            let b = write_pptx(&deck, "AgileEngine", at).unwrap();
            assert_eq!(a, b);
            assert!(unzip(&a)["docProps/core.xml"].contains("2025-01-02T03:04:06Z"));
        }
    }

    describe "preview and export agreement" {
        it "previews exactly the slides that are exported" {
            let proposal = ProposalData::sample();
            let exported = slide_parts(&unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap())).len();

            let previewable = (0..)
                .take_while(|&i| render_preview(&proposal, i, &options).is_ok())
                .count();
            assert_eq!(previewable, exported);
        }

        it "places the same element at the same fraction in both outputs" {
            let proposal = ProposalData::sample();
            let deck = assemble_deck(&proposal, &options);
            let title = &deck.slides[1].elements[0];

            let html = render_preview(&proposal, 1, &options).unwrap();
            assert!(html.contains(&format!("left:{:.4}%", title.rect.left * 100.0)));

            let entries = unzip(&export(&proposal, &options, OutputFormat::Pptx).unwrap());
            let emu_x = (title.rect.left * (options.slide.width * EMU_PER_INCH).round()).round() as i64;
            assert!(entries["ppt/slides/slide2.xml"].contains(&format!("<a:off x=\"{}\"", emu_x)));
        }
    }
}
