//! Slide assembly: runs every section's layout and collects the results into
//! a backend-neutral [`Deck`].
//!
//! Both renderers read the same `Deck`, so slide count, item placement and
//! element rectangles cannot diverge between the preview and the export.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::geometry::{Element, ElementKind, Rect, SlideDimensions, SlideFrame};
use super::hierarchy::{layout_hierarchy, HierarchyGeometry};
use super::pagination::{paginate, FeaturePage, FEATURES_PER_PAGE};
use super::team::layout_team;
use super::timeline::layout_timeline;
use crate::models::*;

const TITLE_TOP: f64 = 0.4;
const TITLE_HEIGHT: f64 = 0.7;
const ACCENT_TOP: f64 = 1.15;

/// Inputs to slide assembly besides the proposal itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub slide: SlideDimensions,
    pub features_per_page: usize,
    /// Used when a timeline arrives with `total_weeks == 0`.
    pub default_total_weeks: u32,
    /// Brand name printed on the cover.
    pub brand_name: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            slide: SlideDimensions::default(),
            features_per_page: FEATURES_PER_PAGE,
            default_total_weeks: DEFAULT_TOTAL_WEEKS,
            brand_name: "AgileEngine".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideBackground {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    /// 1-based position in the deck.
    pub number: usize,
    pub section: Section,
    pub background: SlideBackground,
    pub title: String,
    /// Back-to-front drawing order.
    pub elements: Vec<Element>,
    /// Set when the section has nothing to show yet. Only the preview renders it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    pub title: String,
    pub dimensions: SlideDimensions,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Index of the first slide belonging to `section`.
    pub fn section_start(&self, section: Section) -> Option<usize> {
        self.slides.iter().position(|s| s.section == section)
    }

    pub fn slides_for(&self, section: Section) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(move |s| s.section == section)
    }
}

/// Build every slide of `proposal` in section order.
///
/// Each section yields exactly one slide, except scope which yields one per
/// feature page and none when there are no features.
pub fn assemble_deck(proposal: &ProposalData, options: &LayoutOptions) -> Deck {
    let builder = SlideBuilder::new(options);
    let mut slides = Vec::new();

    for section in Section::ALL {
        match section {
            Section::Cover => slides.push(builder.cover(&proposal.cover)),
            Section::Challenge => slides.push(builder.challenge(&proposal.challenge)),
            Section::Solution => slides.push(builder.solution(&proposal.solution)),
            Section::Scope => {
                let pages = paginate(&proposal.scope.features, options.features_per_page);
                slides.extend(pages.iter().map(|page| builder.scope_page(page)));
            }
            Section::Team => slides.push(builder.team(&proposal.team)),
            Section::Timeline => slides.push(builder.timeline(&proposal.gantt)),
            Section::Risk => slides.push(builder.risk(&proposal.risk)),
        }
    }

    for (i, slide) in slides.iter_mut().enumerate() {
        slide.number = i + 1;
    }

    tracing::debug!(slides = slides.len(), "assembled deck");

    Deck {
        title: proposal.document_title(),
        dimensions: options.slide,
        slides,
    }
}

/// Titled slide carrying only the section's empty-state hint. The preview
/// shows it for sections that produce no slides.
pub fn placeholder_slide(section: Section, options: &LayoutOptions) -> Slide {
    let builder = SlideBuilder::new(options);
    let mut slide = builder.titled(section, section.label().to_string());
    builder.hint_if(&mut slide, true);
    slide
}

/// Inch-based placement for each slide type.
struct SlideBuilder<'a> {
    options: &'a LayoutOptions,
    dims: SlideDimensions,
    frame: SlideFrame,
}

impl<'a> SlideBuilder<'a> {
    fn new(options: &'a LayoutOptions) -> Self {
        Self {
            options,
            dims: options.slide,
            frame: SlideFrame::new(options.slide),
        }
    }

    fn rect(&self, x: f64, y: f64, w: f64, h: f64) -> Rect {
        self.frame.rect(x, y, w, h)
    }

    /// Light slide with the standard title and accent underline.
    fn titled(&self, section: Section, title: String) -> Slide {
        let m = self.dims.margin;
        let elements = vec![
            Element::text(
                ElementKind::SlideTitle,
                self.rect(m, TITLE_TOP, self.dims.content_width(), TITLE_HEIGHT),
                title.clone(),
            ),
            Element::shape(ElementKind::TitleAccent, self.rect(m, ACCENT_TOP, 2.0, 0.05)),
        ];
        Slide {
            number: 0,
            section,
            background: SlideBackground::Light,
            title,
            elements,
            empty_hint: None,
        }
    }

    fn hint_if(&self, slide: &mut Slide, empty: bool) {
        if empty {
            slide.empty_hint = Some(slide.section.empty_hint().to_string());
        }
    }

    fn cover(&self, cover: &CoverData) -> Slide {
        let d = self.dims;
        let m = d.margin;
        let title = if cover.title.is_empty() {
            "Proposal".to_string()
        } else {
            cover.title.clone()
        };

        let mut elements = vec![
            Element::text(
                ElementKind::BrandMark,
                self.rect(m, 0.4, 4.0, 0.5),
                self.options.brand_name.clone(),
            ),
            Element::text(ElementKind::CoverTitle, self.rect(m, 2.2, 8.0, 1.2), title.clone()),
        ];
        if !cover.description.is_empty() {
            elements.push(Element::text(
                ElementKind::CoverDescription,
                self.rect(m, 3.5, 8.0, 0.8),
                cover.description.clone(),
            ));
        }
        if !cover.client_name.is_empty() {
            elements.push(Element::text(
                ElementKind::CoverClient,
                self.rect(m, 4.6, 8.0, 0.6),
                cover.client_name.clone(),
            ));
        }
        if let Some(logo) = cover.client_logo_base64.as_ref().filter(|l| !l.is_empty()) {
            elements.push(Element::shape(
                ElementKind::ClientLogo {
                    data_uri: logo.clone(),
                },
                self.rect(d.width - m - 2.5, 0.4, 2.5, 1.2),
            ));
        }
        elements.push(Element::shape(
            ElementKind::FooterRule,
            self.rect(m, d.height - 0.6, d.content_width(), 0.04),
        ));

        Slide {
            number: 0,
            section: Section::Cover,
            background: SlideBackground::Dark,
            title,
            elements,
            empty_hint: None,
        }
    }

    fn challenge(&self, challenge: &ChallengeData) -> Slide {
        let d = self.dims;
        let m = d.margin;
        let mut slide = self.titled(Section::Challenge, Section::Challenge.label().to_string());

        let columns = 2;
        let card_w = (d.content_width() - 0.4) / columns as f64;
        let card_h = 2.0;
        let items = &challenge.items[..challenge.items.len().min(ChallengeData::MAX_ITEMS)];
        for (i, item) in items.iter().enumerate() {
            let x = m + (i % columns) as f64 * (card_w + 0.4);
            let y = 1.6 + (i / columns) as f64 * (card_h + 0.3);
            slide.elements.extend([
                Element::shape(ElementKind::Card, self.rect(x, y, card_w, card_h)),
                Element::text(
                    ElementKind::NumberBadge,
                    self.rect(x + 0.2, y + 0.2, 0.45, 0.45),
                    (i + 1).to_string(),
                ),
                Element::text(
                    ElementKind::CardTitle,
                    self.rect(x + 0.8, y + 0.2, card_w - 1.1, 0.45),
                    item.title.clone(),
                ),
                Element::text(
                    ElementKind::CardBody,
                    self.rect(x + 0.2, y + 0.8, card_w - 0.4, card_h - 1.0),
                    item.description.clone(),
                ),
            ]);
        }

        if !challenge.additional_statement.is_empty() {
            slide.elements.push(Element::shape(
                ElementKind::StatementBanner,
                self.rect(m, d.height - 1.1, d.content_width(), 0.65),
            ));
            slide.elements.push(Element::text(
                ElementKind::StatementText,
                self.rect(m + 0.3, d.height - 1.1, d.content_width() - 0.6, 0.65),
                challenge.additional_statement.clone(),
            ));
        }

        self.hint_if(&mut slide, items.is_empty());
        slide
    }

    fn solution(&self, solution: &SolutionData) -> Slide {
        let m = self.dims.margin;
        let mut slide = self.titled(Section::Solution, Section::Solution.label().to_string());

        let points = &solution.points[..solution.points.len().min(SolutionData::MAX_POINTS)];
        let per_column = points.len().div_ceil(2).max(1);
        let column_w = (self.dims.content_width() - 0.5) / 2.0;
        let row_h = 0.52;
        for (i, point) in points.iter().enumerate() {
            let x = m + (i / per_column) as f64 * (column_w + 0.5);
            let y = 1.6 + (i % per_column) as f64 * row_h;
            slide.elements.push(Element::text(
                ElementKind::CheckBadge,
                self.rect(x, y + 0.05, 0.32, 0.32),
                "\u{2713}",
            ));
            slide.elements.push(Element::text(
                ElementKind::PointText,
                self.rect(x + 0.42, y, column_w - 0.5, row_h),
                point.clone(),
            ));
        }

        self.hint_if(&mut slide, points.is_empty());
        slide
    }

    fn scope_page(&self, page: &FeaturePage<'_>) -> Slide {
        let m = self.dims.margin;
        let inner_w = self.dims.content_width();
        let title = format!("{}{}", Section::Scope.label(), page.counter_suffix());
        let mut slide = self.titled(Section::Scope, title);

        let card_h = 1.2;
        for (i, feature) in page.features.iter().enumerate() {
            let y = 1.5 + i as f64 * (card_h + 0.2);
            slide.elements.extend([
                Element::shape(ElementKind::FeatureAccent, self.rect(m, y, 0.06, card_h)),
                Element::shape(ElementKind::Card, self.rect(m + 0.12, y, inner_w - 0.12, card_h)),
                Element::text(
                    ElementKind::FeatureHeader,
                    self.rect(m + 0.35, y, inner_w - 0.6, 0.45),
                    feature.header.clone(),
                ),
                Element::text(
                    ElementKind::FeatureBody,
                    self.rect(m + 0.35, y + 0.45, inner_w - 0.6, card_h - 0.55),
                    feature.description.clone(),
                ),
            ]);
        }
        slide
    }

    fn team(&self, team: &TeamData) -> Slide {
        let mut slide = self.titled(Section::Team, Section::Team.label().to_string());
        let layout = layout_team(&team.members, &self.dims);

        for group in &layout.groups {
            let role = group.group.role_type;
            slide.elements.push(Element::text(
                ElementKind::RoleHeader,
                group.header,
                format!("{}  {}s", role.icon(), role.as_str()),
            ));

            for (card, member) in group.cards.iter().zip(&group.group.members) {
                let r = &card.rect;
                let w = self.frame.width_of(r);
                slide
                    .elements
                    .push(Element::shape(ElementKind::MemberCard, *r));
                slide.elements.push(Element::text(
                    ElementKind::MemberIcon,
                    self.frame.within(r, 0.0, 0.1, w, 0.5),
                    role.icon(),
                ));
                if let Some(seniority) = member.seniority {
                    slide.elements.push(Element::text(
                        ElementKind::MemberSeniority,
                        self.frame.within(r, 0.0, 0.6, w, 0.3),
                        seniority.as_str(),
                    ));
                }
                slide.elements.push(Element::text(
                    ElementKind::MemberRole,
                    self.frame.within(r, 0.0, 0.85, w, 0.3),
                    role.as_str(),
                ));
                if member.count > 1 {
                    slide.elements.push(Element::text(
                        ElementKind::CountBadge,
                        self.frame.within(r, w - 0.55, 0.05, 0.45, 0.3),
                        format!("\u{00D7}{}", member.count),
                    ));
                }
            }
        }

        self.hint_if(&mut slide, team.members.is_empty());
        slide
    }

    fn timeline(&self, timeline: &Timeline) -> Slide {
        let d = self.dims;
        let m = d.margin;
        let mut slide = self.titled(Section::Timeline, Section::Timeline.label().to_string());
        let layout = if timeline.total_weeks == 0 {
            layout_timeline(&Timeline {
                total_weeks: self.options.default_total_weeks,
                phases: timeline.phases.clone(),
            })
        } else {
            layout_timeline(timeline)
        };

        let chart_x = m + 1.8;
        let chart_w = d.width - chart_x - m;
        let chart_y = 1.6;
        let row_h = 0.65;
        let header_h = 0.5;
        let bar_h = 0.35;
        let rows = layout.phase_bars.len() as f64;

        for marker in &layout.month_markers {
            let x = chart_x + marker.left * chart_w;
            slide.elements.push(Element::text(
                ElementKind::MonthLabel,
                self.rect(x, chart_y, marker.width * chart_w, header_h),
                marker.label.clone(),
            ));
            if marker.index > 0 {
                slide.elements.push(Element::shape(
                    ElementKind::MonthDivider,
                    self.rect(x, chart_y, 0.01, header_h + rows * row_h),
                ));
            }
        }
        slide.elements.push(Element::shape(
            ElementKind::HeaderRule,
            self.rect(chart_x, chart_y + header_h, chart_w, 0.02),
        ));

        for (bar, phase) in layout.phase_bars.iter().zip(&timeline.phases) {
            let y = chart_y + header_h + 0.1 + bar.row as f64 * row_h;
            slide.elements.push(Element::text(
                ElementKind::PhaseLabel,
                self.rect(m, y, 1.7, row_h - 0.1),
                phase.name.clone(),
            ));
            if bar.shaded {
                slide.elements.push(Element::shape(
                    ElementKind::RowShade,
                    self.rect(chart_x, y, chart_w, row_h - 0.1),
                ));
            }
            slide.elements.push(Element::text(
                ElementKind::PhaseBar {
                    color: phase.color.clone(),
                },
                self.rect(
                    chart_x + bar.left * chart_w,
                    y + (row_h - 0.1 - bar_h) / 2.0,
                    bar.width * chart_w,
                    bar_h,
                ),
                bar.label.clone(),
            ));
        }

        let legend_y = chart_y + header_h + 0.1 + rows * row_h + 0.3;
        let legend_item_w = 1.8;
        let legend_x = (d.width - rows * legend_item_w) / 2.0;
        for (i, phase) in timeline.phases.iter().enumerate() {
            let x = legend_x + i as f64 * legend_item_w;
            slide.elements.push(Element::shape(
                ElementKind::LegendSwatch {
                    color: phase.color.clone(),
                },
                self.rect(x, legend_y, 0.25, 0.25),
            ));
            slide.elements.push(Element::text(
                ElementKind::LegendLabel,
                self.rect(x + 0.32, legend_y, legend_item_w - 0.4, 0.25),
                phase.name.clone(),
            ));
        }

        self.hint_if(&mut slide, timeline.phases.is_empty());
        slide
    }

    fn risk(&self, hierarchy: &Hierarchy) -> Slide {
        let mut slide = self.titled(Section::Risk, Section::Risk.label().to_string());
        if hierarchy.nodes.is_empty() {
            self.hint_if(&mut slide, true);
            return slide;
        }

        let layout = layout_hierarchy(hierarchy, &HierarchyGeometry::new(self.dims));
        let dropped = hierarchy.links.len().saturating_sub(layout.connectors.len());
        if dropped > 0 {
            tracing::debug!(dropped, "skipped escalation links with unknown endpoints");
        }

        // Connectors go first so nodes paint over their ends.
        for connector in &layout.connectors {
            slide.elements.push(Element::shape(
                ElementKind::Connector {
                    segment: connector.segment,
                },
                connector.segment.bounds(),
            ));
            if !connector.label.is_empty() {
                let (mid_x, mid_y) = connector.label_anchor();
                let (half_w, half_h) = (self.frame.x(0.6), self.frame.y(0.15));
                slide.elements.push(Element::text(
                    ElementKind::ConnectorLabel,
                    Rect::new(mid_x - half_w, mid_y - half_h, half_w * 2.0, half_h * 2.0),
                    connector.label.clone(),
                ));
            }
        }

        let mut drawn = HashSet::new();
        for node in &hierarchy.nodes {
            // Repeated ids: the first occurrence owns the position.
            if !drawn.insert(node.id.as_str()) {
                continue;
            }
            let Some(position) = layout.positions.get(&node.id) else {
                continue;
            };
            let root = position.root;
            let r = &position.rect;
            let h = self.frame.height_of(r);
            let w = self.frame.width_of(r);
            slide
                .elements
                .push(Element::shape(ElementKind::Node { root }, *r));
            slide.elements.push(Element::text(
                ElementKind::NodeRole { root },
                self.frame.within(r, 0.0, 0.0, w, h * 0.5),
                node.role.clone(),
            ));
            slide.elements.push(Element::text(
                ElementKind::NodeName { root },
                self.frame.within(r, 0.0, h * 0.45, w, h * 0.5),
                node.display_name(),
            ));
        }
        slide
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(deck: &Deck) -> Vec<Section> {
        deck.slides.iter().map(|s| s.section).collect()
    }

    #[test]
    fn empty_proposal_skips_scope_slides() {
        let deck = assemble_deck(&ProposalData::default(), &LayoutOptions::default());
        assert_eq!(
            sections(&deck),
            vec![
                Section::Cover,
                Section::Challenge,
                Section::Solution,
                Section::Team,
                Section::Timeline,
                Section::Risk,
            ]
        );
        let numbers: Vec<usize> = deck.slides.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_sections_carry_a_hint() {
        let deck = assemble_deck(&ProposalData::default(), &LayoutOptions::default());
        let risk = deck.slides_for(Section::Risk).next().unwrap();
        assert_eq!(risk.empty_hint.as_deref(), Some("Add team roles to see preview"));
        let cover = deck.slides_for(Section::Cover).next().unwrap();
        assert!(cover.empty_hint.is_none());
        assert_eq!(cover.title, "Proposal");
    }

    #[test]
    fn scope_pages_become_slides_with_counters() {
        let mut proposal = ProposalData::default();
        proposal.scope.features = (0..9)
            .map(|i| ScopeFeature::new(format!("F{}", i), "desc"))
            .collect();
        let deck = assemble_deck(&proposal, &LayoutOptions::default());
        let titles: Vec<&str> = deck
            .slides_for(Section::Scope)
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Scope & Features (1/3)",
                "Scope & Features (2/3)",
                "Scope & Features (3/3)",
            ]
        );
        assert_eq!(deck.section_start(Section::Scope), Some(3));
        assert_eq!(deck.section_start(Section::Team), Some(6));
    }

    #[test]
    fn challenge_keeps_first_four_items() {
        let mut proposal = ProposalData::default();
        proposal.challenge.items = (0..6).map(|i| ChallengeItem::new(format!("C{}", i), "")).collect();
        let deck = assemble_deck(&proposal, &LayoutOptions::default());
        let slide = deck.slides_for(Section::Challenge).next().unwrap();
        let badges = slide
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::NumberBadge)
            .count();
        assert_eq!(badges, 4);
    }

    #[test]
    fn solution_fills_columns_top_to_bottom() {
        let mut proposal = ProposalData::default();
        proposal.solution.points = (0..5).map(|i| format!("P{}", i)).collect();
        let deck = assemble_deck(&proposal, &LayoutOptions::default());
        let slide = deck.slides_for(Section::Solution).next().unwrap();
        let texts: Vec<&Element> = slide
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::PointText)
            .collect();
        // Three in the left column, two in the right.
        assert_eq!(texts[2].rect.left, texts[0].rect.left);
        assert!(texts[3].rect.left > texts[0].rect.left);
        assert_eq!(texts[3].rect.top, texts[0].rect.top);
    }

    #[test]
    fn every_node_is_drawn_once() {
        let proposal = ProposalData::sample();
        let deck = assemble_deck(&proposal, &LayoutOptions::default());
        let slide = deck.slides_for(Section::Risk).next().unwrap();
        let nodes = slide
            .elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Node { .. }))
            .count();
        assert_eq!(nodes, proposal.risk.nodes.len());
        let roots = slide
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::Node { root: true })
            .count();
        assert_eq!(roots, 1);
    }

    #[test]
    fn timeline_bar_spans_the_chart_track_proportionally() {
        let mut proposal = ProposalData::default();
        proposal.gantt = Timeline {
            total_weeks: 20,
            phases: vec![Phase::new("MVP", 5, 16)],
        };
        let options = LayoutOptions::default();
        let deck = assemble_deck(&proposal, &options);
        let slide = deck.slides_for(Section::Timeline).next().unwrap();
        let bar = slide
            .elements
            .iter()
            .find(|e| matches!(e.kind, ElementKind::PhaseBar { .. }))
            .unwrap();
        let d = options.slide;
        let chart_x = d.margin + 1.8;
        let chart_w = d.width - chart_x - d.margin;
        assert!((bar.rect.left * d.width - (chart_x + 0.2 * chart_w)).abs() < 1e-9);
        assert!((bar.rect.width * d.width - 0.6 * chart_w).abs() < 1e-9);
        assert_eq!(bar.label.as_deref(), Some("W5\u{2013}W16"));
    }

    #[test]
    fn team_count_badge_only_for_multiples() {
        let mut proposal = ProposalData::default();
        proposal.team.members = vec![
            TeamMember::new(RoleType::Engineer, Some(Seniority::Senior), 3),
            TeamMember::new(RoleType::Designer, None, 1),
        ];
        let deck = assemble_deck(&proposal, &LayoutOptions::default());
        let slide = deck.slides_for(Section::Team).next().unwrap();
        let badges: Vec<&str> = slide
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::CountBadge)
            .filter_map(|e| e.label.as_deref())
            .collect();
        assert_eq!(badges, vec!["\u{00D7}3"]);
        let headers: Vec<&str> = slide
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::RoleHeader)
            .filter_map(|e| e.label.as_deref())
            .collect();
        assert_eq!(headers.len(), 2);
        assert!(headers[0].ends_with("Engineers"));
    }
}
