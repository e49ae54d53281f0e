use crate::{Area, IdAllocator, Item, ItemId, Section};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Section layouts offered by the layout picker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    SingleColumn,
    TwoColumns,
    ThreeColumns,
    OneThirdLeft,
    OneThirdRight,
    Vertical,
    FullWidth,
}

impl LayoutKind {
    /// Parse a layout keyword. Unknown keywords fall back to `FullWidth`.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "single-column" | "one-column" | "single" => LayoutKind::SingleColumn,
            "two-columns" | "two-column" => LayoutKind::TwoColumns,
            "three-columns" | "three-column" => LayoutKind::ThreeColumns,
            "one-third-left" => LayoutKind::OneThirdLeft,
            "one-third-right" => LayoutKind::OneThirdRight,
            "vertical" => LayoutKind::Vertical,
            _ => LayoutKind::FullWidth,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            LayoutKind::SingleColumn => "single-column",
            LayoutKind::TwoColumns => "two-columns",
            LayoutKind::ThreeColumns => "three-columns",
            LayoutKind::OneThirdLeft => "one-third-left",
            LayoutKind::OneThirdRight => "one-third-right",
            LayoutKind::Vertical => "vertical",
            LayoutKind::FullWidth => "full-width",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutKind::SingleColumn => "Single Column",
            LayoutKind::TwoColumns => "Two Columns",
            LayoutKind::ThreeColumns => "Three Columns",
            LayoutKind::OneThirdLeft => "One Third Left",
            LayoutKind::OneThirdRight => "One Third Right",
            LayoutKind::Vertical => "Vertical",
            LayoutKind::FullWidth => "Full Width",
        }
    }

    /// Names of the areas a fresh section of this layout gets, in order
    pub fn area_names(&self) -> &'static [&'static str] {
        match self {
            LayoutKind::SingleColumn => &["Main"],
            LayoutKind::TwoColumns => &["Left", "Right"],
            LayoutKind::ThreeColumns => &["Left", "Center", "Right"],
            LayoutKind::OneThirdLeft => &["Left (1/3)", "Right (2/3)"],
            LayoutKind::OneThirdRight => &["Left (2/3)", "Right (1/3)"],
            LayoutKind::Vertical => &["Top", "Bottom"],
            LayoutKind::FullWidth => &["Full Width"],
        }
    }
}

impl FromStr for LayoutKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_keyword(s))
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Where a newly created section should be spliced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertPosition {
    pub relative_to: ItemId,
    pub placement: Placement,
}

impl InsertPosition {
    pub fn above(relative_to: ItemId) -> Self {
        Self {
            relative_to,
            placement: Placement::Above,
        }
    }

    pub fn below(relative_to: ItemId) -> Self {
        Self {
            relative_to,
            placement: Placement::Below,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

/// Builds sections with fresh ids and empty areas
pub struct LayoutFactory;

impl LayoutFactory {
    pub fn create_section(layout: LayoutKind, ids: &mut IdAllocator) -> Section {
        let areas = layout
            .area_names()
            .iter()
            .map(|name| Area::new(ids.next_id(), *name))
            .collect();

        Section {
            id: ids.next_id(),
            name: format!("{} Section", layout.display_name()),
            layout,
            areas,
        }
    }

    /// Insert `section` according to `position`, returning the new list and
    /// the index the section landed at. A missing reference id appends.
    pub fn splice_section(
        items: &[Item],
        section: Section,
        position: Option<InsertPosition>,
    ) -> (Vec<Item>, usize) {
        let mut next = items.to_vec();

        let index = position
            .and_then(|pos| {
                crate::item::position_of(items, pos.relative_to).map(|idx| match pos.placement {
                    Placement::Above => idx,
                    Placement::Below => idx + 1,
                })
            })
            .unwrap_or(next.len());

        next.insert(index, Item::Section(section));
        (next, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Widget, WidgetType};

    #[test]
    fn test_area_counts_per_layout() {
        let mut ids = IdAllocator::new();
        let cases = [
            (LayoutKind::SingleColumn, 1),
            (LayoutKind::TwoColumns, 2),
            (LayoutKind::ThreeColumns, 3),
            (LayoutKind::OneThirdLeft, 2),
            (LayoutKind::OneThirdRight, 2),
            (LayoutKind::Vertical, 2),
            (LayoutKind::FullWidth, 1),
        ];

        for (layout, expected) in cases {
            let section = LayoutFactory::create_section(layout, &mut ids);
            assert_eq!(section.areas.len(), expected, "{}", layout);
            assert!(section.areas.iter().all(|a| a.widgets.is_empty()));
            assert_eq!(section.layout, layout);
        }
    }

    #[test]
    fn test_two_columns_area_names() {
        let section =
            LayoutFactory::create_section(LayoutKind::TwoColumns, &mut IdAllocator::new());
        let names: Vec<&str> = section.areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Left", "Right"]);
        assert_ne!(section.areas[0].id, section.areas[1].id);
        assert_ne!(section.id, section.areas[0].id);
    }

    #[test]
    fn test_unknown_keyword_falls_back() {
        assert_eq!(LayoutKind::from_keyword("hexagonal"), LayoutKind::FullWidth);
        assert_eq!(LayoutKind::from_keyword("Two-Columns"), LayoutKind::TwoColumns);
        assert_eq!("vertical".parse::<LayoutKind>().unwrap(), LayoutKind::Vertical);

        let section =
            LayoutFactory::create_section(LayoutKind::from_keyword(""), &mut IdAllocator::new());
        assert_eq!(section.areas.len(), 1);
        assert_eq!(section.areas[0].name, "Full Width");
    }

    #[test]
    fn test_keyword_round_trip() {
        for layout in [
            LayoutKind::SingleColumn,
            LayoutKind::TwoColumns,
            LayoutKind::ThreeColumns,
            LayoutKind::OneThirdLeft,
            LayoutKind::OneThirdRight,
            LayoutKind::Vertical,
            LayoutKind::FullWidth,
        ] {
            assert_eq!(LayoutKind::from_keyword(layout.keyword()), layout);
        }
    }

    #[test]
    fn test_splice_section_positions() {
        let mut ids = IdAllocator::new();
        let first = Item::Widget(Widget::new(ids.next_id(), WidgetType::Heading, "default"));
        let second = Item::Widget(Widget::new(ids.next_id(), WidgetType::Text, "default"));
        let items = vec![first.clone(), second.clone()];

        let section = LayoutFactory::create_section(LayoutKind::SingleColumn, &mut ids);
        let (above, index) = LayoutFactory::splice_section(
            &items,
            section.clone(),
            Some(InsertPosition::above(second.id())),
        );
        assert_eq!(index, 1);
        assert!(above[1].is_section());

        let (below, index) = LayoutFactory::splice_section(
            &items,
            section.clone(),
            Some(InsertPosition::below(first.id())),
        );
        assert_eq!(index, 1);
        assert!(below[1].is_section());

        let (missing, index) = LayoutFactory::splice_section(
            &items,
            section.clone(),
            Some(InsertPosition::below(ids.next_id())),
        );
        assert_eq!(index, 2);
        assert!(missing[2].is_section());

        let (appended, index) = LayoutFactory::splice_section(&items, section, None);
        assert_eq!(index, 2);
        assert_eq!(appended.len(), 3);
    }
}
