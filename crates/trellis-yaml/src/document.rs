//! Grid documents: a whole grid, its options and its elements in one file.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use trellis_core::{FixedElement, Insets, LayoutElement, Rect, Size};
use trellis_layout::{GridConstraints, GridLayoutManager, GridOptions};

const fn default_visible() -> bool {
    true
}

/// One element of a grid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Unique element id
    pub id: String,
    /// Intrinsic minimum size as `[width, height]`
    #[serde(default)]
    pub minimum: [i32; 2],
    /// Intrinsic preferred size; defaults to the minimum
    #[serde(default)]
    pub preferred: Option<[i32; 2]>,
    /// Intrinsic maximum size; unbounded when absent
    #[serde(default)]
    pub maximum: Option<[i32; 2]>,
    /// Visibility flag
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Whether the element is a gap-collapsing filler
    #[serde(default)]
    pub filler: bool,
    /// Placement and sizing directives
    #[serde(default)]
    pub constraints: GridConstraints,
}

impl ElementSpec {
    /// The element this spec describes.
    #[must_use]
    pub fn element(&self) -> FixedElement {
        let minimum = size(self.minimum);
        let preferred = self.preferred.map_or(minimum, size);
        let maximum = self.maximum.map_or(Size::UNBOUNDED, size);
        FixedElement::new(minimum, preferred)
            .with_maximum(maximum)
            .with_visible(self.visible)
            .with_filler(self.filler)
    }

    fn validate(&self, index: usize) -> Result<(), DocumentError> {
        if self.id.is_empty() {
            return Err(DocumentError::EmptyId(index));
        }
        let sizes = [
            ("minimum", Some(self.minimum)),
            ("preferred", self.preferred),
            ("maximum", self.maximum),
        ];
        for (field, value) in sizes {
            if let Some([width, height]) = value {
                if width < 0 || height < 0 {
                    return Err(DocumentError::NegativeSize {
                        id: self.id.clone(),
                        field,
                        width,
                        height,
                    });
                }
            }
        }
        Ok(())
    }
}

const fn size([width, height]: [i32; 2]) -> Size {
    Size::new(width, height)
}

/// A grid layout described in YAML.
///
/// ```yaml
/// rows: 1
/// columns: 2
/// options: { h_gap: 5 }
/// elements:
///   - id: label
///     minimum: [40, 20]
///   - id: field
///     minimum: [40, 20]
///     preferred: [120, 20]
///     constraints: { column: 1, fill: Horizontal, h_size_policy: "CAN_SHRINK | WANT_GROW" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridDocument {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Gaps, margin and sizing modes
    #[serde(default)]
    pub options: GridOptions,
    /// Host insets applied to every measurement and layout
    #[serde(default)]
    pub insets: Insets,
    /// Elements in attach order
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

impl GridDocument {
    /// Parse a document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serialize the document to a YAML string.
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check element ids and intrinsic sizes.
    ///
    /// Constraints are checked against the grid by [`GridDocument::build`].
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for (index, spec) in self.elements.iter().enumerate() {
            spec.validate(index)?;
            if !seen.insert(spec.id.as_str()) {
                return Err(DocumentError::DuplicateId(spec.id.clone()));
            }
        }
        Ok(())
    }

    /// Build the grid this document describes.
    pub fn build(&self) -> Result<DocumentGrid, DocumentError> {
        self.validate()?;

        let mut grid =
            GridLayoutManager::with_options(self.rows, self.columns, self.options.clone())?;
        for spec in &self.elements {
            grid.add(spec.element(), spec.constraints.clone())
                .map_err(|source| DocumentError::Element {
                    id: spec.id.clone(),
                    source,
                })?;
        }

        debug!(
            rows = self.rows,
            columns = self.columns,
            elements = self.elements.len(),
            "built grid from document"
        );

        Ok(DocumentGrid {
            grid,
            ids: self.elements.iter().map(|spec| spec.id.clone()).collect(),
            insets: self.insets,
        })
    }
}

/// Final bounds of one document element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Element id
    pub id: String,
    /// Bounds from the last layout pass
    pub bounds: Rect,
    /// Whether the element took part in layout
    pub visible: bool,
}

/// A grid built from a document, with element ids in attach order.
#[derive(Debug)]
pub struct DocumentGrid {
    /// The grid itself
    pub grid: GridLayoutManager<FixedElement>,
    /// Element ids, index-aligned with the grid's children
    pub ids: Vec<String>,
    /// Host insets from the document
    pub insets: Insets,
}

impl DocumentGrid {
    /// Minimum size including the document insets.
    pub fn minimum_size(&mut self) -> Size {
        self.grid.minimum_size(self.insets)
    }

    /// Preferred size including the document insets.
    pub fn preferred_size(&mut self) -> Size {
        self.grid.preferred_size(self.insets)
    }

    /// Lay the grid out inside a container of `size`.
    pub fn layout(&mut self, size: Size) {
        self.grid.layout(size, self.insets);
    }

    /// Index of the element with `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Bounds of every element, in document order.
    pub fn placements(&self) -> Vec<Placement> {
        self.ids
            .iter()
            .zip(self.grid.children())
            .map(|(id, child)| Placement {
                id: id.clone(),
                bounds: child.element().bounds(),
                visible: child.element().is_visible(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_layout::{Anchor, Fill, LayoutError, SizePolicy};

    const FORM_YAML: &str = r#"
rows: 2
columns: 2
options:
  h_gap: 5
  v_gap: 3
insets: { top: 1, left: 2, bottom: 1, right: 2 }
elements:
  - id: name-label
    minimum: [60, 20]
    constraints: { row: 0, column: 0, anchor: WEST }
  - id: name-field
    minimum: [40, 20]
    preferred: [120, 20]
    constraints:
      row: 0
      column: 1
      fill: Horizontal
      h_size_policy: CAN_SHRINK | CAN_GROW | WANT_GROW
  - id: notes
    minimum: [100, 40]
    maximum: [400, 80]
    constraints: { row: 1, column: 0, col_span: 2, fill: Both }
"#;

    // =========================================================================
    // Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_document() {
        let doc = GridDocument::from_yaml(FORM_YAML).unwrap();
        assert_eq!(doc.rows, 2);
        assert_eq!(doc.columns, 2);
        assert_eq!(doc.options.h_gap, 5);
        assert_eq!(doc.options.min_cell_size, 7);
        assert_eq!(doc.insets, Insets::new(1, 2, 1, 2));
        assert_eq!(doc.elements.len(), 3);
    }

    #[test]
    fn test_parse_constraints() {
        let doc = GridDocument::from_yaml(FORM_YAML).unwrap();
        let label = &doc.elements[0].constraints;
        assert_eq!(label.anchor(), Anchor::WEST);
        assert_eq!(label.h_size_policy(), SizePolicy::default());

        let field = &doc.elements[1].constraints;
        assert_eq!(field.fill(), Fill::Horizontal);
        assert_eq!(field.h_size_policy(), SizePolicy::all());

        let notes = &doc.elements[2].constraints;
        assert_eq!(notes.col_span(), 2);
        assert_eq!(notes.row_span(), 1);
    }

    #[test]
    fn test_element_defaults() {
        let doc = GridDocument::from_yaml(FORM_YAML).unwrap();
        let label = doc.elements[0].element();
        assert_eq!(label.preferred, Size::new(60, 20));
        assert_eq!(label.maximum, Size::UNBOUNDED);
        assert!(label.visible);
        assert!(!label.filler);

        let notes = doc.elements[2].element();
        assert_eq!(notes.maximum, Size::new(400, 80));
    }

    #[test]
    fn test_unknown_top_level_field_is_rejected() {
        let err = GridDocument::from_yaml("rows: 1\ncolumns: 1\nsurprise: 3\n").unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
    }

    #[test]
    fn test_missing_dimensions_are_rejected() {
        assert!(GridDocument::from_yaml("columns: 1\n").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let doc = GridDocument::from_yaml(FORM_YAML).unwrap();
        let yaml = doc.to_yaml().unwrap();
        assert_eq!(GridDocument::from_yaml(&yaml).unwrap(), doc);
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let yaml = concat!(
            "rows: 1\ncolumns: 2\nelements:\n",
            "  - id: a\n",
            "  - id: a\n    constraints: { column: 1 }\n",
        );
        let doc = GridDocument::from_yaml(yaml).unwrap();
        assert!(matches!(doc.validate(), Err(DocumentError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let doc = GridDocument::from_yaml("rows: 1\ncolumns: 1\nelements:\n  - id: ''\n").unwrap();
        assert!(matches!(doc.build(), Err(DocumentError::EmptyId(0))));
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let yaml = "rows: 1\ncolumns: 1\nelements:\n  - id: a\n    preferred: [-5, 10]\n";
        let doc = GridDocument::from_yaml(yaml).unwrap();
        assert!(matches!(
            doc.validate(),
            Err(DocumentError::NegativeSize {
                field: "preferred",
                width: -5,
                ..
            })
        ));
    }

    #[test]
    fn test_out_of_range_element_names_the_element() {
        let yaml = concat!(
            "rows: 1\ncolumns: 1\nelements:\n",
            "  - id: stray\n    constraints: { row: 3 }\n",
        );
        let doc = GridDocument::from_yaml(yaml).unwrap();
        match doc.build() {
            Err(DocumentError::Element { id, source }) => {
                assert_eq!(id, "stray");
                assert_eq!(
                    source,
                    LayoutError::RowOutOfRange {
                        row: 3,
                        row_count: 1
                    }
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_grid_is_rejected() {
        let doc = GridDocument::from_yaml("rows: 0\ncolumns: 1\n").unwrap();
        assert!(matches!(
            doc.build(),
            Err(DocumentError::Grid(LayoutError::InvalidGridSize { .. }))
        ));
    }

    // =========================================================================
    // Build Tests
    // =========================================================================

    #[test]
    fn test_build_and_layout() {
        let doc = GridDocument::from_yaml(FORM_YAML).unwrap();
        let mut built = doc.build().unwrap();
        assert_eq!(built.ids, vec!["name-label", "name-field", "notes"]);
        assert_eq!(built.index_of("notes"), Some(2));
        assert_eq!(built.index_of("missing"), None);

        // 60 + 120 + gap 5 + insets 4; 20 + 40 + gap 3 + insets 2
        assert_eq!(built.preferred_size(), Size::new(189, 65));

        built.layout(Size::new(289, 65));
        let placements = built.placements();
        assert_eq!(placements[0].bounds, Rect::new(2, 1, 60, 20));
        assert_eq!(placements[1].bounds, Rect::new(67, 1, 220, 20));
        assert!(placements.iter().all(|p| p.visible));
    }
}
