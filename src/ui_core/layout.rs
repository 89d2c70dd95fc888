//! Grid placement for desktop and narrow viewports.
//!
//! Desktop placement is authorial: explicit start lines plus spans, no
//! collision checks. Narrow placement is a deterministic reflow: sort by
//! `(row, column)` with missing coordinates last, drop the coordinates,
//! and recompute spans for the fixed two-column grid.

use crate::types::BlockRecord;
use crate::ui_core::policy::ViewportClass;
use serde::Serialize;

/// Sort key used for any missing coordinate; larger than any real line.
pub const UNPLACED: u32 = u32::MAX;

/// Number of columns in the narrow grid.
pub const NARROW_COLUMNS: u32 = 2;

/// Where one block lands in the grid. `None` start lines mean natural flow
/// on that axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Index into the authored block list.
    pub index: usize,
    pub block_id: String,
    pub column_start: Option<u32>,
    pub row_start: Option<u32>,
    pub col_span: u32,
    pub row_span: u32,
}

impl Placement {
    /// CSS `grid-column` / `grid-row` declarations for this placement.
    pub fn to_css(&self) -> String {
        format!(
            "grid-column:{};grid-row:{};",
            axis_css(self.column_start, self.col_span),
            axis_css(self.row_start, self.row_span)
        )
    }
}

fn axis_css(start: Option<u32>, span: u32) -> String {
    match start {
        Some(start) => format!("{start} / {}", start.saturating_add(span)),
        None => format!("span {span}"),
    }
}

/// Narrow-grid spans as a pure function of the authored desktop spans.
///
/// Blocks four or more columns wide take the full narrow row; blocks three
/// or four columns wide get at least two rows.
pub fn mobile_spans(col_span: u32, row_span: u32) -> (u32, u32) {
    let col = if col_span >= 4 { 2 } else { 1 };
    let row = if (3..5).contains(&col_span) {
        row_span.max(2)
    } else {
        row_span
    };
    (col, row)
}

/// Authored placement, in authored order.
pub fn desktop_layout(blocks: &[BlockRecord]) -> Vec<Placement> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| Placement {
            index,
            block_id: block.id.clone(),
            column_start: block.grid_column,
            row_start: block.grid_row,
            col_span: block.col_span.max(1),
            row_span: block.row_span.max(1),
        })
        .collect()
}

/// Reflow order: `(row, column)` ascending, missing coordinates last,
/// ties kept in authored order.
pub fn reflow_order(blocks: &[BlockRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..blocks.len()).collect();
    // sort_by_key is stable
    order.sort_by_key(|&i| {
        let block = &blocks[i];
        (
            block.grid_row.unwrap_or(UNPLACED),
            block.grid_column.unwrap_or(UNPLACED),
        )
    });
    order
}

/// Narrow placement: reflowed order, no explicit lines, recomputed spans.
pub fn narrow_layout(blocks: &[BlockRecord]) -> Vec<Placement> {
    reflow_order(blocks)
        .into_iter()
        .map(|index| {
            let block = &blocks[index];
            let (col_span, row_span) = mobile_spans(block.col_span.max(1), block.row_span.max(1));
            Placement {
                index,
                block_id: block.id.clone(),
                column_start: None,
                row_start: None,
                col_span,
                row_span,
            }
        })
        .collect()
}

/// Placement sequence for a viewport class.
pub fn layout(blocks: &[BlockRecord], viewport: ViewportClass) -> Vec<Placement> {
    let placements = match viewport {
        ViewportClass::Desktop => desktop_layout(blocks),
        ViewportClass::Narrow => narrow_layout(blocks),
    };
    crate::debug::log_with(crate::debug::cat::LAYOUT, || {
        format!("{} placements for {viewport:?}", placements.len())
    });
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockKind;

    fn placed(id: &str, col: Option<u32>, row: Option<u32>, col_span: u32, row_span: u32) -> BlockRecord {
        let mut block = BlockRecord::new(id, BlockKind::Text);
        block.grid_column = col;
        block.grid_row = row;
        block.col_span = col_span;
        block.row_span = row_span;
        block
    }

    #[test]
    fn test_mobile_spans_table() {
        assert_eq!(mobile_spans(1, 1), (1, 1));
        assert_eq!(mobile_spans(2, 3), (1, 3));
        assert_eq!(mobile_spans(3, 1), (1, 2));
        assert_eq!(mobile_spans(3, 4), (1, 4));
        assert_eq!(mobile_spans(4, 1), (2, 2));
        assert_eq!(mobile_spans(4, 5), (2, 5));
        assert_eq!(mobile_spans(5, 1), (2, 1));
        assert_eq!(mobile_spans(9, 1), (2, 1));
    }

    #[test]
    fn test_reflow_sorts_rows_then_columns() {
        let blocks = vec![
            placed("c", Some(1), Some(3), 1, 1),
            placed("b", Some(5), Some(1), 1, 1),
            placed("a", Some(2), Some(1), 1, 1),
            placed("free", None, None, 1, 1),
            placed("d", Some(1), Some(2), 1, 1),
        ];
        let ids: Vec<_> = narrow_layout(&blocks).into_iter().map(|p| p.block_id).collect();
        assert_eq!(ids, vec!["a", "b", "d", "c", "free"]);
    }

    #[test]
    fn test_reflow_is_stable_for_ties() {
        let blocks = vec![
            placed("first", None, None, 1, 1),
            placed("second", None, None, 1, 1),
            placed("x", Some(1), Some(1), 1, 1),
            placed("x2", Some(1), Some(1), 1, 1),
        ];
        let ids: Vec<_> = narrow_layout(&blocks).into_iter().map(|p| p.block_id).collect();
        assert_eq!(ids, vec!["x", "x2", "first", "second"]);
    }

    #[test]
    fn test_partial_coordinates() {
        // Row only: sorts by row, column treated as missing
        let blocks = vec![placed("col-only", Some(1), None, 1, 1), placed("row-only", None, Some(4), 1, 1)];
        let ids: Vec<_> = narrow_layout(&blocks).into_iter().map(|p| p.block_id).collect();
        assert_eq!(ids, vec!["row-only", "col-only"]);

        let desktop = desktop_layout(&blocks);
        assert_eq!(desktop[0].to_css(), "grid-column:1 / 2;grid-row:span 1;");
        assert_eq!(desktop[1].to_css(), "grid-column:span 1;grid-row:4 / 5;");
    }

    #[test]
    fn test_desktop_keeps_authored_order_and_overlaps() {
        let blocks = vec![placed("a", Some(1), Some(1), 3, 2), placed("b", Some(2), Some(1), 3, 2)];
        let placements = layout(&blocks, ViewportClass::Desktop);
        assert_eq!(placements[0].to_css(), "grid-column:1 / 4;grid-row:1 / 3;");
        assert_eq!(placements[1].column_start, Some(2));
    }

    #[test]
    fn test_narrow_drops_coordinates() {
        let blocks = vec![placed("wide", Some(1), Some(1), 9, 1)];
        let placements = layout(&blocks, ViewportClass::Narrow);
        assert_eq!(placements[0].to_css(), "grid-column:span 2;grid-row:span 1;");
    }

    #[test]
    fn test_layout_is_idempotent() {
        let blocks = vec![
            placed("a", Some(4), Some(2), 3, 1),
            placed("b", None, Some(1), 5, 2),
            placed("c", Some(1), Some(2), 4, 1),
        ];
        assert_eq!(narrow_layout(&blocks), narrow_layout(&blocks));
        assert_eq!(desktop_layout(&blocks), desktop_layout(&blocks));
    }
}
