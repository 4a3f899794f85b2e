use gantt_scene_protocol::{
    HAlign, Line, ModelRef, Point, Rectangle, Scene, Style, Text, TextMetrics, VAlign,
};
use log::debug;

use crate::config::TableConfig;
use crate::model::{Column, Row};

/// Appended to truncated cell text.
const ELLIPSIS: &str = "... ";
/// Character whose width stands in for an average glyph when truncating.
const REPRESENTATIVE_CHAR: &str = "m";

/// A laid-out table and the pixel size it occupies.
#[derive(Debug, Clone)]
pub struct TableScene {
    pub scene: Scene,
    pub width: f64,
    pub height: f64,
}

/// Lay out a header and one band per row.
///
/// Columns are placed left to right starting at `horizontal_offset`. Cells
/// that do not fit their column are truncated with an ellipsis; row values
/// keyed by a column that is not in `columns` are ignored.
pub fn layout_table(
    columns: &[Column],
    rows: &[Row],
    config: &TableConfig,
    metrics: &dyn TextMetrics,
) -> TableScene {
    if columns.is_empty() {
        return TableScene {
            scene: Scene::new(),
            width: 0.0,
            height: 0.0,
        };
    }

    let widths = column_widths(columns, rows, config, metrics);
    let width = widths.iter().sum::<f64>() + 2.0 * config.horizontal_offset;
    let height = config.header_height + config.row_height * rows.len() as f64;

    let mut scene = Scene::new();

    // Header
    let mut x = config.horizontal_offset;
    for (column, &col_width) in columns.iter().zip(&widths) {
        let cell = Rectangle::new(x, 0.0, col_width, config.header_height, Style::TimelineArea);
        let middle_y = cell.rect().middle_y();
        scene.push_rect(cell);
        scene.push_line(Line::new(
            Point::new(x, config.header_height),
            Point::new(x + col_width, config.header_height),
            Style::TimelineBorderBottom,
        ));
        scene.push_text(
            Text::fixed(
                Point::new(x + config.text_padding, middle_y),
                Style::HeaderText,
                truncate(&column.name, col_width, metrics),
            )
            .with_alignment(HAlign::Left, VAlign::Center),
        );
        x += col_width;
    }

    // Rows
    for (index, row) in rows.iter().enumerate() {
        let top = config.header_height + config.row_height * index as f64;
        let bottom = top + config.row_height;
        let style = if index % 2 == 1 { Style::OddRow } else { Style::Row };
        scene.push_rect(
            Rectangle::new(0.0, top, width, config.row_height, style)
                .with_model(ModelRef::Row(index)),
        );
        scene.push_line(Line::new(
            Point::new(0.0, bottom),
            Point::new(width, bottom),
            Style::RowBorder,
        ));

        let middle_y = top + config.row_height / 2.0;
        let mut left = config.horizontal_offset;
        for (column, &col_width) in columns.iter().zip(&widths) {
            if let Some(value) = row.value(&column.key) {
                let x = match column.alignment {
                    HAlign::Left => left + config.text_padding + indent_px(column, row, config),
                    HAlign::Right => left + col_width - config.text_padding,
                    HAlign::Center => left + col_width / 2.0,
                };
                scene.push_text(
                    Text::fixed(
                        Point::new(x, middle_y),
                        Style::CellText,
                        truncate(value, col_width, metrics),
                    )
                    .with_alignment(column.alignment, VAlign::Center),
                );
            }
            left += col_width;
        }
    }

    debug!(
        "laid out {} columns x {} rows into {width}x{height}px ({} primitives)",
        columns.len(),
        rows.len(),
        scene.len()
    );

    TableScene {
        scene,
        width,
        height,
    }
}

fn indent_px(column: &Column, row: &Row, config: &TableConfig) -> f64 {
    if column.is_tree_column {
        f64::from(row.depth) * config.indent_unit
    } else {
        0.0
    }
}

/// Pixel width of every column: its fixed width, or the widest of its name
/// and its (indented) cell values.
pub fn column_widths(
    columns: &[Column],
    rows: &[Row],
    config: &TableConfig,
    metrics: &dyn TextMetrics,
) -> Vec<f64> {
    columns
        .iter()
        .map(|column| {
            column.width.unwrap_or_else(|| {
                rows.iter()
                    .filter_map(|row| {
                        row.value(&column.key)
                            .map(|v| indent_px(column, row, config) + metrics.text_width(v))
                    })
                    .fold(metrics.text_width(&column.name), f64::max)
            })
        })
        .collect()
}

/// Shorten `text` so it fits `limit` pixels, ending it with `"... "`.
///
/// The number of kept characters is estimated from the width of `"m"`. When
/// the estimate would not actually shorten the string it is returned as is,
/// so a string that fits is never changed.
pub fn truncate(text: &str, limit: f64, metrics: &dyn TextMetrics) -> String {
    if metrics.text_width(text) <= limit {
        return text.to_owned();
    }
    let letter_width = metrics.text_width(REPRESENTATIVE_CHAR);
    if letter_width <= 0.0 {
        return text.to_owned();
    }
    let letters = ((limit - metrics.text_width(ELLIPSIS)) / letter_width)
        .floor()
        .max(0.0) as usize;
    if letters < text.chars().count() {
        let mut fit: String = text.chars().take(letters).collect();
        fit.push_str(ELLIPSIS);
        fit
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use gantt_scene_protocol::{MonospaceMetrics, Rect, RenderCommand};

    use super::*;

    fn metrics() -> MonospaceMetrics {
        MonospaceMetrics::new(10.0, 12.0)
    }

    fn labels(table: &TableScene) -> Vec<(String, Point, HAlign, Style)> {
        table
            .scene
            .to_commands(&metrics())
            .into_iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText {
                    position,
                    text,
                    style,
                    h_align,
                    ..
                } => Some((text.to_string(), position, h_align, style)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_columns_give_empty_scene() {
        let table = layout_table(&[], &[Row::new(0)], &TableConfig::default(), &metrics());
        assert!(table.scene.is_empty());
        assert_eq!((table.width, table.height), (0.0, 0.0));
    }

    #[test]
    fn width_follows_indented_content() {
        let config = TableConfig {
            horizontal_offset: 3.0,
            ..TableConfig::default()
        };
        let columns = [Column::new("name", "Name").tree()];
        let rows = [
            Row::new(0).with_value("name", "Design"),
            Row::new(2).with_value("name", "Mockups"),
        ];
        let table = layout_table(&columns, &rows, &config, &metrics());
        // 2 * 15 indent + 7 chars * 10px, plus the offset on both sides.
        assert!((table.width - (100.0 + 6.0)).abs() < f64::EPSILON);
        assert!((table.height - (30.0 + 2.0 * 24.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn header_name_can_dominate_width() {
        let columns = [Column::new("d", "Duration")];
        let rows = [Row::new(0).with_value("d", "3")];
        let widths = column_widths(&columns, &rows, &TableConfig::default(), &metrics());
        assert_eq!(widths, vec![80.0]);
    }

    #[test]
    fn fixed_width_wins_and_truncates() {
        let columns = [Column::new("name", "Name").with_width(80.0)];
        let rows = [Row::new(0).with_value("name", "Requirements gathering")];
        let table = layout_table(&columns, &rows, &TableConfig::default(), &metrics());
        assert!((table.width - 80.0).abs() < f64::EPSILON);
        let cell = labels(&table).into_iter().find(|l| l.3 == Style::CellText);
        // (80 - 40) / 10 = 4 characters survive.
        assert_eq!(cell.map(|l| l.0), Some("Requ... ".to_owned()));
    }

    #[test]
    fn truncation_leaves_fitting_text_alone() {
        let m = metrics();
        assert_eq!(truncate("fits", 40.0, &m), "fits");
        assert_eq!(truncate("", 0.0, &m), "");
        assert_eq!(truncate("abcdefghijkl", 20.0, &m), "... ");
    }

    /// Every glyph is 10px wide except a 1px `m`.
    struct NarrowM;

    impl TextMetrics for NarrowM {
        fn text_width(&self, text: &str) -> f64 {
            text.chars().map(|c| if c == 'm' { 1.0 } else { 10.0 }).sum()
        }

        fn text_height(&self, _text: &str) -> f64 {
            10.0
        }
    }

    #[test]
    fn estimate_not_shorter_keeps_text() {
        // Too wide (50 > 45) but (45 - 40) / 1 = 5 letters would survive.
        assert_eq!(truncate("abcde", 45.0, &NarrowM), "abcde");
        assert_eq!(truncate("abcdef", 45.0, &NarrowM), "abcde... ");
    }

    #[test]
    fn zero_width_glyphs_never_truncate() {
        let m = MonospaceMetrics::new(0.0, 12.0);
        assert_eq!(truncate("anything", -1.0, &m), "anything");
    }

    #[test]
    fn odd_rows_alternate() {
        let columns = [Column::new("n", "N")];
        let rows: Vec<Row> = (0..4).map(|_| Row::new(0)).collect();
        let table = layout_table(&columns, &rows, &TableConfig::default(), &metrics());
        let styles: Vec<Style> = table
            .scene
            .rects()
            .filter(|r| r.model().is_some())
            .map(Rectangle::style)
            .collect();
        assert_eq!(styles, vec![Style::Row, Style::OddRow, Style::Row, Style::OddRow]);
    }

    #[test]
    fn row_bands_are_hit_testable() {
        let columns = [Column::new("n", "N").with_width(100.0)];
        let rows = [Row::new(0), Row::new(0)];
        let table = layout_table(&columns, &rows, &TableConfig::default(), &metrics());
        let hit = table.scene.primitive_at(50.0, 30.0 + 24.0 + 1.0);
        assert_eq!(hit.and_then(Rectangle::model), Some(ModelRef::Row(1)));
        assert_eq!(
            hit.map(Rectangle::rect),
            Some(Rect::new(0.0, 54.0, 100.0, 24.0))
        );
    }

    #[test]
    fn cell_alignment_anchors() {
        let config = TableConfig::default();
        let columns = [
            Column::new("name", "Name").with_width(100.0).tree(),
            Column::new("cost", "Cost").with_width(60.0).aligned(HAlign::Right),
            Column::new("done", "Done").with_width(40.0).aligned(HAlign::Center),
        ];
        let rows = [Row::new(1)
            .with_value("name", "Build")
            .with_value("cost", "12")
            .with_value("done", "x")];
        let table = layout_table(&columns, &rows, &config, &metrics());
        let cells: Vec<_> = labels(&table)
            .into_iter()
            .filter(|l| l.3 == Style::CellText)
            .map(|l| (l.1.x, l.2))
            .collect();
        let middle_y = 30.0 + 12.0;
        assert_eq!(
            cells,
            vec![(5.0 + 15.0, HAlign::Left), (155.0, HAlign::Right), (180.0, HAlign::Center)]
        );
        assert!(
            labels(&table)
                .iter()
                .filter(|l| l.3 == Style::CellText)
                .all(|l| (l.1.y - middle_y).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn header_texts_are_left_aligned_and_padded() {
        let columns = [
            Column::new("a", "A").with_width(50.0),
            Column::new("b", "B").with_width(50.0).aligned(HAlign::Right),
        ];
        let table = layout_table(&columns, &[], &TableConfig::default(), &metrics());
        let headers: Vec<_> = labels(&table)
            .into_iter()
            .map(|l| (l.0, l.1, l.2))
            .collect();
        assert_eq!(
            headers,
            vec![
                ("A".to_owned(), Point::new(5.0, 15.0), HAlign::Left),
                ("B".to_owned(), Point::new(55.0, 15.0), HAlign::Left),
            ]
        );
        let borders = table
            .scene
            .lines()
            .filter(|l| l.style() == Style::TimelineBorderBottom)
            .count();
        assert_eq!(borders, 2);
    }

    #[test]
    fn unknown_and_missing_cells_render_nothing() {
        let columns = [Column::new("name", "Name")];
        let rows = [
            Row::new(0).with_value("ghost", "boo"),
            Row::new(0).with_value("name", "real"),
        ];
        let table = layout_table(&columns, &rows, &TableConfig::default(), &metrics());
        let cells: Vec<String> = labels(&table)
            .into_iter()
            .filter(|l| l.3 == Style::CellText)
            .map(|l| l.0)
            .collect();
        assert_eq!(cells, vec!["real".to_owned()]);
    }
}
