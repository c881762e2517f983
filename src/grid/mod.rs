/// FMCSA daily log grid renderer.
///
/// Turns an ordered duty-log list into a 24-hour by 4-row vector drawing:
/// the status grid with quarter-hour ticks, per-interval status segments,
/// vertical transition connectors, and dashed leaders into the remarks band.
/// Geometry follows the standard paper log sheet; downstream export depends
/// on it staying put.
mod drawing;

pub use drawing::{Drawing, Shape};

use chrono::{DateTime, Timelike, Utc};

use crate::types::DutyLog;

pub const DEFAULT_WIDTH: f64 = 1000.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;

// Status grid takes the top 70% of the sheet, remarks band the rest.
const GRID_SPLIT: f64 = 0.7;
const REMARK_LEADER_DX: f64 = 50.0;
const REMARK_LEADER_Y_INSET: f64 = 20.0;
const REMARK_TEXT_DX: f64 = 85.0;
const REMARK_TEXT_Y_INSET: f64 = 5.0;
const HOUR_LABEL_Y_OFFSET: f64 = 15.0;

const GRID_STROKE: &str = "black";
const DATA_STROKE: &str = "blue";

/// Sheet measurements derived from the requested dimensions. Recomputed per
/// render call; nothing here survives between calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub width: f64,
    pub height: f64,
    pub hour_width: f64,
    pub grid_height: f64,
    pub remarks_height: f64,
    pub row_height: f64,
}

impl GridGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        let grid_height = height * GRID_SPLIT;
        GridGeometry {
            width,
            height,
            hour_width: width / 24.0,
            grid_height,
            remarks_height: height - grid_height,
            row_height: grid_height / 4.0,
        }
    }

    /// Horizontal position of an instant. Reads the UTC hour and minute of
    /// day, so midnight maps to 0 and positions advance monotonically
    /// through the day regardless of the viewer's timezone.
    pub fn time_to_x(&self, t: DateTime<Utc>) -> f64 {
        (t.hour() as f64 + t.minute() as f64 / 60.0) * self.hour_width
    }

    /// Vertical midpoint of a status row, where its segments are drawn.
    pub fn row_mid_y(&self, row: usize) -> f64 {
        (row as f64 + 0.5) * self.row_height
    }
}

pub fn render(logs: &[DutyLog], width: f64, height: f64) -> Drawing {
    let geo = GridGeometry::new(width, height);
    let mut drawing = Drawing::new(width, height);

    draw_grid_skeleton(&mut drawing, &geo);
    draw_status_segments(&mut drawing, &geo, logs);

    // Remarks band: boundary lines only, no interior verticals.
    drawing.line(0.0, geo.grid_height, geo.width, geo.grid_height, GRID_STROKE, 1.0);
    drawing.line(0.0, geo.height, geo.width, geo.height, GRID_STROKE, 1.0);

    drawing
}

fn draw_grid_skeleton(drawing: &mut Drawing, geo: &GridGeometry) {
    // Four row boundaries plus the top edge.
    for i in 0..=4 {
        let y = i as f64 * geo.row_height;
        drawing.line(0.0, y, geo.width, y, GRID_STROKE, 1.0);
    }

    for i in 0..=24 {
        let x = i as f64 * geo.hour_width;
        drawing.line(x, 0.0, x, geo.grid_height, GRID_STROKE, 1.0);

        if i == 24 {
            continue;
        }

        // Quarter-hour ticks inside each status row. The half-hour tick
        // reaches deeper than the quarter ticks, as on the paper form.
        for row in 0..4 {
            let row_top = row as f64 * geo.row_height;
            drawing.line(
                x + geo.hour_width / 4.0,
                row_top,
                x + geo.hour_width / 4.0,
                row_top + geo.row_height / 4.0,
                GRID_STROKE,
                0.5,
            );
            drawing.line(
                x + geo.hour_width / 2.0,
                row_top,
                x + geo.hour_width / 2.0,
                row_top + geo.row_height / 2.0,
                GRID_STROKE,
                0.5,
            );
            drawing.line(
                x + geo.hour_width * 3.0 / 4.0,
                row_top,
                x + geo.hour_width * 3.0 / 4.0,
                row_top + geo.row_height / 4.0,
                GRID_STROKE,
                0.5,
            );
        }

        drawing.text(
            x,
            geo.height - geo.remarks_height + HOUR_LABEL_Y_OFFSET,
            12.0,
            GRID_STROKE,
            format!("{i:02}:00"),
        );
    }
}

fn draw_status_segments(drawing: &mut Drawing, geo: &GridGeometry, logs: &[DutyLog]) {
    for (index, log) in logs.iter().enumerate() {
        let start_x = geo.time_to_x(log.start_time);
        // A reversed interval is a data-quality problem, not a render error:
        // clamp it to a zero-length segment at its start.
        let end_x = if log.end_time < log.start_time {
            start_x
        } else {
            geo.time_to_x(log.end_time)
        };
        let y = geo.row_mid_y(log.status.grid_row());
        drawing.line(start_x, y, end_x, y, DATA_STROKE, 2.0);

        let Some(next) = logs.get(index + 1) else {
            continue;
        };
        if next.status == log.status {
            continue;
        }

        // Status change: vertical connector at the shared boundary, plus a
        // dashed leader down into the remarks band.
        let next_y = geo.row_mid_y(next.status.grid_row());
        drawing.line(end_x, y, end_x, next_y, DATA_STROKE, 2.0);
        drawing.dashed_line(
            end_x,
            next_y,
            end_x - REMARK_LEADER_DX,
            geo.height - REMARK_LEADER_Y_INSET,
            DATA_STROKE,
            1.0,
            "4,4",
        );
        if !log.remarks.is_empty() {
            drawing.text(
                end_x - REMARK_TEXT_DX,
                geo.height - REMARK_TEXT_Y_INSET,
                10.0,
                DATA_STROKE,
                log.remarks.clone(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DutyStatus, Location};
    use chrono::TimeZone;

    fn log(
        status: DutyStatus,
        (h1, m1): (u32, u32),
        (h2, m2): (u32, u32),
        remarks: &str,
    ) -> DutyLog {
        DutyLog {
            id: None,
            trip_id: 1,
            status,
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, h1, m1, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 1, h2, m2, 0).unwrap(),
            location: Location::at_address("US-30"),
            remarks: remarks.to_string(),
        }
    }

    fn data_lines(drawing: &Drawing) -> Vec<(f64, f64, f64, f64, Option<&'static str>)> {
        drawing
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke: "blue",
                    dash,
                    ..
                } => Some((*x1, *y1, *x2, *y2, *dash)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn geometry_splits_seventy_thirty() {
        let geo = GridGeometry::new(1000.0, 400.0);
        assert_eq!(geo.grid_height, 280.0);
        assert_eq!(geo.remarks_height, 120.0);
        assert_eq!(geo.row_height, 70.0);
        assert!((geo.hour_width - 1000.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn time_to_x_is_monotonic_across_the_day() {
        let geo = GridGeometry::new(1000.0, 400.0);
        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(geo.time_to_x(midnight), 0.0);

        let mut previous = -1.0;
        for minute in 0..(24 * 60) {
            let t = midnight + chrono::Duration::minutes(minute);
            let x = geo.time_to_x(t);
            assert!(x >= previous, "x regressed at minute {minute}");
            assert!(x <= geo.width);
            previous = x;
        }
    }

    #[test]
    fn skeleton_renders_for_an_empty_log_list() {
        let drawing = render(&[], 1000.0, 400.0);
        assert_eq!(drawing.width, 1000.0);
        assert_eq!(drawing.height, 400.0);

        // 5 row lines + 25 hour lines + 24*4*3 ticks + 2 remarks boundaries.
        assert_eq!(drawing.lines().count(), 5 + 25 + 288 + 2);
        // One label per hour cell, zero-padded.
        assert_eq!(drawing.texts().count(), 24);
        assert!(drawing.shapes.iter().any(
            |shape| matches!(shape, Shape::Text { content, .. } if content == "00:00")
        ));
        assert!(drawing.shapes.iter().any(
            |shape| matches!(shape, Shape::Text { content, .. } if content == "23:00")
        ));

        // The 25th hour line sits on the right edge.
        assert!(drawing.shapes.iter().any(|shape| matches!(
            shape,
            Shape::Line { x1, x2, y1, .. } if *x1 == 1000.0 && *x2 == 1000.0 && *y1 == 0.0
        )));
        assert!(data_lines(&drawing).is_empty());
    }

    #[test]
    fn rendering_is_deterministic() {
        let logs = vec![
            log(DutyStatus::Driving, (0, 0), (4, 30), ""),
            log(DutyStatus::OnDuty, (4, 30), (6, 0), "fuel stop"),
        ];
        let first = render(&logs, 1000.0, 400.0);
        let second = render(&logs, 1000.0, 400.0);
        assert_eq!(first, second);
        assert_eq!(first.to_svg(), second.to_svg());
    }

    #[test]
    fn same_status_neighbours_merge_without_artifacts() {
        let logs = vec![
            log(DutyStatus::Driving, (1, 0), (2, 0), ""),
            log(DutyStatus::Driving, (2, 0), (3, 0), ""),
        ];
        let drawing = render(&logs, 1000.0, 400.0);
        let data = data_lines(&drawing);

        // Two horizontal segments at the same midpoint, nothing else.
        assert_eq!(data.len(), 2);
        let geo = GridGeometry::new(1000.0, 400.0);
        let mid = geo.row_mid_y(DutyStatus::Driving.grid_row());
        for (_, y1, _, y2, dash) in data {
            assert_eq!(y1, mid);
            assert_eq!(y2, mid);
            assert!(dash.is_none());
        }
    }

    #[test]
    fn status_change_draws_one_connector_and_one_leader() {
        let logs = vec![
            log(DutyStatus::Driving, (0, 0), (4, 30), ""),
            log(DutyStatus::OnDuty, (4, 30), (6, 0), "fuel stop"),
        ];
        let drawing = render(&logs, 1000.0, 400.0);
        let geo = GridGeometry::new(1000.0, 400.0);
        let data = data_lines(&drawing);

        let boundary_x = 4.5 * geo.hour_width;
        let driving_y = geo.row_mid_y(2);
        let on_duty_y = geo.row_mid_y(3);

        let connectors: Vec<_> = data
            .iter()
            .filter(|(x1, _, x2, _, dash)| x1 == x2 && dash.is_none())
            .collect();
        assert_eq!(connectors.len(), 1);
        let (x1, y1, _, y2, _) = connectors[0];
        assert!((x1 - boundary_x).abs() < 1e-9);
        assert_eq!(*y1, driving_y);
        assert_eq!(*y2, on_duty_y);

        let leaders: Vec<_> = data.iter().filter(|(.., dash)| dash.is_some()).collect();
        assert_eq!(leaders.len(), 1);
        let (lx1, ly1, lx2, ly2, _) = leaders[0];
        assert!((lx1 - boundary_x).abs() < 1e-9);
        assert_eq!(*ly1, on_duty_y);
        assert!((lx2 - (boundary_x - 50.0)).abs() < 1e-9);
        assert_eq!(*ly2, 380.0);
    }

    #[test]
    fn remark_text_lands_in_the_remarks_band() {
        let logs = vec![
            log(DutyStatus::Driving, (0, 0), (4, 30), ""),
            log(DutyStatus::OnDuty, (4, 30), (6, 0), "fuel stop"),
        ];
        let drawing = render(&logs, 1000.0, 400.0);
        let geo = GridGeometry::new(1000.0, 400.0);

        let remark = drawing
            .shapes
            .iter()
            .find_map(|shape| match shape {
                Shape::Text { x, y, content, .. } if content == "fuel stop" => Some((*x, *y)),
                _ => None,
            })
            .expect("remark text missing");
        assert!((remark.0 - (4.5 * geo.hour_width - 85.0)).abs() < 1e-9);
        assert_eq!(remark.1, 395.0);
        assert!(remark.1 > geo.grid_height);
    }

    #[test]
    fn empty_remark_omits_the_label_but_keeps_the_leader() {
        let logs = vec![
            log(DutyStatus::OffDuty, (0, 0), (7, 0), ""),
            log(DutyStatus::Driving, (7, 0), (9, 0), ""),
        ];
        let drawing = render(&logs, 1000.0, 400.0);
        assert_eq!(drawing.texts().count(), 24); // hour labels only
        assert_eq!(
            data_lines(&drawing)
                .iter()
                .filter(|(.., dash)| dash.is_some())
                .count(),
            1
        );
    }

    #[test]
    fn final_interval_draws_no_transition() {
        let logs = vec![log(DutyStatus::Sleeper, (20, 0), (23, 45), "late note")];
        let drawing = render(&logs, 1000.0, 400.0);
        let data = data_lines(&drawing);
        assert_eq!(data.len(), 1);
        assert!(data[0].4.is_none());
        // Remark never rendered without a following status change.
        assert_eq!(drawing.texts().count(), 24);
    }

    #[test]
    fn reversed_interval_clamps_to_zero_length() {
        let bad = log(DutyStatus::Driving, (8, 0), (6, 0), "");
        let drawing = render(&[bad], 1000.0, 400.0);
        let data = data_lines(&drawing);
        assert_eq!(data.len(), 1);
        let (x1, _, x2, _, _) = data[0];
        assert_eq!(x1, x2);
    }
}
