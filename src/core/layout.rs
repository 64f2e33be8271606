use serde::{Deserialize, Serialize};

use crate::core::dataset::DataAttr;
use crate::core::types::{DeviceViewport, PixelPoint};
use crate::error::{ChartError, ChartResult};

/// Canonical frame coordinates of the plot area, in device pixels.
///
/// `origin` is the bottom-left corner, `top` and `right` are the extremities of
/// the y and x axes, `x_mid`/`y_mid` the midpoints of those spans. The x axis
/// itself is drawn through `y_mid`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisPoints {
    pub origin: PixelPoint,
    pub top: PixelPoint,
    pub right: PixelPoint,
    pub x_mid: PixelPoint,
    pub y_mid: PixelPoint,
}

impl AxisPoints {
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.right.x
    }

    #[must_use]
    pub fn top_y(&self) -> f64 {
        self.top.y
    }

    #[must_use]
    pub fn bottom_y(&self) -> f64 {
        self.origin.y
    }

    #[must_use]
    pub fn mid_x(&self) -> f64 {
        self.x_mid.x
    }

    #[must_use]
    pub fn mid_y(&self) -> f64 {
        self.y_mid.y
    }

    /// Pixel length available to the x axis.
    #[must_use]
    pub fn x_extent(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    /// Pixel length from the x axis up to the top extent.
    #[must_use]
    pub fn y_extent(&self) -> f64 {
        self.mid_y() - self.top_y()
    }
}

/// Computes the plot frame for a device viewport.
///
/// Every coordinate is floored so repeated calls with equal inputs return
/// bit-identical results.
pub fn compute_axis_points(
    viewport: DeviceViewport,
    padding: f64,
    title_height: f64,
) -> ChartResult<AxisPoints> {
    if !viewport.is_valid() {
        return Err(ChartError::DegenerateViewport { extent_px: 0.0 });
    }
    if !padding.is_finite() || padding < 0.0 {
        return Err(ChartError::InvalidConfig(
            "padding must be finite and >= 0".to_owned(),
        ));
    }
    if !title_height.is_finite() || title_height < 0.0 {
        return Err(ChartError::InvalidData(
            "title height must be finite and >= 0".to_owned(),
        ));
    }

    let min_x = padding.floor();
    let max_x = (viewport.width - padding).floor();
    let bottom_y = (viewport.height - padding).floor();
    let top_y = (padding + title_height).floor();
    let mid_x = ((min_x + max_x) / 2.0).floor();
    let mid_y = ((top_y + bottom_y) / 2.0).floor();

    if max_x <= min_x {
        return Err(ChartError::DegenerateViewport {
            extent_px: max_x - min_x,
        });
    }
    if mid_y <= top_y {
        return Err(ChartError::DegenerateViewport {
            extent_px: mid_y - top_y,
        });
    }

    Ok(AxisPoints {
        origin: PixelPoint::new(min_x, bottom_y),
        top: PixelPoint::new(min_x, top_y),
        right: PixelPoint::new(max_x, bottom_y),
        x_mid: PixelPoint::new(mid_x, bottom_y),
        y_mid: PixelPoint::new(min_x, mid_y),
    })
}

/// Pixels per data unit along one axis.
///
/// `delta + 2` keeps one unit of margin at each end of the axis, so a flat
/// series (`delta == 0`) still gets a finite period.
pub fn compute_period(attr: DataAttr, pixel_extent: f64) -> ChartResult<f64> {
    if !pixel_extent.is_finite() || pixel_extent <= 0.0 {
        return Err(ChartError::DegenerateViewport {
            extent_px: pixel_extent,
        });
    }
    if !attr.delta.is_finite() || attr.delta < 0.0 {
        return Err(ChartError::InvalidData(
            "axis delta must be finite and >= 0".to_owned(),
        ));
    }

    Ok((pixel_extent / (attr.delta + 2.0)).ceil())
}

/// Notch layout for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickPlan {
    /// Data units between adjacent notches.
    pub multiplier: f64,
    /// Index of the last notch; notches run over `0..=count`.
    pub count: usize,
    /// Pixels between adjacent notches.
    pub spacing_px: f64,
}

impl TickPlan {
    /// Caps `count` so no notch lands past `pixel_extent`.
    #[must_use]
    pub fn clamped_to_extent(self, period: f64, pixel_extent: f64) -> Self {
        if period <= 0.0 || self.spacing_px <= 0.0 {
            return self;
        }
        let room = ((pixel_extent - period) / self.spacing_px).floor();
        let cap = if room.is_finite() && room > 0.0 {
            room as usize
        } else {
            0
        };
        Self {
            count: self.count.min(cap),
            ..self
        }
    }
}

/// Coarsens notches until adjacent ones are at least `min_pixel_spacing` apart.
///
/// The multiplier is applied to both spacing and notch count. `count` never
/// exceeds the number of whole data units spanned by the axis.
pub fn compute_tick_plan(attr: DataAttr, period: f64, min_pixel_spacing: f64) -> ChartResult<TickPlan> {
    if !period.is_finite() || period <= 0.0 {
        return Err(ChartError::InvalidData(
            "axis period must be finite and > 0".to_owned(),
        ));
    }

    let multiplier = if min_pixel_spacing.is_finite() && period < min_pixel_spacing {
        (min_pixel_spacing / period).ceil()
    } else {
        1.0
    };

    let whole_steps = attr.delta.floor();
    let steps = (attr.delta / multiplier).floor().min(whole_steps);
    let count = if steps.is_finite() && steps > 0.0 {
        steps as usize
    } else {
        0
    };

    Ok(TickPlan {
        multiplier,
        count,
        spacing_px: period * multiplier,
    })
}

/// One axis of the data layout: range, period and notch plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    pub attr: DataAttr,
    pub ticks: TickPlan,
}

impl AxisScale {
    /// Distance in pixels from the axis start to `value`.
    #[must_use]
    pub fn offset_px(&self, value: f64) -> f64 {
        (value - self.attr.min + 1.0) * self.attr.period
    }

    /// `(data value, pixel offset)` of every notch.
    pub fn notches(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..=self.ticks.count).map(move |index| {
            let units = index as f64 * self.ticks.multiplier;
            (self.attr.min + units, (units + 1.0) * self.attr.period)
        })
    }

    /// Pixels the full data range needs at the current period.
    #[must_use]
    pub fn required_extent_px(&self) -> f64 {
        (self.attr.delta + 2.0) * self.attr.period
    }
}

/// Data-dependent part of a layout plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataLayout {
    pub x: AxisScale,
    pub y: AxisScale,
    pub frame: AxisPoints,
}

impl DataLayout {
    #[must_use]
    pub fn x_to_px(&self, x: f64) -> f64 {
        self.frame.min_x() + self.x.offset_px(x)
    }

    /// Height of `y` above the x axis; also the bubble radius for `y`.
    #[must_use]
    pub fn y_offset_px(&self, y: f64) -> f64 {
        self.y.offset_px(y)
    }

    #[must_use]
    pub fn y_to_px(&self, y: f64) -> f64 {
        self.frame.mid_y() - self.y_offset_px(y)
    }

    #[must_use]
    pub fn point_to_px(&self, x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(self.x_to_px(x), self.y_to_px(y))
    }

    /// True when the data fits the frame at the current periods.
    #[must_use]
    pub fn fits_frame(&self) -> bool {
        self.x.required_extent_px() <= self.frame.x_extent()
            && self.y.required_extent_px() <= self.frame.y_extent()
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_axis_points, compute_period, compute_tick_plan};
    use crate::core::dataset::DataAttr;
    use crate::core::types::DeviceViewport;
    use crate::error::ChartError;

    #[test]
    fn axis_points_respect_padding_on_every_side() {
        let points = compute_axis_points(
            DeviceViewport {
                width: 800.0,
                height: 600.0,
            },
            40.0,
            0.0,
        )
        .expect("valid frame");
        assert_eq!(points.origin.x, 40.0);
        assert_eq!(points.origin.y, 560.0);
        assert_eq!(points.max_x(), 760.0);
        assert_eq!(points.top_y(), 40.0);
        assert_eq!(points.mid_x(), 400.0);
        assert_eq!(points.mid_y(), 300.0);
    }

    #[test]
    fn title_height_lowers_top_extent_only() {
        let viewport = DeviceViewport {
            width: 800.0,
            height: 600.0,
        };
        let plain = compute_axis_points(viewport, 40.0, 0.0).expect("frame");
        let titled = compute_axis_points(viewport, 40.0, 28.0).expect("frame");
        assert_eq!(plain.origin, titled.origin);
        assert_eq!(titled.top_y(), 68.0);
        assert_eq!(titled.mid_y(), 314.0);
    }

    #[test]
    fn frame_smaller_than_padding_is_degenerate() {
        let result = compute_axis_points(
            DeviceViewport {
                width: 60.0,
                height: 600.0,
            },
            40.0,
            0.0,
        );
        assert!(matches!(result, Err(ChartError::DegenerateViewport { .. })));
    }

    #[test]
    fn period_reserves_one_unit_margin_per_side() {
        let attr = DataAttr::from_range(2000.0, 2002.0);
        assert_eq!(compute_period(attr, 720.0).expect("period"), 180.0);
        assert_eq!(compute_period(attr, 721.0).expect("period"), 181.0);
    }

    #[test]
    fn flat_series_still_has_finite_period() {
        let attr = DataAttr::from_range(5.0, 5.0);
        assert_eq!(compute_period(attr, 100.0).expect("period"), 50.0);
    }

    #[test]
    fn zero_extent_is_a_degenerate_viewport() {
        let attr = DataAttr::from_range(0.0, 1.0);
        assert!(matches!(
            compute_period(attr, 0.0),
            Err(ChartError::DegenerateViewport { .. })
        ));
    }

    #[test]
    fn tick_plan_coarsens_below_min_spacing() {
        let attr = DataAttr::from_range(1867.0, 1977.0);
        let plan = compute_tick_plan(attr, 7.0, 50.0).expect("plan");
        assert_eq!(plan.multiplier, 8.0);
        assert_eq!(plan.spacing_px, 56.0);
        assert_eq!(plan.count, 13);
    }

    #[test]
    fn tick_plan_keeps_unit_steps_when_spacing_is_wide() {
        let attr = DataAttr::from_range(1.0, 4.0);
        let plan = compute_tick_plan(attr, 65.0, 30.0).expect("plan");
        assert_eq!(plan.multiplier, 1.0);
        assert_eq!(plan.count, 3);
    }

    #[test]
    fn fractional_range_never_exceeds_whole_steps() {
        let attr = DataAttr::from_range(0.2, 0.9);
        let plan = compute_tick_plan(attr, 200.0, 30.0).expect("plan");
        assert_eq!(plan.count, 0);
    }
}
