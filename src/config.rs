use crate::error::PlotError;

/// All conversion parameters in one struct.
/// Filled from CLI flags or by a host application per job.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    // -- Raster stage --
    /// Longest-edge target size in pixels. Both passes downsample
    /// relative to it, so traced geometry spans roughly this many units.
    pub resolution: u32,

    // -- Contour stage --
    /// Contour scale factor. The contour pass traces an image whose longest
    /// edge is `resolution / draw_contours` pixels and multiplies the traced
    /// coordinates back up by this factor. 0 = no contours.
    pub draw_contours: f64,
    /// How many times the ordered contour set is emitted.
    pub repeat_contours: u32,

    // -- Hatch stage --
    /// Hatch cell size in output units. The hatch pass samples an image whose
    /// longest edge is `resolution / draw_hatch` pixels. 0 = no hatching.
    pub draw_hatch: f64,
    /// How many times the ordered hatch set is emitted.
    pub repeat_hatch: u32,

    // -- Output --
    /// Physical canvas the drawing is mapped onto.
    pub canvas: Canvas,
}

/// Target area on the plotter bed, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width_mm: f64,
    pub height_mm: f64,
    pub offset_x_mm: f64,
    pub offset_y_mm: f64,
}

impl Canvas {
    /// Right edge of the drawable area (offset + width).
    pub fn extent_x(&self) -> f64 {
        self.offset_x_mm + self.width_mm
    }

    /// Bottom edge of the drawable area (offset + height).
    pub fn extent_y(&self) -> f64 {
        self.offset_y_mm + self.height_mm
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        let sizes = [self.width_mm, self.height_mm];
        if sizes.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(PlotError::InvalidConfig(format!(
                "canvas size must be positive, got {} x {} mm",
                self.width_mm, self.height_mm
            )));
        }
        let offsets = [self.offset_x_mm, self.offset_y_mm];
        if offsets.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PlotError::InvalidConfig(format!(
                "canvas offsets must be non-negative, got ({}, {}) mm",
                self.offset_x_mm, self.offset_y_mm
            )));
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width_mm: 30.0,
            height_mm: 30.0,
            offset_x_mm: 80.0,
            offset_y_mm: 80.0,
        }
    }
}

impl PlotConfig {
    /// True if the contour pass will run.
    pub fn contours_enabled(&self) -> bool {
        self.draw_contours > 0.0 && self.repeat_contours > 0
    }

    /// True if the hatch pass will run.
    pub fn hatch_enabled(&self) -> bool {
        self.draw_hatch > 0.0 && self.repeat_hatch > 0
    }

    /// Reject configurations no conversion can succeed with.
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.resolution == 0 {
            return Err(PlotError::InvalidConfig("resolution must be at least 1".into()));
        }
        if !self.draw_contours.is_finite() || self.draw_contours < 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "contour scale must be finite and non-negative, got {}",
                self.draw_contours
            )));
        }
        if !self.draw_hatch.is_finite() || self.draw_hatch < 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "hatch size must be finite and non-negative, got {}",
                self.draw_hatch
            )));
        }
        if !self.contours_enabled() && !self.hatch_enabled() {
            return Err(PlotError::InvalidConfig(
                "neither contours nor hatching requested".into(),
            ));
        }
        self.canvas.validate()
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            resolution: 1024,
            draw_contours: 1.0,
            repeat_contours: 5,
            draw_hatch: 0.0,
            repeat_hatch: 0,
            canvas: Canvas::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PlotConfig::default().validate().is_ok());
    }

    #[test]
    fn nothing_requested_is_rejected() {
        let config = PlotConfig {
            draw_contours: 0.0,
            draw_hatch: 0.0,
            ..PlotConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlotError::InvalidConfig(_))));
    }

    #[test]
    fn zero_repeat_disables_pass() {
        let config = PlotConfig {
            draw_hatch: 16.0,
            repeat_hatch: 0,
            ..PlotConfig::default()
        };
        assert!(!config.hatch_enabled());
        assert!(config.contours_enabled());
    }

    #[test]
    fn flat_canvas_is_rejected() {
        let canvas = Canvas {
            height_mm: 0.0,
            ..Canvas::default()
        };
        assert!(canvas.validate().is_err());
        assert_eq!(Canvas::default().extent_x(), 110.0);
    }
}
