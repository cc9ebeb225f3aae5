//! Fixed styling of the campaign figure.

/// Troop trail
pub mod trail {
    /// Stroke width range the survivor count is scaled into
    pub const SIZE_RANGE: (f64, f64) = (1.0, 75.0);
    pub const ADVANCE_COLOR: &str = "#FFE0B2";
    pub const RETREAT_COLOR: &str = "#A1887F";
}

/// Survivor-count labels along the trail
pub mod troop_label {
    /// Every second troop position is labelled
    pub const STRIDE: usize = 2;
    /// Degrees of longitude per division number
    pub const LON_OFFSET_PER_DIVISION: f64 = 0.13;
    pub const ADVANCE_LAT_OFFSET: f64 = 0.35;
    pub const RETREAT_LAT_OFFSET: f64 = -0.21;
    pub const FONT: &str = "Helvetica Neue";
    pub const FONT_SIZE: f64 = 8.0;
    pub const ANGLE: f64 = 280.0;
}

/// City names
pub mod city_label {
    pub const FONT: &str = "Helvetica Neue";
    pub const FONT_SIZE: f64 = 10.0;
    pub const DX: f64 = -4.0;
}

/// Map panel axes
pub mod map {
    /// Degrees added above and below the troops' latitude extent
    pub const LAT_PADDING: f64 = 1.0;
    /// Half-width given to a longitude domain that would otherwise be empty
    pub const DEGENERATE_LON_PADDING: f64 = 0.5;
    pub const LON_TITLE: &str = "Longitude";
    pub const LAT_TITLE: &str = "Latitude";
}

/// Temperature panel
pub mod temperature {
    /// Degrees Celsius added above and below the observed extent
    pub const TEMP_PADDING: f64 = 10.0;
    pub const LINE_COLOR: &str = "#F44336";
    pub const LABEL_DX: f64 = 10.0;
    pub const LABEL_DY: f64 = 30.0;
    pub const LABEL_FONT: &str = "Copperplate";
    pub const LABEL_FONT_SIZE: f64 = 14.0;
    pub const HEIGHT: u32 = 200;
    pub const TITLE: &str = "Temperature on Retreat";
}

/// Figure-wide settings
pub mod figure {
    pub const VIEW_WIDTH: u32 = 1200;
    pub const VIEW_HEIGHT: u32 = 800;
    pub const VIEW_STROKE_WIDTH: f64 = 0.0;
    pub const AXIS_FONT: &str = "Copperplate";
}
