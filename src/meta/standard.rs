
//! Typed accessors for the optional attributes that the OpenEXR format standardizes.
//! Each attribute gets a `has_`, a getter, and a `set_` method on `Header`.

use crate::error::*;
use crate::math::Vec2;
use crate::meta::header::Header;
use crate::meta::attribute::*;


macro_rules! define_standard_attributes {
    ( $(
        $(#[$documentation: meta])*
        $name_constant: ident = $name: expr => $has: ident, $get: ident, $set: ident : $type: ty;
    )* ) => {

        /// The names of the standardized optional attributes.
        pub mod names {
            $(
                $(#[$documentation])*
                pub const $name_constant: &'static [u8] = $name;
            )*
        }

        impl Header {
            $(
                $(#[$documentation])*
                ///
                /// Returns whether the attribute exists with the standardized type.
                pub fn $has(&self) -> bool {
                    self.custom_attributes().get(names::$name_constant)
                        .map_or(false, |value| value.kind_name() == <$type as TypedValue>::TYPE_NAME)
                }

                $(#[$documentation])*
                ///
                /// Returns `Error::Invalid` if the attribute is absent
                /// and `Error::Type` if it has a different type.
                pub fn $get(&self) -> Result<$type> {
                    self.get_typed(names::$name_constant)
                }

                $(#[$documentation])*
                ///
                /// Returns `Error::Type` if the attribute already exists with a different type.
                pub fn $set(&mut self, value: $type) -> UnitResult {
                    self.insert(Text::from_slice_unchecked(names::$name_constant), value)
                }
            )*
        }
    };
}

define_standard_attributes! {

    /// The primaries and white point of the color space of the pixels.
    CHROMATICITIES = b"chromaticities" => has_chromaticities, chromaticities, set_chromaticities: Chromaticities;

    /// The luminance in candela per square meter of the rgb value `(1, 1, 1)`.
    WHITE_LUMINANCE = b"whiteLuminance" => has_white_luminance, white_luminance, set_white_luminance: f32;

    /// The chromaticity coordinates of a color that is displayed as neutral.
    ADOPTED_NEUTRAL = b"adoptedNeutral" => has_adopted_neutral, adopted_neutral, set_adopted_neutral: Vec2<f32>;

    /// The name of the color transform that converts the pixels to a display.
    RENDERING_TRANSFORM = b"renderingTransform" => has_rendering_transform, rendering_transform, set_rendering_transform: Text;

    /// The name of the color transform that applies a look.
    LOOK_MOD_TRANSFORM = b"lookModTransform" => has_look_mod_transform, look_mod_transform, set_look_mod_transform: Text;

    /// Horizontal output density, in pixels per inch.
    X_DENSITY = b"xDensity" => has_x_density, x_density, set_x_density: f32;

    /// Name of the owner.
    OWNER = b"owner" => has_owner, owner, set_owner: Text;

    /// Additional textual information.
    COMMENTS = b"comments" => has_comments, comments, set_comments: Text;

    /// The date of image creation, in `YYYY:MM:DD hh:mm:ss` format.
    CAPTURE_DATE = b"capDate" => has_capture_date, capture_date, set_capture_date: Text;

    /// Time difference in seconds between local time and UTC.
    UTC_OFFSET = b"utcOffset" => has_utc_offset, utc_offset, set_utc_offset: f32;

    /// Geographical image location.
    LONGITUDE = b"longitude" => has_longitude, longitude, set_longitude: f32;

    /// Geographical image location.
    LATITUDE = b"latitude" => has_latitude, latitude, set_latitude: f32;

    /// Geographical image location, in meters above sea level.
    ALTITUDE = b"altitude" => has_altitude, altitude, set_altitude: f32;

    /// Camera focus in meters.
    FOCUS = b"focus" => has_focus, focus, set_focus: f32;

    /// Exposure time in seconds.
    EXPOSURE_TIME = b"expTime" => has_exposure_time, exposure_time, set_exposure_time: f32;

    /// Camera aperture measured in f-stops.
    APERTURE = b"aperture" => has_aperture, aperture, set_aperture: f32;

    /// Iso-speed of the camera sensor.
    ISO_SPEED = b"isoSpeed" => has_iso_speed, iso_speed, set_iso_speed: f32;

    /// How this image is projected onto an environment.
    ENVIRONMENT_MAP = b"envmap" => has_environment_map, environment_map, set_environment_map: EnvironmentMap;

    /// Identifies the film frame of this image.
    KEY_CODE = b"keyCode" => has_key_code, key_code, set_key_code: KeyCode;

    /// Time and control code of this frame.
    TIME_CODE = b"timeCode" => has_time_code, time_code, set_time_code: TimeCode;

    /// How texture map images are extrapolated, for example `clamp` or `periodic`.
    WRAP_MODES = b"wrapmodes" => has_wrap_modes, wrap_modes, set_wrap_modes: Text;

    /// Frame rate of the image sequence.
    FRAMES_PER_SECOND = b"framesPerSecond" => has_frames_per_second, frames_per_second, set_frames_per_second: Rational;

    /// The view names of a multi-view image, for example `left` and `right`.
    MULTI_VIEW = b"multiView" => has_multi_view, multi_view, set_multi_view: Vec<Text>;

    /// The matrix that transforms world coordinates to camera coordinates.
    WORLD_TO_CAMERA = b"worldToCamera" => has_world_to_camera, world_to_camera, set_world_to_camera: Matrix4x4;

    /// The matrix that transforms world coordinates to normalized device coordinates.
    WORLD_TO_NDC = b"worldToNDC" => has_world_to_ndc, world_to_ndc, set_world_to_ndc: Matrix4x4;

    /// A small thumbnail of the image.
    PREVIEW = b"preview" => has_preview, preview, set_preview: Preview;
}
