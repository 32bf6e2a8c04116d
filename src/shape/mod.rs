//! The shape-generator plugin contract.
//!
//! Three generator flavors share one contract: a stable lowercase `name`
//! used as the persistence key, a human-readable `title`, a pure
//! `generate_path`, and the settings introspection SettingsCodec relies on.
//! Pixel shapes render the whole matrix at [`MODULE`] units per cell; eye
//! and pupil shapes render one canonical locator template in the
//! [`EYE_FRAME`] local space and are placed three times by the compositor.
//!
//! Generators hold only configuration, which is read-only after
//! construction, so one instance can serve concurrent renders.

use crate::matrix::Topology;
use crate::path::{Path, Transform};
use crate::settings::{SettingsValue, ShapeSettings};

pub mod eye;
pub mod pixel;
pub mod pupil;

pub use eye::EyeGenerator;
pub use pixel::PixelGenerator;
pub use pupil::PupilGenerator;

/// Side length of one module cell in shape-local coordinates.
pub const MODULE: f64 = 10.0;

/// Side length of the eye-local coordinate frame: the 9x9 locator zone at
/// [`MODULE`] units per module. The 7x7 finder ring occupies `0..70` with
/// its one-module separator towards the matrix interior; the 3x3 pupil
/// occupies `20..50`.
pub const EYE_FRAME: f64 = 90.0;

/// Outer side of the finder ring within [`EYE_FRAME`].
pub const EYE_RING_OUTER: f64 = 70.0;

/// The three locator positions of a QR matrix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EyeCorner {
    TopLeft,
    TopRight,
    BottomLeft,
}

impl EyeCorner {
    pub const ALL: [EyeCorner; 3] = [EyeCorner::TopLeft, EyeCorner::TopRight, EyeCorner::BottomLeft];
}

/// The reflection that maps the canonical (top-left) eye template onto a
/// corner, expressed inside the eye-local frame.
pub fn corner_local_transform(corner: EyeCorner) -> Transform {
    match corner {
        EyeCorner::TopLeft => Transform::identity(),
        EyeCorner::TopRight => Transform::flip_horizontal(EYE_FRAME / 2.0),
        EyeCorner::BottomLeft => Transform::flip_vertical(EYE_FRAME / 2.0),
    }
}

/// Which matrix cells a pixel-flavor generator may emit geometry for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PixelRegion {
    /// Skip cells inside the three locator zones (the default mode).
    DataOnly,
    /// Include locator-zone cells, letting the pixel shape merge visually
    /// with the locator pattern.
    IncludeEyes,
}

/// Module ("pixel") shape strategy: turns the dark cells of a matrix into
/// one path, selecting a pre-built local template per cell from its
/// neighbor pattern.
pub trait PixelShape: Send + Sync {
    /// Stable lowercase registry key.
    fn name(&self) -> &'static str;

    /// Human-readable catalog title.
    fn title(&self) -> &'static str;

    /// Whether this shape is also suitable for drawing locator-zone cells
    /// in the extend-into-eye-pattern mode.
    fn can_generate_eye_and_pupil_shapes(&self) -> bool {
        false
    }

    /// Emits the path for every dark cell of the matrix behind `topology`,
    /// at [`MODULE`] units per cell. Pure: equal inputs yield equal paths.
    fn generate_path(&self, topology: &Topology<'_>, region: PixelRegion) -> Path;

    fn supports_setting(&self, _key: &str) -> bool {
        false
    }

    /// Applies one setting. Returns `false` for unsupported keys without
    /// failing, so newer designs load in older builds.
    fn set_setting(&mut self, _key: &str, _value: &SettingsValue) -> bool {
        false
    }

    /// The full serialized configuration, `type` tag included.
    fn settings(&self) -> ShapeSettings {
        ShapeSettings::new(self.name())
    }

    fn boxed_clone(&self) -> Box<dyn PixelShape>;
}

impl Clone for Box<dyn PixelShape> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Locator-ring shape strategy. Generates one canonical template in the
/// [`EYE_FRAME`] space; the compositor places the three copies.
pub trait EyeShape: Send + Sync {
    fn name(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// The canonical (top-left) ring template.
    fn generate_path(&self) -> Path;

    /// A corner-specific rendition, used when mirroring is disabled.
    /// Symmetric shapes keep this default, which matches the mirrored
    /// placement exactly; non-symmetric shapes override it.
    fn generate_path_for_corner(&self, corner: EyeCorner) -> Path {
        self.generate_path().transformed(&corner_local_transform(corner))
    }

    /// The pupil style that visually matches this ring, used when a design
    /// leaves the pupil unset.
    fn matching_pupil(&self) -> Box<dyn PupilShape>;

    fn supports_setting(&self, _key: &str) -> bool {
        false
    }

    fn set_setting(&mut self, _key: &str, _value: &SettingsValue) -> bool {
        false
    }

    fn settings(&self) -> ShapeSettings {
        ShapeSettings::new(self.name())
    }

    fn boxed_clone(&self) -> Box<dyn EyeShape>;
}

impl Clone for Box<dyn EyeShape> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Pupil shape strategy, same frame conventions as [`EyeShape`].
pub trait PupilShape: Send + Sync {
    fn name(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// The canonical (top-left) pupil template, occupying `20..50` of the
    /// eye-local frame.
    fn generate_path(&self) -> Path;

    fn generate_path_for_corner(&self, corner: EyeCorner) -> Path {
        self.generate_path().transformed(&corner_local_transform(corner))
    }

    fn supports_setting(&self, _key: &str) -> bool {
        false
    }

    fn set_setting(&mut self, _key: &str, _value: &SettingsValue) -> bool {
        false
    }

    fn settings(&self) -> ShapeSettings {
        ShapeSettings::new(self.name())
    }

    fn boxed_clone(&self) -> Box<dyn PupilShape>;
}

impl Clone for Box<dyn PupilShape> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}
