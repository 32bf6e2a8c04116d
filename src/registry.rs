//! Name-to-factory registries for the three shape flavors.
//!
//! Registries are populated once, at first use, and are read-only
//! afterwards, so concurrent lookups need no locking. Unknown names resolve
//! to `None` rather than an error: a design persisted by a newer library
//! version must still load here, degrading the unknown component to its
//! default shape.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;

use crate::matrix::{BitMatrix, Topology};
use crate::path::Path;
use crate::settings::ShapeSettings;
use crate::shape::eye::{EyeGenerator, EyeKind};
use crate::shape::pixel::{PixelGenerator, PixelKind};
use crate::shape::pupil::{PupilGenerator, PupilKind};
use crate::shape::{EyeShape, PixelRegion, PixelShape, PupilShape, EYE_FRAME};

type Factory<T> = Box<dyn Fn(&ShapeSettings) -> Box<T> + Send + Sync>;

/// A registry for one generator flavor.
pub struct ShapeRegistry<T: ?Sized> {
    factories: HashMap<String, Factory<T>>,
}

impl<T: ?Sized> ShapeRegistry<T> {
    pub fn new() -> Self {
        ShapeRegistry { factories: HashMap::new() }
    }

    /// Registers a factory under a stable lowercase name. A later
    /// registration under the same name replaces the earlier one.
    pub fn register(
        &mut self,
        name: &str,
        factory: impl Fn(&ShapeSettings) -> Box<T> + Send + Sync + 'static,
    ) {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// All registered names, sorted for stable catalog enumeration.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Constructs a generator by name with the given parameters.
    pub fn by_name(&self, name: &str, settings: &ShapeSettings) -> Option<Box<T>> {
        self.factories.get(name).map(|factory| factory(settings))
    }

    /// Reconstructs a generator from its serialized form. Returns `None`
    /// for unrecognized type names.
    pub fn from_settings(&self, settings: &ShapeSettings) -> Option<Box<T>> {
        let found = self.by_name(&settings.type_name, settings);
        if found.is_none() {
            debug!("unknown shape type {:?}, caller will fall back to default", settings.type_name);
        }
        found
    }
}

impl<T: ?Sized> Default for ShapeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

static PIXEL_SHAPES: Lazy<ShapeRegistry<dyn PixelShape>> = Lazy::new(|| {
    let mut registry = ShapeRegistry::new();
    for kind in PixelKind::ALL {
        let name = PixelGenerator::new(kind).name();
        registry.register(name, move |settings: &ShapeSettings| {
            Box::new(PixelGenerator::create(kind, settings)) as Box<dyn PixelShape>
        });
    }
    registry
});

static EYE_SHAPES: Lazy<ShapeRegistry<dyn EyeShape>> = Lazy::new(|| {
    let mut registry = ShapeRegistry::new();
    for kind in EyeKind::ALL {
        let name = EyeGenerator::new(kind).name();
        registry.register(name, move |settings: &ShapeSettings| {
            Box::new(EyeGenerator::create(kind, settings)) as Box<dyn EyeShape>
        });
    }
    registry
});

static PUPIL_SHAPES: Lazy<ShapeRegistry<dyn PupilShape>> = Lazy::new(|| {
    let mut registry = ShapeRegistry::new();
    for kind in PupilKind::ALL {
        let name = PupilGenerator::new(kind).name();
        registry.register(name, move |settings: &ShapeSettings| {
            Box::new(PupilGenerator::create(kind, settings)) as Box<dyn PupilShape>
        });
    }
    registry
});

/// The process-wide pixel-shape registry, holding every built-in style.
pub fn pixel_shapes() -> &'static ShapeRegistry<dyn PixelShape> {
    &PIXEL_SHAPES
}

/// The process-wide eye-shape registry.
pub fn eye_shapes() -> &'static ShapeRegistry<dyn EyeShape> {
    &EYE_SHAPES
}

/// The process-wide pupil-shape registry.
pub fn pupil_shapes() -> &'static ShapeRegistry<dyn PupilShape> {
    &PUPIL_SHAPES
}

/// The SettingsCodec contract: a generator serializes to its full
/// [`ShapeSettings`] and reconstructs through the matching registry.
/// `decode(encode(g))` behaves identically to `g` for every query, though
/// it is a fresh instance.
pub mod codec {
    use super::*;

    pub fn encode_pixel(shape: &dyn PixelShape) -> ShapeSettings {
        shape.settings()
    }

    pub fn encode_eye(shape: &dyn EyeShape) -> ShapeSettings {
        shape.settings()
    }

    pub fn encode_pupil(shape: &dyn PupilShape) -> ShapeSettings {
        shape.settings()
    }

    pub fn decode_pixel(settings: &ShapeSettings) -> Option<Box<dyn PixelShape>> {
        pixel_shapes().from_settings(settings)
    }

    pub fn decode_eye(settings: &ShapeSettings) -> Option<Box<dyn EyeShape>> {
        eye_shapes().from_settings(settings)
    }

    pub fn decode_pupil(settings: &ShapeSettings) -> Option<Box<dyn PupilShape>> {
        pupil_shapes().from_settings(settings)
    }
}

fn thumbnail_svg(path: &Path, side: f64) -> String {
    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" ",
            "viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
            "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n",
            "\t<path d=\"{1}\" fill=\"#000000\" fill-rule=\"evenodd\"/>\n",
            "</svg>\n"
        ),
        side,
        path.to_svg_data()
    )
}

/// Renders a catalog thumbnail of a registered pixel shape over the fixed
/// [`BitMatrix::sample`] pattern. Returns `None` for unknown names.
pub fn pixel_thumbnail(name: &str) -> Option<String> {
    let shape = pixel_shapes().by_name(name, &ShapeSettings::new(name))?;
    let matrix = BitMatrix::sample();
    let topology = Topology::new(&matrix);
    let path = shape.generate_path(&topology, PixelRegion::DataOnly);
    Some(thumbnail_svg(&path, 70.0))
}

/// Renders a catalog thumbnail of a registered eye shape together with its
/// matching pupil.
pub fn eye_thumbnail(name: &str) -> Option<String> {
    let shape = eye_shapes().by_name(name, &ShapeSettings::new(name))?;
    let mut path = shape.generate_path();
    path.append(&shape.matching_pupil().generate_path());
    Some(thumbnail_svg(&path, EYE_FRAME))
}

/// Renders a catalog thumbnail of a registered pupil shape.
pub fn pupil_thumbnail(name: &str) -> Option<String> {
    let shape = pupil_shapes().by_name(name, &ShapeSettings::new(name))?;
    Some(thumbnail_svg(&shape.generate_path(), EYE_FRAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsValue;

    #[test]
    fn built_ins_are_registered_and_sorted() {
        let names = pixel_shapes().names();
        assert_eq!(
            names,
            vec![
                "circle",
                "connected",
                "horizontal",
                "inset",
                "rounded",
                "square",
                "squircle",
                "vertical"
            ]
        );
        assert_eq!(eye_shapes().names(), vec!["circle", "leaf", "rounded", "shield", "square"]);
        assert_eq!(pupil_shapes().names(), vec!["circle", "dots", "leaf", "rounded", "square"]);
    }

    #[test]
    fn unknown_names_degrade_to_none() {
        let settings = ShapeSettings::new("hexagonal-starburst");
        assert!(pixel_shapes().from_settings(&settings).is_none());
        assert!(eye_shapes().from_settings(&settings).is_none());
        assert!(pupil_shapes().from_settings(&settings).is_none());
    }

    #[test]
    fn codec_round_trip_reproduces_geometry() {
        let mut original = pixel_shapes()
            .by_name("inset", &ShapeSettings::new("inset"))
            .unwrap();
        original.set_setting("inset_fraction", &SettingsValue::Number(0.5));
        original.set_setting("corner_radius_fraction", &SettingsValue::Number(1.0));

        let rebuilt = codec::decode_pixel(&codec::encode_pixel(original.as_ref())).unwrap();
        let matrix = BitMatrix::sample();
        let topology = Topology::new(&matrix);
        assert_eq!(
            original.generate_path(&topology, PixelRegion::DataOnly),
            rebuilt.generate_path(&topology, PixelRegion::DataOnly)
        );
        assert_eq!(original.settings(), rebuilt.settings());
    }

    #[test]
    fn from_settings_applies_parameters() {
        let settings = ShapeSettings::new("rounded").with("corner_radius_fraction", 1.0);
        let a = pixel_shapes().from_settings(&settings).unwrap();
        let b = pixel_shapes().from_settings(&ShapeSettings::new("rounded")).unwrap();
        let matrix = BitMatrix::sample();
        let topology = Topology::new(&matrix);
        assert_ne!(
            a.generate_path(&topology, PixelRegion::DataOnly),
            b.generate_path(&topology, PixelRegion::DataOnly)
        );
    }

    #[test]
    fn thumbnails_render_for_every_registered_name() {
        for name in pixel_shapes().names() {
            let svg = pixel_thumbnail(&name).unwrap();
            assert!(svg.contains("<path"));
        }
        for name in eye_shapes().names() {
            assert!(eye_thumbnail(&name).is_some());
        }
        for name in pupil_shapes().names() {
            assert!(pupil_thumbnail(&name).is_some());
        }
        assert!(pixel_thumbnail("no-such-shape").is_none());
    }
}
