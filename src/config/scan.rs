//! Configuration file parser for a single scan: the voxel grid and the
//! circular trajectory which acquires it.

use std::fs;
use std::str::FromStr;
use std::path::Path;

use serde::{Deserialize, Deserializer, de};

use geometry::{CircularTrajectory, Detector};
use units::{degree, mm_, Length};

use crate::{Error, Result, fov::FOV};

fn deserialize_uom<'d, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    String::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

fn deserialize_uom_array<'d, D, T, const N: usize>(deserializer: D) -> std::result::Result<[T; N], D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let parsed = Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|text| text.parse::<T>().map_err(de::Error::custom))
        .collect::<std::result::Result<Vec<T>, D::Error>>()?;
    parsed.try_into().map_err(|wrong: Vec<T>| {
        de::Error::invalid_length(wrong.len(), &format!("{N} quantities").as_str())
    })
}

fn deserialize_uom_array_opt<'d, D, T, const N: usize>(deserializer: D) -> std::result::Result<Option<[T; N]>, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    deserialize_uom_array(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub volume: VolumeConfig,
    pub trajectory: TrajectoryConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VolumeConfig {

    /// Number of voxels in x, y, z
    pub n: [usize; 3],

    #[serde(deserialize_with = "deserialize_uom_array")]
    pub voxel_size: [Length; 3],

    /// Voxel `[0,0,0]` is centred at `-offset`. Centred on the origin when absent.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_uom_array_opt")]
    pub offset: Option<[Length; 3]>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrajectoryConfig {

    /// Number of equally spaced views
    pub views: usize,

    #[serde(default = "full_circle")]
    pub angular_range_degrees: f64,

    #[serde(default)]
    pub start_angle_degrees: f64,

    #[serde(deserialize_with = "deserialize_uom")]
    pub source_to_axis: Length,

    #[serde(deserialize_with = "deserialize_uom")]
    pub source_to_detector: Length,

    /// Number of detector pixels in u and v
    pub detector: [usize; 2],

    #[serde(deserialize_with = "deserialize_uom_array")]
    pub pixel_size: [Length; 2],
}

fn full_circle() -> f64 { 360.0 }

impl Config {

    pub fn fov(&self) -> FOV {
        let VolumeConfig { n, voxel_size, offset } = self.volume;
        let voxel_size = voxel_size.map(mm_);
        match offset {
            Some(offset) => FOV::new(n, voxel_size, offset.map(mm_)),
            None         => FOV::centred(n, voxel_size),
        }
    }

    pub fn trajectory(&self) -> CircularTrajectory {
        let t = &self.trajectory;
        CircularTrajectory::new(
            t.views,
            degree(t.angular_range_degrees),
            degree(t.start_angle_degrees),
            t.source_to_axis,
            t.source_to_detector,
            Detector::new(t.detector, t.pixel_size),
        )
    }

    /// Reject values which parse, but describe no usable scan
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfig(message));
        let VolumeConfig { n, voxel_size, .. } = self.volume;
        let t = &self.trajectory;
        if n.contains(&0)            { return invalid(format!("volume.n must be positive, got {n:?}")) }
        if t.views == 0              { return invalid("trajectory.views must be positive".into()) }
        if t.detector.contains(&0)   { return invalid(format!("trajectory.detector must be positive, got {:?}", t.detector)) }
        if voxel_size.iter().any(|&d| !(mm_(d) > 0.0)) {
            return invalid("volume.voxel_size must be positive".into())
        }
        if t.pixel_size.iter().any(|&d| !(mm_(d) > 0.0)) {
            return invalid("trajectory.pixel_size must be positive".into())
        }
        if !(mm_(t.source_to_axis) > 0.0 && t.source_to_detector > t.source_to_axis) {
            return invalid("need 0 < source_to_axis < source_to_detector".into())
        }
        Ok(())
    }
}

pub fn read_config_file(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use units::{cm, mm};
    use float_eq::assert_float_eq;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    const SCAN: &str = r#"
        [volume]
        n          = [10, 20, 30]
        voxel_size = ["1 mm", "0.5 mm", "2 mm"]

        [trajectory]
        views              = 36
        source_to_axis     = "60 cm"
        source_to_detector = "1200 mm"
        detector           = [64, 48]
        pixel_size         = ["1 mm", "1.5 mm"]
    "#;

    fn parse(input: &str) -> std::result::Result<Config, toml::de::Error> { toml::from_str(input) }

    // ----- Test an example on-disk config file -----------------------------------------
    #[test]
    fn test_config_file() -> Result<()> {
        let config = read_config_file(Path::new("ddproj-config.toml"))?;
        assert_eq!(config.volume.n, [64, 64, 64]);
        assert_eq!(config.trajectory.views, 180);
        assert_eq!(config.trajectory.source_to_axis, mm(600.0));
        assert_eq!(config.trajectory.detector, [128, 96]);
        Ok(())
    }

    #[test]
    fn config_with_defaults() {
        let config = parse(SCAN).unwrap();
        assert_eq!(config.volume.n, [10, 20, 30]);
        assert_eq!(config.volume.voxel_size, [mm(1.0), mm(0.5), mm(2.0)]);
        assert_eq!(config.volume.offset, None);
        assert_eq!(config.trajectory.angular_range_degrees, 360.0);
        assert_eq!(config.trajectory.start_angle_degrees, 0.0);
        assert_eq!(config.trajectory.source_to_axis, cm(60.0));
        assert_eq!(config.trajectory.pixel_size, [mm(1.0), mm(1.5)]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builds_runtime_objects() {
        let config = parse(SCAN).unwrap();
        let fov = config.fov();
        assert_eq!(fov.n, [10, 20, 30]);
        assert_float_eq!(fov.offset, [4.5, 4.75, 29.0], abs <= [1e-12; 3]);

        let trajectory = config.trajectory();
        assert_eq!(trajectory.n_views, 36);
        assert_float_eq!(trajectory.magnification(), 2.0, abs <= 1e-12);
        assert_float_eq!(trajectory.angle(1).to_degrees(), 10.0, abs <= 1e-9);
    }

    #[test]
    fn explicit_offset() {
        let config = parse(&SCAN.replace(r#"voxel_size = ["1 mm", "0.5 mm", "2 mm"]"#,
                                         r#"voxel_size = ["1 mm", "0.5 mm", "2 mm"]
                                            offset     = ["0 mm", "1 cm", "-3 mm"]"#)).unwrap();
        assert_float_eq!(config.fov().offset, [0.0, 10.0, -3.0], abs <= [1e-12; 3]);
    }

    #[test]
    fn units_are_mandatory() {
        assert!(parse(&SCAN.replace(r#""60 cm""#, "600")).is_err());
        assert!(parse(&SCAN.replace(r#""60 cm""#, r#""60""#)).is_err());
    }

    #[test]
    fn wrong_number_of_components_is_rejected() {
        assert!(parse(&SCAN.replace(r#"["1 mm", "1.5 mm"]"#, r#"["1 mm"]"#)).is_err());
    }

    // ----- Make sure that unknown fields are not accepted -----------------------------
    #[test]
    fn config_reject_unknown_field() {
        assert!(parse(&format!("{SCAN}\nunknown_field = 666")).is_err());
        assert!(parse(&SCAN.replace("views", "n_views")).is_err());
    }

    #[test]
    fn nonsensical_values_fail_validation() {
        let broken = [
            SCAN.replace("[10, 20, 30]", "[10, 0, 30]"),
            SCAN.replace("= 36", "= 0"),
            SCAN.replace(r#""1200 mm""#, r#""500 mm""#),
            SCAN.replace(r#"["1 mm", "1.5 mm"]"#, r#"["1 mm", "-1.5 mm"]"#),
        ];
        for text in broken {
            let config = parse(&text).unwrap();
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "accepted:\n{text}");
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = read_config_file(Path::new("no/such/config.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
