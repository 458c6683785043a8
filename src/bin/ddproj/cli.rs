#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "ddproj", about = "Distance-driven forward and back projection for cone-beam CT")]
pub struct Cli {

    /// Maximum number of rayon threads [default: one per core]
    #[clap(short = 'j', long)]
    pub n_threads: Option<usize>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {

    /// Simulate the detector images of a volume
    Forward {
        /// Scan description (TOML)
        #[clap(short, long)]
        config: PathBuf,

        /// Volume (raw f32, x fastest)
        #[clap(short, long)]
        input: PathBuf,

        /// Where to write the detector images (raw f32, [view][u][v])
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Back project detector images into a volume
    Back {
        /// Scan description (TOML)
        #[clap(short, long)]
        config: PathBuf,

        /// Detector images (raw f32, [view][u][v])
        #[clap(short, long)]
        input: PathBuf,

        /// Where to write the volume (raw f32, x fastest)
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Generate a synthetic volume
    #[clap(group(clap::ArgGroup::new("shape").required(true).args(["sphere", "dots"])))]
    Phantom {
        /// Scan description (TOML): only the volume section is used
        #[clap(short, long)]
        config: PathBuf,

        /// Where to write the volume (raw f32, x fastest)
        #[clap(short, long)]
        output: PathBuf,

        /// Centred sphere of given radius (e.g. '20 mm')
        #[clap(long)]
        sphere: Option<Length>,

        /// Number of randomly placed single-voxel dots
        #[clap(long)]
        dots: Option<usize>,

        /// Seed for the placement of dots
        #[clap(long, default_value = "0")]
        seed: u64,

        /// Value of voxels inside the phantom
        #[clap(long, default_value = "1.0")]
        value: Intensityf32,
    },
}

// ----- Imports ------------------------------------------------------------------------------------------
use std::path::PathBuf;
use units::{Length, todo::Intensityf32};
