mod cli;
use cli::*;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let Cli { n_threads, command } = Cli::parse();

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = n_threads { pool = pool.num_threads(n) }
    let pool = pool.build()?;
    log::debug!("Using {} threads", pool.current_num_threads());

    let mut progress = Progress::new();
    pool.install(|| match command {
        Command::Forward { config, input, output } => forward(&config, &input, &output, &mut progress),
        Command::Back    { config, input, output } => back   (&config, &input, &output, &mut progress),
        Command::Phantom { config, output, sphere, dots, seed, value } => {
            // The argument group guarantees that one of them is present
            let shape = match sphere {
                Some(radius) => Shape::Sphere(radius),
                None         => Shape::Dots { n: dots.unwrap_or(0), seed },
            };
            phantom(&config, &output, shape, value, &mut progress)
        }
    })?;
    Ok(())
}

fn read_config(path: &Path, progress: &mut Progress) -> ddproj::Result<Config> {
    progress.start(&format!("Reading configuration {path:?}"));
    let config = read_config_file(path)?;
    progress.done();
    Ok(config)
}

fn forward(config: &Path, input: &Path, output: &Path, progress: &mut Progress) -> ddproj::Result<()> {
    let config = read_config(config, progress)?;
    let (fov, trajectory) = (config.fov(), config.trajectory());

    progress.start(&format!("Reading volume {input:?}"));
    let volume = Volume::from_raw_file(input, fov)?;
    progress.done();

    let mut projections = DetectorStack::zeros(trajectory.n_views, trajectory.detector.n);
    progress.start(&format!("Forward projecting {} voxels into {} views",
                            group_digits(fov.n_voxels()), group_digits(trajectory.n_views)));
    let stats = DistanceDriven::new(trajectory, fov).forward_project(&mut projections, &volume)?;
    progress.done();
    println!("{stats}");

    progress.start(&format!("Writing projections to {output:?}"));
    projections.write_to_raw_file(output)?;
    progress.done();
    Ok(())
}

fn back(config: &Path, input: &Path, output: &Path, progress: &mut Progress) -> ddproj::Result<()> {
    let config = read_config(config, progress)?;
    let (fov, trajectory) = (config.fov(), config.trajectory());

    progress.start(&format!("Reading projections {input:?}"));
    let projections = DetectorStack::from_raw_file(input, trajectory.n_views, trajectory.detector.n)?;
    progress.done();

    let mut volume = Volume::zeros(fov);
    progress.start(&format!("Back projecting {} views into {} voxels",
                            group_digits(trajectory.n_views), group_digits(fov.n_voxels())));
    let stats = DistanceDriven::new(trajectory, fov).back_project(&projections, &mut volume)?;
    progress.done();
    println!("{stats}");

    progress.start(&format!("Writing volume to {output:?}"));
    volume.write_to_raw_file(output)?;
    progress.done();
    Ok(())
}

enum Shape {
    Sphere(Length),
    Dots { n: usize, seed: u64 },
}

fn phantom(config: &Path, output: &Path, shape: Shape, value: Intensityf32, progress: &mut Progress) -> ddproj::Result<()> {
    let fov = read_config(config, progress)?.fov();
    progress.start("Generating phantom");
    let volume = match shape {
        Shape::Sphere(radius) => rasterize(fov, &[Ellipsoid::sphere(fov.centre(), mm_(radius), value)]),
        Shape::Dots { n, seed } => random_dots(fov, n, value, &mut Isaac64Rng::seed_from_u64(seed)),
    };
    progress.done();
    println!("Phantom total: {}", volume.sum());

    progress.start(&format!("Writing volume to {output:?}"));
    volume.write_to_raw_file(output)?;
    progress.done();
    Ok(())
}

// ----- Imports ------------------------------------------------------------------------------------------
use std::error::Error;
use std::path::Path;

use clap::Parser;
use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

use units::{Length, mm_, todo::Intensityf32};

use ddproj::{
    DetectorStack, DistanceDriven, Projector, Volume,
    config::{Config, read_config_file},
    phantom::{Ellipsoid, random_dots, rasterize},
    utils::{group_digits, timing::Progress},
};
