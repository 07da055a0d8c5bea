use std::path::{Path, PathBuf};

use argh::FromArgs;
use georef::core::{TransformDirection, Transformer};
use georef::TransformerConfig;
use serde::{Deserialize, Serialize};

/// Transforms points with a persisted transformer and prints them as JSON
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the JSON transformer configuration
    #[argh(option, short = 'c')]
    config: PathBuf,

    /// path to a JSON array of [x, y] or [x, y, z] points
    #[argh(option, short = 'p')]
    points: PathBuf,

    /// transform in the inverse direction
    #[argh(switch, short = 'i')]
    inverse: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputPoint {
    Xy([f64; 2]),
    Xyz([f64; 3]),
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct OutputPoint {
    x: f64,
    y: f64,
    z: f64,
    success: bool,
}

fn run(
    config: &Path,
    points: &Path,
    direction: TransformDirection,
) -> Result<Vec<OutputPoint>, Box<dyn std::error::Error>> {
    let config = TransformerConfig::from_json(&std::fs::read_to_string(config)?)?;
    let transformer = config.build(None)?;

    let input: Vec<InputPoint> = serde_json::from_str(&std::fs::read_to_string(points)?)?;
    let mut x = Vec::with_capacity(input.len());
    let mut y = Vec::with_capacity(input.len());
    let mut z = Vec::with_capacity(input.len());
    for p in &input {
        let [px, py, pz] = match *p {
            InputPoint::Xy([px, py]) => [px, py, 0.0],
            InputPoint::Xyz(xyz) => xyz,
        };
        x.push(px);
        y.push(py);
        z.push(pz);
    }

    let mut success = vec![false; input.len()];
    transformer.transform(direction, &mut x, &mut y, Some(&mut z), &mut success)?;

    let failed = success.iter().filter(|ok| !**ok).count();
    if failed > 0 {
        log::warn!("{failed} of {} points could not be transformed", input.len());
    }

    let out = x
        .into_iter()
        .zip(y)
        .zip(z)
        .zip(success)
        .map(|(((x, y), z), success)| OutputPoint { x, y, z, success })
        .collect();
    Ok(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let direction = if args.inverse {
        TransformDirection::Inverse
    } else {
        TransformDirection::Forward
    };
    log::debug!("transforming {:?} {direction:?}", args.points);

    let out = run(&args.config, &args.points, direction)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
