use std::sync::Arc;

use approx::assert_relative_eq;
use georef::cem::{CemOptions, CemTransformer, CollinearityModel, ExteriorOrientation};
use georef::core::{GeoTransform, Gcp, TransformDirection, Transformer};
use georef::dem::{DemProvider, ElevationGrid, GridSize, InMemoryDemProvider, ResampleMethod};
use georef::tin::TinTransformer;
use georef::TransformerConfig;

fn cem() -> Result<CemTransformer, georef::cem::CemError> {
    let mut model = CollinearityModel {
        exterior: ExteriorOrientation {
            xs: 100.0,
            ys: 200.0,
            zs: 1000.0,
            omega: [0.01, 0.0, 0.0],
            phi: [0.02, 0.0, 0.0],
            kappa: [0.03, 0.0, 0.0],
        },
        ..Default::default()
    };
    model.interior.focal_length = 50.0;
    let options = CemOptions {
        height_offset: 10.0,
        dem_path: Some("flat.dem".to_string()),
        dem_interpolation: ResampleMethod::Cubic,
        ..Default::default()
    };
    CemTransformer::new(model, false, 1e-6, options)
}

fn provider() -> Arc<dyn DemProvider> {
    let grid = ElevationGrid::from_fn(GridSize::from([40, 40]), |_, _| 90.0)
        .with_geo_transform(GeoTransform([0.0, 10.0, 0.0, 400.0, 0.0, -10.0]));
    let mut provider = InMemoryDemProvider::new();
    provider.insert("flat.dem", grid);
    Arc::new(provider)
}

#[test]
fn cem_config_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let direct = cem()?.with_dem_provider(provider());
    let json = TransformerConfig::from(&direct).to_json()?;
    assert!(json.contains("\"CEMTransformer\""));
    assert!(json.contains("\"DEMInterpolation\": \"cubic\""));

    let rebuilt = TransformerConfig::from_json(&json)?.build(Some(provider()))?;

    let a = direct
        .transform_point(TransformDirection::Inverse, 130.0, 170.0, 0.0)
        .ok_or("no image point")?;
    let b = rebuilt
        .transform_point(TransformDirection::Inverse, 130.0, 170.0, 0.0)
        .ok_or("no image point")?;
    assert_eq!(a, b);

    // the flat terrain lifts the point by 90 on top of the offset
    let [p, l] = direct.project(130.0, 170.0, 100.0);
    assert_relative_eq!(a[0], p, epsilon = 1e-9);
    assert_relative_eq!(a[1], l, epsilon = 1e-9);
    Ok(())
}

#[test]
fn cem_without_provider_ignores_terrain() -> Result<(), Box<dyn std::error::Error>> {
    let config = TransformerConfig::from(&cem()?);
    let transformer = config.build(None)?;
    let [p, l] = transformer
        .transform_point(TransformDirection::Inverse, 130.0, 170.0, 0.0)
        .ok_or("no image point")?;

    let expected = cem()?.project(130.0, 170.0, 10.0);
    assert_relative_eq!(p, expected[0], epsilon = 1e-9);
    assert_relative_eq!(l, expected[1], epsilon = 1e-9);
    Ok(())
}

#[test]
fn tin_config_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let gcps = [
        Gcp::new(0.0, 0.0, 0.0, 0.0),
        Gcp::new(1.0, 0.0, 2.0, 0.0),
        Gcp::new(0.0, 1.0, 0.0, 2.0),
        Gcp::new(1.0, 1.0, 2.0, 2.0),
        Gcp::new(0.5, 0.5, 1.0, 1.0),
    ];
    let tin = TinTransformer::new(&gcps, false)?;
    let json = TransformerConfig::from(&tin).to_json()?;
    let rebuilt = TransformerConfig::from_json(&json)?.build(None)?;

    let mut x = [1.0, 0.2];
    let mut y = [1.0, 1.8];
    let mut ok = [false; 2];
    rebuilt.transform(TransformDirection::Inverse, &mut x, &mut y, None, &mut ok)?;

    assert_eq!(ok, [true, true]);
    assert_relative_eq!(x[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(y[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(x[1], 0.1, epsilon = 1e-12);
    assert_relative_eq!(y[1], 0.9, epsilon = 1e-12);
    Ok(())
}
