use serde::Serialize;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use wing_geometry::config::WingConfig;
use wing_geometry::serialize::{section_views, ArrayView, SectionView};
use wing_geometry::wing::Planform;

#[derive(Serialize)]
#[serde(untagged)]
enum Geometry<'a> {
    Array(ArrayView),
    Sections(Vec<SectionView<'a>>),
}

#[derive(Serialize)]
struct Output<'a> {
    planform: Option<&'a Planform>,
    geometry: Geometry<'a>,
}

const USAGE: &str = "usage: wing_geometry <config.json> [--sections]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("WING_LOG", "info")).init();

    let mut path: Option<PathBuf> = None;
    let mut sections = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--sections" => sections = true,
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => return Err(USAGE.into()),
        }
    }
    let path = path.ok_or(USAGE)?;

    let config = WingConfig::from_file(&path)?;
    let repository = config.repository();
    let mut wing = config.build()?;
    wing.construct(repository.as_ref())?;

    let geometry = if sections {
        Geometry::Sections(section_views(wing.geometry()))
    } else {
        Geometry::Array(ArrayView::from(wing.geometry()))
    };
    let output = Output {
        planform: wing.planform(),
        geometry,
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
