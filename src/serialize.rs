use crate::wing::store::{GeometryStore, Section};
use ncollide2d::na::{Matrix3xX, Point2};
use serde::{Serialize, Serializer};

/// Section points are stored as (x, z) in the section plane
#[derive(Serialize)]
#[serde(remote = "Point2<f64>")]
pub struct SectionPoint {
    x: f64,
    #[serde(rename = "z")]
    y: f64,
}

#[derive(Serialize)]
struct SectionPointRef(#[serde(with = "SectionPoint")] Point2<f64>);

fn serialize_points<S>(points: &[Point2<f64>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(points.iter().map(|p| SectionPointRef(*p)))
}

#[derive(Serialize)]
pub struct SectionView<'a> {
    pub y: f64,
    #[serde(serialize_with = "serialize_points")]
    pub points: &'a [Point2<f64>],
}

impl<'a> From<&'a Section> for SectionView<'a> {
    fn from(section: &'a Section) -> Self {
        SectionView {
            y: section.y,
            points: &section.points,
        }
    }
}

/// The row-major view of the 3xN geometry array handed to consumers: each field holds one
/// coordinate of every surface point, station blocks in span order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayView {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl From<&Matrix3xX<f64>> for ArrayView {
    fn from(array: &Matrix3xX<f64>) -> Self {
        ArrayView {
            x: array.row(0).iter().cloned().collect(),
            y: array.row(1).iter().cloned().collect(),
            z: array.row(2).iter().cloned().collect(),
        }
    }
}

impl From<&GeometryStore> for ArrayView {
    fn from(store: &GeometryStore) -> Self {
        ArrayView::from(store.array())
    }
}

pub fn section_views(store: &GeometryStore) -> Vec<SectionView<'_>> {
    store.sections().iter().map(SectionView::from).collect()
}
