use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::projection::MultiViewJoints;
use crate::rig::Rig;

// --- data.json (3Dビューア用) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraExport {
    pub cam_id: String,
    /// [fx, fy, cx, cy]
    pub intrinsics: [f64; 4],
    /// カメラ→ワールド (row-major 4x4)
    pub extrinsics: [[f64; 4]; 4],
    pub color: String,
    pub image: ImageSize,
    /// カメラ座標系での関節 xyz
    pub points: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneExport {
    pub frame: usize,
    pub cameras: Vec<CameraExport>,
}

impl SceneExport {
    /// 1フレーム分のシーンを作る
    pub fn build(rig: &Rig, views: &MultiViewJoints, frame: usize) -> Result<Self> {
        let cameras = rig
            .views
            .iter()
            .enumerate()
            .map(|(i, cam)| {
                Ok(CameraExport {
                    cam_id: cam.serial.clone(),
                    intrinsics: cam.intrinsics.to_array(),
                    extrinsics: cam.extrinsics_rows(),
                    color: cam.color.clone(),
                    image: ImageSize { width: rig.width, height: rig.height },
                    points: views.xyz(i, frame)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { frame, cameras })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_scene<P: AsRef<Path>>(path: P, scene: &SceneExport) -> Result<()> {
    let path = path.as_ref();
    let json = scene.to_json()?;
    fs::write(path, json).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    log::info!("Wrote scene with {} cameras to {}", scene.cameras.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RigConfig;
    use crate::dataset::JointSequence;
    use crate::hand::{HandFrame, HandJoint};
    use crate::projection::project_views;

    fn scene(frame: usize) -> Result<SceneExport> {
        let rig = Rig::from_config(&RigConfig::default());
        let joints = JointSequence::new(vec![
            HandFrame::from_xyz(&[[0.0, 0.0, 400.0]; HandJoint::COUNT]),
            HandFrame::from_xyz(&[[5.0, 6.0, 700.0]; HandJoint::COUNT]),
        ]);
        let views = project_views(&rig, &joints)?;
        SceneExport::build(&rig, &views, frame)
    }

    #[test]
    fn test_build_scene() {
        let scene = scene(1).unwrap();
        assert_eq!(scene.cameras.len(), 4);
        let origin = &scene.cameras[3];
        assert_eq!(origin.cam_id, "840412062076");
        assert_eq!(origin.image, ImageSize { width: 640, height: 480 });
        assert_eq!(origin.points.len(), HandJoint::COUNT);
        assert_eq!(origin.points[0], [5.0, 6.0, 700.0]);
        assert_eq!(origin.intrinsics, [615.665, 615.09, 306.514, 240.344]);
    }

    #[test]
    fn test_build_scene_bad_frame() {
        assert!(matches!(scene(2), Err(Error::FrameOutOfRange { index: 2, count: 2 })));
    }

    #[test]
    fn test_json_field_names() {
        let json = scene(0).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let cam = &value["cameras"][0];
        assert_eq!(cam["cam_id"], "840412062035");
        assert_eq!(cam["image"]["width"], 640);
        assert_eq!(cam["extrinsics"][0][3], 175.24);
        assert_eq!(cam["points"].as_array().unwrap().len(), 21);
    }

    #[test]
    fn test_write_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let scene = scene(0).unwrap();
        write_scene(&path, &scene).unwrap();

        let read: SceneExport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.frame, 0);
        assert_eq!(read.cameras.len(), scene.cameras.len());
        for (a, b) in read.cameras.iter().zip(&scene.cameras) {
            assert_eq!(a.cam_id, b.cam_id);
            for (pa, pb) in a.points.iter().zip(&b.points) {
                assert!(pa.iter().zip(pb).all(|(x, y)| (x - y).abs() < 1e-9));
            }
        }
    }
}
