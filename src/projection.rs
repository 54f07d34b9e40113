use nalgebra::Matrix4;

use crate::dataset::JointSequence;
use crate::error::{Error, Result};
use crate::hand::{HandFrame, HandJoint};
use crate::rig::{CameraView, Rig};

/// 全カメラ視点の関節座標
///
/// frames[view][frame] がそのカメラ座標系での手の関節。
#[derive(Debug, Clone)]
pub struct MultiViewJoints {
    pub serials: Vec<String>,
    pub frames: Vec<Vec<HandFrame>>,
    /// 入力関節配列の形状
    pub source_shape: Vec<usize>,
}

/// 各カメラ座標系へ関節を変換: inverse(extrinsics) @ joints
///
/// 逆行列はカメラごとに1回だけ計算する。
pub fn project_views(rig: &Rig, joints: &JointSequence) -> Result<MultiViewJoints> {
    let mut serials = Vec::with_capacity(rig.len());
    let mut frames = Vec::with_capacity(rig.len());

    for view in &rig.views {
        let inv = view.world_to_camera()?;
        frames.push(transform_sequence(&inv, joints));
        serials.push(view.serial.clone());
    }

    Ok(MultiViewJoints {
        serials,
        frames,
        source_shape: joints.source_shape.clone(),
    })
}

fn transform_sequence(transform: &Matrix4<f64>, joints: &JointSequence) -> Vec<HandFrame> {
    joints
        .frames
        .iter()
        .map(|frame| HandFrame::new(frame.joints.map(|p| transform * p)))
        .collect()
}

impl MultiViewJoints {
    pub fn view_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }

    /// (views, N, 21, 4)
    pub fn shape(&self) -> [usize; 4] {
        [self.view_count(), self.frame_count(), HandJoint::COUNT, 4]
    }

    /// 入力の末尾次元を保った出力形状。(N, 21, 4, 1) なら (views, N, 21, 4, 1)
    pub fn array_shape(&self) -> Vec<usize> {
        let mut shape = self.shape().to_vec();
        if self.source_shape.len() == 4 {
            shape.push(1);
        }
        shape
    }

    pub fn frame(&self, view: usize, frame: usize) -> Result<&HandFrame> {
        let frames = self.frames.get(view).ok_or(Error::ViewOutOfRange {
            index: view,
            count: self.frames.len(),
        })?;
        frames.get(frame).ok_or(Error::FrameOutOfRange {
            index: frame,
            count: frames.len(),
        })
    }

    /// カメラ座標系での xyz
    pub fn xyz(&self, view: usize, frame: usize) -> Result<Vec<[f64; 3]>> {
        Ok(self.frame(view, frame)?.xyz())
    }

    /// 0方向へ切り捨てた整数座標（int64 バッファと同じ値）
    pub fn xyz_truncated(&self, view: usize, frame: usize) -> Result<Vec<[i64; 3]>> {
        Ok(self
            .xyz(view, frame)?
            .into_iter()
            .map(|p| p.map(to_int64))
            .collect())
    }

    /// ピクセル座標。カメラの後ろの関節は None
    pub fn pixels(&self, rig: &Rig, view: usize, frame: usize) -> Result<Vec<Option<(f64, f64)>>> {
        let hand = self.frame(view, frame)?;
        let camera: &CameraView = rig.views.get(view).ok_or(Error::ViewOutOfRange {
            index: view,
            count: rig.len(),
        })?;
        Ok(hand
            .joints
            .iter()
            .map(|p| camera.intrinsics.project(&p.xyz()))
            .collect())
    }
}

/// numpy の int64 キャストと同じ値。NaN・無限大・範囲外は i64::MIN
fn to_int64(v: f64) -> i64 {
    if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        v as i64
    } else {
        i64::MIN
    }
}
