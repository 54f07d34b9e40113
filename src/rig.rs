use nalgebra::{Matrix4, Vector3, Vector4};

use crate::config::{CameraConfig, RigConfig};
use crate::error::{Error, Result};

/// ジンバルロック判定の閾値
const GIMBAL_EPS: f64 = 0.9999999;

/// 内部パラメータ（ピンホール）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Intrinsics {
    pub fn from_array(k: [f64; 4]) -> Self {
        Self { fx: k[0], fy: k[1], cx: k[2], cy: k[3] }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.fx, self.fy, self.cx, self.cy]
    }

    /// カメラ座標 → ピクセル座標
    ///
    /// カメラの後ろ (z <= 0) の点は None
    pub fn project(&self, p: &Vector3<f64>) -> Option<(f64, f64)> {
        if p.z <= 0.0 {
            return None;
        }
        let u = p.x / p.z * self.fx + self.cx;
        let v = p.y / p.z * self.fy + self.cy;
        Some((u, v))
    }
}

/// リグ内の1台のカメラ
#[derive(Debug, Clone)]
pub struct CameraView {
    pub serial: String,
    /// カメラ→ワールド変換
    pub extrinsics: Matrix4<f64>,
    pub intrinsics: Intrinsics,
    pub color: String,
}

impl CameraView {
    pub fn from_config(config: &CameraConfig) -> Self {
        let flat: Vec<f64> = config.extrinsics.iter().flatten().copied().collect();
        Self {
            serial: config.serial.clone(),
            extrinsics: Matrix4::from_row_slice(&flat),
            intrinsics: Intrinsics::from_array(config.intrinsics),
            color: config.color.clone(),
        }
    }

    /// ワールド→カメラ変換（外部パラメータの逆行列）
    ///
    /// 回転部が厳密な直交行列とは限らないので転置ではなく一般の逆行列を使う。
    pub fn world_to_camera(&self) -> Result<Matrix4<f64>> {
        self.extrinsics
            .try_inverse()
            .ok_or_else(|| Error::SingularExtrinsics(self.serial.clone()))
    }

    /// ワールド座標でのカメラ中心
    pub fn center(&self) -> Vector3<f64> {
        (self.extrinsics * Vector4::new(0.0, 0.0, 0.0, 1.0)).xyz()
    }

    /// 回転部の XYZ オイラー角（ラジアン）
    pub fn euler_xyz(&self) -> [f64; 3] {
        let m = &self.extrinsics;
        let (m11, m12, m13) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let (m22, m23) = (m[(1, 1)], m[(1, 2)]);
        let (m32, m33) = (m[(2, 1)], m[(2, 2)]);

        let y = m13.clamp(-1.0, 1.0).asin();
        if m13.abs() < GIMBAL_EPS {
            let x = f64::atan2(-m23, m33);
            let z = f64::atan2(-m12, m11);
            [x, y, z]
        } else {
            let x = f64::atan2(m32, m22);
            [x, y, 0.0]
        }
    }

    /// 行列を row-major の配列で返す
    pub fn extrinsics_rows(&self) -> [[f64; 4]; 4] {
        std::array::from_fn(|r| std::array::from_fn(|c| self.extrinsics[(r, c)]))
    }
}

/// 複数カメラ構成
#[derive(Debug, Clone)]
pub struct Rig {
    pub width: u32,
    pub height: u32,
    pub views: Vec<CameraView>,
}

impl Rig {
    pub fn from_config(config: &RigConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            views: config.cameras.iter().map(CameraView::from_config).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// シリアル番号でカメラを探す
    pub fn view(&self, serial: &str) -> Option<&CameraView> {
        self.views.iter().find(|v| v.serial == serial)
    }

    /// ピクセルが画像内か
    pub fn contains_pixel(&self, u: f64, v: f64) -> bool {
        u >= 0.0 && v >= 0.0 && u < self.width as f64 && v < self.height as f64
    }
}
