use nalgebra::Point3 as NaPoint3;

/// 3D座標（単位は入力データに従う）
pub type Point3 = NaPoint3<f64>;

/// 2点間のユークリッド距離
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    nalgebra::distance(a, b)
}
