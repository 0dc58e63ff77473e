use nalgebra;

pub use itertools::{izip, Itertools};
pub use std::ops::AddAssign;

//------------------------------------------------------------------------------
// Types
//------------------------------------------------------------------------------

/// Matrix (3 x 3)
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Matrix (3 x Points)
pub type Matrix3xX = nalgebra::Matrix3xX<f64>;

/// Matrix (Neighbors x 3)
pub type MatrixXx3 = nalgebra::MatrixXx3<f64>;

pub type Vector3 = nalgebra::Vector3<f64>;
pub type Vector6 = nalgebra::Vector6<f64>;

/// Column vector (stacked residual rows)
pub type VectorD = nalgebra::DVector<f64>;

//------------------------------------------------------------------------------
// Traits
//------------------------------------------------------------------------------

pub trait Matrix3ColsExt {
    fn columns3(&self) -> [Vector3; 3];
}

impl Matrix3ColsExt for Matrix3 {
    fn columns3(&self) -> [Vector3; 3] {
        [
            Vector3::from(self.column(0)),
            Vector3::from(self.column(1)),
            Vector3::from(self.column(2)),
        ]
    }
}
