use ndarray::{Array1, Array2, Zip};

/// Samples per axis.
pub const GRID_SIZE: usize = 500;
/// Angular frequency of both the sine and the cosine term.
pub const FREQUENCY: f64 = 5.0;
/// Inclusive coordinate range shared by both axes.
pub const EXTENT: (f64, f64) = (-1.0, 1.0);

pub struct Mesh {
    /// `x[[i, j]]` is the j-th axis coordinate, constant down each column.
    pub x: Array2<f64>,
    /// `y[[i, j]]` is the i-th axis coordinate, constant along each row.
    pub y: Array2<f64>,
}

pub fn axis() -> Array1<f64> {
    Array1::linspace(EXTENT.0, EXTENT.1, GRID_SIZE)
}

pub fn meshgrid(x: &Array1<f64>, y: &Array1<f64>) -> Mesh {
    let shape = (y.len(), x.len());
    Mesh {
        x: Array2::from_shape_fn(shape, |(_, j)| x[j]),
        y: Array2::from_shape_fn(shape, |(i, _)| y[i]),
    }
}

/// `sin(5x) * cos(5y)` evaluated elementwise over the mesh.
pub fn interference(mesh: &Mesh) -> Array2<f64> {
    Zip::from(&mesh.x)
        .and(&mesh.y)
        .map_collect(|&x, &y| (FREQUENCY * x).sin() * (FREQUENCY * y).cos())
}

pub fn synthesize() -> Array2<f64> {
    let axis = axis();
    interference(&meshgrid(&axis, &axis))
}
