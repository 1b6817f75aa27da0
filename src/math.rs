
//! Simple math utilities.

/// Simple two-dimensional vector of any numerical type.
/// Used mainly as a data struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2<T> (pub T, pub T);

impl<T: Copy> Vec2<T> {

    /// The first component of the vector.
    pub fn x(self) -> T { self.0 }

    /// The second component of the vector.
    pub fn y(self) -> T { self.1 }

    /// Seeing this vector as a dimension (width and height),
    /// this returns the area that the dimensions contain.
    pub fn area(self) -> T where T: std::ops::Mul<T, Output = T> {
        self.0 * self.1
    }
}

impl<T> From<(T, T)> for Vec2<T> {
    fn from((x, y): (T, T)) -> Self { Vec2(x, y) }
}

impl<T> From<Vec2<T>> for (T, T) {
    fn from(vec2: Vec2<T>) -> Self { (vec2.0, vec2.1) }
}
