pub type Vector2F = Vector2X<f32>;

#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Vector2X<T> {
    pub x: T,
    pub y: T,
}

pub type Rect2F = Rect2X<f32>;

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Rect2X<T> {
    pub pos: Vector2X<T>,
    pub size: Vector2X<T>,
}

impl<T: std::fmt::Display> std::fmt::Display for Vector2X<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Rect2X<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[({},{}), ({},{})]", self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

impl<T> Vector2X<T>
where
    T: Default
{
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: T::default(), y: T::default() }
    }
}

impl<T> std::ops::Add for Vector2X<T>
where
    T: std::ops::Add<Output = T>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y
        }
    }
}

impl<T> std::ops::AddAssign for Vector2X<T>
where
    T: std::ops::AddAssign
{
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T> std::ops::Sub for Vector2X<T>
where
    T: std::ops::Sub<Output = T>
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: T::sub(self.x, rhs.x),
            y: T::sub(self.y, rhs.y)
        }
    }
}

impl<T> std::ops::Mul<T> for Vector2X<T>
where
    T: std::ops::Mul<Output = T> + Copy
{
    type Output = Self;
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs
        }
    }
}

impl<T> Rect2X<T> {
    pub fn new(x: T, y: T, w: T, h: T) -> Self {
        Self { pos: Vector2X { x, y }, size: Vector2X { x: w, y: h } }
    }
}

impl<T> Rect2X<T>
where
    T: PartialOrd + std::ops::Add<Output = T> + Copy
{
    pub fn contains(&self, point: &Vector2X<T>) -> bool {
        point.x >= self.pos.x
            && point.y >= self.pos.y
            && point.x < self.pos.x + self.size.x
            && point.y < self.pos.y + self.size.y
    }

    /// Strict half-open overlap test. Rectangles touching exactly at an
    /// edge or corner do not count as overlapping.
    pub fn intersects(&self, other: &Rect2X<T>) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

#[test]
fn test_vector_creation() {
    let v1 = Vector2X::<f32>::new(1.0, 2.0);
    assert_eq!(v1.x, 1.0);
    assert_eq!(v1.y, 2.0);
}

#[test]
fn test_vector_add() {
    let v1 = Vector2X::<f32>::new(1.0, 2.0);
    let v2 = Vector2X::<f32>::new(10.0, 20.0);
    let v3 = v1 + v2;
    assert_eq!(v3.x, v1.x + v2.x);
    assert_eq!(v3.y, v1.y + v2.y);
}

#[test]
fn test_vector_add_assign() {
    let v1 = Vector2X::<f32>::new(1.0, 2.0);
    let mut v2 = Vector2X::<f32>::new(10.0, 20.0);
    v2 += v1;
    assert_eq!(v2.x, 11.0);
    assert_eq!(v2.y, 22.0);
}

#[test]
fn test_vector_mul_scalar() {
    let v1 = Vector2X::<f32>::new(1.0, 2.0);
    let scalar = 5.0;
    let v1_multiplied = v1 * scalar;
    assert_eq!(v1_multiplied.x, v1.x * scalar);
    assert_eq!(v1_multiplied.y, v1.y * scalar);
}

#[test]
fn test_rect_creation() {
    let position = Vector2X::<f32>::new(1.0, 0.0);
    let size = Vector2X::<f32>::new(3.0, 5.0);
    let rect = Rect2X::new(position.x, position.y, size.x, size.y);
    assert_eq!(rect.pos, position);
    assert_eq!(rect.size, size);
}

#[test]
fn test_rect_containing() {
    let position = Vector2X::<f32>::new(1.0, 0.0);
    let size = Vector2X::<f32>::new(3.0, 5.0);
    let rect = Rect2X::new(position.x, position.y, size.x, size.y);

    let p1_inside = position;
    let p2_not_inside = position + Vector2X::new(size.x, 0.0);
    let p3_not_inside = position + Vector2X::new(0.0, size.y);
    let p4_not_inside = position + size;
    let p5_inside = position + Vector2X::new(size.x / 2.0, size.y / 2.0);

    assert!(rect.contains(&p1_inside));
    assert!(!rect.contains(&p2_not_inside));
    assert!(!rect.contains(&p3_not_inside));
    assert!(!rect.contains(&p4_not_inside));
    assert!(rect.contains(&p5_inside));
}

#[test]
fn test_rect_overlapping() {
    let r1 = Rect2F::new(0.0, 0.0, 0.2, 0.2);
    let r2 = Rect2F::new(0.1, 0.1, 0.2, 0.2);
    assert!(r1.intersects(&r2));
    assert!(r2.intersects(&r1));
}

#[test]
fn test_rect_contained_rect_overlaps() {
    let outer = Rect2F::new(0.0, 0.0, 1.0, 1.0);
    let inner = Rect2F::new(0.4, 0.4, 0.1, 0.1);
    assert!(outer.intersects(&inner));
    assert!(inner.intersects(&outer));
}

#[test]
fn test_rect_edge_touch_is_not_overlap() {
    let r1 = Rect2F::new(0.0, 0.0, 0.2, 0.2);
    let touching_right = Rect2F::new(0.2, 0.0, 0.05, 0.05);
    let touching_top = Rect2F::new(0.0, 0.2, 0.05, 0.05);
    let touching_corner = Rect2F::new(0.2, 0.2, 0.05, 0.05);
    assert!(!r1.intersects(&touching_right));
    assert!(!r1.intersects(&touching_top));
    assert!(!r1.intersects(&touching_corner));

    let barely_inside = Rect2F::new(0.19, 0.19, 0.05, 0.05);
    assert!(r1.intersects(&barely_inside));
}

#[test]
fn test_rect_disjoint_does_not_overlap() {
    let r1 = Rect2F::new(-0.5, -0.5, 0.2, 0.2);
    let r2 = Rect2F::new(0.5, 0.5, 0.2, 0.2);
    assert!(!r1.intersects(&r2));
}
